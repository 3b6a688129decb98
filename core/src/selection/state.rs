use super::commands::{Candidate, Origin};
use crate::construct::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selected {
    pub id: EntityId,
    pub kind: EntityKind,
    pub origin: Origin,
}

/// Entities picked for the armed command, in the order they were picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionState {
    items: Vec<Selected>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Selected] {
        &self.items
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.items.iter().map(|s| s.id).collect()
    }

    pub fn kinds(&self) -> Vec<EntityKind> {
        self.items.iter().map(|s| s.kind).collect()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.items
            .iter()
            .map(|s| Candidate::new(s.kind, s.origin))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.iter().any(|s| s.id == id)
    }

    /// Appends an entity. Returns false if it was already selected.
    pub fn select(&mut self, id: EntityId, candidate: impl Into<Candidate>) -> bool {
        if self.contains(id) {
            return false;
        }
        let Candidate { kind, origin } = candidate.into();
        self.items.push(Selected { id, kind, origin });
        true
    }

    pub fn deselect(&mut self, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|s| s.id != id);
        self.items.len() != before
    }

    /// Empties the selection, returning what was selected.
    pub fn clear(&mut self) -> Vec<Selected> {
        std::mem::take(&mut self.items)
    }
}
