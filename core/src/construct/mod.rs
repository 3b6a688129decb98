//! Constructed entities: the closed set of kinds, their construction rules,
//! and how each kind recomputes its geometry from its dependencies.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use std::fmt;

pub mod shape;
pub use shape::Shape;

pub mod rules;
pub use rules::Rule;

pub mod recompute;
pub use recompute::{build, recompute};

pub mod intersect;
pub use intersect::{intersection_kind, try_intersect};

pub mod entity;
pub use entity::{ConstructedEntity, EntityFlags, EntitySnapshot};

#[cfg(test)]
mod tests_recompute;

/// Identifier of a constructed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of entity kinds, ordered by intersection rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Point = 0,
    Segment = 1,
    Line = 2,
    Plane = 3,
    Triangle = 4,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Point,
        EntityKind::Segment,
        EntityKind::Line,
        EntityKind::Plane,
        EntityKind::Triangle,
    ];

    /// The higher-ranked kind of a pair owns their intersection.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Kinds with a direction (usable as the axis of a perpendicular, parallel, mirror...).
    pub fn is_linear(self) -> bool {
        matches!(self, EntityKind::Segment | EntityKind::Line)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Point => "Point",
            EntityKind::Segment => "Segment",
            EntityKind::Line => "Line",
            EntityKind::Plane => "Plane",
            EntityKind::Triangle => "Triangle",
        };
        f.write_str(name)
    }
}

/// A dependency list that does not fit the rule it is fed to.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuleError {
    #[error("rule {rule:?} expects {expected} dependencies, got {got}")]
    Arity { rule: Rule, expected: usize, got: usize },

    #[error("rule {rule:?} cannot take a {got} at position {position}")]
    DependencyKind { rule: Rule, position: usize, got: EntityKind },

    #[error("rule {rule:?} cannot produce a {kind}")]
    OutputKind { rule: Rule, kind: EntityKind },
}
