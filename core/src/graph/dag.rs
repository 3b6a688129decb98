use super::{GraphError, GraphResult};
use crate::config::DisplayConfig;
use crate::construct::{ConstructedEntity, EntityId, EntityKind, EntitySnapshot, Rule, Shape};
use crate::geometry::{Matrix4, Vector3};
use crate::scene::{shape_from_vertices, PlacementHandle, Scene};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, trace, warn};

/// The ordered collection of constructed entities.
///
/// Invariant: every entity appears after all entities in its dependency list.
/// Insertion preserves it trivially (dependencies must already exist); new
/// edges go through [`ConstructionGraph::add_dependency`], which restores it
/// with one stable partition or refuses the edge.
#[derive(Debug, Default, Clone)]
pub struct ConstructionGraph {
    entities: Vec<ConstructedEntity>,
    positions: HashMap<EntityId, usize>,
}

impl ConstructionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in topological order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstructedEntity> {
        self.entities.iter()
    }

    pub fn get(&self, id: EntityId) -> Option<&ConstructedEntity> {
        self.positions.get(&id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.positions.contains_key(&id)
    }

    fn entity(&self, id: EntityId) -> GraphResult<&ConstructedEntity> {
        self.get(id).ok_or(GraphError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> GraphResult<&mut ConstructedEntity> {
        match self.positions.get(&id) {
            Some(&i) => Ok(&mut self.entities[i]),
            None => Err(GraphError::UnknownEntity(id)),
        }
    }

    /// Index of an entity in the topological order.
    pub fn position(&self, id: EntityId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn order(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id()).collect()
    }

    pub fn find_by_placement(&self, handle: PlacementHandle) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.placement() == handle)
            .map(|e| e.id())
    }

    /// Entities that list `id` directly among their dependencies.
    pub fn dependents(&self, id: EntityId) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.dependencies().contains(&id))
            .map(|e| e.id())
            .collect()
    }

    pub fn is_topologically_sorted(&self) -> bool {
        self.entities.iter().enumerate().all(|(i, e)| {
            e.dependencies()
                .iter()
                .all(|dep| self.positions.get(dep).map_or(false, |&j| j < i))
        })
    }

    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.entities.iter().map(|e| e.snapshot()).collect()
    }

    /// Appends an entity. Its dependencies must already be in the graph.
    pub(crate) fn insert(&mut self, entity: ConstructedEntity) -> GraphResult<EntityId> {
        if let Some(missing) = entity.dependencies().iter().find(|d| !self.contains(**d)) {
            return Err(GraphError::UnknownEntity(*missing));
        }
        let id = entity.id();
        debug!(%id, kind = %entity.kind(), rule = ?entity.rule(), "inserting entity");
        self.positions.insert(id, self.entities.len());
        self.entities.push(entity);
        debug_assert!(self.is_topologically_sorted());
        Ok(id)
    }

    fn reindex(&mut self) {
        self.positions = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id(), i))
            .collect();
    }

    // =========================================================================
    // Propagation
    // =========================================================================

    pub fn mark_moved(&mut self, id: EntityId) -> GraphResult<()> {
        self.entity_mut(id)?.flags.moved = true;
        Ok(())
    }

    /// One forward sweep: an entity becomes moved if any of its dependencies
    /// is. Because dependencies come first, this reaches every descendant of
    /// every marked entity.
    pub fn propagate(&mut self) {
        for i in 0..self.entities.len() {
            if self.entities[i].flags.moved {
                continue;
            }
            let dirty = self.entities[i].dependencies.iter().any(|dep| {
                self.positions
                    .get(dep)
                    .map_or(false, |&j| self.entities[j].flags.moved)
            });
            if dirty {
                self.entities[i].flags.moved = true;
            }
        }
    }

    pub fn clear_moved(&mut self) {
        for e in &mut self.entities {
            e.flags.moved = false;
        }
    }

    /// Entities currently flagged as moved, in order.
    pub fn moved(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.is_moved())
            .map(|e| e.id())
            .collect()
    }

    /// Every entity that transitively depends on `id`, in order.
    pub fn descendants(&mut self, id: EntityId) -> GraphResult<Vec<EntityId>> {
        self.clear_moved();
        self.mark_moved(id)?;
        self.propagate();
        let result = self.moved().into_iter().filter(|d| *d != id).collect();
        self.clear_moved();
        Ok(result)
    }

    /// Recomputes every moved entity in order. Dependencies are up to date
    /// when an entity is reached. Free entities keep the geometry the scene gave them.
    pub fn recompute_moved<S: Scene + ?Sized>(&mut self, scene: &mut S) -> GraphResult<usize> {
        let mut count = 0;
        let mut first_error = None;

        for i in 0..self.entities.len() {
            let entity = &self.entities[i];
            if !entity.is_moved() || entity.rule() == Rule::Free {
                continue;
            }
            let deps: GraphResult<Vec<Shape>> = entity
                .dependencies()
                .iter()
                .map(|d| {
                    self.positions
                        .get(d)
                        .map(|&j| self.entities[j].shape)
                        .ok_or(GraphError::UnknownEntity(*d))
                })
                .collect();

            match deps.and_then(|deps| entity.recompute(&deps).map_err(GraphError::from)) {
                Ok(shape) => {
                    let entity = &mut self.entities[i];
                    entity.shape = shape;
                    entity.sync_placement(scene);
                    count += 1;
                }
                Err(err) => {
                    error!(id = %entity.id(), %err, "recompute failed, keeping previous geometry");
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(count),
        }
    }

    /// Per-frame propagation: marks `ids`, flags their descendants, recomputes
    /// them in order and clears the dirty bits. Returns how many entities were recomputed.
    pub fn update<S: Scene + ?Sized>(&mut self, ids: &[EntityId], scene: &mut S) -> GraphResult<usize> {
        self.clear_moved();
        for id in ids {
            self.mark_moved(*id)?;
        }
        self.propagate();
        let result = self.recompute_moved(scene);
        self.clear_moved();
        if let Ok(n) = result {
            trace!(recomputed = n, "propagation sweep done");
        }
        result
    }

    // =========================================================================
    // Edges
    // =========================================================================

    /// Adds `target` to `entity`'s dependencies, re-stabilizing the order, or
    /// refuses the edge when `target` already depends on `entity`.
    ///
    /// The moved set after one sweep from `entity` is exactly `entity` plus its
    /// descendants. If `target` is not in it, moving that set to the back (in
    /// its existing relative order) puts `target` before `entity` and keeps
    /// every other edge pointing backwards. On refusal the order is untouched.
    pub fn add_dependency(&mut self, entity: EntityId, target: EntityId) -> GraphResult<()> {
        self.entity(target)?;
        if self.entity(entity)?.dependencies().contains(&target) {
            return Ok(());
        }

        self.clear_moved();
        self.mark_moved(entity)?;
        self.propagate();

        if self.entity(target)?.is_moved() {
            self.clear_moved();
            warn!(%entity, %target, "dependency edge rejected: would create a cycle");
            return Err(GraphError::CycleRejected { entity, target });
        }

        let (moved, still): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.is_moved());
        self.entities = still;
        self.entities.extend(moved);
        self.reindex();

        self.entity_mut(entity)?.dependencies.push(target);
        self.clear_moved();
        debug_assert!(self.is_topologically_sorted());
        debug!(%entity, %target, "dependency edge added");
        Ok(())
    }

    /// Pins a free point onto `target`: the point gains `target` as its only
    /// dependency and from then on stays on it.
    pub fn connect<S: Scene + ?Sized>(
        &mut self,
        entity: EntityId,
        target: EntityId,
        scene: &mut S,
    ) -> GraphResult<()> {
        let e = self.entity(entity)?;
        if e.kind() != EntityKind::Point || e.rule() != Rule::Free {
            return Err(GraphError::NotConnectable(entity));
        }
        self.add_dependency(entity, target)?;
        self.entity_mut(entity)?.rule = Rule::Connect;
        self.update(&[entity], scene)?;
        info!(%entity, %target, "point connected");
        Ok(())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Removes `id` and everything that transitively depends on it, releasing
    /// their scene instances. Returns the removed ids in their former order.
    pub fn remove_cascade<S: Scene + ?Sized>(
        &mut self,
        id: EntityId,
        scene: &mut S,
    ) -> GraphResult<Vec<EntityId>> {
        self.clear_moved();
        self.mark_moved(id)?;
        self.propagate();

        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entities)
            .into_iter()
            .partition(|e| e.is_moved());
        self.entities = kept;
        self.reindex();

        for e in &removed {
            scene.delete_instance(e.placement());
        }
        let ids: Vec<EntityId> = removed.iter().map(|e| e.id()).collect();
        info!(%id, removed = ids.len(), "entity deleted with dependents");
        Ok(ids)
    }

    // =========================================================================
    // Direct manipulation
    // =========================================================================

    /// Entities that move with `id` when it is dragged: itself, plus every
    /// other pinned manual entity when `id` is itself pinned. Empty when `id`
    /// is derived.
    pub fn drag_group(&self, id: EntityId) -> GraphResult<Vec<EntityId>> {
        let e = self.entity(id)?;
        if !e.is_manual() {
            return Ok(Vec::new());
        }
        let mut group = vec![id];
        if e.is_pinned() {
            group.extend(
                self.entities
                    .iter()
                    .filter(|o| o.id() != id && o.is_pinned() && o.is_manual())
                    .map(|o| o.id()),
            );
        }
        Ok(group)
    }

    /// Applies a translation to every entity of `group` through the scene,
    /// then recomputes their dependents. Each entity is moved at most once per
    /// frame: a member that depends on another moved entity is left to the
    /// sweep instead of also receiving the delta.
    pub fn translate_group<S: Scene + ?Sized>(
        &mut self,
        group: &[EntityId],
        delta: &Vector3,
        scene: &mut S,
    ) -> GraphResult<usize> {
        let matrix = Matrix4::new_translation(delta);
        let mut moved_this_frame = HashSet::new();
        let mut members = Vec::with_capacity(group.len());

        self.clear_moved();
        for &id in group {
            if moved_this_frame.insert(id) {
                self.mark_moved(id)?;
                members.push(id);
            }
        }
        self.propagate();

        for id in members {
            if self.follows_moved(id) {
                trace!(%id, "group member follows its dependencies");
                continue;
            }
            let placement = self.entity(id)?.placement();
            scene.compose_transform_left(placement, &matrix);
            self.refresh_from_scene(id, scene)?;
        }

        let result = self.recompute_moved(scene);
        self.clear_moved();
        result
    }

    /// Whether any direct dependency of `id` is flagged moved.
    fn follows_moved(&self, id: EntityId) -> bool {
        self.get(id).map_or(false, |e| {
            e.dependencies()
                .iter()
                .any(|d| self.get(*d).map_or(false, |dep| dep.is_moved()))
        })
    }

    /// Places a manual entity at `shape` (an explicit edit) and recomputes its dependents.
    pub fn set_manual_shape<S: Scene + ?Sized>(
        &mut self,
        id: EntityId,
        shape: Shape,
        scene: &mut S,
    ) -> GraphResult<usize> {
        let e = self.entity_mut(id)?;
        if !e.is_manual() || e.kind() != shape.kind() {
            return Err(GraphError::NotManual(id));
        }
        e.shape = shape;
        e.sync_placement(scene);
        self.update(&[id], scene)
    }

    /// Reads a manual entity's geometry back from its scene instance.
    pub(crate) fn refresh_from_scene<S: Scene + ?Sized>(
        &mut self,
        id: EntityId,
        scene: &S,
    ) -> GraphResult<()> {
        let e = self.entity(id)?;
        let (kind, handle) = (e.kind(), e.placement());
        let shape = match kind {
            EntityKind::Point => scene.world_position(handle).map(Shape::Point),
            _ => scene
                .vertex_positions(handle)
                .and_then(|v| shape_from_vertices(kind, &v)),
        }
        .ok_or(GraphError::StalePlacement(handle))?;
        self.entity_mut(id)?.shape = shape;
        Ok(())
    }

    // =========================================================================
    // Flags
    // =========================================================================

    pub(crate) fn set_selected<S: Scene + ?Sized>(
        &mut self,
        id: EntityId,
        on: bool,
        scene: &mut S,
        display: &DisplayConfig,
    ) -> GraphResult<()> {
        self.entity_mut(id)?.set_highlight(on, scene, display);
        Ok(())
    }

    /// Returns the new hidden state.
    pub fn toggle_hidden<S: Scene + ?Sized>(
        &mut self,
        id: EntityId,
        scene: &mut S,
        display: &DisplayConfig,
    ) -> GraphResult<bool> {
        let e = self.entity_mut(id)?;
        let hidden = !e.is_hidden();
        e.set_hidden(hidden, scene, display);
        Ok(hidden)
    }

    /// Returns the new pinned state. Only manual entities can be pinned.
    pub fn toggle_pinned(&mut self, id: EntityId) -> GraphResult<bool> {
        let e = self.entity_mut(id)?;
        if !e.is_manual() {
            return Err(GraphError::NotManual(id));
        }
        e.flags.pinned = !e.flags.pinned;
        Ok(e.flags.pinned)
    }
}
