//! Host-facing driver.
//!
//! The host calls [`Controller::handle_event`] for every input event and
//! [`Controller::update`] once per rendered frame. Within a frame the pending
//! drag is applied first, then dependents are recomputed, then the dirty bits
//! are cleared; all of it happens inside [`ConstructionGraph`].

use crate::config::EngineConfig;
use crate::construct::{
    build, try_intersect, ConstructedEntity, EntityId, EntityKind, EntitySnapshot, Rule, RuleError,
    Shape,
};
use crate::geometry::{Point3, Vector3};
use crate::graph::{ConstructionGraph, GraphError};
use crate::input::{CursorHint, InputEvent, Key, Modifiers, PointerButton};
use crate::scene::{Material, Scene};
use crate::selection::{
    command, is_available, is_ready, resolve, Action, Candidate, CommandCode, SelectionState,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command {0}")]
    UnknownCommand(CommandCode),

    #[error("Selection does not fit command {0}")]
    NotReady(CommandCode),

    #[error("Selected entities do not intersect")]
    NoIntersection,

    #[error("Placing free points is disabled")]
    NotAllowed,

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl CommandError {
    /// Stable short code for hosts.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            CommandError::NotReady(_) => "NOT_READY",
            CommandError::NoIntersection => "NO_INTERSECTION",
            CommandError::NotAllowed => "NOT_ALLOWED",
            CommandError::Graph(GraphError::CycleRejected { .. }) => "CYCLE_REJECTED",
            CommandError::Graph(GraphError::NotConnectable(_)) => "NOT_CONNECTABLE",
            CommandError::Graph(GraphError::NotManual(_)) => "NOT_MANUAL",
            CommandError::Graph(_) => "GRAPH_ERROR",
            CommandError::Rule(_) => "RULE_ERROR",
        }
    }
}

/// What an input event did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data")]
pub enum EventOutcome {
    Ignored,
    Selected(EntityId),
    Deselected(EntityId),
    SelectionCleared,
    Created(EntityId),
    Deleted(Vec<EntityId>),
    DragStarted(EntityId),
    DragEnded(EntityId),
    Connected { entity: EntityId, target: EntityId },
    /// The connect would have closed a cycle; the point was moved onto the
    /// target instead, without a dependency edge.
    ConnectFallback { entity: EntityId, target: EntityId },
    HiddenToggled(Vec<EntityId>),
    PinnedToggled(Vec<EntityId>),
}

#[derive(Debug, Clone)]
struct Drag {
    entity: EntityId,
    group: Vec<EntityId>,
}

pub struct Controller<S: Scene> {
    graph: ConstructionGraph,
    scene: S,
    selection: SelectionState,
    config: EngineConfig,
    command: Option<CommandCode>,
    hovered: Option<EntityId>,
    modifiers: Modifiers,
    drag: Option<Drag>,
    pending: Vector3,
}

impl<S: Scene> Controller<S> {
    pub fn new(scene: S, config: EngineConfig) -> Self {
        Self {
            graph: ConstructionGraph::new(),
            scene,
            selection: SelectionState::new(),
            config,
            command: None,
            hovered: None,
            modifiers: Modifiers::NONE,
            drag: None,
            pending: Vector3::zeros(),
        }
    }

    pub fn graph(&self) -> &ConstructionGraph {
        &self.graph
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The host reports picks through its scene.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.graph.snapshot()
    }

    // =========================================================================
    // Host interface
    // =========================================================================

    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        command: Option<CommandCode>,
    ) -> Result<EventOutcome, CommandError> {
        self.arm(command);
        self.modifiers = event.modifiers();
        self.refresh_hover();

        match *event {
            InputEvent::PointerPress { button: PointerButton::Primary, position, .. } => {
                self.press(position)
            }
            InputEvent::PointerPress { button: PointerButton::Secondary, .. } => {
                Ok(self.cancel())
            }
            InputEvent::PointerPress { .. } => Ok(EventOutcome::Ignored),
            InputEvent::PointerRelease { button: PointerButton::Primary, modifiers } => {
                self.release(modifiers)
            }
            InputEvent::PointerRelease { .. } => Ok(EventOutcome::Ignored),
            InputEvent::PointerMove { delta, .. } | InputEvent::Scroll { delta, .. } => {
                if self.drag.is_some() {
                    self.pending += delta;
                }
                Ok(EventOutcome::Ignored)
            }
            InputEvent::KeyPress { key, .. } => self.key(key),
        }
    }

    /// Per-frame pass. Returns the cursor hint for the host.
    pub fn update(&mut self, command: Option<CommandCode>) -> CursorHint {
        self.arm(command);
        self.refresh_hover();
        if let Err(err) = self.apply_drag() {
            warn!(%err, "drag step failed");
            if matches!(err, GraphError::StalePlacement(_) | GraphError::UnknownEntity(_)) {
                self.drag = None;
                self.pending = Vector3::zeros();
            }
        }
        self.cursor_hint()
    }

    // =========================================================================
    // Programmatic interface
    // =========================================================================

    /// Places a free point, as the place-point command does.
    pub fn place_point(&mut self, position: Point3) -> Result<EntityId, CommandError> {
        if !self.config.allow_free_points {
            return Err(CommandError::NotAllowed);
        }
        let handle = self.scene.create_instance(EntityKind::Point, Material::Free);
        let entity = ConstructedEntity::free(Shape::Point(position), handle);
        let id = self.insert(entity)?;
        info!(%id, ?position, "free point placed");
        Ok(id)
    }

    /// Selects `ids` in order for `code` and fires it.
    pub fn execute(&mut self, code: CommandCode, ids: &[EntityId]) -> Result<EventOutcome, CommandError> {
        command(code).ok_or(CommandError::UnknownCommand(code))?;
        self.arm(Some(code));
        self.clear_selection();
        for &id in ids {
            let candidate = Candidate::of(self.graph.get(id).ok_or(GraphError::UnknownEntity(id))?);
            if !is_available(code, candidate, &self.selection.candidates()) {
                self.clear_selection();
                return Err(CommandError::NotReady(code));
            }
            self.select(id)?;
        }
        self.fire(code)
    }

    /// Explicit edit of a free or connected entity's geometry.
    pub fn move_entity(&mut self, id: EntityId, shape: Shape) -> Result<usize, CommandError> {
        Ok(self.graph.set_manual_shape(id, shape, &mut self.scene)?)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn arm(&mut self, command: Option<CommandCode>) {
        if command != self.command {
            debug!(?command, "command armed");
            self.clear_selection();
            self.command = command;
        }
    }

    fn refresh_hover(&mut self) {
        self.hovered = self
            .scene
            .pick()
            .and_then(|pick| self.graph.find_by_placement(pick.handle));
    }

    fn press(&mut self, position: Point3) -> Result<EventOutcome, CommandError> {
        let Some(code) = self.command else {
            return Ok(self.start_drag());
        };
        let spec = command(code).ok_or(CommandError::UnknownCommand(code))?;
        if spec.places_point() {
            return self.place_point(position).map(EventOutcome::Created);
        }

        let Some(id) = self.hovered else {
            return Ok(EventOutcome::Ignored);
        };
        if self.selection.contains(id) {
            self.selection.deselect(id);
            self.graph
                .set_selected(id, false, &mut self.scene, &self.config.display)?;
            return Ok(EventOutcome::Deselected(id));
        }

        let candidate = Candidate::of(self.graph.get(id).ok_or(GraphError::UnknownEntity(id))?);
        if !is_available(code, candidate, &self.selection.candidates()) {
            return Ok(EventOutcome::Ignored);
        }
        self.select(id)?;

        if is_ready(code, &self.selection.candidates()) {
            self.fire(code)
        } else {
            Ok(EventOutcome::Selected(id))
        }
    }

    fn start_drag(&mut self) -> EventOutcome {
        let Some(id) = self.hovered else {
            return EventOutcome::Ignored;
        };
        match self.graph.drag_group(id) {
            Ok(group) if !group.is_empty() => {
                debug!(%id, group = group.len(), "drag started");
                self.drag = Some(Drag { entity: id, group });
                self.pending = Vector3::zeros();
                EventOutcome::DragStarted(id)
            }
            _ => EventOutcome::Ignored,
        }
    }

    fn apply_drag(&mut self) -> Result<(), GraphError> {
        let Some(drag) = &self.drag else {
            return Ok(());
        };
        if self.pending == Vector3::zeros() {
            return Ok(());
        }
        let delta = std::mem::replace(&mut self.pending, Vector3::zeros());
        self.graph.translate_group(&drag.group, &delta, &mut self.scene)?;
        Ok(())
    }

    fn release(&mut self, modifiers: Modifiers) -> Result<EventOutcome, CommandError> {
        self.apply_drag()?;
        let Some(drag) = self.drag.take() else {
            return Ok(EventOutcome::Ignored);
        };
        let entity = drag.entity;

        let target = match self.hovered {
            Some(target) if target != entity && modifiers.has(self.config.connect_modifier) => target,
            _ => return Ok(EventOutcome::DragEnded(entity)),
        };

        self.connect(entity, target)
    }

    /// Connects `entity` onto `target`. When the edge would close a cycle the
    /// point is only placed on the target, with no dependency added.
    fn connect(&mut self, entity: EntityId, target: EntityId) -> Result<EventOutcome, CommandError> {
        match self.graph.connect(entity, target, &mut self.scene) {
            Ok(()) => Ok(EventOutcome::Connected { entity, target }),
            Err(GraphError::CycleRejected { .. }) => {
                let current = self.shape_of(entity)?.anchor();
                let on_target = self.shape_of(target)?.closest_point(&current);
                self.graph
                    .set_manual_shape(entity, Shape::Point(on_target), &mut self.scene)?;
                info!(%entity, %target, "connect rejected, point projected onto target");
                Ok(EventOutcome::ConnectFallback { entity, target })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn key(&mut self, key: Key) -> Result<EventOutcome, CommandError> {
        match key {
            Key::Escape => Ok(self.cancel()),
            Key::Delete => {
                let mut removed = Vec::new();
                for id in self.targets() {
                    if self.graph.contains(id) {
                        removed.extend(self.graph.remove_cascade(id, &mut self.scene)?);
                    }
                }
                self.clear_selection();
                self.forget_removed();
                Ok(if removed.is_empty() { EventOutcome::Ignored } else { EventOutcome::Deleted(removed) })
            }
            Key::Hide => {
                let targets = self.targets();
                for &id in &targets {
                    self.graph.toggle_hidden(id, &mut self.scene, &self.config.display)?;
                }
                self.clear_selection();
                Ok(if targets.is_empty() { EventOutcome::Ignored } else { EventOutcome::HiddenToggled(targets) })
            }
            Key::Pin => {
                let targets: Vec<EntityId> = self
                    .targets()
                    .into_iter()
                    .filter(|id| self.graph.get(*id).map_or(false, |e| e.is_manual()))
                    .collect();
                for &id in &targets {
                    self.graph.toggle_pinned(id)?;
                }
                self.clear_selection();
                Ok(if targets.is_empty() { EventOutcome::Ignored } else { EventOutcome::PinnedToggled(targets) })
            }
            Key::Other(_) => Ok(EventOutcome::Ignored),
        }
    }

    /// Entities a key acts on: the selection, or the hovered entity.
    fn targets(&self) -> Vec<EntityId> {
        if self.selection.is_empty() {
            self.hovered.into_iter().collect()
        } else {
            self.selection.ids()
        }
    }

    fn cancel(&mut self) -> EventOutcome {
        self.drag = None;
        self.pending = Vector3::zeros();
        if self.clear_selection() {
            EventOutcome::SelectionCleared
        } else {
            EventOutcome::Ignored
        }
    }

    fn fire(&mut self, code: CommandCode) -> Result<EventOutcome, CommandError> {
        let result = self.fire_resolved(code);
        self.clear_selection();
        if let Err(err) = &result {
            warn!(%code, %err, "command failed");
        }
        result
    }

    fn fire_resolved(&mut self, code: CommandCode) -> Result<EventOutcome, CommandError> {
        let resolved = resolve(code, &self.selection.candidates()).ok_or(CommandError::NotReady(code))?;
        let items = self.selection.items();
        let ids: Vec<EntityId> = resolved.order.iter().map(|&i| items[i].id).collect();

        match resolved.action {
            Action::Construct(rule) => self.construct(rule, ids).map(EventOutcome::Created),
            Action::Intersect => {
                let (a, b) = (self.shape_of(ids[0])?, self.shape_of(ids[1])?);
                try_intersect(&a, &b).ok_or(CommandError::NoIntersection)?;
                self.construct(Rule::Intersection, ids).map(EventOutcome::Created)
            }
            Action::Connect => self.connect(ids[0], ids[1]),
            Action::Delete => {
                let removed = self.graph.remove_cascade(ids[0], &mut self.scene)?;
                self.forget_removed();
                Ok(EventOutcome::Deleted(removed))
            }
            Action::ToggleHidden => {
                self.graph
                    .toggle_hidden(ids[0], &mut self.scene, &self.config.display)?;
                Ok(EventOutcome::HiddenToggled(ids))
            }
            Action::TogglePinned => {
                self.graph.toggle_pinned(ids[0])?;
                Ok(EventOutcome::PinnedToggled(ids))
            }
            Action::PlacePoint => Err(CommandError::NotReady(code)),
        }
    }

    fn construct(&mut self, rule: Rule, deps: Vec<EntityId>) -> Result<EntityId, CommandError> {
        let shapes = deps
            .iter()
            .map(|id| self.shape_of(*id))
            .collect::<Result<Vec<Shape>, _>>()?;
        let shape = build(rule, &shapes)?;
        let handle = self.scene.create_instance(shape.kind(), Material::Constructed);
        let id = self.insert(ConstructedEntity::derived(rule, deps, shape, handle))?;
        info!(%id, ?rule, kind = %shape.kind(), "entity constructed");
        Ok(id)
    }

    fn insert(&mut self, entity: ConstructedEntity) -> Result<EntityId, CommandError> {
        let handle = entity.placement();
        entity.sync_placement(&mut self.scene);
        self.scene
            .set_appearance(handle, &entity.appearance(&self.config.display));
        match self.graph.insert(entity) {
            Ok(id) => Ok(id),
            Err(err) => {
                self.scene.delete_instance(handle);
                Err(err.into())
            }
        }
    }

    fn select(&mut self, id: EntityId) -> Result<(), CommandError> {
        let candidate = Candidate::of(self.graph.get(id).ok_or(GraphError::UnknownEntity(id))?);
        self.graph
            .set_selected(id, true, &mut self.scene, &self.config.display)?;
        self.selection.select(id, candidate);
        Ok(())
    }

    /// Returns whether anything was selected.
    fn clear_selection(&mut self) -> bool {
        let cleared = self.selection.clear();
        for item in &cleared {
            if self.graph.contains(item.id) {
                // Entity exists, so this cannot fail
                let _ = self
                    .graph
                    .set_selected(item.id, false, &mut self.scene, &self.config.display);
            }
        }
        !cleared.is_empty()
    }

    /// Drops references to entities that no longer exist.
    fn forget_removed(&mut self) {
        if self.hovered.map_or(false, |id| !self.graph.contains(id)) {
            self.hovered = None;
        }
        if let Some(drag) = &mut self.drag {
            drag.group.retain(|id| self.graph.contains(*id));
            if drag.group.is_empty() || !self.graph.contains(drag.entity) {
                self.drag = None;
            }
        }
    }

    fn shape_of(&self, id: EntityId) -> Result<Shape, CommandError> {
        Ok(*self.graph.get(id).ok_or(GraphError::UnknownEntity(id))?.shape())
    }

    fn cursor_hint(&self) -> CursorHint {
        if let Some(drag) = &self.drag {
            let over_other = self.hovered.map_or(false, |id| id != drag.entity);
            if over_other && self.modifiers.has(self.config.connect_modifier) {
                return CursorHint::Connectable;
            }
            return CursorHint::Dragging;
        }

        let Some(entity) = self.hovered.and_then(|id| self.graph.get(id)) else {
            return CursorHint::Neutral;
        };
        let actionable = match self.command {
            Some(code) => {
                self.selection.contains(entity.id())
                    || is_available(code, Candidate::of(entity), &self.selection.candidates())
            }
            None => entity.is_manual(),
        };
        if actionable {
            CursorHint::Hoverable
        } else {
            CursorHint::Neutral
        }
    }
}
