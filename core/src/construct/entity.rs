use super::{recompute, try_intersect, EntityId, EntityKind, Rule, RuleError, Shape};
use crate::config::DisplayConfig;
use crate::scene::{placement_matrix, Appearance, PlacementHandle, Scene};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFlags {
    pub selected: bool,
    /// Marked by the user to move together with a dragged entity
    pub pinned: bool,
    pub hidden: bool,
    /// Transient dirty bit, cleared at the end of every sweep
    pub moved: bool,
}

/// A geometric object produced by a construction rule.
///
/// Dependencies, rule and flags are only changed through the
/// [`ConstructionGraph`](crate::graph::ConstructionGraph) that owns the entity.
#[derive(Debug, Clone)]
pub struct ConstructedEntity {
    id: EntityId,
    kind: EntityKind,
    pub(crate) rule: Rule,
    pub(crate) dependencies: Vec<EntityId>,
    placement: PlacementHandle,
    pub(crate) shape: Shape,
    pub(crate) flags: EntityFlags,
}

impl ConstructedEntity {
    /// A directly placed entity with no dependencies.
    pub(crate) fn free(shape: Shape, placement: PlacementHandle) -> Self {
        Self {
            id: EntityId::new(),
            kind: shape.kind(),
            rule: Rule::Free,
            dependencies: Vec::new(),
            placement,
            shape,
            flags: EntityFlags::default(),
        }
    }

    pub(crate) fn derived(
        rule: Rule,
        dependencies: Vec<EntityId>,
        shape: Shape,
        placement: PlacementHandle,
    ) -> Self {
        Self {
            id: EntityId::new(),
            kind: shape.kind(),
            rule,
            dependencies,
            placement,
            shape,
            flags: EntityFlags::default(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    pub fn rule_id(&self) -> i32 {
        self.rule.id()
    }

    pub fn dependencies(&self) -> &[EntityId] {
        &self.dependencies
    }

    pub fn placement(&self) -> PlacementHandle {
        self.placement
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn flags(&self) -> EntityFlags {
        self.flags
    }

    pub fn is_selected(&self) -> bool {
        self.flags.selected
    }

    pub fn is_pinned(&self) -> bool {
        self.flags.pinned
    }

    pub fn is_hidden(&self) -> bool {
        self.flags.hidden
    }

    pub fn is_moved(&self) -> bool {
        self.flags.moved
    }

    /// Free or connected entities can be dragged directly.
    pub fn is_manual(&self) -> bool {
        self.rule.is_manual()
    }

    /// Geometry this entity's rule yields from its dependencies' shapes,
    /// given in dependency order.
    pub fn recompute(&self, deps: &[Shape]) -> Result<Shape, RuleError> {
        recompute(self.kind, self.rule, &self.shape, deps)
    }

    pub fn try_intersect(&self, other: &ConstructedEntity) -> Option<Shape> {
        try_intersect(&self.shape, &other.shape)
    }

    /// Display state derived from kind and flags. Hidden segments and lines
    /// shrink to a thin marker, hidden planes and triangles fade.
    pub fn appearance(&self, display: &DisplayConfig) -> Appearance {
        let hidden = self.flags.hidden;
        let pick = |normal: f32, thin: f32| if hidden { thin } else { normal };
        let (opacity, thickness) = match self.kind {
            EntityKind::Point => (1.0, pick(display.point_radius, display.hidden_point_radius)),
            EntityKind::Segment | EntityKind::Line => {
                (1.0, pick(display.line_thickness, display.hidden_line_thickness))
            }
            EntityKind::Plane => (
                pick(display.plane_opacity, display.hidden_plane_opacity),
                display.line_thickness,
            ),
            EntityKind::Triangle => (
                pick(display.triangle_opacity, display.hidden_triangle_opacity),
                display.line_thickness,
            ),
        };
        Appearance {
            highlighted: self.flags.selected,
            hidden,
            opacity,
            thickness,
        }
    }

    pub(crate) fn set_highlight<S: Scene + ?Sized>(
        &mut self,
        on: bool,
        scene: &mut S,
        display: &DisplayConfig,
    ) {
        self.flags.selected = on;
        scene.set_appearance(self.placement, &self.appearance(display));
    }

    pub(crate) fn set_hidden<S: Scene + ?Sized>(
        &mut self,
        hidden: bool,
        scene: &mut S,
        display: &DisplayConfig,
    ) {
        self.flags.hidden = hidden;
        scene.set_appearance(self.placement, &self.appearance(display));
    }

    /// Pushes the cached shape to the scene instance.
    pub(crate) fn sync_placement<S: Scene + ?Sized>(&self, scene: &mut S) {
        scene.set_transform(self.placement, &placement_matrix(&self.shape));
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind: self.kind,
            rule_id: self.rule.id(),
            dependencies: self.dependencies.clone(),
            placement: self.placement,
            shape: self.shape,
            flags: self.flags,
        }
    }
}

/// Serializable view of an entity for hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rule_id: i32,
    pub dependencies: Vec<EntityId>,
    pub placement: PlacementHandle,
    pub shape: Shape,
    pub flags: EntityFlags,
}
