use crate::construct::{ConstructedEntity, EntityKind, Rule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Command armed by the host's menu surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandCode {
    pub group: u8,
    pub index: u8,
}

impl CommandCode {
    pub const fn new(group: u8, index: u8) -> Self {
        Self { group, index }
    }

    pub const MIDPOINT: CommandCode = CommandCode::new(0, 0);
    pub const INTERSECTION: CommandCode = CommandCode::new(0, 1);
    pub const PROJECTION: CommandCode = CommandCode::new(0, 2);
    pub const CENTROID: CommandCode = CommandCode::new(0, 3);
    pub const PLACE_POINT: CommandCode = CommandCode::new(0, 4);
    pub const SEGMENT: CommandCode = CommandCode::new(1, 0);
    pub const LINE: CommandCode = CommandCode::new(1, 1);
    pub const PERPENDICULAR_LINE: CommandCode = CommandCode::new(1, 2);
    pub const PARALLEL_LINE: CommandCode = CommandCode::new(1, 3);
    pub const ANGLE_BISECTOR: CommandCode = CommandCode::new(1, 4);
    pub const PLANE: CommandCode = CommandCode::new(2, 0);
    pub const PERPENDICULAR_PLANE: CommandCode = CommandCode::new(2, 1);
    pub const PARALLEL_PLANE: CommandCode = CommandCode::new(2, 2);
    pub const BISECTOR_PLANE: CommandCode = CommandCode::new(2, 3);
    pub const TRIANGLE: CommandCode = CommandCode::new(2, 4);
    pub const POINT_SYMMETRY: CommandCode = CommandCode::new(3, 0);
    pub const LINE_SYMMETRY: CommandCode = CommandCode::new(3, 1);
    pub const PLANE_SYMMETRY: CommandCode = CommandCode::new(3, 2);
    pub const TRANSLATE: CommandCode = CommandCode::new(3, 3);
    pub const CONNECT: CommandCode = CommandCode::new(4, 0);
    pub const DELETE: CommandCode = CommandCode::new(4, 1);
    pub const HIDE: CommandCode = CommandCode::new(4, 2);
    pub const PIN: CommandCode = CommandCode::new(4, 3);
}

impl fmt::Display for CommandCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.index)
    }
}

/// How a picked entity got its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    /// Placed by hand, no dependencies
    Free,
    /// Free point attached to a target
    Connected,
    Derived,
}

/// What the engine knows about a picked entity. A bare kind is taken to be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub kind: EntityKind,
    pub origin: Origin,
}

impl Candidate {
    pub const fn new(kind: EntityKind, origin: Origin) -> Self {
        Self { kind, origin }
    }

    pub fn of(entity: &ConstructedEntity) -> Self {
        let origin = match entity.rule() {
            Rule::Free => Origin::Free,
            Rule::Connect => Origin::Connected,
            _ => Origin::Derived,
        };
        Self::new(entity.kind(), origin)
    }

    pub fn is_manual(self) -> bool {
        self.origin != Origin::Derived
    }
}

impl From<EntityKind> for Candidate {
    fn from(kind: EntityKind) -> Self {
        Self::new(kind, Origin::Derived)
    }
}

/// What a signature position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Kind(EntityKind),
    /// Point with no dependencies
    FreePoint,
    /// Free or connected entity of any kind
    Manual,
    /// Segment or line
    Linear,
    /// Plane or triangle
    Planar,
    /// Anything but a point
    NonPoint,
    Any,
}

impl Slot {
    pub fn accepts(self, candidate: impl Into<Candidate>) -> bool {
        let Candidate { kind, origin } = candidate.into();
        match self {
            Slot::Kind(k) => k == kind,
            Slot::FreePoint => kind == EntityKind::Point && origin == Origin::Free,
            Slot::Manual => origin != Origin::Derived,
            Slot::Linear => kind.is_linear(),
            Slot::Planar => matches!(kind, EntityKind::Plane | EntityKind::Triangle),
            Slot::NonPoint => kind != EntityKind::Point,
            Slot::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Build a derived entity with this rule from the ordered selection.
    Construct(Rule),
    /// Intersection rule, fired only when the pair actually meets.
    Intersect,
    /// Place a free point where the pointer is.
    PlacePoint,
    Connect,
    Delete,
    ToggleHidden,
    TogglePinned,
}

/// A complete selection shape for a command. Slot order is dependency order.
#[derive(Debug, Clone, Copy)]
pub struct Signature {
    pub slots: &'static [Slot],
    pub action: Action,
}

#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub code: CommandCode,
    pub name: &'static str,
    pub signatures: &'static [Signature],
}

const P: Slot = Slot::Kind(EntityKind::Point);
const S: Slot = Slot::Kind(EntityKind::Segment);
const T: Slot = Slot::Kind(EntityKind::Triangle);
const PL: Slot = Slot::Kind(EntityKind::Plane);
const LIN: Slot = Slot::Linear;
const PLN: Slot = Slot::Planar;
const ANY: Slot = Slot::Any;

const fn sig(slots: &'static [Slot], action: Action) -> Signature {
    Signature { slots, action }
}

const fn rule(slots: &'static [Slot], rule: Rule) -> Signature {
    Signature { slots, action: Action::Construct(rule) }
}

pub static COMMANDS: &[CommandSpec] = &[
    // Points
    CommandSpec {
        code: CommandCode::MIDPOINT,
        name: "Midpoint",
        signatures: &[rule(&[P, P], Rule::Midpoint), rule(&[S], Rule::SegmentMidpoint)],
    },
    CommandSpec {
        code: CommandCode::INTERSECTION,
        name: "Intersection",
        signatures: &[
            sig(&[LIN, LIN], Action::Intersect),
            sig(&[LIN, PLN], Action::Intersect),
            sig(&[PL, PL], Action::Intersect),
            sig(&[T, PL], Action::Intersect),
        ],
    },
    CommandSpec {
        code: CommandCode::PROJECTION,
        name: "Projection",
        signatures: &[rule(&[P, Slot::NonPoint], Rule::Projection)],
    },
    CommandSpec {
        code: CommandCode::CENTROID,
        name: "Centroid",
        signatures: &[rule(&[P, P, P], Rule::Centroid), rule(&[T], Rule::TriangleCentroid)],
    },
    CommandSpec {
        code: CommandCode::PLACE_POINT,
        name: "Place point",
        signatures: &[sig(&[], Action::PlacePoint)],
    },
    // Lines
    CommandSpec {
        code: CommandCode::SEGMENT,
        name: "Segment",
        signatures: &[rule(&[P, P], Rule::Segment)],
    },
    CommandSpec {
        code: CommandCode::LINE,
        name: "Line",
        signatures: &[rule(&[P, P], Rule::LineThrough), rule(&[S], Rule::LineFromSegment)],
    },
    CommandSpec {
        code: CommandCode::PERPENDICULAR_LINE,
        name: "Perpendicular line",
        signatures: &[
            rule(&[P, LIN], Rule::PerpendicularLine),
            rule(&[P, PLN], Rule::PerpendicularLine),
        ],
    },
    CommandSpec {
        code: CommandCode::PARALLEL_LINE,
        name: "Parallel line",
        signatures: &[rule(&[P, LIN], Rule::ParallelLine)],
    },
    CommandSpec {
        code: CommandCode::ANGLE_BISECTOR,
        name: "Angle bisector",
        signatures: &[rule(&[LIN, LIN], Rule::AngleBisector)],
    },
    // Planes
    CommandSpec {
        code: CommandCode::PLANE,
        name: "Plane",
        signatures: &[
            rule(&[P, P, P], Rule::PlaneThrough),
            rule(&[T], Rule::PlaneFromTriangle),
            rule(&[P, LIN], Rule::PlaneThroughPointLine),
        ],
    },
    CommandSpec {
        code: CommandCode::PERPENDICULAR_PLANE,
        name: "Perpendicular plane",
        signatures: &[rule(&[P, LIN], Rule::PerpendicularPlane)],
    },
    CommandSpec {
        code: CommandCode::PARALLEL_PLANE,
        name: "Parallel plane",
        signatures: &[rule(&[P, PLN], Rule::ParallelPlane)],
    },
    CommandSpec {
        code: CommandCode::BISECTOR_PLANE,
        name: "Bisector plane",
        signatures: &[
            rule(&[PL, PL], Rule::BisectorPlane),
            rule(&[P, P], Rule::MidPlane),
            rule(&[S], Rule::MidPlane),
        ],
    },
    CommandSpec {
        code: CommandCode::TRIANGLE,
        name: "Triangle",
        signatures: &[rule(&[P, P, P], Rule::Triangle)],
    },
    // Transforms
    CommandSpec {
        code: CommandCode::POINT_SYMMETRY,
        name: "Point symmetry",
        signatures: &[rule(&[ANY, P], Rule::PointSymmetry)],
    },
    CommandSpec {
        code: CommandCode::LINE_SYMMETRY,
        name: "Line symmetry",
        signatures: &[rule(&[ANY, LIN], Rule::LineSymmetry)],
    },
    CommandSpec {
        code: CommandCode::PLANE_SYMMETRY,
        name: "Plane symmetry",
        signatures: &[rule(&[ANY, PLN], Rule::PlaneSymmetry)],
    },
    CommandSpec {
        code: CommandCode::TRANSLATE,
        name: "Translate",
        signatures: &[rule(&[ANY, P, P], Rule::Translate)],
    },
    // Edit
    CommandSpec {
        code: CommandCode::CONNECT,
        name: "Connect",
        signatures: &[sig(&[Slot::FreePoint, Slot::NonPoint], Action::Connect)],
    },
    CommandSpec {
        code: CommandCode::DELETE,
        name: "Delete",
        signatures: &[sig(&[ANY], Action::Delete)],
    },
    CommandSpec {
        code: CommandCode::HIDE,
        name: "Hide",
        signatures: &[sig(&[ANY], Action::ToggleHidden)],
    },
    CommandSpec {
        code: CommandCode::PIN,
        name: "Pin",
        signatures: &[sig(&[Slot::Manual], Action::TogglePinned)],
    },
];

pub fn command(code: CommandCode) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.code == code)
}

impl CommandSpec {
    /// Commands that act on the pointer position rather than on a selection.
    pub fn places_point(&self) -> bool {
        self.signatures.iter().any(|s| s.action == Action::PlacePoint)
    }
}
