use super::{intersection_kind, EntityKind};
use serde::{Deserialize, Serialize};

/// Construction rule: which recompute formula applies to an entity, and how
/// its ordered dependency list is read.
///
/// `Free` and `Connect` are the manual rules (negative ids): a free entity has
/// no dependencies and is placed directly; a connected point is pinned onto
/// its single dependency without deriving its position from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    Free,
    Connect,
    /// [Point, Point] -> Point
    Midpoint,
    /// [Segment] -> Point
    SegmentMidpoint,
    /// [Point, Point, Point] -> Point
    Centroid,
    /// [Triangle] -> Point
    TriangleCentroid,
    /// [A, B] -> Point, Line (plane x plane) or Segment (triangle x plane)
    Intersection,
    /// [Point, Segment|Line|Plane|Triangle] -> Point
    Projection,
    /// [Point, Point] -> Segment
    Segment,
    /// [Point, Point] -> Line
    LineThrough,
    /// [Segment] -> Line
    LineFromSegment,
    /// [Point, Segment|Line|Plane] -> Line
    PerpendicularLine,
    /// [Point, Segment|Line] -> Line
    ParallelLine,
    /// [Segment|Line, Segment|Line] -> Line
    AngleBisector,
    /// [Point, Point, Point] -> Plane
    PlaneThrough,
    /// [Triangle] -> Plane
    PlaneFromTriangle,
    /// [Point, Segment|Line] -> Plane
    PlaneThroughPointLine,
    /// [Point, Segment|Line] -> Plane
    PerpendicularPlane,
    /// [Segment] or [Point, Point] -> Plane
    MidPlane,
    /// [Point, Plane] -> Plane
    ParallelPlane,
    /// [Plane, Plane] -> Plane
    BisectorPlane,
    /// [Point, Point, Point] -> Triangle
    Triangle,
    /// [X, Point] -> X
    PointSymmetry,
    /// [X, Segment|Line] -> X
    LineSymmetry,
    /// [X, Plane] -> X
    PlaneSymmetry,
    /// [X, Point, Point] -> X
    Translate,
}

impl Rule {
    /// Stable numeric id. Manual rules are negative.
    pub fn id(self) -> i32 {
        match self {
            Rule::Free => -1,
            Rule::Connect => -2,
            Rule::Midpoint => 0,
            Rule::SegmentMidpoint => 1,
            Rule::Centroid => 2,
            Rule::TriangleCentroid => 3,
            Rule::Intersection => 4,
            Rule::Projection => 5,
            Rule::Segment => 10,
            Rule::LineThrough => 11,
            Rule::LineFromSegment => 12,
            Rule::PerpendicularLine => 13,
            Rule::ParallelLine => 14,
            Rule::AngleBisector => 15,
            Rule::PlaneThrough => 20,
            Rule::PlaneFromTriangle => 21,
            Rule::PlaneThroughPointLine => 22,
            Rule::PerpendicularPlane => 23,
            Rule::MidPlane => 24,
            Rule::ParallelPlane => 25,
            Rule::BisectorPlane => 26,
            Rule::Triangle => 27,
            Rule::PointSymmetry => 30,
            Rule::LineSymmetry => 31,
            Rule::PlaneSymmetry => 32,
            Rule::Translate => 33,
        }
    }

    /// Free or connected: the entity may be dragged directly.
    pub fn is_manual(self) -> bool {
        self.id() < 0
    }

    /// Kind of the entity this rule produces from dependencies of the given kinds.
    pub fn output_kind(self, deps: &[EntityKind]) -> Option<EntityKind> {
        match self {
            Rule::Free => None,
            Rule::Connect
            | Rule::Midpoint
            | Rule::SegmentMidpoint
            | Rule::Centroid
            | Rule::TriangleCentroid
            | Rule::Projection => Some(EntityKind::Point),
            Rule::Intersection => match deps {
                [a, b] => intersection_kind(*a, *b),
                _ => None,
            },
            Rule::Segment => Some(EntityKind::Segment),
            Rule::LineThrough
            | Rule::LineFromSegment
            | Rule::PerpendicularLine
            | Rule::ParallelLine
            | Rule::AngleBisector => Some(EntityKind::Line),
            Rule::PlaneThrough
            | Rule::PlaneFromTriangle
            | Rule::PlaneThroughPointLine
            | Rule::PerpendicularPlane
            | Rule::MidPlane
            | Rule::ParallelPlane
            | Rule::BisectorPlane => Some(EntityKind::Plane),
            Rule::Triangle => Some(EntityKind::Triangle),
            Rule::PointSymmetry | Rule::LineSymmetry | Rule::PlaneSymmetry | Rule::Translate => {
                deps.first().copied()
            }
        }
    }
}
