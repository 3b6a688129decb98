//! Recompute formulas, one per [`Rule`].
//!
//! Degenerate inputs (coincident points, parallel directions) always produce
//! a defined shape; only dependency lists that do not fit the rule fail.

use super::intersect::intersection_shape;
use super::{EntityKind, Rule, RuleError, Shape};
use crate::geometry::{
    any_orthogonal, intersect_lines, normalize_or, points_centroid, reflect_through_point, Line3,
    Plane, Point3, Segment, Vector3, PARALLEL_EPSILON,
};

/// Computes the initial shape of a new entity built by a derived `rule`.
pub fn build(rule: Rule, deps: &[Shape]) -> Result<Shape, RuleError> {
    let kinds: Vec<EntityKind> = deps.iter().map(Shape::kind).collect();
    let kind = match (rule.output_kind(&kinds), kinds.last()) {
        (Some(kind), _) => kind,
        (None, Some(last)) => {
            return Err(RuleError::DependencyKind { rule, position: kinds.len() - 1, got: *last })
        }
        (None, None) => return Err(RuleError::Arity { rule, expected: 1, got: 0 }),
    };
    // Derived rules never read the seed
    let seed = deps.first().copied().unwrap_or(Shape::Point(Point3::origin()));
    recompute(kind, rule, &seed, deps)
}

/// Recomputes the geometry of an entity of kind `kind` built by `rule` from
/// `deps`. `current` is the entity's present shape, used by the manual rules.
pub fn recompute(
    kind: EntityKind,
    rule: Rule,
    current: &Shape,
    deps: &[Shape],
) -> Result<Shape, RuleError> {
    let shape = match rule {
        Rule::Free => *current,
        Rule::Connect => {
            let [target] = arity::<1>(rule, deps)?;
            Shape::Point(target.closest_point(&current.anchor()))
        }

        Rule::Midpoint => {
            let [a, b] = points::<2>(rule, deps)?;
            Shape::Point(nalgebra::center(&a, &b))
        }
        Rule::SegmentMidpoint => {
            let [s] = arity::<1>(rule, deps)?;
            Shape::Point(segment(rule, 0, &s)?.midpoint())
        }
        Rule::Centroid => {
            let pts = points::<3>(rule, deps)?;
            Shape::Point(points_centroid(&pts))
        }
        Rule::TriangleCentroid => {
            let [t] = arity::<1>(rule, deps)?;
            Shape::Point(points_centroid(&triangle(rule, 0, &t)?))
        }
        Rule::Intersection => {
            let [a, b] = arity::<2>(rule, deps)?;
            intersection_shape(&a, &b).ok_or(RuleError::DependencyKind {
                rule,
                position: 1,
                got: b.kind(),
            })?
        }
        Rule::Projection => {
            let [p, target] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            if target.kind() == EntityKind::Point {
                return Err(RuleError::DependencyKind { rule, position: 1, got: target.kind() });
            }
            Shape::Point(target.foot_of_perpendicular(&p))
        }

        Rule::Segment => {
            let [a, b] = points::<2>(rule, deps)?;
            Shape::Segment(Segment::new(a, b))
        }
        Rule::LineThrough => {
            let [a, b] = points::<2>(rule, deps)?;
            Shape::Line(Line3::through(&a, &b))
        }
        Rule::LineFromSegment => {
            let [s] = arity::<1>(rule, deps)?;
            Shape::Line(segment(rule, 0, &s)?.line)
        }
        Rule::PerpendicularLine => {
            let [p, target] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            Shape::Line(perpendicular_line(rule, &p, &target)?)
        }
        Rule::ParallelLine => {
            let [p, target] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            let line = linear(rule, 1, &target)?;
            Shape::Line(Line3::new(p, line.direction))
        }
        Rule::AngleBisector => {
            let [a, b] = arity::<2>(rule, deps)?;
            let l1 = linear(rule, 0, &a)?;
            let l2 = linear(rule, 1, &b)?;
            Shape::Line(angle_bisector(&l1, &l2))
        }

        Rule::PlaneThrough => {
            let [a, b, c] = points::<3>(rule, deps)?;
            Shape::Plane(Plane::from_points(&a, &b, &c))
        }
        Rule::PlaneFromTriangle => {
            let [t] = arity::<1>(rule, deps)?;
            let [a, b, c] = triangle(rule, 0, &t)?;
            Shape::Plane(Plane::from_points(&a, &b, &c))
        }
        Rule::PlaneThroughPointLine => {
            let [p, l] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            let line = linear(rule, 1, &l)?;
            Shape::Plane(Plane::from_points(&p, &line.origin, &line.point_at(1.0)))
        }
        Rule::PerpendicularPlane => {
            let [p, l] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            let line = linear(rule, 1, &l)?;
            Shape::Plane(Plane::from_point_normal(&p, &line.direction))
        }
        Rule::MidPlane => {
            let (a, b) = match deps {
                [s] => {
                    let s = segment(rule, 0, s)?;
                    (s.start, s.end)
                }
                _ => {
                    let [a, b] = points::<2>(rule, deps)?;
                    (a, b)
                }
            };
            let normal = normalize_or(b - a, Vector3::x());
            Shape::Plane(Plane::from_point_normal(&nalgebra::center(&a, &b), &normal))
        }
        Rule::ParallelPlane => {
            let [p, plane] = arity::<2>(rule, deps)?;
            let p = point(rule, 0, &p)?;
            let plane = plane_of(rule, 1, &plane)?;
            Shape::Plane(Plane::from_point_normal(&p, &plane.normal))
        }
        Rule::BisectorPlane => {
            let [a, b] = arity::<2>(rule, deps)?;
            let p1 = plane_of(rule, 0, &a)?;
            let p2 = plane_of(rule, 1, &b)?;
            Shape::Plane(bisector_plane(&p1, &p2))
        }
        Rule::Triangle => {
            let pts = points::<3>(rule, deps)?;
            Shape::Triangle(pts)
        }

        Rule::PointSymmetry => {
            let [object, center] = arity::<2>(rule, deps)?;
            let center = point(rule, 1, &center)?;
            object.map_points(|p| reflect_through_point(p, &center))
        }
        Rule::LineSymmetry => {
            let [object, mirror] = arity::<2>(rule, deps)?;
            let mirror = linear(rule, 1, &mirror)?;
            object.map_points(|p| mirror.reflect_point(p))
        }
        Rule::PlaneSymmetry => {
            let [object, mirror] = arity::<2>(rule, deps)?;
            let mirror = plane_of(rule, 1, &mirror)?;
            object.map_points(|p| mirror.reflect_point(p))
        }
        Rule::Translate => {
            let [object, from, to] = arity::<3>(rule, deps)?;
            let from = point(rule, 1, &from)?;
            let to = point(rule, 2, &to)?;
            object.translated(&(to - from))
        }
    };

    if shape.kind() != kind {
        return Err(RuleError::OutputKind { rule, kind });
    }
    Ok(shape)
}

/// Line through `p` perpendicular to `target`. For a linear target it meets
/// the target at the foot of the perpendicular; a point already on the target
/// gets an arbitrary orthogonal direction. For a plane it is the normal through `p`.
fn perpendicular_line(rule: Rule, p: &Point3, target: &Shape) -> Result<Line3, RuleError> {
    match target {
        Shape::Segment(_) | Shape::Line(_) => {
            let line = linear(rule, 1, target)?;
            let foot = line.project_point(p);
            let dir = normalize_or(foot - p, any_orthogonal(&line.direction));
            Ok(Line3::new(*p, dir))
        }
        Shape::Plane(_) | Shape::Triangle(_) => {
            let plane = plane_of(rule, 1, target)?;
            Ok(Line3::new(*p, plane.normal))
        }
        Shape::Point(_) => Err(RuleError::DependencyKind { rule, position: 1, got: EntityKind::Point }),
    }
}

/// Bisector of the angle between `l1` and `l2` through their crossing. Parallel
/// lines yield the mid-line between them.
fn angle_bisector(l1: &Line3, l2: &Line3) -> Line3 {
    if l1.is_parallel_to(l2) {
        let foot = l2.project_point(&l1.origin);
        return Line3::new(nalgebra::center(&l1.origin, &foot), l1.direction);
    }
    let origin = intersect_lines(l1, l2);
    let dir = normalize_or(l1.direction + l2.direction, l1.direction);
    Line3::new(origin, dir)
}

/// Plane of points with equal signed distance to both planes. Parallel planes
/// with the same orientation yield the plane midway between them.
fn bisector_plane(p1: &Plane, p2: &Plane) -> Plane {
    let diff = p1.normal - p2.normal;
    if diff.norm() < PARALLEL_EPSILON {
        return Plane::new(p1.normal + p2.normal, p1.offset + p2.offset);
    }
    Plane::new(diff, p1.offset - p2.offset)
}

fn arity<const N: usize>(rule: Rule, deps: &[Shape]) -> Result<[Shape; N], RuleError> {
    <[Shape; N]>::try_from(deps).map_err(|_| RuleError::Arity {
        rule,
        expected: N,
        got: deps.len(),
    })
}

fn points<const N: usize>(rule: Rule, deps: &[Shape]) -> Result<[Point3; N], RuleError> {
    let shapes = arity::<N>(rule, deps)?;
    let mut out = [Point3::origin(); N];
    for (i, s) in shapes.iter().enumerate() {
        out[i] = point(rule, i, s)?;
    }
    Ok(out)
}

fn point(rule: Rule, position: usize, s: &Shape) -> Result<Point3, RuleError> {
    s.as_point()
        .ok_or(RuleError::DependencyKind { rule, position, got: s.kind() })
}

fn segment(rule: Rule, position: usize, s: &Shape) -> Result<Segment, RuleError> {
    match s {
        Shape::Segment(seg) => Ok(*seg),
        _ => Err(RuleError::DependencyKind { rule, position, got: s.kind() }),
    }
}

fn triangle(rule: Rule, position: usize, s: &Shape) -> Result<[Point3; 3], RuleError> {
    match s {
        Shape::Triangle(t) => Ok(*t),
        _ => Err(RuleError::DependencyKind { rule, position, got: s.kind() }),
    }
}

fn linear(rule: Rule, position: usize, s: &Shape) -> Result<Line3, RuleError> {
    s.as_line()
        .ok_or(RuleError::DependencyKind { rule, position, got: s.kind() })
}

fn plane_of(rule: Rule, position: usize, s: &Shape) -> Result<Plane, RuleError> {
    s.as_plane()
        .ok_or(RuleError::DependencyKind { rule, position, got: s.kind() })
}
