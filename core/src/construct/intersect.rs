//! Intersection of two constructed shapes.
//!
//! Dispatch is symmetric: the pair is ordered by [`EntityKind::rank`] and the
//! higher-ranked kind computes the result.

use super::{EntityKind, Shape};
use crate::geometry::{
    dist_sq, in_triangle, intersect_lines, intersect_plane_line, intersect_plane_segment,
    intersect_planes, intersect_segments, lines_intersecting, plane_line_intersecting,
    plane_segment_intersecting, planes_intersecting, points_centroid, segment_line_intersecting,
    segments_intersecting, ApproxEq, Plane, Point3, Segment, EPSILON,
};

/// Kind produced by intersecting kinds `a` and `b`, or None when the pair
/// has no supported intersection.
pub fn intersection_kind(a: EntityKind, b: EntityKind) -> Option<EntityKind> {
    let (hi, lo) = if a.rank() >= b.rank() { (a, b) } else { (b, a) };
    match (hi, lo) {
        (EntityKind::Triangle, EntityKind::Triangle) => None,
        (EntityKind::Plane, EntityKind::Plane) => Some(EntityKind::Line),
        (EntityKind::Triangle, EntityKind::Plane) => Some(EntityKind::Segment),
        _ => Some(EntityKind::Point),
    }
}

/// Intersects two shapes if they actually meet.
pub fn try_intersect(a: &Shape, b: &Shape) -> Option<Shape> {
    match ordered(a, b)? {
        (shape, true) => Some(shape),
        (_, false) => None,
    }
}

/// Intersection used when recomputing an existing intersection entity: once
/// the inputs drift apart this still yields a shape on one of them.
pub fn intersection_shape(a: &Shape, b: &Shape) -> Option<Shape> {
    ordered(a, b).map(|(shape, _)| shape)
}

fn ordered(a: &Shape, b: &Shape) -> Option<(Shape, bool)> {
    if a.kind().rank() >= b.kind().rank() {
        intersect_ranked(a, b)
    } else {
        intersect_ranked(b, a)
    }
}

/// `hi` has rank >= `lo`. Returns the shape and whether it is a true intersection.
fn intersect_ranked(hi: &Shape, lo: &Shape) -> Option<(Shape, bool)> {
    let result = match (hi, lo) {
        (_, Shape::Point(p)) => (Shape::Point(hi.closest_point(p)), hi.contains_point(p)),

        (Shape::Segment(s1), Shape::Segment(s2)) => (
            Shape::Point(intersect_segments(s1, s2)),
            segments_intersecting(s1, s2),
        ),

        (Shape::Line(l), Shape::Segment(s)) => (
            Shape::Point(intersect_lines(l, &s.line)),
            segment_line_intersecting(s, l),
        ),
        (Shape::Line(l1), Shape::Line(l2)) => {
            (Shape::Point(intersect_lines(l1, l2)), lines_intersecting(l1, l2))
        }

        (Shape::Plane(plane), Shape::Segment(s)) => (
            Shape::Point(intersect_plane_segment(plane, s)),
            plane_segment_intersecting(plane, s),
        ),
        (Shape::Plane(plane), Shape::Line(l)) => (
            Shape::Point(intersect_plane_line(plane, l)),
            plane_line_intersecting(plane, l),
        ),
        (Shape::Plane(p1), Shape::Plane(p2)) => {
            (Shape::Line(intersect_planes(p1, p2)), planes_intersecting(p1, p2))
        }

        (Shape::Triangle([a, b, c]), Shape::Segment(s)) => {
            let plane = Plane::from_points(a, b, c);
            let p = intersect_plane_segment(&plane, s);
            (
                Shape::Point(p),
                plane_segment_intersecting(&plane, s)
                    && plane.contains_point(&p)
                    && in_triangle(&p, a, b, c),
            )
        }
        (Shape::Triangle([a, b, c]), Shape::Line(l)) => {
            let plane = Plane::from_points(a, b, c);
            let p = intersect_plane_line(&plane, l);
            (
                Shape::Point(p),
                plane_line_intersecting(&plane, l) && in_triangle(&p, a, b, c),
            )
        }
        (Shape::Triangle(t), Shape::Plane(plane)) => triangle_plane(t, plane),

        (Shape::Triangle(_), Shape::Triangle(_)) => return None,

        // Remaining pairs have hi ranked below lo and never reach here
        _ => return None,
    };
    Some(result)
}

/// Chord cut from a triangle by a plane. A triangle lying in the plane, or
/// missing it entirely, is not a true intersection.
fn triangle_plane(t: &[Point3; 3], plane: &Plane) -> (Shape, bool) {
    let d = [
        plane.signed_distance(&t[0]),
        plane.signed_distance(&t[1]),
        plane.signed_distance(&t[2]),
    ];

    if d.iter().all(|x| x.abs() < EPSILON) {
        return (Shape::Segment(Segment::new(t[0], t[1])), false);
    }

    let mut points: Vec<Point3> = Vec::with_capacity(3);
    for i in 0..3 {
        let j = (i + 1) % 3;
        let candidate = if d[i].abs() < EPSILON {
            Some(t[i])
        } else if d[j].abs() >= EPSILON && (d[i] > 0.0) != (d[j] > 0.0) {
            Some(t[i] + (t[j] - t[i]) * (d[i] / (d[i] - d[j])))
        } else {
            None
        };
        if let Some(p) = candidate {
            if !points.iter().any(|q| q.approx_eq(&p)) {
                points.push(p);
            }
        }
    }

    match points.as_slice() {
        [] => {
            let foot = plane.project_point(&points_centroid(t));
            (Shape::Segment(Segment::new(foot, foot)), false)
        }
        [p] => (Shape::Segment(Segment::new(*p, *p)), true),
        [p, q] => (Shape::Segment(Segment::new(*p, *q)), true),
        _ => {
            // Three distinct crossings only arise from tolerance noise; keep the widest pair
            let mut best = (points[0], points[1]);
            for (i, p) in points.iter().enumerate() {
                for q in &points[i + 1..] {
                    if dist_sq(p, q) > dist_sq(&best.0, &best.1) {
                        best = (*p, *q);
                    }
                }
            }
            (Shape::Segment(Segment::new(best.0, best.1)), true)
        }
    }
}
