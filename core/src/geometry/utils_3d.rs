//! 3D utilities: containment tests, triangle helpers and point reflection.

use super::{Point3, Segment, Vector3, EPSILON, PARALLEL_EPSILON};

// =============================================================================
// Containment
// =============================================================================

/// Whether `v` lies inside the angle spanned by `a` and `b` (all three
/// assumed coplanar). The bounding rays count as inside, and so does a zero `v`.
///
/// When `a` and `b` are parallel the angle has no interior: only directions
/// along the rays themselves are inside.
pub fn in_angle(v: &Vector3, a: &Vector3, b: &Vector3) -> bool {
    let (Some(v), Some(a), Some(b)) = (unit(v), unit(a), unit(b)) else {
        return true;
    };

    let n = a.cross(&b);
    if n.norm() < PARALLEL_EPSILON {
        let along_a = a.cross(&v).norm() < EPSILON && a.dot(&v) > 0.0;
        let along_b = b.cross(&v).norm() < EPSILON && b.dot(&v) > 0.0;
        return along_a || along_b;
    }
    let n = n.normalize();

    a.cross(&v).dot(&n) >= -EPSILON && v.cross(&b).dot(&n) >= -EPSILON
}

/// Whether `p` lies inside triangle `abc`, edges and vertices included.
/// `p` is assumed to lie in the triangle's plane; a degenerate triangle
/// contains exactly the points of its edges.
pub fn in_triangle(p: &Point3, a: &Point3, b: &Point3, c: &Point3) -> bool {
    if triangle_area(a, b, c) < EPSILON * EPSILON {
        return [Segment::new(*a, *b), Segment::new(*b, *c), Segment::new(*c, *a)]
            .iter()
            .any(|edge| edge.contains_point(p));
    }
    in_angle(&(p - a), &(b - a), &(c - a)) && in_angle(&(p - b), &(c - b), &(a - b))
}

fn unit(v: &Vector3) -> Option<Vector3> {
    let n = v.norm();
    (n >= PARALLEL_EPSILON).then(|| v / n)
}

// =============================================================================
// Triangle Operations
// =============================================================================

/// Unit normal of a triangle. Degenerate triangles yield +Z.
pub fn triangle_normal(v0: &Point3, v1: &Point3, v2: &Point3) -> Vector3 {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    super::normalize_or(edge1.cross(&edge2), Vector3::z())
}

pub fn triangle_area(v0: &Point3, v1: &Point3, v2: &Point3) -> f64 {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    edge1.cross(&edge2).norm() / 2.0
}

// =============================================================================
// Point Operations
// =============================================================================

pub fn points_centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::origin();
    }

    let sum: Vector3 = points.iter().map(|p| p.coords).sum();
    Point3::from(sum / points.len() as f64)
}

/// Point reflection of `p` through `center`.
pub fn reflect_through_point(p: &Point3, center: &Point3) -> Point3 {
    center + (center - p)
}

// =============================================================================
// Tests
// =============================================================================
