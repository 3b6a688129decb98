//! Mapping between entity shapes and scene transforms.
//!
//! Every kind is drawn from a canonical unit mesh:
//! point `(0,0,0)`; segment and line `(0,0,0)-(1,0,0)`; plane and triangle
//! `(0,0,0), (1,0,0), (0,1,0)`. One affine matrix per entity places it.

use crate::construct::{EntityKind, Shape};
use crate::geometry::{
    any_orthogonal, normalize_or, triangle_normal, Line3, Matrix4, Plane, Point3, Segment, Vector3,
};

pub fn canonical_vertices(kind: EntityKind) -> Vec<Point3> {
    match kind {
        EntityKind::Point => vec![Point3::origin()],
        EntityKind::Segment | EntityKind::Line => {
            vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)]
        }
        EntityKind::Plane | EntityKind::Triangle => vec![
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
    }
}

/// Affine matrix taking the canonical axes to `x`, `y`, `z` and the origin to `t`.
fn affine(x: &Vector3, y: &Vector3, z: &Vector3, t: &Point3) -> Matrix4 {
    Matrix4::new(
        x.x, y.x, z.x, t.x,
        x.y, y.y, z.y, t.y,
        x.z, y.z, z.z, t.z,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Frame with `axis` as X and two unit vectors completing it.
fn frame_along(axis: &Vector3, origin: &Point3) -> Matrix4 {
    let dir = normalize_or(*axis, Vector3::x());
    let u = any_orthogonal(&dir);
    let w = dir.cross(&u);
    affine(axis, &u, &w, origin)
}

pub fn placement_matrix(shape: &Shape) -> Matrix4 {
    match shape {
        Shape::Point(p) => Matrix4::new_translation(&p.coords),
        Shape::Segment(s) => frame_along(&(s.end - s.start), &s.start),
        Shape::Line(l) => frame_along(&l.direction, &l.origin),
        Shape::Plane(plane) => {
            let u = any_orthogonal(&plane.normal);
            let v = plane.normal.cross(&u);
            affine(&u, &v, &plane.normal, &plane.origin())
        }
        Shape::Triangle([a, b, c]) => affine(&(b - a), &(c - a), &triangle_normal(a, b, c), a),
    }
}

/// Rebuilds a shape of `kind` from the transformed canonical vertices.
pub fn shape_from_vertices(kind: EntityKind, vertices: &[Point3]) -> Option<Shape> {
    let shape = match (kind, vertices) {
        (EntityKind::Point, [p, ..]) => Shape::Point(*p),
        (EntityKind::Segment, [a, b, ..]) => Shape::Segment(Segment::new(*a, *b)),
        (EntityKind::Line, [a, b, ..]) => Shape::Line(Line3::through(a, b)),
        (EntityKind::Plane, [a, b, c, ..]) => Shape::Plane(Plane::from_points(a, b, c)),
        (EntityKind::Triangle, [a, b, c, ..]) => Shape::Triangle([*a, *b, *c]),
        _ => return None,
    };
    Some(shape)
}
