use super::EntityKind;
use crate::geometry::{
    any_orthogonal, in_triangle, points_centroid, Line3, Plane, Point3, Segment,
    Vector3, ApproxEq,
};
use serde::{Deserialize, Serialize};

/// Cached geometry of a constructed entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Point3),
    Segment(Segment),
    Line(Line3),
    Plane(Plane),
    Triangle([Point3; 3]),
}

impl Shape {
    pub fn kind(&self) -> EntityKind {
        match self {
            Shape::Point(_) => EntityKind::Point,
            Shape::Segment(_) => EntityKind::Segment,
            Shape::Line(_) => EntityKind::Line,
            Shape::Plane(_) => EntityKind::Plane,
            Shape::Triangle(_) => EntityKind::Triangle,
        }
    }

    pub fn as_point(&self) -> Option<Point3> {
        match self {
            Shape::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// Supporting line of a segment or line.
    pub fn as_line(&self) -> Option<Line3> {
        match self {
            Shape::Segment(s) => Some(s.line),
            Shape::Line(l) => Some(*l),
            _ => None,
        }
    }

    /// Supporting plane of a plane or triangle.
    pub fn as_plane(&self) -> Option<Plane> {
        match self {
            Shape::Plane(p) => Some(*p),
            Shape::Triangle([a, b, c]) => Some(Plane::from_points(a, b, c)),
            _ => None,
        }
    }

    /// A representative position: the point itself, a segment's midpoint,
    /// a line's origin, a plane's origin or a triangle's centroid.
    pub fn anchor(&self) -> Point3 {
        match self {
            Shape::Point(p) => *p,
            Shape::Segment(s) => s.midpoint(),
            Shape::Line(l) => l.origin,
            Shape::Plane(p) => p.origin(),
            Shape::Triangle(v) => points_centroid(v),
        }
    }

    /// Foot of the perpendicular from `p` onto the (unbounded) support of
    /// this shape. Projecting onto a point yields that point.
    pub fn foot_of_perpendicular(&self, p: &Point3) -> Point3 {
        match self {
            Shape::Point(q) => *q,
            Shape::Segment(s) => s.project_point(p),
            Shape::Line(l) => l.project_point(p),
            Shape::Plane(plane) => plane.project_point(p),
            Shape::Triangle([a, b, c]) => Plane::from_points(a, b, c).project_point(p),
        }
    }

    /// Closest point of the bounded shape to `p`.
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        match self {
            Shape::Triangle([a, b, c]) => {
                let on_plane = Plane::from_points(a, b, c).project_point(p);
                if in_triangle(&on_plane, a, b, c) {
                    return on_plane;
                }
                [Segment::new(*a, *b), Segment::new(*b, *c), Segment::new(*c, *a)]
                    .iter()
                    .map(|edge| edge.closest_point(p))
                    .min_by(|x, y| {
                        crate::geometry::dist_sq(x, p)
                            .total_cmp(&crate::geometry::dist_sq(y, p))
                    })
                    .unwrap_or(on_plane)
            }
            Shape::Segment(s) => s.closest_point(p),
            _ => self.foot_of_perpendicular(p),
        }
    }

    pub fn contains_point(&self, p: &Point3) -> bool {
        match self {
            Shape::Point(q) => q.approx_eq(p),
            Shape::Segment(s) => s.contains_point(p),
            Shape::Line(l) => l.contains_point(p),
            Shape::Plane(plane) => plane.contains_point(p),
            Shape::Triangle([a, b, c]) => {
                Plane::from_points(a, b, c).contains_point(p) && in_triangle(p, a, b, c)
            }
        }
    }

    /// Applies an affine point map to the shape, keeping its kind.
    pub fn map_points<F: Fn(&Point3) -> Point3>(&self, f: F) -> Shape {
        match self {
            Shape::Point(p) => Shape::Point(f(p)),
            Shape::Segment(s) => Shape::Segment(Segment::new(f(&s.start), f(&s.end))),
            Shape::Line(l) => {
                let a = f(&l.origin);
                let b = f(&l.point_at(1.0));
                Shape::Line(Line3::new(a, b - a))
            }
            Shape::Plane(plane) => {
                let o = plane.origin();
                let u = any_orthogonal(&plane.normal);
                let v = plane.normal.cross(&u);
                Shape::Plane(Plane::from_points(&f(&o), &f(&(o + u)), &f(&(o + v))))
            }
            Shape::Triangle(v) => Shape::Triangle([f(&v[0]), f(&v[1]), f(&v[2])]),
        }
    }

    pub fn translated(&self, delta: &Vector3) -> Shape {
        self.map_points(|p| p + delta)
    }

    pub fn approx_eq(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Point(a), Shape::Point(b)) => a.approx_eq(b),
            (Shape::Segment(a), Shape::Segment(b)) => {
                a.start.approx_eq(&b.start) && a.end.approx_eq(&b.end)
            }
            (Shape::Line(a), Shape::Line(b)) => {
                a.origin.approx_eq(&b.origin) && a.direction.approx_eq(&b.direction)
            }
            (Shape::Plane(a), Shape::Plane(b)) => {
                a.normal.approx_eq(&b.normal) && a.offset.approx_eq(&b.offset)
            }
            (Shape::Triangle(a), Shape::Triangle(b)) => {
                a.iter().zip(b.iter()).all(|(p, q)| p.approx_eq(q))
            }
            _ => false,
        }
    }
}
