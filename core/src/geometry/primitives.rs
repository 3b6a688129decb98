use super::{normalize_or, any_orthogonal, Point3, Vector3, ApproxEq, EPSILON, PARALLEL_EPSILON};
use serde::{Deserialize, Serialize};

/// An infinite oriented line: origin plus unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Line3 {
    /// A zero direction falls back to the X axis.
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: normalize_or(direction, Vector3::x()),
        }
    }

    /// Line through `a` towards `b`.
    pub fn through(a: &Point3, b: &Point3) -> Self {
        Self::new(*a, b - a)
    }

    pub fn point_at(&self, t: f64) -> Point3 {
        self.origin + self.direction * t
    }

    /// Signed parameter of the projection of `p` along the line.
    pub fn parameter_of(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(&self.direction)
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        self.point_at(self.parameter_of(p))
    }

    pub fn distance_to_point(&self, p: &Point3) -> f64 {
        let proj = self.project_point(p);
        (p - proj).norm()
    }

    pub fn contains_point(&self, p: &Point3) -> bool {
        self.distance_to_point(p) < EPSILON
    }

    /// Mirror `p` across this line.
    pub fn reflect_point(&self, p: &Point3) -> Point3 {
        let foot = self.project_point(p);
        foot + (foot - p)
    }

    pub fn is_parallel_to(&self, other: &Line3) -> bool {
        self.direction.cross(&other.direction).norm() < PARALLEL_EPSILON
    }
}

/// A plane stored as unit normal and signed offset: `normal . x = offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3,
    pub offset: f64,
}

impl Plane {
    /// A zero normal falls back to the XY plane through the origin.
    pub fn new(normal: Vector3, offset: f64) -> Self {
        let n = normal.norm();
        if n < PARALLEL_EPSILON {
            return Self::xy();
        }
        Self {
            normal: normal / n,
            offset: offset / n,
        }
    }

    pub fn from_point_normal(point: &Point3, normal: &Vector3) -> Self {
        let n = normalize_or(*normal, Vector3::z());
        Self {
            normal: n,
            offset: n.dot(&point.coords),
        }
    }

    /// Plane through three points. For collinear input the plane contains the
    /// points' common line; for coincident input it is the XY-parallel plane through `a`.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Self {
        let normal = (b - a).cross(&(c - a));
        if normal.norm() >= PARALLEL_EPSILON {
            return Self::from_point_normal(a, &normal);
        }
        let ab = if (b - a).norm() >= (c - a).norm() { b - a } else { c - a };
        if ab.norm() < PARALLEL_EPSILON {
            return Self::from_point_normal(a, &Vector3::z());
        }
        Self::from_point_normal(a, &any_orthogonal(&ab))
    }

    pub fn xy() -> Self {
        Self { normal: Vector3::z(), offset: 0.0 }
    }

    /// The point of the plane closest to the world origin.
    pub fn origin(&self) -> Point3 {
        Point3::from(self.normal * self.offset)
    }

    /// Positive on the side the normal points to.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        p - self.normal * self.signed_distance(p)
    }

    pub fn contains_point(&self, p: &Point3) -> bool {
        self.signed_distance(p).abs() < EPSILON
    }

    pub fn reflect_point(&self, p: &Point3) -> Point3 {
        p - self.normal * (2.0 * self.signed_distance(p))
    }

    pub fn is_parallel_to(&self, other: &Plane) -> bool {
        self.normal.cross(&other.normal).norm() < PARALLEL_EPSILON
    }
}

/// A bounded segment; the supporting line is cached at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
    pub line: Line3,
}

impl Segment {
    pub fn new(start: Point3, end: Point3) -> Self {
        Self {
            start,
            end,
            line: Line3::through(&start, &end),
        }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    pub fn midpoint(&self) -> Point3 {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn is_degenerate(&self) -> bool {
        self.length() < EPSILON
    }

    pub fn project_point(&self, p: &Point3) -> Point3 {
        self.line.project_point(p)
    }

    /// Closest point of the bounded segment to `p`.
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        let t = self.line.parameter_of(p).clamp(0.0, self.length());
        self.line.point_at(t)
    }

    /// True when `p` lies on the segment, endpoints included.
    pub fn contains_point(&self, p: &Point3) -> bool {
        if self.is_degenerate() {
            return self.start.approx_eq(p);
        }
        let t = self.line.parameter_of(p);
        self.line.contains_point(p) && t >= -EPSILON && t <= self.length() + EPSILON
    }
}
