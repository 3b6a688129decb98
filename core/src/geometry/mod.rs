use nalgebra as na;

pub type Point3 = na::Point3<f64>;
pub type Vector3 = na::Vector3<f64>;
pub type Matrix4 = na::Matrix4<f64>;

pub mod tolerance;
pub use tolerance::{EPSILON, PARALLEL_EPSILON};

pub trait ApproxEq {
    fn approx_eq(&self, other: &Self) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).abs() < EPSILON
    }
}

impl ApproxEq for Point3 {
    fn approx_eq(&self, other: &Self) -> bool {
        na::distance_squared(self, other) < EPSILON * EPSILON
    }
}

impl ApproxEq for Vector3 {
    fn approx_eq(&self, other: &Self) -> bool {
        (self - other).norm_squared() < EPSILON * EPSILON
    }
}

pub mod primitives;
pub use primitives::*;

pub mod intersection;
pub use intersection::*;

pub mod utils_3d;
pub use utils_3d::*;

pub fn dist_sq(p1: &Point3, p2: &Point3) -> f64 {
    na::distance_squared(p1, p2)
}

/// Normalizes `v`, falling back to `fallback` when `v` has no usable length.
pub fn normalize_or(v: Vector3, fallback: Vector3) -> Vector3 {
    let n = v.norm();
    if n < PARALLEL_EPSILON {
        fallback
    } else {
        v / n
    }
}

/// Any unit vector orthogonal to `v`.
pub fn any_orthogonal(v: &Vector3) -> Vector3 {
    // Cross with the axis least aligned with v
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    normalize_or(v.cross(&axis), Vector3::y())
}
