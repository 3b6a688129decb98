//! Tolerances shared by every geometric test in the crate.
//!
//! All values are absolute. Lengths are compared against [`EPSILON`]; the
//! sine of the angle between two unit directions (the norm of their cross
//! product) is compared against [`PARALLEL_EPSILON`], which doubles as the
//! zero-length threshold before a normalization.

/// Length tolerance in model units.
pub const EPSILON: f64 = 1e-6;

/// Parallelism / zero-length threshold.
pub const PARALLEL_EPSILON: f64 = 1e-9;
