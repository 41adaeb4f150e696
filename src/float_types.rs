//! Scalar type and geometric constants used across the crate.

// Re-export parry under the shorter name used throughout the crate.
pub use parry3d_f64 as parry3d;

/// Our Real scalar type. All geometry runs in double precision.
pub type Real = f64;

/// Tolerance used for point classification and degeneracy tests.
pub const EPSILON: Real = 1e-5;

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;
