//! Deterministic, allocation-free fixed-point math usable from any
//! system. All operations are pure; see `scalar` for the Q32.32
//! representation and its arithmetic invariants.

pub mod rand;
pub mod scalar;
pub mod trig;
pub mod vector;

pub use rand::FastRand;
pub use scalar::{abs, clamp, div, from_float, from_int, mul, mul_div, sqrt, to_float, to_int, fx, SCALE};
pub use trig::{cos, rad_to_rot, rotate_vector, sin};
pub use vector::{magnitude, magnitude_sq, normalize_2d, perpendicular, Vec2, Vec3, Vec3F};
