pub mod transform;
pub mod vec2;

pub use transform::{Rotation, Transform};
pub use vec2::Vec2;

/// Tolerance used by the narrow phase and solver for near-zero comparisons.
pub const EPSILON: f64 = 1e-6;

/// Biased `a >= b` used to pick a reference face. The bias keeps the choice
/// stable frame to frame when two penetrations are nearly equal.
pub fn bias_greater_than(a: f64, b: f64) -> bool {
    const BIAS_RELATIVE: f64 = 0.95;
    const BIAS_ABSOLUTE: f64 = 0.01;
    a >= b * BIAS_RELATIVE + a * BIAS_ABSOLUTE
}
