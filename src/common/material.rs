//! Surface response coefficients of a body.

use serde::{Deserialize, Serialize};

/// Physical properties of a body's surface that affect contact resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Coefficient of restitution (bounciness). Range [0, 1].
    pub restitution: f64,
    /// Friction coefficient while the contact is not sliding. Range [0, inf).
    pub static_friction: f64,
    /// Friction coefficient once the contact slides. Range [0, inf).
    pub dynamic_friction: f64,
}

impl Material {
    /// Creates a material, clamping each coefficient into its valid range.
    /// Non-finite inputs collapse to zero.
    pub fn new(restitution: f64, static_friction: f64, dynamic_friction: f64) -> Self {
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        Material {
            restitution: finite_or_zero(restitution).clamp(0.0, 1.0),
            static_friction: finite_or_zero(static_friction).max(0.0),
            dynamic_friction: finite_or_zero(dynamic_friction).max(0.0),
        }
    }

    /// Pairwise coefficients for a contact: geometric mean of each field.
    pub fn combine(&self, other: &Material) -> Material {
        Material {
            restitution: (self.restitution * other.restitution).sqrt(),
            static_friction: (self.static_friction * other.static_friction).sqrt(),
            dynamic_friction: (self.dynamic_friction * other.dynamic_friction).sqrt(),
        }
    }
}

impl Default for Material {
    /// No bounce, moderate grip.
    fn default() -> Self {
        Material {
            restitution: 0.0,
            static_friction: 0.4,
            dynamic_friction: 0.2,
        }
    }
}
