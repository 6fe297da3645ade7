use std::f64::consts::PI;

use crate::error::{PhysicsError, PhysicsResult};
use crate::math::Vec2;

use super::MassData;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    /// Fails with `InvalidShape` unless the radius is finite and positive.
    pub fn new(radius: f64) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidShape(format!(
                "circle radius must be positive, got {}",
                radius
            )));
        }
        Ok(Self { radius })
    }

    /// Solid disc: `I = m r^2 / 2`.
    pub fn mass_data(&self) -> MassData {
        let area = PI * self.radius * self.radius;
        MassData {
            area,
            inertia: 0.5 * area * self.radius * self.radius,
        }
    }

    /// Point `index` of a `segments`-gon inscribed in the circle, local space.
    /// Circles are reported with a fixed vertex count for drawing.
    pub fn outline_point(&self, index: usize, segments: usize) -> Vec2 {
        let angle = (360.0 / segments as f64 * index as f64).to_radians();
        Vec2::from_angle(angle) * self.radius
    }
}
