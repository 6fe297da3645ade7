//! World configuration, loadable from JSON.

use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, PhysicsResult};
use crate::math::Vec2;
use crate::shapes::Polygon;

/// Tunables of a `PhysicsWorld`. Every field has a default, so a JSON
/// document only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravitational acceleration. +y points down the screen.
    pub gravity: Vec2,
    /// Fixed step used by `update`, `run_step` and the background runner, in milliseconds.
    pub time_step_ms: f64,
    /// Capacity of the body pool.
    pub max_bodies: usize,
    /// Impulse relaxation passes per step.
    pub collision_iterations: usize,
    /// Penetration tolerated before positional correction kicks in (slop).
    pub penetration_allowance: f64,
    /// Fraction of the remaining penetration removed per step.
    pub penetration_correction: f64,
    /// Vertex count reported for circle outlines.
    pub circle_vertices: usize,
    /// Largest vertex count accepted for polygon bodies.
    pub max_vertices: usize,
    /// Fixed steps `update` may take per call; leftover time is dropped.
    pub max_steps_per_update: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 9.81),
            time_step_ms: 1000.0 / 60.0,
            max_bodies: 64,
            collision_iterations: 20,
            penetration_allowance: 0.05,
            penetration_correction: 0.4,
            circle_vertices: 24,
            max_vertices: Polygon::MAX_VERTICES,
            max_steps_per_update: 8,
        }
    }
}

impl PhysicsConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> PhysicsResult<Self> {
        let config: PhysicsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed step in seconds.
    pub fn time_step(&self) -> f64 {
        self.time_step_ms / 1000.0
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::Config("gravity must be finite".into()));
        }
        if !self.time_step_ms.is_finite() || self.time_step_ms <= 0.0 {
            return Err(PhysicsError::Config(format!(
                "time_step_ms must be positive, got {}",
                self.time_step_ms
            )));
        }
        if self.max_bodies == 0 {
            return Err(PhysicsError::Config("max_bodies must be at least 1".into()));
        }
        if self.collision_iterations == 0 {
            return Err(PhysicsError::Config("collision_iterations must be at least 1".into()));
        }
        if !self.penetration_allowance.is_finite() || self.penetration_allowance < 0.0 {
            return Err(PhysicsError::Config("penetration_allowance must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.penetration_correction) {
            return Err(PhysicsError::Config("penetration_correction must be in [0, 1]".into()));
        }
        if self.circle_vertices < 3 {
            return Err(PhysicsError::Config("circle_vertices must be at least 3".into()));
        }
        if !(3..=Polygon::MAX_VERTICES).contains(&self.max_vertices) {
            return Err(PhysicsError::Config(format!(
                "max_vertices must be in 3..={}",
                Polygon::MAX_VERTICES
            )));
        }
        if self.max_steps_per_update == 0 {
            return Err(PhysicsError::Config("max_steps_per_update must be at least 1".into()));
        }
        Ok(())
    }
}
