use crate::collision::AABB;
use crate::common::Material;
use crate::error::{PhysicsError, PhysicsResult};
use crate::math::{Rotation, Transform, Vec2};
use crate::shapes::Shape;
use crate::world::BodyHandle;

/// A rigid body owned by a `PhysicsWorld`.
///
/// Mass properties are derived from the shape and density at construction and
/// only change when the body is enabled or disabled. A disabled body keeps
/// colliding but has zero inverse mass and inertia, so nothing moves it.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBody {
    handle: BodyHandle,
    shape: Shape,
    pub material: Material,

    // Primary state
    pub position: Vec2,
    rotation: f64,
    orientation: Rotation,
    pub linear_velocity: Vec2,
    pub angular_velocity: f64,

    // Accumulators, cleared at the end of every step
    pub force: Vec2,
    pub torque: f64,

    density: f64,
    mass: f64,
    inv_mass: f64,
    inertia: f64,
    inv_inertia: f64,

    enabled: bool,
    /// Gravity is applied during integration.
    pub use_gravity: bool,
    /// Orientation is locked: no angular integration or response.
    pub freeze_orient: bool,
    is_grounded: bool,
}

impl RigidBody {
    /// Creates an enabled body with the default material at `position`.
    ///
    /// Mass is `density * area`; inertia is taken about the centroid.
    /// Fails with `InvalidShape` if the density is not finite and positive.
    pub fn new(shape: Shape, position: Vec2, density: f64) -> PhysicsResult<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(PhysicsError::InvalidShape(format!(
                "density must be positive, got {}",
                density
            )));
        }
        if !position.is_finite() {
            return Err(PhysicsError::InvalidShape("position must be finite".into()));
        }

        let mass_data = shape.mass_data();
        let mass = density * mass_data.area;
        let inertia = density * mass_data.inertia;

        Ok(Self {
            handle: BodyHandle::default(),
            shape,
            material: Material::default(),
            position,
            rotation: 0.0,
            orientation: Rotation::IDENTITY,
            linear_velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            force: Vec2::ZERO,
            torque: 0.0,
            density,
            mass,
            inv_mass: if mass > 0.0 { 1.0 / mass } else { 0.0 },
            inertia,
            inv_inertia: if inertia > 0.0 { 1.0 / inertia } else { 0.0 },
            enabled: true,
            use_gravity: true,
            freeze_orient: false,
            is_grounded: false,
        })
    }

    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    pub(crate) fn set_handle(&mut self, handle: BodyHandle) {
        self.handle = handle;
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    /// Zero for disabled bodies.
    pub fn inv_mass(&self) -> f64 {
        self.inv_mass
    }

    /// Zero for disabled bodies and for bodies with a frozen orientation.
    pub fn inv_inertia(&self) -> f64 {
        if self.freeze_orient {
            0.0
        } else {
            self.inv_inertia
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True when nothing can move this body.
    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Enabling restores the shape-derived inverse mass and inertia,
    /// disabling forces both to zero and stops the body.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.inv_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
            self.inv_inertia = if self.inertia > 0.0 { 1.0 / self.inertia } else { 0.0 };
        } else {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
            self.linear_velocity = Vec2::ZERO;
            self.angular_velocity = 0.0;
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub(crate) fn set_grounded(&mut self, grounded: bool) {
        self.is_grounded = grounded;
    }

    /// Orientation in radians.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians;
        self.orientation = Rotation::from_radians(radians);
    }

    pub fn transform(&self) -> Transform {
        Transform { position: self.position, rotation: self.orientation }
    }

    /// World-space outline vertex. Circles report `circle_vertices` points
    /// and ignore rotation.
    pub fn world_vertex(&self, index: usize, circle_vertices: usize) -> Option<Vec2> {
        let local = self.shape.local_vertex(index, circle_vertices)?;
        Some(match self.shape {
            Shape::Circle(_) => self.position + local,
            _ => self.transform().apply(local),
        })
    }

    /// Calculates the world-space bounding box of the shape.
    pub fn calculate_aabb(&self) -> AABB {
        if let Shape::Circle(circle) = &self.shape {
            return AABB::around(self.position, circle.radius);
        }
        let transform = self.transform();
        let world: Vec<Vec2> = self
            .shape
            .as_polygon()
            .map(|polygon| polygon.vertices().iter().map(|&v| transform.apply(v)).collect())
            .unwrap_or_default();
        AABB::from_points(&world).unwrap_or_else(|| AABB::around(self.position, 0.0))
    }

    /// Applies a force at the center of mass.
    pub fn apply_force(&mut self, force: Vec2) {
        self.force += force;
    }

    pub fn apply_torque(&mut self, torque: f64) {
        self.torque += torque;
    }

    /// Changes velocities by an impulse applied at `contact` (relative to the center of mass).
    pub fn apply_impulse(&mut self, impulse: Vec2, contact: Vec2) {
        if !self.enabled {
            return;
        }
        self.linear_velocity += impulse * self.inv_mass;
        if !self.freeze_orient {
            self.angular_velocity += self.inv_inertia * contact.cross(impulse);
        }
    }

    /// Velocity of the material point at offset `r` from the center of mass.
    pub fn velocity_at(&self, r: Vec2) -> Vec2 {
        self.linear_velocity + r.cross_scalar(self.angular_velocity)
    }

    pub fn clear_accumulators(&mut self) {
        self.force = Vec2::ZERO;
        self.torque = 0.0;
    }
}
