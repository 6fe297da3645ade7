use log::{debug, info, trace, warn};

use crate::{
    collision::{self, CollisionManifold, AABB},
    common::{Material, PhysicsConfig},
    error::{PhysicsError, PhysicsResult},
    integration::integrator,
    math::Vec2,
    objects::rigid_body::RigidBody,
    shapes::{Circle, Polygon, Rectangle, Shape, ShapeKind},
    solver,
};

use super::registry::{BodyHandle, BodyRegistry};
use super::time::FixedTimestep;

/// Fragments are shrunk about their centroids by this factor.
const SHATTER_SCALE: f64 = 0.95;

/// An independent simulation: owns its bodies, configuration and the
/// contacts of the most recent step.
///
/// Nothing here is global; share a world between threads by wrapping it in
/// a lock (see `PhysicsRunner`).
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    bodies: BodyRegistry,
    config: PhysicsConfig,
    timestep: FixedTimestep,
    // Manifolds found by the last step
    contacts: Vec<CollisionManifold>,
    steps: u64,
}

impl PhysicsWorld {
    /// Creates a new, empty physics world with default settings.
    pub fn new() -> Self {
        let config = PhysicsConfig::default();
        info!(
            "physics world created: capacity {}, step {:.3} ms",
            config.max_bodies, config.time_step_ms
        );
        Self::from_valid_config(config)
    }

    /// Creates an empty world from a configuration, validating it first.
    pub fn with_config(config: PhysicsConfig) -> PhysicsResult<Self> {
        config.validate()?;
        info!(
            "physics world created: capacity {}, step {:.3} ms",
            config.max_bodies, config.time_step_ms
        );
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: BodyRegistry::new(config.max_bodies),
            timestep: FixedTimestep::new(config.time_step(), config.max_steps_per_update),
            contacts: Vec::new(),
            steps: 0,
            config,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Destroys every body and clears contacts and accumulated time. The
    /// configuration is kept; handles issued before the reset stay invalid.
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.contacts.clear();
        self.timestep.reset();
        self.steps = 0;
        info!("physics world reset");
    }

    pub fn gravity(&self) -> Vec2 {
        self.config.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> PhysicsResult<()> {
        if !gravity.is_finite() {
            return Err(PhysicsError::Config("gravity must be finite".into()));
        }
        self.config.gravity = gravity;
        Ok(())
    }

    /// Fixed step in seconds.
    pub fn time_step(&self) -> f64 {
        self.config.time_step()
    }

    /// Sets the fixed step used by `run_step`, `update` and the runner.
    pub fn set_time_step_ms(&mut self, milliseconds: f64) -> PhysicsResult<()> {
        if !milliseconds.is_finite() || milliseconds <= 0.0 {
            return Err(PhysicsError::InvalidTimeStep(milliseconds));
        }
        self.config.time_step_ms = milliseconds;
        self.timestep.set_dt(self.config.time_step());
        debug!("time step set to {} ms", milliseconds);
        Ok(())
    }

    /// Total steps taken since creation or the last reset.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Fraction of a step left in the `update` accumulator, for interpolating
    /// rendered positions between the last two steps.
    pub fn interpolation_alpha(&self) -> f64 {
        self.timestep.alpha()
    }

    // ---------------------------------------------------------------------
    // Body lifecycle
    // ---------------------------------------------------------------------

    /// Adds a body with the given shape at `position`.
    pub fn create_body(&mut self, shape: Shape, position: Vec2, density: f64) -> PhysicsResult<BodyHandle> {
        if let Some(polygon) = shape.as_polygon() {
            if polygon.vertex_count() > self.config.max_vertices {
                return Err(PhysicsError::InvalidShape(format!(
                    "polygon has {} vertices, limit is {}",
                    polygon.vertex_count(),
                    self.config.max_vertices
                )));
            }
        }
        let kind = shape.kind();
        let body = RigidBody::new(shape, position, density)?;
        self.insert(body, kind)
    }

    fn insert(&mut self, body: RigidBody, kind: ShapeKind) -> PhysicsResult<BodyHandle> {
        match self.bodies.insert(body) {
            Ok(handle) => {
                debug!("created {:?} body {:?}", kind, handle);
                Ok(handle)
            }
            Err(err) => {
                warn!("body creation refused: {}", err);
                Err(err)
            }
        }
    }

    pub fn create_circle(&mut self, position: Vec2, radius: f64, density: f64) -> PhysicsResult<BodyHandle> {
        self.create_body(Shape::Circle(Circle::new(radius)?), position, density)
    }

    pub fn create_rectangle(
        &mut self,
        position: Vec2,
        width: f64,
        height: f64,
        density: f64,
    ) -> PhysicsResult<BodyHandle> {
        self.create_body(Shape::Rectangle(Rectangle::new(width, height)?), position, density)
    }

    /// Regular polygon with `sides` vertices on a circle of `radius`.
    pub fn create_polygon(
        &mut self,
        position: Vec2,
        radius: f64,
        sides: usize,
        density: f64,
    ) -> PhysicsResult<BodyHandle> {
        if sides > self.config.max_vertices {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon sides must be in 3..={}, got {}",
                self.config.max_vertices, sides
            )));
        }
        self.create_body(Shape::Polygon(Polygon::regular(radius, sides)?), position, density)
    }

    /// Convex polygon from local-space vertices; they are recentred on their centroid.
    pub fn create_polygon_from_vertices(
        &mut self,
        position: Vec2,
        vertices: Vec<Vec2>,
        density: f64,
    ) -> PhysicsResult<BodyHandle> {
        self.create_body(Shape::Polygon(Polygon::new(vertices)?), position, density)
    }

    pub fn destroy(&mut self, handle: BodyHandle) -> PhysicsResult<()> {
        self.bodies.remove(handle)?;
        debug!("destroyed body {:?}", handle);
        Ok(())
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    fn body_or_err(&mut self, handle: BodyHandle) -> PhysicsResult<&mut RigidBody> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::InvalidHandle(handle))
    }

    /// Live bodies in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = &RigidBody> {
        self.bodies.iter()
    }

    pub fn set_rotation(&mut self, handle: BodyHandle, radians: f64) -> PhysicsResult<()> {
        if !radians.is_finite() {
            return Err(PhysicsError::InvalidShape(format!("rotation must be finite, got {}", radians)));
        }
        self.body_or_err(handle)?.set_rotation(radians);
        Ok(())
    }

    /// Disabled bodies still collide but are never moved.
    pub fn set_enabled(&mut self, handle: BodyHandle, enabled: bool) -> PhysicsResult<()> {
        self.body_or_err(handle)?.set_enabled(enabled);
        Ok(())
    }

    pub fn set_material(&mut self, handle: BodyHandle, material: Material) -> PhysicsResult<()> {
        self.body_or_err(handle)?.material = material;
        Ok(())
    }

    /// Accumulates a force applied during the next step.
    pub fn add_force(&mut self, handle: BodyHandle, force: Vec2) -> PhysicsResult<()> {
        self.body_or_err(handle)?.apply_force(force);
        Ok(())
    }

    pub fn add_torque(&mut self, handle: BodyHandle, torque: f64) -> PhysicsResult<()> {
        self.body_or_err(handle)?.apply_torque(torque);
        Ok(())
    }

    /// Breaks a polygon body into one triangle per edge around `point`.
    ///
    /// Nothing happens (an empty vec is returned) for circles or when `point`
    /// is not strictly inside the shape. Each fragment is pushed outwards
    /// with `force` through its accumulated force. The source body is only
    /// destroyed once every fragment has been built and fits in the pool.
    pub fn shatter(&mut self, handle: BodyHandle, point: Vec2, force: f64) -> PhysicsResult<Vec<BodyHandle>> {
        let body = self.bodies.get(handle).ok_or(PhysicsError::InvalidHandle(handle))?;
        let polygon = match body.shape().as_polygon() {
            Some(polygon) => polygon,
            None => return Ok(Vec::new()),
        };

        let transform = body.transform();
        let local_point = transform.apply_inverse(point);
        if !polygon.contains(local_point) {
            return Ok(Vec::new());
        }

        let count = polygon.vertex_count();
        if self.bodies.available() + 1 < count {
            let err = PhysicsError::CapacityExceeded { capacity: self.bodies.capacity() };
            warn!("shatter of {:?} refused: {}", handle, err);
            return Err(err);
        }

        let mut fragments = Vec::with_capacity(count);
        for i in 0..count {
            let (v1, v2) = polygon.edge(i);
            let centroid = (v1 + v2 + local_point) / 3.0;
            let triangle = [v1, v2, local_point]
                .iter()
                .map(|&v| (v - centroid) * SHATTER_SCALE)
                .collect();

            let mut fragment = RigidBody::new(
                Shape::Polygon(Polygon::new(triangle)?),
                transform.apply(centroid),
                body.density(),
            )?;
            fragment.set_rotation(body.rotation());
            fragment.material = body.material;

            let direction = transform.rotation.apply((v1 + v2) / 2.0 - centroid).normalize();
            fragment.apply_force(direction * force);
            fragments.push(fragment);
        }

        self.bodies.remove(handle)?;
        let handles = fragments
            .into_iter()
            .map(|fragment| self.bodies.insert(fragment))
            .collect::<PhysicsResult<Vec<_>>>()?;
        debug!("shattered body {:?} into {} fragments", handle, handles.len());
        Ok(handles)
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn bodies_count(&self) -> usize {
        self.bodies.len()
    }

    /// Handle of the `index`-th live body, in slot order.
    pub fn body_at(&self, index: usize) -> Option<BodyHandle> {
        self.bodies.nth(index).map(RigidBody::handle)
    }

    pub fn shape_kind(&self, handle: BodyHandle) -> PhysicsResult<ShapeKind> {
        self.bodies
            .get(handle)
            .map(|body| body.shape().kind())
            .ok_or(PhysicsError::InvalidHandle(handle))
    }

    /// Outline vertex count of the `index`-th live body. Circles report
    /// `circle_vertices` points.
    pub fn shape_vertices_count(&self, index: usize) -> Option<usize> {
        self.bodies
            .nth(index)
            .map(|body| body.shape().vertex_count(self.config.circle_vertices))
    }

    /// World-space outline vertex, with position and rotation applied.
    pub fn shape_vertex(&self, handle: BodyHandle, vertex: usize) -> PhysicsResult<Vec2> {
        let body = self.bodies.get(handle).ok_or(PhysicsError::InvalidHandle(handle))?;
        let circle_vertices = self.config.circle_vertices;
        body.world_vertex(vertex, circle_vertices).ok_or(PhysicsError::InvalidVertex {
            index: vertex,
            count: body.shape().vertex_count(circle_vertices),
        })
    }

    /// Manifolds found during the last step.
    pub fn contacts(&self) -> &[CollisionManifold] {
        &self.contacts
    }

    // ---------------------------------------------------------------------
    // Stepping
    // ---------------------------------------------------------------------

    /// Runs exactly one step of the configured fixed size.
    pub fn run_step(&mut self) -> PhysicsResult<()> {
        self.step(self.time_step())
    }

    /// Feeds real elapsed time into the fixed-step accumulator and runs the
    /// steps it yields. Returns how many steps were taken.
    pub fn update(&mut self, frame_dt: f64) -> u32 {
        let steps = self.timestep.accumulate(frame_dt);
        if self.timestep.dropped() > 0.0 {
            warn!(
                "physics falling behind: dropped {:.4} s after {} steps",
                self.timestep.dropped(),
                steps
            );
        }
        let dt = self.timestep.dt();
        for _ in 0..steps {
            self.advance(dt);
        }
        steps
    }

    /// Advances the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f64) -> PhysicsResult<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }
        self.advance(dt);
        Ok(())
    }

    fn advance(&mut self, dt: f64) {
        let gravity = self.config.gravity;

        for body in self.bodies.iter_mut() {
            body.set_grounded(false);
        }

        // 1. Broad and narrow phase
        self.detect_collisions();

        // 2. Forces and gravity into velocity
        for body in self.bodies.iter_mut() {
            integrator::integrate_forces(body, dt, gravity);
        }

        // 3. Impulses
        for manifold in self.contacts.iter_mut() {
            if let (Some(a), Some(b)) = (self.bodies.get(manifold.body_a), self.bodies.get(manifold.body_b)) {
                solver::prepare(manifold, a, b, gravity, dt);
            }
        }
        for _ in 0..self.config.collision_iterations {
            for manifold in &self.contacts {
                if let Some((a, b)) = self.bodies.pair_mut(manifold.body_a, manifold.body_b) {
                    solver::apply_impulse(manifold, a, b);
                }
            }
        }

        // 4. Velocity into position
        for body in self.bodies.iter_mut() {
            integrator::integrate_velocity(body, dt);
        }

        // 5. Positional correction
        let allowance = self.config.penetration_allowance;
        let percent = self.config.penetration_correction;
        for manifold in &self.contacts {
            if let Some((a, b)) = self.bodies.pair_mut(manifold.body_a, manifold.body_b) {
                solver::positional_correction(manifold, a, b, allowance, percent);
            }
        }

        for body in self.bodies.iter_mut() {
            body.clear_accumulators();
        }

        self.steps += 1;
        trace!("step {}: {} bodies, {} manifolds", self.steps, self.bodies.len(), self.contacts.len());
    }

    /// Fills `contacts` with a manifold for every overlapping pair that has
    /// at least one movable body.
    fn detect_collisions(&mut self) {
        self.contacts.clear();

        let bounds: Vec<(BodyHandle, AABB, bool)> = self
            .bodies
            .iter()
            .map(|body| (body.handle(), body.calculate_aabb(), body.is_static()))
            .collect();

        for (i, &(handle_a, aabb_a, static_a)) in bounds.iter().enumerate() {
            for &(handle_b, aabb_b, static_b) in &bounds[i + 1..] {
                if static_a && static_b {
                    continue;
                }
                if !aabb_a.overlaps(&aabb_b) {
                    continue;
                }
                let (Some(body_a), Some(body_b)) = (self.bodies.get(handle_a), self.bodies.get(handle_b)) else {
                    continue;
                };
                if let Some(manifold) = collision::check_collision(body_a, body_b) {
                    self.contacts.push(manifold);
                }
            }
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}
