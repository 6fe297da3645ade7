use crate::error::{PhysicsError, PhysicsResult};
use crate::math::Vec2;
use crate::objects::rigid_body::RigidBody;

/// Advances one body by `dt` seconds using semi-implicit Euler:
/// forces and gravity into velocity, velocity into position and
/// orientation, then clears the force accumulators.
///
/// Static (zero inverse mass) and disabled bodies are left untouched apart
/// from the accumulator reset.
pub fn integrate(body: &mut RigidBody, dt: f64, gravity: Vec2) -> PhysicsResult<()> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(PhysicsError::InvalidTimeStep(dt));
    }
    integrate_forces(body, dt, gravity);
    integrate_velocity(body, dt);
    body.clear_accumulators();
    Ok(())
}

/// `v += (F/m + g) * dt`, `w += (T/I) * dt`.
pub fn integrate_forces(body: &mut RigidBody, dt: f64, gravity: Vec2) {
    if !is_movable(body) || dt <= 0.0 {
        return;
    }

    let mut acceleration = body.force * body.inv_mass();
    if body.use_gravity {
        acceleration += gravity;
    }
    body.linear_velocity += acceleration * dt;

    if !body.freeze_orient {
        body.angular_velocity += body.torque * body.inv_inertia() * dt;
    }
}

/// `p += v * dt`, `theta += w * dt`.
pub fn integrate_velocity(body: &mut RigidBody, dt: f64) {
    if !is_movable(body) || dt <= 0.0 {
        return;
    }

    body.position += body.linear_velocity * dt;

    if !body.freeze_orient {
        let rotation = wrap_angle(body.rotation() + body.angular_velocity * dt);
        body.set_rotation(rotation);
    }
}

fn is_movable(body: &RigidBody) -> bool {
    body.is_enabled() && !body.is_static()
}

/// Wraps an angle in radians to the range [-PI, PI].
fn wrap_angle(angle: f64) -> f64 {
    angle.sin().atan2(angle.cos())
}
