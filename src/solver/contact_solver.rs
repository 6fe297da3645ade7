use log::trace;

use crate::collision::CollisionManifold;
use crate::math::{Vec2, EPSILON};
use crate::objects::rigid_body::RigidBody;

/// Fills in the combined material of a manifold. Contacts whose relative
/// speed is no more than what gravity adds in one step are resting and get
/// zero restitution.
pub fn prepare(manifold: &mut CollisionManifold, body_a: &RigidBody, body_b: &RigidBody, gravity: Vec2, dt: f64) {
    let material = body_a.material.combine(&body_b.material);
    manifold.restitution = material.restitution;
    manifold.static_friction = material.static_friction;
    manifold.dynamic_friction = material.dynamic_friction;

    let resting_threshold = (gravity * dt).length_squared() + EPSILON;
    let resting = manifold.contacts().iter().any(|&contact| {
        let r_a = contact - body_a.position;
        let r_b = contact - body_b.position;
        let relative_velocity = body_b.velocity_at(r_b) - body_a.velocity_at(r_a);
        relative_velocity.length_squared() < resting_threshold
    });
    if resting {
        manifold.restitution = 0.0;
    }
}

/// One sequential-impulse pass over the contacts of a manifold: a normal
/// impulse followed by a Coulomb friction impulse per contact point.
pub fn apply_impulse(manifold: &CollisionManifold, body_a: &mut RigidBody, body_b: &mut RigidBody) {
    if body_a.inv_mass() + body_b.inv_mass() <= EPSILON {
        trace!("skipping manifold {:?}/{:?}: both bodies static", manifold.body_a, manifold.body_b);
        return;
    }

    // +y is down: the body on top of the contact is grounded.
    if manifold.normal.y < 0.0 {
        body_b.set_grounded(true);
    } else if manifold.normal.y > 0.0 {
        body_a.set_grounded(true);
    }

    let normal = manifold.normal;
    let contact_count = manifold.contact_count as f64;

    for &contact in manifold.contacts() {
        let r_a = contact - body_a.position;
        let r_b = contact - body_b.position;

        let relative_velocity = body_b.velocity_at(r_b) - body_a.velocity_at(r_a);
        let contact_velocity = relative_velocity.dot(normal);

        // Separating at this point.
        if contact_velocity > 0.0 {
            continue;
        }

        let ra_cross_n = r_a.cross(normal);
        let rb_cross_n = r_b.cross(normal);
        let inv_mass_sum = body_a.inv_mass()
            + body_b.inv_mass()
            + ra_cross_n * ra_cross_n * body_a.inv_inertia()
            + rb_cross_n * rb_cross_n * body_b.inv_inertia();
        if inv_mass_sum <= EPSILON {
            continue;
        }

        let j = -(1.0 + manifold.restitution) * contact_velocity / inv_mass_sum / contact_count;
        let impulse = normal * j;
        body_a.apply_impulse(-impulse, r_a);
        body_b.apply_impulse(impulse, r_b);

        // Friction, from the velocities after the normal impulse.
        let relative_velocity = body_b.velocity_at(r_b) - body_a.velocity_at(r_a);
        let tangent = (relative_velocity - normal * relative_velocity.dot(normal)).normalize();
        if tangent == Vec2::ZERO {
            continue;
        }

        let ra_cross_t = r_a.cross(tangent);
        let rb_cross_t = r_b.cross(tangent);
        let inv_mass_sum_t = body_a.inv_mass()
            + body_b.inv_mass()
            + ra_cross_t * ra_cross_t * body_a.inv_inertia()
            + rb_cross_t * rb_cross_t * body_b.inv_inertia();
        if inv_mass_sum_t <= EPSILON {
            continue;
        }

        let jt = -relative_velocity.dot(tangent) / inv_mass_sum_t / contact_count;
        if jt.abs() <= EPSILON {
            continue;
        }

        // Coulomb: stick below the static cone, otherwise slide. The sliding
        // impulse never exceeds what would stop the tangential motion.
        let tangent_impulse = if jt.abs() < j * manifold.static_friction {
            tangent * jt
        } else {
            let sliding = (j * manifold.dynamic_friction).min(jt.abs());
            tangent * (-sliding)
        };

        body_a.apply_impulse(-tangent_impulse, r_a);
        body_b.apply_impulse(tangent_impulse, r_b);
    }
}

/// Pushes the bodies apart along the normal by `percent` of the penetration
/// beyond `allowance`, split by inverse mass. Disabled bodies never move.
pub fn positional_correction(
    manifold: &CollisionManifold,
    body_a: &mut RigidBody,
    body_b: &mut RigidBody,
    allowance: f64,
    percent: f64,
) {
    let total_inv_mass = body_a.inv_mass() + body_b.inv_mass();
    if total_inv_mass <= EPSILON {
        return;
    }

    let depth = (manifold.penetration - allowance).max(0.0);
    if depth <= 0.0 {
        return;
    }

    let correction = manifold.normal * (depth / total_inv_mass * percent);
    if body_a.is_enabled() {
        body_a.position -= correction * body_a.inv_mass();
    }
    if body_b.is_enabled() {
        body_b.position += correction * body_b.inv_mass();
    }
}
