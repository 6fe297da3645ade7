use crate::math::Vec2;
use crate::world::BodyHandle;

/// Contact information between two overlapping bodies for a single step.
///
/// Produced fresh by the narrow phase each step and discarded afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionManifold {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    /// Unit collision normal, pointing from body A towards body B.
    pub normal: Vec2,
    /// Overlap depth along the normal, never negative.
    pub penetration: f64,
    /// World-space contact points; only the first `contact_count` are valid.
    pub contacts: [Vec2; 2],
    pub contact_count: usize,
    /// Combined surface coefficients, filled in by the contact solver.
    pub restitution: f64,
    pub static_friction: f64,
    pub dynamic_friction: f64,
}

impl CollisionManifold {
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, normal: Vec2, penetration: f64) -> Self {
        Self {
            body_a,
            body_b,
            normal,
            penetration,
            contacts: [Vec2::ZERO; 2],
            contact_count: 0,
            restitution: 0.0,
            static_friction: 0.0,
            dynamic_friction: 0.0,
        }
    }

    pub fn with_contact(mut self, point: Vec2) -> Self {
        self.push_contact(point);
        self
    }

    /// Adds a contact point; points beyond the second are ignored.
    pub fn push_contact(&mut self, point: Vec2) {
        if self.contact_count < self.contacts.len() {
            self.contacts[self.contact_count] = point;
            self.contact_count += 1;
        }
    }

    pub fn contacts(&self) -> &[Vec2] {
        &self.contacts[..self.contact_count]
    }

    /// Swaps the roles of A and B, flipping the normal to match.
    pub fn flipped(mut self) -> Self {
        std::mem::swap(&mut self.body_a, &mut self.body_b);
        self.normal = -self.normal;
        self
    }
}
