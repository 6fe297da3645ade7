use super::vec2::Vec2;

/// 2x2 rotation matrix cached from an orientation angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub m00: f64,
    pub m01: f64,
    pub m10: f64,
    pub m11: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation { m00: 1.0, m01: 0.0, m10: 0.0, m11: 1.0 };

    pub fn from_radians(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self { m00: c, m01: -s, m10: s, m11: c }
    }

    pub fn transpose(self) -> Self {
        Self { m00: self.m00, m01: self.m10, m10: self.m01, m11: self.m11 }
    }

    /// Rotates a vector from local to world orientation.
    pub fn apply(self, v: Vec2) -> Vec2 {
        Vec2::new(self.m00 * v.x + self.m01 * v.y, self.m10 * v.x + self.m11 * v.y)
    }

    /// Rotates a vector from world to local orientation.
    pub fn apply_inverse(self, v: Vec2) -> Vec2 {
        self.transpose().apply(v)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rigid placement of a shape: translation plus rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub rotation: Rotation,
}

impl Transform {
    /// Local point to world point.
    pub fn apply(self, point: Vec2) -> Vec2 {
        self.rotation.apply(point) + self.position
    }

    /// World point to local point.
    pub fn apply_inverse(self, point: Vec2) -> Vec2 {
        self.rotation.apply_inverse(point - self.position)
    }
}
