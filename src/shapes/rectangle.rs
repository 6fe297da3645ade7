use crate::error::{PhysicsError, PhysicsResult};
use crate::math::Vec2;

use super::Polygon;

/// Axis-aligned box in local space, stored as a 4-gon so the polygon
/// narrow phase handles it unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
    polygon: Polygon,
}

impl Rectangle {
    pub fn new(width: f64, height: f64) -> PhysicsResult<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PhysicsError::InvalidShape(format!(
                    "rectangle {} must be positive, got {}",
                    name, value
                )));
            }
        }
        let (hw, hh) = (width * 0.5, height * 0.5);
        let polygon = Polygon::new(vec![
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
            Vec2::new(-hw, -hh),
        ])?;
        Ok(Self { width, height, polygon })
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_rectangle_vertices_match_dimensions() {
        let rect = Rectangle::new(4.0, 2.0).unwrap();
        let v = rect.polygon().vertices();
        assert_eq!(v.len(), 4);
        assert!((v[0].x - 2.0).abs() < EPSILON && (v[0].y - -1.0).abs() < EPSILON);
        assert!((v[1].x - 2.0).abs() < EPSILON && (v[1].y - 1.0).abs() < EPSILON);
        assert!((v[2].x - -2.0).abs() < EPSILON && (v[2].y - 1.0).abs() < EPSILON);
        assert!((v[3].x - -2.0).abs() < EPSILON && (v[3].y - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rectangle_normals() {
        let rect = Rectangle::new(4.0, 2.0).unwrap();
        let n = rect.polygon().normals();
        // right, bottom (+y), left, top (-y)
        assert!((n[0].x - 1.0).abs() < EPSILON);
        assert!((n[1].y - 1.0).abs() < EPSILON);
        assert!((n[2].x - -1.0).abs() < EPSILON);
        assert!((n[3].y - -1.0).abs() < EPSILON);
    }

    #[test]
    fn test_rectangle_rejects_bad_dimensions() {
        assert!(matches!(Rectangle::new(0.0, 1.0), Err(PhysicsError::InvalidShape(_))));
        assert!(matches!(Rectangle::new(1.0, -3.0), Err(PhysicsError::InvalidShape(_))));
    }
}
