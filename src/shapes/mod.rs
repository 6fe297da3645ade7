pub mod circle;
pub mod polygon;
pub mod rectangle;

use serde::{Deserialize, Serialize};

pub use circle::Circle;
pub use polygon::Polygon;
pub use rectangle::Rectangle;

use crate::math::Vec2;

/// Area and unit-density moment of inertia about the centroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassData {
    pub area: f64,
    pub inertia: f64,
}

/// Geometric shape of a rigid body. Immutable once the body exists.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

/// Shape tag reported by queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Polygon,
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Polygon view shared by rectangles and general polygons.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Circle(_) => None,
            Shape::Rectangle(rect) => Some(rect.polygon()),
            Shape::Polygon(polygon) => Some(polygon),
        }
    }

    pub fn mass_data(&self) -> MassData {
        match self {
            Shape::Circle(circle) => circle.mass_data(),
            Shape::Rectangle(rect) => rect.polygon().mass_data(),
            Shape::Polygon(polygon) => polygon.mass_data(),
        }
    }

    /// Number of outline vertices; circles report `circle_vertices`.
    pub fn vertex_count(&self, circle_vertices: usize) -> usize {
        match self.as_polygon() {
            Some(polygon) => polygon.vertex_count(),
            None => circle_vertices,
        }
    }

    /// Outline vertex in local space, before rotation.
    pub fn local_vertex(&self, index: usize, circle_vertices: usize) -> Option<Vec2> {
        match self {
            Shape::Circle(circle) if index < circle_vertices => {
                Some(circle.outline_point(index, circle_vertices))
            }
            Shape::Circle(_) => None,
            _ => self
                .as_polygon()
                .and_then(|polygon| polygon.vertices().get(index).copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_is_polygon_view() {
        let shape = Shape::Rectangle(Rectangle::new(2.0, 2.0).unwrap());
        assert_eq!(shape.kind(), ShapeKind::Rectangle);
        assert_eq!(shape.as_polygon().map(Polygon::vertex_count), Some(4));
    }

    #[test]
    fn test_circle_vertex_count_uses_setting() {
        let shape = Shape::Circle(Circle::new(1.0).unwrap());
        assert_eq!(shape.vertex_count(24), 24);
        assert!(shape.local_vertex(23, 24).is_some());
        assert!(shape.local_vertex(24, 24).is_none());
    }

    #[test]
    fn test_polygon_local_vertex_out_of_range() {
        let shape = Shape::Polygon(Polygon::regular(1.0, 5).unwrap());
        assert!(shape.local_vertex(4, 24).is_some());
        assert!(shape.local_vertex(5, 24).is_none());
    }
}
