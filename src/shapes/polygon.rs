use crate::error::{PhysicsError, PhysicsResult};
use crate::math::{Vec2, EPSILON};

use super::MassData;

/// Convex polygon in local space.
///
/// Construction normalizes the winding to positive signed area, moves the
/// centroid to the local origin and caches one outward unit normal per edge.
/// Edge `i` runs from vertex `i` to vertex `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    normals: Vec<Vec2>,
}

impl Polygon {
    /// Hard cap on vertices per polygon.
    pub const MAX_VERTICES: usize = 24;

    /// Builds a polygon from vertices in either winding order.
    ///
    /// Fails with `InvalidShape` for fewer than 3 or more than
    /// `MAX_VERTICES` points, non-finite coordinates, repeated points,
    /// zero area, or a non-convex outline.
    pub fn new(vertices: Vec<Vec2>) -> PhysicsResult<Self> {
        let n = vertices.len();
        if n < 3 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs at least 3 vertices, got {}",
                n
            )));
        }
        if n > Self::MAX_VERTICES {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon supports at most {} vertices, got {}",
                Self::MAX_VERTICES,
                n
            )));
        }
        if vertices.iter().any(|v| !v.is_finite()) {
            return Err(PhysicsError::InvalidShape("polygon vertex is not finite".into()));
        }

        let mut vertices = vertices;
        let signed_area = signed_area(&vertices);
        if signed_area.abs() < EPSILON {
            return Err(PhysicsError::InvalidShape("polygon has zero area".into()));
        }
        if signed_area < 0.0 {
            vertices.reverse();
        }

        for i in 0..n {
            let edge = vertices[(i + 1) % n] - vertices[i];
            if edge.length_squared() < EPSILON * EPSILON {
                return Err(PhysicsError::InvalidShape(format!(
                    "polygon has a repeated vertex at index {}",
                    i
                )));
            }
            let next_edge = vertices[(i + 2) % n] - vertices[(i + 1) % n];
            // Collinear runs are tolerated; any right turn is not.
            if edge.cross(next_edge) < -EPSILON {
                return Err(PhysicsError::InvalidShape("polygon is not convex".into()));
            }
        }

        let centroid = centroid(&vertices);
        for v in vertices.iter_mut() {
            *v -= centroid;
        }

        let normals = (0..n)
            .map(|i| (vertices[(i + 1) % n] - vertices[i]).edge_normal().normalize())
            .collect();

        Ok(Self { vertices, normals })
    }

    /// Regular polygon with vertex `i` at angle `360 / sides * i` degrees.
    pub fn regular(radius: f64, sides: usize) -> PhysicsResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon radius must be positive, got {}",
                radius
            )));
        }
        if sides < 3 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs at least 3 sides, got {}",
                sides
            )));
        }
        if sides > Self::MAX_VERTICES {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon has {} sides, at most {} allowed",
                sides,
                Self::MAX_VERTICES
            )));
        }
        let vertices = (0..sides)
            .map(|i| Vec2::from_angle((360.0 / sides as f64 * i as f64).to_radians()) * radius)
            .collect();
        Self::new(vertices)
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec2] {
        &self.normals
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Endpoints of edge `index`.
    pub fn edge(&self, index: usize) -> (Vec2, Vec2) {
        let n = self.vertices.len();
        (self.vertices[index % n], self.vertices[(index + 1) % n])
    }

    /// Vertex furthest along `direction`.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let mut best = self.vertices[0];
        let mut best_projection = best.dot(direction);
        for &v in self.vertices.iter().skip(1) {
            let projection = v.dot(direction);
            if projection > best_projection {
                best = v;
                best_projection = projection;
            }
        }
        best
    }

    /// Strict containment test for a local-space point.
    pub fn contains(&self, point: Vec2) -> bool {
        self.vertices
            .iter()
            .zip(self.normals.iter())
            .all(|(&v, &n)| n.dot(point - v) < 0.0)
    }

    /// Area and unit-density inertia about the local origin (the centroid).
    pub fn mass_data(&self) -> MassData {
        let n = self.vertices.len();
        let mut area = 0.0;
        let mut inertia = 0.0;
        for i in 0..n {
            let p1 = self.vertices[i];
            let p2 = self.vertices[(i + 1) % n];
            let cross = p1.cross(p2);
            area += 0.5 * cross;
            let int_x2 = p1.x * p1.x + p2.x * p1.x + p2.x * p2.x;
            let int_y2 = p1.y * p1.y + p2.y * p1.y + p2.y * p2.y;
            inertia += (0.25 / 3.0 * cross) * (int_x2 + int_y2);
        }
        MassData { area, inertia }
    }
}

fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| vertices[i].cross(vertices[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

/// Area-weighted centroid. Assumes positive winding and non-zero area.
fn centroid(vertices: &[Vec2]) -> Vec2 {
    let n = vertices.len();
    let mut area = 0.0;
    let mut center = Vec2::ZERO;
    for i in 0..n {
        let p1 = vertices[i];
        let p2 = vertices[(i + 1) % n];
        let triangle_area = 0.5 * p1.cross(p2);
        area += triangle_area;
        center += (p1 + p2) * (triangle_area / 3.0);
    }
    center / area
}
