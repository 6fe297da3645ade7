use crate::math::{bias_greater_than, Transform, Vec2, EPSILON};
use crate::objects::rigid_body::RigidBody;
use crate::shapes::{Circle, Polygon, Shape};

use super::manifold::CollisionManifold;

/// Narrow phase entry point. Dispatches on the shape pair and returns a
/// manifold with the normal pointing from `body_a` to `body_b`, or `None`
/// when the shapes do not overlap.
pub fn check_collision(body_a: &RigidBody, body_b: &RigidBody) -> Option<CollisionManifold> {
    match (body_a.shape(), body_b.shape()) {
        (Shape::Circle(circle_a), Shape::Circle(circle_b)) => {
            check_circle_circle(body_a, circle_a, body_b, circle_b)
        }
        (Shape::Circle(circle), other) => {
            let polygon = other.as_polygon()?;
            check_circle_polygon(body_a, circle, body_b, polygon)
        }
        (other, Shape::Circle(circle)) => {
            let polygon = other.as_polygon()?;
            check_circle_polygon(body_b, circle, body_a, polygon).map(CollisionManifold::flipped)
        }
        (shape_a, shape_b) => {
            let polygon_a = shape_a.as_polygon()?;
            let polygon_b = shape_b.as_polygon()?;
            check_polygon_polygon(body_a, polygon_a, body_b, polygon_b)
        }
    }
}

/// Checks for collision between two circles.
pub fn check_circle_circle(
    body_a: &RigidBody,
    circle_a: &Circle,
    body_b: &RigidBody,
    circle_b: &Circle,
) -> Option<CollisionManifold> {
    let offset = body_b.position - body_a.position;
    let dist_sq = offset.length_squared();
    let radii_sum = circle_a.radius + circle_b.radius;

    if dist_sq >= radii_sum * radii_sum {
        return None;
    }

    let distance = dist_sq.sqrt();
    let manifold = if distance == 0.0 {
        // Concentric: any direction separates them; pick +x.
        CollisionManifold::new(body_a.handle(), body_b.handle(), Vec2::new(1.0, 0.0), radii_sum)
            .with_contact(body_a.position)
    } else {
        let normal = offset / distance;
        CollisionManifold::new(body_a.handle(), body_b.handle(), normal, radii_sum - distance)
            .with_contact(body_a.position + normal * circle_a.radius)
    };
    Some(manifold)
}

/// Circle (A) against convex polygon (B). The polygon is searched for the
/// face of greatest separation from the circle centre, then the centre is
/// classified into the face or one of its two vertex regions.
pub fn check_circle_polygon(
    circle_body: &RigidBody,
    circle: &Circle,
    polygon_body: &RigidBody,
    polygon: &Polygon,
) -> Option<CollisionManifold> {
    let radius = circle.radius;
    let transform = polygon_body.transform();
    let center = transform.apply_inverse(circle_body.position);

    let mut separation = f64::MIN;
    let mut face = 0;
    for (i, (&vertex, &normal)) in polygon.vertices().iter().zip(polygon.normals()).enumerate() {
        let s = normal.dot(center - vertex);
        if s > radius {
            return None;
        }
        if s > separation {
            separation = s;
            face = i;
        }
    }

    let (v1, v2) = polygon.edge(face);
    let face_normal = polygon.normals()[face];
    let new_manifold = |normal: Vec2, penetration: f64| {
        CollisionManifold::new(circle_body.handle(), polygon_body.handle(), normal, penetration)
    };

    // Centre inside the polygon.
    if separation < EPSILON {
        let normal = -transform.rotation.apply(face_normal);
        return Some(
            new_manifold(normal, radius - separation)
                .with_contact(circle_body.position + normal * radius),
        );
    }

    let dot1 = (center - v1).dot(v2 - v1);
    let dot2 = (center - v2).dot(v1 - v2);

    let vertex_region = if dot1 <= 0.0 {
        Some(v1)
    } else if dot2 <= 0.0 {
        Some(v2)
    } else {
        None
    };

    match vertex_region {
        Some(vertex) => {
            let dist_sq = center.distance_squared(vertex);
            if dist_sq > radius * radius {
                return None;
            }
            let normal = transform.rotation.apply(vertex - center).normalize();
            Some(new_manifold(normal, radius - dist_sq.sqrt()).with_contact(transform.apply(vertex)))
        }
        None => {
            if (center - v1).dot(face_normal) > radius {
                return None;
            }
            let normal = -transform.rotation.apply(face_normal);
            Some(
                new_manifold(normal, radius - separation)
                    .with_contact(circle_body.position + normal * radius),
            )
        }
    }
}

/// Polygon placed in the world, for the SAT helpers below.
#[derive(Clone, Copy)]
struct Placed<'a> {
    polygon: &'a Polygon,
    transform: Transform,
}

impl<'a> Placed<'a> {
    fn world_vertex(&self, index: usize) -> Vec2 {
        let n = self.polygon.vertex_count();
        self.transform.apply(self.polygon.vertices()[index % n])
    }
}

/// Separating axis test over the face normals of both polygons, followed by
/// clipping the incident face against the reference face.
pub fn check_polygon_polygon(
    body_a: &RigidBody,
    polygon_a: &Polygon,
    body_b: &RigidBody,
    polygon_b: &Polygon,
) -> Option<CollisionManifold> {
    let a = Placed { polygon: polygon_a, transform: body_a.transform() };
    let b = Placed { polygon: polygon_b, transform: body_b.transform() };

    let (penetration_a, face_a) = find_axis_least_penetration(a, b);
    if penetration_a >= 0.0 {
        return None;
    }
    let (penetration_b, face_b) = find_axis_least_penetration(b, a);
    if penetration_b >= 0.0 {
        return None;
    }

    // Normal always points from A to B, so flip when B owns the reference face.
    let (reference, incident, reference_index, flip) =
        if bias_greater_than(penetration_a, penetration_b) {
            (a, b, face_a, false)
        } else {
            (b, a, face_b, true)
        };

    let incident_face = find_incident_face(reference, incident, reference_index);

    let v1 = reference.world_vertex(reference_index);
    let v2 = reference.world_vertex(reference_index + 1);

    let side_normal = (v2 - v1).normalize();
    let reference_normal = side_normal.edge_normal();
    let reference_offset = reference_normal.dot(v1);
    let neg_side = -side_normal.dot(v1);
    let pos_side = side_normal.dot(v2);

    // Floating point error can leave fewer than two points; treat as no contact.
    let incident_face = clip(-side_normal, neg_side, incident_face)?;
    let incident_face = clip(side_normal, pos_side, incident_face)?;

    let normal = if flip { -reference_normal } else { reference_normal };
    let mut manifold = CollisionManifold::new(body_a.handle(), body_b.handle(), normal, 0.0);

    let mut depth_sum = 0.0;
    for point in incident_face {
        let separation = reference_normal.dot(point) - reference_offset;
        if separation <= 0.0 {
            manifold.push_contact(point);
            depth_sum -= separation;
        }
    }
    if manifold.contact_count == 0 {
        return None;
    }
    manifold.penetration = depth_sum / manifold.contact_count as f64;
    Some(manifold)
}

/// Largest signed distance from a face of `a` to the deepest point of `b`
/// behind it, with that face's index. A non-negative result means the face
/// is a separating axis.
fn find_axis_least_penetration(a: Placed, b: Placed) -> (f64, usize) {
    let mut best_distance = f64::MIN;
    let mut best_index = 0;

    for (i, (&vertex, &normal)) in a.polygon.vertices().iter().zip(a.polygon.normals()).enumerate() {
        // Face normal and vertex of A in B's model space.
        let normal_b = b.transform.rotation.apply_inverse(a.transform.rotation.apply(normal));
        let vertex_b = b.transform.apply_inverse(a.transform.apply(vertex));

        let support = b.polygon.support(-normal_b);
        let distance = normal_b.dot(support - vertex_b);

        if distance > best_distance {
            best_distance = distance;
            best_index = i;
        }
    }

    (best_distance, best_index)
}

/// World-space endpoints of the incident face: the face of `incident` most
/// anti-parallel to the reference face normal.
fn find_incident_face(reference: Placed, incident: Placed, reference_index: usize) -> [Vec2; 2] {
    let reference_normal = incident.transform.rotation.apply_inverse(
        reference.transform.rotation.apply(reference.polygon.normals()[reference_index]),
    );

    let mut incident_index = 0;
    let mut min_dot = f64::MAX;
    for (i, &normal) in incident.polygon.normals().iter().enumerate() {
        let dot = reference_normal.dot(normal);
        if dot < min_dot {
            min_dot = dot;
            incident_index = i;
        }
    }

    [incident.world_vertex(incident_index), incident.world_vertex(incident_index + 1)]
}

/// Clips a segment against the half-plane `normal . p <= offset`.
/// Returns `None` unless two points survive.
fn clip(normal: Vec2, offset: f64, face: [Vec2; 2]) -> Option<[Vec2; 2]> {
    let mut out = face;
    let mut count = 0;

    let distance_a = normal.dot(face[0]) - offset;
    let distance_b = normal.dot(face[1]) - offset;

    if distance_a <= 0.0 {
        out[count] = face[0];
        count += 1;
    }
    if distance_b <= 0.0 {
        out[count] = face[1];
        count += 1;
    }
    if distance_a * distance_b < 0.0 {
        let alpha = distance_a / (distance_a - distance_b);
        out[count] = face[0] + (face[1] - face[0]) * alpha;
        count += 1;
    }

    (count == 2).then_some(out)
}
