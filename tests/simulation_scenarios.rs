use physics_kernel::{
    BodyHandle, Material, PhysicsConfig, PhysicsError, PhysicsRunner, PhysicsWorld, ShapeKind, Vec2,
};
use std::f64::consts::PI;
use std::thread;
use std::time::{Duration, Instant};

const DT: f64 = 1.0 / 60.0;
const EPSILON: f64 = 1e-6;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// 800 x 100 static floor whose top surface is at y = 440.
fn world_with_floor() -> (PhysicsWorld, BodyHandle) {
    init_logger();
    let mut world = PhysicsWorld::new();
    let floor = world.create_rectangle(Vec2::new(400.0, 490.0), 800.0, 100.0, 10.0).unwrap();
    world.set_enabled(floor, false).unwrap();
    (world, floor)
}

fn assert_finite(world: &PhysicsWorld) {
    for body in world.bodies() {
        assert!(body.position.is_finite(), "position {:?}", body.position);
        assert!(body.linear_velocity.is_finite(), "velocity {:?}", body.linear_velocity);
        assert!(body.angular_velocity.is_finite());
        assert!(body.rotation().is_finite());
    }
}

#[test]
fn test_circle_falls_and_rests_on_floor() {
    let (mut world, floor) = world_with_floor();
    let ball = world.create_circle(Vec2::new(400.0, 0.0), 30.0, 10.0).unwrap();

    world.step(DT).unwrap();
    assert!(world.body(ball).unwrap().position.y > 0.0);

    for _ in 0..1200 {
        world.step(DT).unwrap();
    }

    let body = world.body(ball).unwrap();
    assert!(body.position.y > 409.0 && body.position.y < 411.0, "y = {}", body.position.y);
    assert!(body.position.y < 440.0);
    assert!(body.linear_velocity.y.abs() < 0.5, "vy = {}", body.linear_velocity.y);
    assert!((body.position.x - 400.0).abs() < 1.0);
    assert!(body.is_grounded());
    assert_eq!(world.body(floor).unwrap().position, Vec2::new(400.0, 490.0));
}

#[test]
fn test_resting_circle_does_not_drift() {
    let (mut world, _) = world_with_floor();
    let ball = world.create_circle(Vec2::new(400.0, 410.0), 30.0, 10.0).unwrap();

    for _ in 0..600 {
        world.step(DT).unwrap();
    }
    let settled = world.body(ball).unwrap().position.y;
    for _ in 0..600 {
        world.step(DT).unwrap();
    }
    let later = world.body(ball).unwrap().position.y;
    assert!((later - settled).abs() < 0.1, "moved from {} to {}", settled, later);
}

#[test]
fn test_elastic_bounce_reverses_normal_velocity() {
    let (mut world, floor) = world_with_floor();
    let bouncy = Material::new(1.0, 0.0, 0.0);
    world.set_material(floor, bouncy).unwrap();

    // Just touching the floor, moving down at 100 px/s.
    let ball = world.create_circle(Vec2::new(400.0, 410.5), 30.0, 10.0).unwrap();
    world.set_material(ball, bouncy).unwrap();
    world.body_mut(ball).unwrap().linear_velocity = Vec2::new(0.0, 100.0);

    world.step(DT).unwrap();

    let incoming = 100.0 + 9.81 * DT;
    let body = world.body(ball).unwrap();
    assert!((body.linear_velocity.y + incoming).abs() < 0.5, "vy = {}", body.linear_velocity.y);
    assert!(body.linear_velocity.x.abs() < EPSILON);
}

#[test]
fn test_inelastic_landing_stops_the_body() {
    let (mut world, floor) = world_with_floor();
    world.set_material(floor, Material::new(0.0, 0.4, 0.2)).unwrap();
    let ball = world.create_circle(Vec2::new(400.0, 410.5), 30.0, 10.0).unwrap();
    world.body_mut(ball).unwrap().linear_velocity = Vec2::new(0.0, 100.0);

    world.step(DT).unwrap();
    assert!(world.body(ball).unwrap().linear_velocity.y.abs() < EPSILON);
}

/// Static 30 degree ramp and a 40x40 box resting flush on it. Returns the
/// distance the box travelled after `steps`.
fn ramp_slide_distance(friction: f64, steps: usize) -> f64 {
    init_logger();
    let mut world = PhysicsWorld::new();
    let angle = 30f64.to_radians();
    let material = Material::new(0.0, friction, friction);

    let ramp_center = Vec2::new(400.0, 300.0);
    let ramp = world.create_rectangle(ramp_center, 800.0, 40.0, 10.0).unwrap();
    world.set_enabled(ramp, false).unwrap();
    world.set_rotation(ramp, angle).unwrap();
    world.set_material(ramp, material).unwrap();

    // Outward normal of the ramp's upper face.
    let up = Vec2::new(angle.sin(), -angle.cos());
    let start = ramp_center + up * (20.0 + 20.0 - 0.1);
    let block = world.create_rectangle(start, 40.0, 40.0, 10.0).unwrap();
    world.set_rotation(block, angle).unwrap();
    world.set_material(block, material).unwrap();

    for _ in 0..steps {
        world.step(DT).unwrap();
    }
    assert_finite(&world);
    world.body(block).unwrap().position.distance(start)
}

#[test]
fn test_high_friction_block_stays_on_ramp() {
    let moved = ramp_slide_distance(1.0, 600);
    assert!(moved < 5.0, "sticky block moved {}", moved);
}

#[test]
fn test_low_friction_block_slides_down_ramp() {
    let moved = ramp_slide_distance(0.1, 600);
    assert!(moved > 20.0, "slippery block moved only {}", moved);
}

#[test]
fn test_static_bodies_never_move() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let a = world.create_rectangle(Vec2::new(100.0, 100.0), 50.0, 50.0, 1.0).unwrap();
    let b = world.create_circle(Vec2::new(110.0, 100.0), 30.0, 1.0).unwrap();
    world.set_enabled(a, false).unwrap();
    world.set_enabled(b, false).unwrap();

    for _ in 0..120 {
        world.step(DT).unwrap();
    }

    assert_eq!(world.body(a).unwrap().position, Vec2::new(100.0, 100.0));
    assert_eq!(world.body(b).unwrap().position, Vec2::new(110.0, 100.0));
    assert_eq!(world.body(b).unwrap().linear_velocity, Vec2::ZERO);
    assert_finite(&world);
}

#[test]
fn test_concentric_circles_report_full_overlap() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec2::ZERO).unwrap();
    world.create_circle(Vec2::new(3.0, 3.0), 2.0, 1.0).unwrap();
    world.create_circle(Vec2::new(3.0, 3.0), 1.0, 1.0).unwrap();

    world.step(DT).unwrap();
    let contacts = world.contacts();
    assert_eq!(contacts.len(), 1);
    // r1 + r2 - distance with distance 0
    assert!((contacts[0].penetration - 3.0).abs() < 1e-9);
}

#[test]
fn test_coincident_circles_separate_without_nan() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec2::ZERO).unwrap();
    let a = world.create_circle(Vec2::new(50.0, 50.0), 10.0, 1.0).unwrap();
    let b = world.create_circle(Vec2::new(50.0, 50.0), 10.0, 1.0).unwrap();

    for _ in 0..240 {
        world.step(DT).unwrap();
    }
    assert_finite(&world);
    let pa = world.body(a).unwrap().position;
    let pb = world.body(b).unwrap().position;
    assert!(pa.distance(pb) > 0.0);
}

#[test]
fn test_circle_pair_penetration_matches_distance() {
    init_logger();
    for &(distance, r1, r2) in &[(1.0, 1.0, 1.0), (2.5, 2.0, 1.0), (0.1, 3.0, 0.5), (2.9, 1.5, 1.5)] {
        let mut world = PhysicsWorld::new();
        world.set_gravity(Vec2::ZERO).unwrap();
        let a = world.create_circle(Vec2::new(0.0, 0.0), r1, 1.0).unwrap();
        let b = world.create_circle(Vec2::new(distance * 0.6, distance * 0.8), r2, 1.0).unwrap();
        world.step(DT).unwrap();

        assert_eq!(world.contacts().len(), 1);
        let manifold = &world.contacts()[0];
        assert_eq!((manifold.body_a, manifold.body_b), (a, b));
        assert_eq!(manifold.contact_count, 1);
        assert!((manifold.penetration - (r1 + r2 - distance)).abs() < EPSILON);
        assert!((manifold.normal.length() - 1.0).abs() < EPSILON);
    }

    for &(distance, r1, r2) in &[(2.0, 1.0, 1.0), (3.5, 2.0, 1.0), (100.0, 3.0, 0.5)] {
        let mut world = PhysicsWorld::new();
        world.create_circle(Vec2::new(0.0, 0.0), r1, 1.0).unwrap();
        world.create_circle(Vec2::new(distance, 0.0), r2, 1.0).unwrap();
        world.step(DT).unwrap();
        assert!(world.contacts().is_empty());
    }
}

#[test]
fn test_rectangle_vertices_round_trip() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let rect = world.create_rectangle(Vec2::new(100.0, 50.0), 60.0, 20.0, 1.0).unwrap();

    assert_eq!(world.shape_vertices_count(0), Some(4));
    let vertices: Vec<Vec2> = (0..4).map(|i| world.shape_vertex(rect, i).unwrap()).collect();
    for v in &vertices {
        assert!(((v.x - 100.0).abs() - 30.0).abs() < EPSILON);
        assert!(((v.y - 50.0).abs() - 10.0).abs() < EPSILON);
    }
    let expected = [(130.0, 40.0), (130.0, 60.0), (70.0, 60.0), (70.0, 40.0)];
    for (v, (x, y)) in vertices.iter().zip(expected) {
        assert!((v.x - x).abs() < EPSILON && (v.y - y).abs() < EPSILON, "{:?}", v);
    }

    world.set_rotation(rect, PI / 2.0).unwrap();
    let rotated = world.shape_vertex(rect, 0).unwrap();
    // Local (30, -10) rotated a quarter turn.
    assert!((rotated.x - 110.0).abs() < EPSILON);
    assert!((rotated.y - 80.0).abs() < EPSILON);
}

#[test]
fn test_polygon_and_circle_vertices_round_trip() {
    init_logger();
    let mut world = PhysicsWorld::new();
    let hexagon = world.create_polygon(Vec2::new(10.0, 20.0), 5.0, 6, 1.0).unwrap();
    let ball = world.create_circle(Vec2::new(-10.0, 0.0), 3.0, 1.0).unwrap();

    assert_eq!(world.shape_kind(hexagon), Ok(ShapeKind::Polygon));
    assert_eq!(world.shape_kind(ball), Ok(ShapeKind::Circle));
    assert_eq!(world.shape_vertices_count(0), Some(6));
    assert_eq!(world.shape_vertices_count(1), Some(world.config().circle_vertices));

    for i in 0..6 {
        let v = world.shape_vertex(hexagon, i).unwrap();
        assert!((v.distance(Vec2::new(10.0, 20.0)) - 5.0).abs() < EPSILON);
    }
    for i in 0..world.config().circle_vertices {
        let v = world.shape_vertex(ball, i).unwrap();
        assert!((v.distance(Vec2::new(-10.0, 0.0)) - 3.0).abs() < EPSILON);
    }
    assert!(matches!(
        world.shape_vertex(hexagon, 6),
        Err(PhysicsError::InvalidVertex { index: 6, count: 6 })
    ));
}

#[test]
fn test_capacity_is_enforced_and_slots_reused() {
    init_logger();
    let config = PhysicsConfig { max_bodies: 3, ..PhysicsConfig::default() };
    let mut world = PhysicsWorld::with_config(config).unwrap();
    let handles: Vec<BodyHandle> = (0..3)
        .map(|i| world.create_circle(Vec2::new(i as f64 * 10.0, 0.0), 1.0, 1.0).unwrap())
        .collect();

    assert_eq!(
        world.create_circle(Vec2::ZERO, 1.0, 1.0),
        Err(PhysicsError::CapacityExceeded { capacity: 3 })
    );
    assert_eq!(world.bodies_count(), 3);

    world.destroy(handles[1]).unwrap();
    let reused = world.create_rectangle(Vec2::ZERO, 1.0, 1.0, 1.0).unwrap();
    assert_eq!(reused.index(), handles[1].index());
    assert!(world.body(handles[1]).is_none());
    assert_eq!(world.body_at(1), Some(reused));
}

#[test]
fn test_operations_on_destroyed_body_fail() {
    let (mut world, floor) = world_with_floor();
    world.destroy(floor).unwrap();

    assert_eq!(world.set_enabled(floor, true), Err(PhysicsError::InvalidHandle(floor)));
    assert_eq!(world.add_force(floor, Vec2::new(1.0, 0.0)), Err(PhysicsError::InvalidHandle(floor)));
    assert_eq!(world.set_material(floor, Material::default()), Err(PhysicsError::InvalidHandle(floor)));
    assert!(matches!(world.shatter(floor, Vec2::ZERO, 1.0), Err(PhysicsError::InvalidHandle(_))));
    assert_eq!(world.body_at(0), None);
    assert_eq!(world.shape_vertices_count(0), None);
    world.step(DT).unwrap();
}

#[test]
fn test_shatter_fragments_fly_apart() {
    init_logger();
    let mut world = PhysicsWorld::new();
    world.set_gravity(Vec2::ZERO).unwrap();
    let center = Vec2::new(200.0, 200.0);
    let pentagon = world.create_polygon(center, 50.0, 5, 1.0).unwrap();
    world.set_rotation(pentagon, 0.4).unwrap();

    let fragments = world.shatter(pentagon, center, 1.0e5).unwrap();
    assert_eq!(fragments.len(), 5);
    assert!(world.body(pentagon).is_none());

    let before: Vec<f64> = fragments
        .iter()
        .map(|&f| world.body(f).unwrap().position.distance(center))
        .collect();
    for _ in 0..30 {
        world.step(DT).unwrap();
    }
    assert_finite(&world);
    for (&fragment, start) in fragments.iter().zip(before) {
        let body = world.body(fragment).unwrap();
        assert_eq!(world.shape_kind(fragment), Ok(ShapeKind::Polygon));
        assert!((body.rotation() - 0.4).abs() < 0.5);
        assert!(body.position.distance(center) > start, "fragment {:?} did not move out", fragment);
    }
}

#[test]
fn test_stacked_boxes_settle_on_floor() {
    let (mut world, _) = world_with_floor();
    let boxes: Vec<BodyHandle> = (0..3)
        .map(|i| world.create_rectangle(Vec2::new(400.0, 415.0 - i as f64 * 52.0), 50.0, 50.0, 1.0).unwrap())
        .collect();

    for _ in 0..600 {
        world.step(DT).unwrap();
    }
    assert_finite(&world);

    let ys: Vec<f64> = boxes.iter().map(|&b| world.body(b).unwrap().position.y).collect();
    assert!(ys[0] < 440.0 && ys[0] > 400.0, "bottom box at {}", ys[0]);
    assert!(ys[1] < ys[0] && ys[2] < ys[1], "stack order lost: {:?}", ys);
    for &b in &boxes {
        assert!((world.body(b).unwrap().position.x - 400.0).abs() < 25.0);
    }
}

#[test]
fn test_config_from_json_drives_world() {
    init_logger();
    let config = PhysicsConfig::from_json(r#"{ "gravity": { "x": 0.0, "y": 0.0 }, "max_bodies": 2 }"#).unwrap();
    let mut world = PhysicsWorld::with_config(config).unwrap();
    let a = world.create_circle(Vec2::new(5.0, 5.0), 1.0, 1.0).unwrap();
    world.create_circle(Vec2::new(50.0, 5.0), 1.0, 1.0).unwrap();
    assert!(world.create_circle(Vec2::ZERO, 1.0, 1.0).is_err());

    world.step(DT).unwrap();
    assert_eq!(world.body(a).unwrap().position, Vec2::new(5.0, 5.0));
}

#[test]
fn test_runner_steps_shared_world() {
    init_logger();
    let (mut world, _) = world_with_floor();
    world.set_time_step_ms(2.0).unwrap();
    let ball = world.create_circle(Vec2::new(400.0, 0.0), 30.0, 10.0).unwrap();

    let mut runner = PhysicsRunner::start(world);
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut last_y = 0.0;
    while Instant::now() < deadline {
        {
            let world = runner.read();
            let y = world.body(ball).unwrap().position.y;
            assert!(y >= last_y - EPSILON, "ball moved up from {} to {}", last_y, y);
            last_y = y;
            if world.steps() >= 20 {
                break;
            }
        }
        thread::sleep(Duration::from_millis(2));
    }
    runner.stop();
    assert!(runner.read().steps() >= 20);
    assert!(last_y > 0.0);
}
