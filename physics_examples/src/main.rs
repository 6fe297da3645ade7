use log::{error, info};
use physics_kernel::*;
use std::env;
use std::thread;
use std::time::Duration;

const SCREEN_WIDTH: f64 = 800.0;
const SCREEN_HEIGHT: f64 = 450.0;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let example = if args.len() > 1 { &args[1] } else { "demo" };

    info!("Running example: {}", example);

    let result = match example {
        "demo" => run_demo_example(),
        "friction" => run_friction_example(),
        "restitution" => run_restitution_example(),
        "movement" => run_movement_example(),
        "shatter" => run_shatter_example(),
        "threaded" => run_threaded_example(),
        _ => {
            println!(
                "Unknown example: {}. Available examples: demo, friction, restitution, movement, shatter, threaded",
                example
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Error running example: {}", e);
    }
}

fn print_bodies(world: &PhysicsWorld, label: &str) {
    println!("{}", label);
    for body in world.bodies() {
        println!(
            "  body {:>2} {:?}: pos ({:7.2}, {:7.2}) rot {:5.2} vel ({:6.2}, {:6.2}){}",
            body.handle().index(),
            body.shape().kind(),
            body.position.x,
            body.position.y,
            body.rotation(),
            body.linear_velocity.x,
            body.linear_velocity.y,
            if body.is_grounded() { " grounded" } else { "" }
        );
    }
}

/// Static floor and circle obstacle with a few mixed bodies dropped on them.
fn run_demo_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();

    let floor = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT), 500.0, 100.0, 10.0)?;
    world.set_enabled(floor, false)?;
    let obstacle = world.create_circle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0), 45.0, 10.0)?;
    world.set_enabled(obstacle, false)?;

    world.create_polygon(Vec2::new(360.0, 60.0), 40.0, 5, 10.0)?;
    world.create_circle(Vec2::new(440.0, 40.0), 25.0, 10.0)?;
    world.create_polygon(Vec2::new(300.0, 120.0), 30.0, 3, 10.0)?;

    for second in 1..=10 {
        for _ in 0..60 {
            world.run_step()?;
        }
        print_bodies(&world, &format!("t = {} s", second));
    }

    // Bodies that left the screen would be destroyed by the render loop.
    let lost: Vec<BodyHandle> = world
        .bodies()
        .filter(|body| body.position.y > SCREEN_HEIGHT * 2.0)
        .map(RigidBody::handle)
        .collect();
    for handle in lost {
        world.destroy(handle)?;
    }
    println!("{} bodies remain", world.bodies_count());
    Ok(())
}

/// Two boxes on opposite 30 degree ramps, one with high and one with low friction.
fn run_friction_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();

    let floor = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT), SCREEN_WIDTH, 100.0, 10.0)?;
    world.set_enabled(floor, false)?;
    let wall = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT * 0.8), 10.0, 80.0, 10.0)?;
    world.set_enabled(wall, false)?;

    let ramp_left = world.create_rectangle(Vec2::new(25.0, SCREEN_HEIGHT - 5.0), 250.0, 250.0, 10.0)?;
    world.set_enabled(ramp_left, false)?;
    world.set_rotation(ramp_left, 30f64.to_radians())?;

    let ramp_right = world.create_rectangle(Vec2::new(SCREEN_WIDTH - 25.0, SCREEN_HEIGHT - 5.0), 250.0, 250.0, 10.0)?;
    world.set_enabled(ramp_right, false)?;
    world.set_rotation(ramp_right, 330f64.to_radians())?;

    let slippery = world.create_rectangle(Vec2::new(35.0, SCREEN_HEIGHT * 0.6), 40.0, 40.0, 10.0)?;
    world.set_material(slippery, Material::new(0.0, 0.1, 0.1))?;
    world.set_rotation(slippery, 30f64.to_radians())?;

    let sticky = world.create_rectangle(Vec2::new(SCREEN_WIDTH - 35.0, SCREEN_HEIGHT * 0.6), 40.0, 40.0, 10.0)?;
    world.set_material(sticky, Material::new(0.0, 1.0, 1.0))?;
    world.set_rotation(sticky, 330f64.to_radians())?;

    for second in 1..=10 {
        for _ in 0..60 {
            world.run_step()?;
        }
        let a = world.body(slippery).map(|b| b.position).unwrap_or_default();
        let b = world.body(sticky).map(|b| b.position).unwrap_or_default();
        println!(
            "t = {:>2} s: friction 0.1 at ({:.1}, {:.1}), friction 1.0 at ({:.1}, {:.1})",
            second, a.x, a.y, b.x, b.y
        );
    }
    Ok(())
}

/// Three circles with restitution 0, 0.5 and 1 dropped on a bouncy floor,
/// using a much finer time step.
fn run_restitution_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();
    world.set_time_step_ms(1000.0 / 60.0 / 100.0)?;

    let floor = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT), SCREEN_WIDTH, 100.0, 10.0)?;
    world.set_enabled(floor, false)?;
    world.set_material(floor, Material::new(1.0, 0.4, 0.2))?;

    let mut circles = Vec::new();
    for (i, restitution) in [0.0, 0.5, 1.0].iter().enumerate() {
        let x = SCREEN_WIDTH * 0.25 * (i + 1) as f64;
        let circle = world.create_circle(Vec2::new(x, SCREEN_HEIGHT / 2.0), 30.0, 10.0)?;
        world.set_material(circle, Material::new(*restitution, 0.4, 0.2))?;
        circles.push(circle);
    }

    // Simulated time advances through the fixed-step accumulator.
    let frame = 1.0 / 60.0;
    for frame_index in 1..=1200 {
        let steps = world.update(frame);
        if steps == 0 {
            info!("frame {} ran no physics steps", frame_index);
        }
        if frame_index % 60 == 0 {
            let heights: Vec<String> = circles
                .iter()
                .filter_map(|&c| world.body(c))
                .map(|b| format!("{:.1}", b.position.y))
                .collect();
            println!("frame {:>4}: heights [{}]", frame_index, heights.join(", "));
        }
    }
    Ok(())
}

/// A box with frozen orientation driven by forces, jumping only when grounded.
fn run_movement_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();

    let statics = [
        world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT), SCREEN_WIDTH, 100.0, 10.0)?,
        world.create_rectangle(Vec2::new(SCREEN_WIDTH * 0.25, SCREEN_HEIGHT * 0.6), SCREEN_WIDTH * 0.25, 10.0, 10.0)?,
        world.create_rectangle(Vec2::new(SCREEN_WIDTH * 0.75, SCREEN_HEIGHT * 0.6), SCREEN_WIDTH * 0.25, 10.0, 10.0)?,
        world.create_rectangle(Vec2::new(-5.0, SCREEN_HEIGHT / 2.0), 10.0, SCREEN_HEIGHT, 10.0)?,
        world.create_rectangle(Vec2::new(SCREEN_WIDTH + 5.0, SCREEN_HEIGHT / 2.0), 10.0, SCREEN_HEIGHT, 10.0)?,
    ];
    for handle in statics {
        world.set_enabled(handle, false)?;
    }

    let player = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0), 50.0, 50.0, 1.0)?;
    if let Some(body) = world.body_mut(player) {
        body.freeze_orient = true;
    }

    let mass = world.body(player).map(RigidBody::mass).unwrap_or_default();
    for frame in 0..600 {
        // Scripted input: run right, then left, jumping every two seconds.
        let direction = if frame < 300 { 1.0 } else { -1.0 };
        world.add_force(player, Vec2::new(direction * 60.0 * mass, 0.0))?;

        let grounded = world.body(player).map(RigidBody::is_grounded).unwrap_or(false);
        if grounded && frame % 120 == 0 {
            if let Some(body) = world.body_mut(player) {
                body.linear_velocity.y = -40.0;
            }
        }

        world.run_step()?;
        if frame % 60 == 0 {
            print_bodies(&world, &format!("frame {}", frame));
        }
    }
    Ok(())
}

/// A pentagon broken apart at its centre, then left to fall.
fn run_shatter_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();

    let floor = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT), SCREEN_WIDTH, 100.0, 10.0)?;
    world.set_enabled(floor, false)?;
    let target = world.create_polygon(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0), 80.0, 5, 10.0)?;

    let fragments = world.shatter(target, Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0), 10.0e6)?;
    println!("shattered into {} fragments", fragments.len());

    for second in 1..=5 {
        for _ in 0..60 {
            world.run_step()?;
        }
        print_bodies(&world, &format!("t = {} s", second));
    }
    Ok(())
}

/// The same scene stepped on a background thread while the main thread
/// reads snapshots, as a render loop would.
fn run_threaded_example() -> PhysicsResult<()> {
    let mut world = PhysicsWorld::new();
    let floor = world.create_rectangle(Vec2::new(SCREEN_WIDTH / 2.0, 490.0), SCREEN_WIDTH, 100.0, 10.0)?;
    world.set_enabled(floor, false)?;
    let ball = world.create_circle(Vec2::new(SCREEN_WIDTH / 2.0, 0.0), 30.0, 10.0)?;

    let mut runner = PhysicsRunner::start(world);
    for frame in 0..20 {
        thread::sleep(Duration::from_millis(100));
        let world = runner.read();
        if let Some(body) = world.body(ball) {
            println!(
                "frame {:>2}: {} steps, ball at y = {:.2}",
                frame,
                world.steps(),
                body.position.y
            );
        }
    }

    // New bodies can be added while the thread runs.
    runner.write().create_polygon(Vec2::new(300.0, 0.0), 30.0, 6, 10.0)?;
    thread::sleep(Duration::from_millis(500));
    print_bodies(&runner.read(), "after adding a hexagon");

    runner.stop();
    Ok(())
}
