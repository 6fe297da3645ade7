//! Background stepping on a dedicated thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{info, warn};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::physics_world::PhysicsWorld;

/// Steps a shared `PhysicsWorld` at its fixed time step on a background
/// thread until stopped.
///
/// Each step holds the write lock for its whole duration, so readers going
/// through `read()` never observe a half-finished step.
pub struct PhysicsRunner {
    world: Arc<RwLock<PhysicsWorld>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl PhysicsRunner {
    /// Moves `world` behind a lock and starts stepping it.
    pub fn start(world: PhysicsWorld) -> Self {
        let world = Arc::new(RwLock::new(world));
        let running = Arc::new(AtomicBool::new(true));

        let thread = {
            let world = Arc::clone(&world);
            let running = Arc::clone(&running);
            thread::spawn(move || physics_loop(world, running))
        };
        info!("physics runner started");

        Self {
            world,
            running,
            thread: Some(thread),
        }
    }

    /// Shared handle to the world, for callers that outlive the guard helpers.
    pub fn world(&self) -> Arc<RwLock<PhysicsWorld>> {
        Arc::clone(&self.world)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, PhysicsWorld> {
        self.world.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, PhysicsWorld> {
        self.world.write()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stops the thread and waits for it. Calling it again does nothing.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("physics thread panicked");
            }
            info!("physics runner stopped");
        }
    }
}

impl Drop for PhysicsRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn physics_loop(world: Arc<RwLock<PhysicsWorld>>, running: Arc<AtomicBool>) {
    while running.load(Ordering::Acquire) {
        let started = Instant::now();

        let dt = {
            let mut world = world.write();
            if let Err(err) = world.run_step() {
                warn!("physics step failed: {}", err);
            }
            world.time_step()
        };

        let budget = Duration::from_secs_f64(dt);
        if let Some(remaining) = budget.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }
}
