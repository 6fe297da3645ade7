pub mod physics_world;
pub mod registry;
pub mod runner;
pub mod time;

pub use physics_world::PhysicsWorld;
pub use registry::{BodyHandle, BodyRegistry};
pub use runner::PhysicsRunner;
pub use time::FixedTimestep;
