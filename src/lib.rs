pub mod error;
pub mod math;
pub mod objects;
pub mod integration;
pub mod collision;
pub mod shapes;
pub mod solver;
pub mod world;
pub mod common;

// Re-export key types for easier use
pub use collision::CollisionManifold;
pub use common::{Material, PhysicsConfig};
pub use error::{PhysicsError, PhysicsResult};
pub use math::vec2::Vec2;
pub use objects::rigid_body::RigidBody;
pub use shapes::{Circle, Polygon, Rectangle, Shape, ShapeKind};
pub use world::{BodyHandle, PhysicsRunner, PhysicsWorld};
