pub mod aabb;
pub mod detection;
pub mod manifold;

pub use aabb::AABB;
pub use detection::check_collision;
pub use manifold::CollisionManifold;
