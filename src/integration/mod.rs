pub mod integrator;

pub use integrator::{integrate, integrate_forces, integrate_velocity};
