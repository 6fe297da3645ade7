pub mod contact_solver;

pub use contact_solver::{apply_impulse, positional_correction, prepare};
