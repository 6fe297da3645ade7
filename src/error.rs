//! Error type shared by every fallible kernel operation.

use std::fmt;

use crate::world::BodyHandle;

/// Errors surfaced by the physics kernel.
///
/// All variants describe local, recoverable conditions. Nothing in the kernel
/// treats them as fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// The body pool is full.
    CapacityExceeded { capacity: usize },
    /// A shape or body parameter was rejected at construction time.
    InvalidShape(String),
    /// The handle refers to a destroyed, reused or never-issued slot.
    InvalidHandle(BodyHandle),
    /// A vertex index past the end of the shape's vertex list.
    InvalidVertex { index: usize, count: usize },
    /// Time steps must be finite and strictly positive.
    InvalidTimeStep(f64),
    /// Configuration could not be parsed or failed validation.
    Config(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::CapacityExceeded { capacity } => {
                write!(f, "body pool is full (capacity {})", capacity)
            }
            PhysicsError::InvalidShape(reason) => write!(f, "invalid shape: {}", reason),
            PhysicsError::InvalidHandle(handle) => write!(
                f,
                "invalid body handle (index {}, generation {})",
                handle.index(),
                handle.generation()
            ),
            PhysicsError::InvalidVertex { index, count } => {
                write!(f, "vertex index {} out of range for {} vertices", index, count)
            }
            PhysicsError::InvalidTimeStep(dt) => write!(f, "invalid time step: {}", dt),
            PhysicsError::Config(reason) => write!(f, "invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for PhysicsError {}

impl From<serde_json::Error> for PhysicsError {
    fn from(err: serde_json::Error) -> Self {
        PhysicsError::Config(err.to_string())
    }
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
