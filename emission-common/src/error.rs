//! Typed failure kinds for the kinematics core.

use thiserror::Error;

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

/// Errors reported by the kinematics core.
///
/// Validation is eager: constructors and mutators check their inputs at the
/// point of call, and a failed call leaves prior state unchanged. Accessors
/// never validate; a `State` error only means the queried optional field was
/// never established at construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Vector length mismatch, or a point outside 2D/3D space.
    #[error("dimension error: {0}")]
    Dimension(String),

    /// Rejected scalar input: non-positive speed, zero frequency, negative
    /// radius, or a missing speed at update time.
    #[error("value error: {0}")]
    Value(String),

    /// Query of an optional property that was never set.
    #[error("state error: {0}")]
    State(String),
}

impl KinematicsError {
    /// Create a dimension error.
    pub fn dimension(msg: impl Into<String>) -> Self {
        Self::Dimension(msg.into())
    }

    /// Create a value error.
    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }

    /// Create a state error.
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}
