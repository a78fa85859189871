use thiserror::Error;

/// Errors raised when a physical input is undefined for the two-body model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    #[error("position vector has zero length; the two-body model is singular there")]
    SingularPosition,
    #[error("{quantity} is not finite")]
    NonFinite { quantity: &'static str },
    #[error("mass `{name}` must be positive and finite, got {value}")]
    InvalidMass { name: &'static str, value: f64 },
    #[error("gravitational constant must be positive and finite, got {0}")]
    InvalidGravitationalConstant(f64),
}
