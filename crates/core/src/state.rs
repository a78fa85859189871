use crate::error::PhysicsError;
use crate::vector::{self, Vector3};

/// Position and velocity of the secondary in the primary-centred frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl State {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self { position, velocity }
    }

    /// Reject states the two-body formulas cannot evaluate.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !vector::is_finite(&self.position) {
            return Err(PhysicsError::NonFinite {
                quantity: "position",
            });
        }
        if !vector::is_finite(&self.velocity) {
            return Err(PhysicsError::NonFinite {
                quantity: "velocity",
            });
        }
        if vector::norm_squared(&self.position) == 0.0 {
            return Err(PhysicsError::SingularPosition);
        }
        Ok(())
    }

    /// Distance from the primary.
    #[inline]
    pub fn radius(&self) -> f64 {
        vector::norm(&self.position)
    }

    #[inline]
    pub fn speed_squared(&self) -> f64 {
        vector::norm_squared(&self.velocity)
    }

    /// Radial velocity term `r·v`.
    #[inline]
    pub fn radial_dot(&self) -> f64 {
        vector::dot(&self.position, &self.velocity)
    }
}
