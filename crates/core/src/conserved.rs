//! Conserved-quantity oracle.
//!
//! Energy here is the Lagrangian-style mechanical energy of the secondary,
//! `0.5*m2*|v|² − G*m1*m2/|r|`, which the true two-body motion keeps constant.

use crate::error::PhysicsError;
use crate::params::PhysicalParameters;
use crate::state::State;
use crate::vector::{self, Vector3};

/// Kinetic minus potential energy of the secondary.
pub fn energy(state: &State, params: &PhysicalParameters) -> Result<f64, PhysicsError> {
    state.validate()?;
    let kinetic = 0.5 * params.m2() * state.speed_squared();
    let potential = params.gamma() / state.radius();
    Ok(kinetic - potential)
}

/// Angular momentum vector `r × v` (per unit mass).
pub fn angular_momentum(state: &State) -> Vector3 {
    vector::cross(&state.position, &state.velocity)
}

/// Norm of the difference between the angular momenta of two states.
pub fn angular_momentum_drift(a: &State, b: &State) -> f64 {
    vector::distance(&angular_momentum(a), &angular_momentum(b))
}

/// Energy captured when an orbit is created; the fixed reference for drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBaseline {
    value: f64,
}

impl EnergyBaseline {
    pub fn capture(state: &State, params: &PhysicalParameters) -> Result<Self, PhysicsError> {
        Ok(Self {
            value: energy(state, params)?,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Absolute energy error of `state` relative to the baseline.
    pub fn error(&self, state: &State, params: &PhysicalParameters) -> Result<f64, PhysicsError> {
        Ok((energy(state, params)? - self.value).abs())
    }
}
