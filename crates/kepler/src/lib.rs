//! Closed-form two-body propagation in universal variables.
//!
//! Both solvers advance a state by a signed time interval in one call and
//! work across elliptic, parabolic and hyperbolic orbits without the caller
//! branching on orbit type. Goodyear's method is the primary propagator; the
//! Danby–Stumpff formulation is an independent cross-check with the same
//! contract.

pub mod danby;
pub mod goodyear;
pub mod stumpff;

use orbit_core::{PhysicsError, State};
use thiserror::Error;

pub use danby::DanbyStumpff;
pub use goodyear::Goodyear;

#[derive(Debug, Error)]
pub enum KeplerError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("gravitational parameter must be positive and finite, got {0}")]
    InvalidGravitationalParameter(f64),
    #[error("propagation interval must be finite, got {0}")]
    NonFiniteTime(f64),
}

/// Outcome of one propagation.
///
/// When `converged` is false the root solve ran out of iterations and
/// `state` is a best-effort estimate; callers decide whether to accept it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    pub state: State,
    pub iterations: usize,
    pub converged: bool,
    /// Last convergence measure of the root solve (time residual for
    /// Goodyear, final correction for Danby).
    pub residual: f64,
}

impl Propagation {
    fn unchanged(state: &State) -> Self {
        Self {
            state: *state,
            iterations: 0,
            converged: true,
            residual: 0.0,
        }
    }
}

/// A closed-form propagator: `(mu, tau, r0, v0) -> (r1, v1)`.
pub trait Propagator {
    fn name(&self) -> &'static str;

    fn propagate(&self, mu: f64, tau: f64, state: &State) -> Result<Propagation, KeplerError>;
}

/// Runtime selection between the available propagators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropagatorKind {
    #[default]
    Goodyear,
    Danby,
}

impl Propagator for PropagatorKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Goodyear => Goodyear.name(),
            Self::Danby => DanbyStumpff.name(),
        }
    }

    fn propagate(&self, mu: f64, tau: f64, state: &State) -> Result<Propagation, KeplerError> {
        match self {
            Self::Goodyear => Goodyear.propagate(mu, tau, state),
            Self::Danby => DanbyStumpff.propagate(mu, tau, state),
        }
    }
}

/// Propagate with Goodyear's method.
pub fn propagate(mu: f64, tau: f64, state: &State) -> Result<Propagation, KeplerError> {
    Goodyear.propagate(mu, tau, state)
}

fn validate_inputs(mu: f64, tau: f64, state: &State) -> Result<(), KeplerError> {
    if !(mu.is_finite() && mu > 0.0) {
        return Err(KeplerError::InvalidGravitationalParameter(mu));
    }
    if !tau.is_finite() {
        return Err(KeplerError::NonFiniteTime(tau));
    }
    state.validate()?;
    Ok(())
}
