//! Adaptive symplectic integration of the two-body equations of motion.
//!
//! Each call to [`AdaptiveIntegrator::advance`] splits the requested interval
//! into equal substeps and searches upward from a seeded substep count until
//! the energy error against the session baseline drops under tolerance, or
//! the substep ceiling is reached.

pub mod field;
pub mod seed;
pub mod stepper;

use orbit_core::constants::{DEFAULT_TOLERANCE, MAX_SUBSTEPS};
use orbit_core::{EnergyBaseline, PhysicalParameters, PhysicsError, State};
use thiserror::Error;

pub use field::CentralField;
pub use seed::{FixedSeed, SpeedSquaredSeed, SubstepSeed};
pub use stepper::{Stepper, StepperKind, VelocityVerlet, Yoshida4};

#[derive(Debug, Error)]
pub enum IntegratorError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("energy tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("substep ceiling must lie in 1..={max}, got {0}", max = MAX_SUBSTEPS)]
    InvalidSubstepCap(usize),
    #[error("time step must be finite, got {0}")]
    NonFiniteTimeStep(f64),
}

/// Result of one adaptive advance.
///
/// `converged == false` means the substep ceiling was reached before the
/// energy error fell under tolerance; `state` is still the best attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub state: State,
    pub substeps: usize,
    pub energy_error: f64,
    pub converged: bool,
}

/// Energy-controlled substepping driver around a stepping kernel.
#[derive(Debug)]
pub struct AdaptiveIntegrator {
    stepper: Box<dyn Stepper>,
    seed: Box<dyn SubstepSeed>,
    tolerance: f64,
    max_substeps: usize,
}

impl Default for AdaptiveIntegrator {
    fn default() -> Self {
        Self {
            stepper: StepperKind::default().kernel(),
            seed: Box::new(SpeedSquaredSeed::default()),
            tolerance: DEFAULT_TOLERANCE,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl AdaptiveIntegrator {
    pub fn new(stepper: StepperKind, tolerance: f64) -> Result<Self, IntegratorError> {
        Self::default().with_stepper(stepper).with_tolerance(tolerance)
    }

    pub fn with_stepper(mut self, stepper: StepperKind) -> Self {
        self.stepper = stepper.kernel();
        self
    }

    /// Use a custom kernel.
    pub fn with_kernel(mut self, stepper: Box<dyn Stepper>) -> Self {
        self.stepper = stepper;
        self
    }

    pub fn with_seed(mut self, seed: Box<dyn SubstepSeed>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, IntegratorError> {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(IntegratorError::InvalidTolerance(tolerance));
        }
        self.tolerance = tolerance;
        Ok(self)
    }

    pub fn with_max_substeps(mut self, max_substeps: usize) -> Result<Self, IntegratorError> {
        if !(1..=MAX_SUBSTEPS).contains(&max_substeps) {
            return Err(IntegratorError::InvalidSubstepCap(max_substeps));
        }
        self.max_substeps = max_substeps;
        Ok(self)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_substeps(&self) -> usize {
        self.max_substeps
    }

    pub fn stepper_name(&self) -> &'static str {
        self.stepper.name()
    }

    /// Advance `state` by `delta_time`, choosing the substep count so the
    /// energy error against `baseline` stays under tolerance.
    pub fn advance(
        &self,
        state: &State,
        params: &PhysicalParameters,
        delta_time: f64,
        baseline: &EnergyBaseline,
    ) -> Result<Advance, IntegratorError> {
        if !delta_time.is_finite() {
            return Err(IntegratorError::NonFiniteTimeStep(delta_time));
        }
        state.validate()?;

        if delta_time == 0.0 {
            let energy_error = baseline.error(state, params)?;
            return Ok(Advance {
                state: *state,
                substeps: 0,
                energy_error,
                converged: energy_error < self.tolerance,
            });
        }

        let field = CentralField::from_parameters(params);
        let mut ticks = self.seed.seed(state).clamp(1, self.max_substeps);
        loop {
            let trial = self.integrate(state, &field, delta_time, ticks)?;
            let energy_error = baseline.error(&trial, params)?;
            log::trace!("adaptive trial: {ticks} substeps, energy error {energy_error:e}");

            if energy_error < self.tolerance {
                return Ok(Advance {
                    state: trial,
                    substeps: ticks,
                    energy_error,
                    converged: true,
                });
            }
            if ticks >= self.max_substeps {
                log::warn!(
                    "substep ceiling {} reached: energy error {energy_error:e} > tolerance {:e}",
                    self.max_substeps,
                    self.tolerance
                );
                return Ok(Advance {
                    state: trial,
                    substeps: ticks,
                    energy_error,
                    converged: false,
                });
            }
            ticks += 1;
        }
    }

    /// Run `ticks` equal substeps from a copy of `start`.
    fn integrate(
        &self,
        start: &State,
        field: &CentralField,
        delta_time: f64,
        ticks: usize,
    ) -> Result<State, PhysicsError> {
        let dt = delta_time / ticks as f64;
        let mut state = *start;
        for _ in 0..ticks {
            self.stepper.step(&mut state, field, dt)?;
        }
        Ok(state)
    }
}
