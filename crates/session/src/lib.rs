//! Orbit session: one physical pair, two independently advanced solutions.
//!
//! The propagator path is recomputed from the initial state at the total
//! elapsed time on every tick; the integrator path is stepped forward by the
//! tick increment. Neither path ever reads the other's state.

mod facade;

use orbit_conic::{ConicError, ConicParameters};
use orbit_core::vector::{self, Vector3};
use orbit_core::conserved::angular_momentum_drift;
use orbit_core::{EnergyBaseline, PhysicalParameters, PhysicsError, State};
use orbit_integrator::{AdaptiveIntegrator, IntegratorError, StepperKind, SubstepSeed};
use orbit_kepler::{KeplerError, Propagator, PropagatorKind};
use thiserror::Error;

pub use facade::from_config;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid orbit: {0}")]
    Physics(#[from] PhysicsError),
    #[error("closed-form propagation failed: {0}")]
    Kepler(#[from] KeplerError),
    #[error("integration failed: {0}")]
    Integrator(#[from] IntegratorError),
    #[error("trajectory unavailable: {0}")]
    Conic(#[from] ConicError),
    #[error("tick delta must be finite, got {0}")]
    NonFiniteTimeStep(f64),
}

/// Per-tick report handed to whatever displays the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickDiagnostics {
    pub tick: u64,
    pub elapsed: f64,
    pub substeps_used: usize,
    /// Integrator-path energy error against the creation baseline.
    pub energy_error: f64,
    pub max_energy_error: f64,
    pub integrator_converged: bool,
    pub propagator_converged: bool,
    pub propagator_iterations: usize,
    /// Distance between the two paths' positions.
    pub divergence: f64,
    /// Norm of the difference between the two paths' `r × v`.
    pub angular_momentum_divergence: f64,
}

#[derive(Debug)]
pub struct OrbitSession {
    params: PhysicalParameters,
    baseline: EnergyBaseline,
    /// The derived conic, or why none exists for these initial conditions.
    conic: Result<ConicParameters, ConicError>,
    initial: State,
    propagator_state: State,
    integrator_state: State,
    propagator: PropagatorKind,
    integrator: AdaptiveIntegrator,
    elapsed: f64,
    ticks: u64,
    max_energy_error: f64,
}

/// Build a session with default solver settings.
pub fn create_orbit(
    m1: f64,
    m2: f64,
    g: f64,
    position: Vector3,
    velocity: Vector3,
) -> Result<OrbitSession, SessionError> {
    OrbitSession::new(
        PhysicalParameters::new(m1, m2, g)?,
        State::new(position, velocity),
    )
}

impl OrbitSession {
    pub fn new(params: PhysicalParameters, initial: State) -> Result<Self, SessionError> {
        initial.validate()?;
        let baseline = EnergyBaseline::capture(&initial, &params)?;
        let conic = ConicParameters::from_state(&params, &initial);
        if let Err(err) = &conic {
            log::warn!("no analytic conic for this orbit: {err}");
        }
        log::info!(
            "orbit created: m1={} m2={} G={} |r|={:.6} |v|={:.6} energy={:.9}",
            params.m1(),
            params.m2(),
            params.g(),
            initial.radius(),
            initial.speed_squared().sqrt(),
            baseline.value()
        );
        Ok(Self {
            params,
            baseline,
            conic,
            initial,
            propagator_state: initial,
            integrator_state: initial,
            propagator: PropagatorKind::default(),
            integrator: AdaptiveIntegrator::default(),
            elapsed: 0.0,
            ticks: 0,
            max_energy_error: 0.0,
        })
    }

    pub fn with_propagator(mut self, propagator: PropagatorKind) -> Self {
        self.propagator = propagator;
        self
    }

    pub fn with_stepper(mut self, stepper: StepperKind) -> Self {
        self.integrator = self.integrator.with_stepper(stepper);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Result<Self, SessionError> {
        self.integrator = self.integrator.with_tolerance(tolerance)?;
        Ok(self)
    }

    pub fn with_max_substeps(mut self, max_substeps: usize) -> Result<Self, SessionError> {
        self.integrator = self.integrator.with_max_substeps(max_substeps)?;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: Box<dyn SubstepSeed>) -> Self {
        self.integrator = self.integrator.with_seed(seed);
        self
    }

    /// Advance both solution paths by `dt`.
    pub fn tick(&mut self, dt: f64) -> Result<TickDiagnostics, SessionError> {
        if !dt.is_finite() {
            return Err(SessionError::NonFiniteTimeStep(dt));
        }
        let elapsed = self.elapsed + dt;

        let propagation = self.propagator.propagate(
            self.params.gravitational_parameter(),
            elapsed,
            &self.initial,
        )?;
        let advance =
            self.integrator
                .advance(&self.integrator_state, &self.params, dt, &self.baseline)?;

        self.elapsed = elapsed;
        self.ticks += 1;
        self.propagator_state = propagation.state;
        self.integrator_state = advance.state;
        self.max_energy_error = self.max_energy_error.max(advance.energy_error);

        let diagnostics = TickDiagnostics {
            tick: self.ticks,
            elapsed,
            substeps_used: advance.substeps,
            energy_error: advance.energy_error,
            max_energy_error: self.max_energy_error,
            integrator_converged: advance.converged,
            propagator_converged: propagation.converged,
            propagator_iterations: propagation.iterations,
            divergence: vector::distance(
                &self.propagator_state.position,
                &self.integrator_state.position,
            ),
            angular_momentum_divergence: angular_momentum_drift(
                &self.propagator_state,
                &self.integrator_state,
            ),
        };
        log::debug!(
            "tick {}: t={:.6} substeps={} energy_error={:e} divergence={:e}",
            diagnostics.tick,
            diagnostics.elapsed,
            diagnostics.substeps_used,
            diagnostics.energy_error,
            diagnostics.divergence
        );
        Ok(diagnostics)
    }

    pub fn integrator_state(&self) -> State {
        self.integrator_state
    }

    pub fn propagator_state(&self) -> State {
        self.propagator_state
    }

    pub fn initial_state(&self) -> State {
        self.initial
    }

    pub fn max_energy_error(&self) -> f64 {
        self.max_energy_error
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn parameters(&self) -> &PhysicalParameters {
        &self.params
    }

    pub fn baseline(&self) -> &EnergyBaseline {
        &self.baseline
    }

    /// The analytic conic, absent when the initial conditions do not define one.
    pub fn conic(&self) -> Option<&ConicParameters> {
        self.conic.as_ref().ok()
    }

    /// The analytic conic, or the error that prevented deriving it.
    pub fn require_conic(&self) -> Result<&ConicParameters, SessionError> {
        self.conic
            .as_ref()
            .map_err(|err| SessionError::Conic(err.clone()))
    }

    pub fn propagator(&self) -> PropagatorKind {
        self.propagator
    }

    pub fn integrator(&self) -> &AdaptiveIntegrator {
        &self.integrator
    }

    /// Current energy error of the propagator path.
    pub fn propagator_energy_error(&self) -> Result<f64, SessionError> {
        Ok(self.baseline.error(&self.propagator_state, &self.params)?)
    }

    /// Sampled conic polyline for the renderer.
    pub fn trajectory(&self, segments: usize) -> Result<Vec<Vector3>, SessionError> {
        Ok(self.require_conic()?.sample(segments)?)
    }
}
