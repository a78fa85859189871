//! Conversion from configuration records into live sessions.

use orbit_config::{OrbitConfig, PropagatorChoice, StepperChoice};
use orbit_core::{PhysicalParameters, State};
use orbit_integrator::{SpeedSquaredSeed, StepperKind};
use orbit_kepler::PropagatorKind;

use crate::{OrbitSession, SessionError};

fn propagator_kind(choice: PropagatorChoice) -> PropagatorKind {
    match choice {
        PropagatorChoice::Goodyear => PropagatorKind::Goodyear,
        PropagatorChoice::Danby => PropagatorKind::Danby,
    }
}

fn stepper_kind(choice: StepperChoice) -> StepperKind {
    match choice {
        StepperChoice::Verlet => StepperKind::Verlet,
        StepperChoice::Yoshida => StepperKind::Yoshida,
    }
}

/// Build a session from a scenario record.
pub fn from_config(config: &OrbitConfig) -> Result<OrbitSession, SessionError> {
    let params = PhysicalParameters::new(config.m1, config.m2, config.g)?;
    let initial = State::new(config.position, config.velocity);
    let integrator = &config.integrator;
    log::debug!(
        "building session `{}` ({:?}, {:?})",
        config.name,
        config.propagator,
        integrator.stepper
    );
    OrbitSession::new(params, initial)?
        .with_propagator(propagator_kind(config.propagator))
        .with_stepper(stepper_kind(integrator.stepper))
        .with_seed(Box::new(SpeedSquaredSeed {
            factor: integrator.seed_factor,
        }))
        .with_tolerance(integrator.tolerance)?
        .with_max_substeps(integrator.max_substeps)
}
