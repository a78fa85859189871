//! Symplectic stepping kernels. Each advances one state by one substep.

use std::fmt::Debug;

use orbit_core::vector;
use orbit_core::{PhysicsError, State};

use crate::field::CentralField;

pub trait Stepper: Debug {
    fn name(&self) -> &'static str;

    /// Order of accuracy of the kernel.
    fn order(&self) -> usize;

    fn step(&self, state: &mut State, field: &CentralField, dt: f64) -> Result<(), PhysicsError>;
}

/// Second-order velocity Verlet.
///
/// 1. `a0 = a(r)`
/// 2. `r += v*dt + 0.5*a0*dt²`
/// 3. `a1 = a(r)`
/// 4. `v += 0.5*(a0 + a1)*dt`
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityVerlet;

impl Stepper for VelocityVerlet {
    fn name(&self) -> &'static str {
        "verlet"
    }

    fn order(&self) -> usize {
        2
    }

    fn step(&self, state: &mut State, field: &CentralField, dt: f64) -> Result<(), PhysicsError> {
        let accel_old = field.acceleration(&state.position)?;
        state.position = vector::add(
            &state.position,
            &vector::combine(&state.velocity, dt, &accel_old, 0.5 * dt * dt),
        );
        let accel_new = field.acceleration(&state.position)?;
        state.velocity = vector::add(
            &state.velocity,
            &vector::scale(&vector::add(&accel_old, &accel_new), 0.5 * dt),
        );
        Ok(())
    }
}

/// Fourth-order Yoshida composition: four drifts weighted `c1, c2, c2, c1`
/// interleaved with three kicks weighted `w1, w0, w1`.
#[derive(Debug, Clone, Copy)]
pub struct Yoshida4 {
    drift: [f64; 4],
    kick: [f64; 3],
}

impl Yoshida4 {
    pub fn new() -> Self {
        let cbrt2 = 2.0_f64.cbrt();
        let w1 = 1.0 / (2.0 - cbrt2);
        let w0 = -cbrt2 / (2.0 - cbrt2);
        let c1 = w1 / 2.0;
        let c2 = (w0 + w1) / 2.0;
        Self {
            drift: [c1, c2, c2, c1],
            kick: [w1, w0, w1],
        }
    }
}

impl Default for Yoshida4 {
    fn default() -> Self {
        Self::new()
    }
}

impl Stepper for Yoshida4 {
    fn name(&self) -> &'static str {
        "yoshida"
    }

    fn order(&self) -> usize {
        4
    }

    fn step(&self, state: &mut State, field: &CentralField, dt: f64) -> Result<(), PhysicsError> {
        for (drift, kick) in self.drift.iter().zip(self.kick.iter()) {
            state.position = vector::combine(&state.position, 1.0, &state.velocity, drift * dt);
            let accel = field.acceleration(&state.position)?;
            state.velocity = vector::combine(&state.velocity, 1.0, &accel, kick * dt);
        }
        state.position = vector::combine(&state.position, 1.0, &state.velocity, self.drift[3] * dt);
        Ok(())
    }
}

/// Runtime selection between the stepping kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepperKind {
    #[default]
    Verlet,
    Yoshida,
}

impl StepperKind {
    /// Instantiate the kernel.
    pub fn kernel(self) -> Box<dyn Stepper> {
        match self {
            Self::Verlet => Box::new(VelocityVerlet),
            Self::Yoshida => Box::new(Yoshida4::new()),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Verlet => "verlet",
            Self::Yoshida => "yoshida",
        }
    }
}
