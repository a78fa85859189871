//! Goodyear's universal-variable solution of the two-body initial value problem.
//!
//! Newton iteration on the universal anomaly `psi`, with the transcendental
//! series evaluated on a reduced argument and rebuilt by double-angle
//! recurrences.

use orbit_core::constants::{GOODYEAR_MAX_ITERATIONS, KEPLER_TOLERANCE};
use orbit_core::vector;
use orbit_core::State;

use crate::{KeplerError, Propagation, Propagator, validate_inputs};

// Horner coefficients of the two truncated series.
const A0: f64 = 0.025;
const B0: f64 = A0 / 42.0;
const C0: f64 = B0 / 72.0;
const D0: f64 = C0 / 110.0;
const E0: f64 = D0 / 156.0;
const F0: f64 = E0 / 210.0;
const G0: f64 = F0 / 272.0;
const H0: f64 = G0 / 342.0;
const I0: f64 = 1.0 / 24.0;
const J0: f64 = I0 / 30.0;
const K0: f64 = J0 / 56.0;
const L0: f64 = K0 / 90.0;
const M0: f64 = L0 / 132.0;
const N0: f64 = M0 / 182.0;
const O0: f64 = N0 / 240.0;
const P0: f64 = O0 / 306.0;

/// Goodyear propagator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Goodyear;

/// Series values `pc0..pc3` at `aas = alp*psi²`.
struct Series {
    pc0: f64,
    pc1: f64,
    pc2: f64,
    pc3: f64,
}

fn series(aas_full: f64) -> Series {
    let zas = if aas_full != 0.0 { 1.0 / aas_full } else { 0.0 };

    let mut aas = aas_full;
    let mut reductions = 0u32;
    while aas.abs() > 1.0 {
        reductions += 1;
        aas *= 0.25;
    }

    let pc5 = A0
        + (B0 + (C0 + (D0 + (E0 + (F0 + (G0 + H0 * aas) * aas) * aas) * aas) * aas) * aas)
            * aas;
    let pc4 = I0
        + (J0 + (K0 + (L0 + (M0 + (N0 + (O0 + P0 * aas) * aas) * aas) * aas) * aas) * aas)
            * aas;
    let mut pc3 = (0.5 + aas * pc5) / 3.0;
    let mut pc2 = 0.5 + aas * pc4;
    let mut pc1 = 1.0 + aas * pc3;
    let mut pc0 = 1.0 + aas * pc2;

    if reductions > 0 {
        for _ in 0..reductions {
            pc1 *= pc0;
            pc0 = 2.0 * pc0 * pc0 - 1.0;
        }
        pc2 = (pc0 - 1.0) * zas;
        pc3 = (pc1 - 1.0) * zas;
    }

    Series { pc0, pc1, pc2, pc3 }
}

impl Propagator for Goodyear {
    fn name(&self) -> &'static str {
        "goodyear"
    }

    fn propagate(&self, mu: f64, tau: f64, state: &State) -> Result<Propagation, KeplerError> {
        validate_inputs(mu, tau, state)?;
        if tau == 0.0 {
            return Ok(Propagation::unchanged(state));
        }

        let r0 = &state.position;
        let v0 = &state.velocity;
        let rsdvs = state.radial_dot();
        let rsm = state.radius();
        let vsm2 = state.speed_squared();
        let zsma = 2.0 / rsm - vsm2 / mu;

        // Bound orbits start from the mean-motion estimate; unbound ones from zero.
        let mut psi = if zsma > 0.0 { tau * zsma } else { 0.0 };
        let alp = vsm2 - 2.0 * mu / rsm;

        let mut s1 = 0.0;
        let mut s2 = 0.0;
        let mut gg = 0.0;
        let mut rfm = rsm;
        let mut dtau = f64::INFINITY;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < GOODYEAR_MAX_ITERATIONS {
            iterations += 1;
            let psi2 = psi * psi;
            let psi3 = psi * psi2;
            let Series { pc0, pc1, pc2, pc3 } = series(alp * psi2);

            s1 = pc1 * psi;
            s2 = pc2 * psi2;
            let s3 = pc3 * psi3;
            gg = rsm * s1 + rsdvs * s2;
            dtau = gg + mu * s3 - tau;
            rfm = (rsdvs * s1 + mu * s2 + rsm * pc0).abs();

            if dtau.abs() < tau.abs() * KEPLER_TOLERANCE {
                converged = true;
                break;
            }
            psi -= dtau / rfm;
        }

        if !converged {
            log::warn!(
                "goodyear: no convergence after {iterations} iterations (tau={tau}, dtau={dtau:e})"
            );
        }

        let f = 1.0 - mu * s2 / rsm;
        let g = gg;
        let fdot = -mu * s1 / (rsm * rfm);
        let gdot = 1.0 - mu * s2 / rfm;

        Ok(Propagation {
            state: State::new(
                vector::combine(r0, f, v0, g),
                vector::combine(r0, fdot, v0, gdot),
            ),
            iterations,
            converged,
            residual: dtau.abs(),
        })
    }
}
