//! Danby's universal Kepler equation solved with Stumpff functions.
//!
//! The initial guess for the universal variable `s` depends on the orbit
//! regime; refinement is a third-order (Halley-family) correction using the
//! first three derivatives of the universal Kepler equation.

use std::f64::consts::TAU;

use orbit_core::constants::{DANBY_MAX_ITERATIONS, KEPLER_TOLERANCE};
use orbit_core::vector;
use orbit_core::State;

use crate::stumpff::stumpff;
use crate::{KeplerError, Propagation, Propagator, validate_inputs};

/// Danby–Stumpff propagator.
#[derive(Debug, Clone, Copy, Default)]
pub struct DanbyStumpff;

/// Quantities shared by the initial guess and the iteration.
#[derive(Clone, Copy)]
struct Setup {
    r0: f64,
    u: f64,
    alpha: f64,
    mu: f64,
}

impl Setup {
    /// Stumpff values scaled by powers of `s`, plus `f(s)` and its derivatives.
    fn evaluate(&self, s: f64, tau: f64) -> Evaluation {
        let [c0, c1, c2, c3] = stumpff(s * s * self.alpha);
        let c1 = c1 * s;
        let c2 = c2 * s * s;
        let c3 = c3 * s * s * s;
        let k = -self.r0 * self.alpha + self.mu;
        Evaluation {
            c1,
            c2,
            c3,
            f: self.r0 * c1 + self.u * c2 + self.mu * c3 - tau,
            fp: self.r0 * c0 + self.u * c1 + self.mu * c2,
            fpp: k * c1 + self.u * c0,
            fppp: k * c0 - self.u * self.alpha * c1,
        }
    }
}

struct Evaluation {
    c1: f64,
    c2: f64,
    c3: f64,
    f: f64,
    fp: f64,
    fpp: f64,
    fppp: f64,
}

/// Reduce `tau` into one period `[0, 2π/n)` of a bound orbit.
fn reduce_to_period(tau: f64, mean_motion: f64) -> f64 {
    let reduced = tau - (mean_motion * tau / TAU).trunc() * TAU / mean_motion;
    if reduced < 0.0 {
        reduced + TAU / mean_motion
    } else {
        reduced
    }
}

fn elliptic_guess(setup: &Setup, tau: f64) -> (f64, f64) {
    let Setup { r0, u, alpha, mu } = *setup;
    let a = mu / alpha;
    let en = (mu / (a * a * a)).sqrt();
    let ec = 1.0 - r0 / a;
    let es = u / (en * a * a);
    let e = (ec * ec + es * es).sqrt();
    let tau = reduce_to_period(tau, en);

    let y = en * tau - es;
    let z = es * y.cos() + ec * y.sin();
    let sigma = if z < 0.0 { -1.0 } else { 1.0 };
    let x = y + 0.85 * sigma * e;
    (x / alpha.sqrt(), tau)
}

/// Two-stage Taylor series in time, valid for short arcs.
fn short_arc_guess(setup: &Setup, tau: f64) -> f64 {
    let Setup { r0, u, alpha, mu } = *setup;
    let r02 = r0 * r0;
    let r03 = r02 * r0;
    let t1 = 0.75 * tau;
    let t2 = 0.25 * tau;

    let mut s = t1 / r0 - 0.5 * t1 * t1 * u / r03
        + t1 * t1 * t1 * (alpha - mu / r0 + 3.0 * u * u / r02) / (6.0 * r03)
        + t1.powi(4)
            * (u / (r02 * r03))
            * (-3.0 * alpha / 8.0 - 5.0 * u * u / (8.0 * r02) + 5.0 * mu / (12.0 * r0));

    let r1 = r0 * (1.0 - alpha * s * s / 2.0)
        + u * s * (1.0 - alpha * s * s / 6.0)
        + mu * s * s / 2.0;
    let u1 = (-r0 * alpha + mu) * s * (1.0 - s * s * alpha / 6.0) + u * (1.0 - alpha * s * s / 2.0);
    let r12 = r1 * r1;
    let r13 = r1 * r12;

    s += t2 / r1 - 0.5 * t2 * t2 * u1 / r13
        + t2 * t2 * t2 * (alpha - mu / r1 + 3.0 * u1 * u1 / r12) / (6.0 * r13)
        + t2.powi(4)
            * (u1 / (r12 * r13))
            * (-3.0 * alpha / 8.0 - 5.0 * u1 * u1 / (8.0 * r12) + 5.0 * mu / (12.0 * r1));
    s
}

fn hyperbolic_guess(setup: &Setup, tau: f64) -> f64 {
    let Setup { r0, u, alpha, mu } = *setup;
    let r02 = r0 * r0;
    let r03 = r02 * r0;
    if (tau * u / r02).abs() < 1.0 && (tau * tau * (alpha / r02 + mu / r03)).abs() < 3.0 {
        return short_arc_guess(setup, tau);
    }

    let a = mu / alpha;
    let en = (-mu / (a * a * a)).sqrt();
    let ch = 1.0 - r0 / a;
    let sh = u / (-a * mu).sqrt();
    let e = (ch * ch - sh * sh).sqrt();
    let dm = en * tau;
    if dm > 0.0 {
        ((2.0 * dm + 1.8 * e) / (ch + sh)).ln() / (-alpha).sqrt()
    } else {
        -((-2.0 * dm + 1.8 * e) / (ch - sh)).ln() / (-alpha).sqrt()
    }
}

impl Propagator for DanbyStumpff {
    fn name(&self) -> &'static str {
        "danby"
    }

    fn propagate(&self, mu: f64, tau: f64, state: &State) -> Result<Propagation, KeplerError> {
        validate_inputs(mu, tau, state)?;
        if tau == 0.0 {
            return Ok(Propagation::unchanged(state));
        }

        let r0 = state.radius();
        let setup = Setup {
            r0,
            u: state.radial_dot(),
            alpha: 2.0 * mu / r0 - state.speed_squared(),
            mu,
        };

        let (mut s, tau) = if setup.alpha > 0.0 {
            elliptic_guess(&setup, tau)
        } else {
            (hyperbolic_guess(&setup, tau), tau)
        };
        if !s.is_finite() {
            // Exactly parabolic input leaves the logarithmic guess undefined.
            s = tau / r0;
        }

        let mut iterations = 0;
        let mut converged = false;
        let mut ds = f64::INFINITY;
        while iterations < DANBY_MAX_ITERATIONS {
            iterations += 1;
            let Evaluation {
                f, fp, fpp, fppp, ..
            } = setup.evaluate(s, tau);
            ds = -f / fp;
            ds = -f / (fp + ds * fpp / 2.0);
            ds = -f / (fp + ds * fpp / 2.0 + ds * ds * fppp / 6.0);
            s += ds;
            if ds.abs() < KEPLER_TOLERANCE {
                converged = true;
                break;
            }
        }

        if !converged {
            log::warn!(
                "danby: no convergence after {iterations} iterations (tau={tau}, ds={ds:e})"
            );
        }

        let Evaluation { c1, c2, c3, fp, .. } = setup.evaluate(s, tau);
        let f = 1.0 - (mu / r0) * c2;
        let g = tau - mu * c3;
        let fdot = -(mu / (fp * r0)) * c1;
        let gdot = 1.0 - (mu / fp) * c2;

        let r = &state.position;
        let v = &state.velocity;
        Ok(Propagation {
            state: State::new(
                vector::combine(r, f, v, g),
                vector::combine(r, fdot, v, gdot),
            ),
            iterations,
            converged,
            residual: ds.abs(),
        })
    }
}
