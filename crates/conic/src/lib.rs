//! Analytic conic model: the polar equation `r = c / (1 + eps*cos(phi))`
//! derived once from an orbit's initial conditions.
//!
//! The eccentricity derivation divides the inverse-radius offset by the
//! x-component of the initial radius direction. That is exact only when the
//! apsidal line lies along the x axis (the axis-aligned setups every scenario
//! in this repository uses); other initial conditions get a distorted shape.
//! The conic is a drawing aid and is never fed back into the solvers.

use std::f64::consts::TAU;

use orbit_core::vector::{self, Vector3};
use orbit_core::{PhysicalParameters, PhysicsError, State};
use thiserror::Error;

/// Threshold on `|eps|` below which the orbit is reported as a circle, and on
/// `|eps| - 1` for a parabola.
const KIND_EPSILON: f64 = 1.0e-12;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConicError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error("initial radius has no x-component; the axis-aligned eccentricity is undefined")]
    DegenerateAxis,
    #[error("trajectory sampling needs at least one segment")]
    NoSegments,
}

/// Shape of the conic described by an eccentricity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConicKind {
    Circle,
    Ellipse,
    Parabola,
    Hyperbola,
}

impl ConicKind {
    pub fn from_eccentricity(eps: f64) -> Self {
        let e = eps.abs();
        if e < KIND_EPSILON {
            Self::Circle
        } else if (e - 1.0).abs() < KIND_EPSILON {
            Self::Parabola
        } else if e < 1.0 {
            Self::Ellipse
        } else {
            Self::Hyperbola
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Parabola => "parabola",
            Self::Hyperbola => "hyperbola",
        }
    }
}

/// Orbit-shape constants, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicParameters {
    /// Reduced mass of the pair.
    pub reduced_mass: f64,
    /// Angular momentum magnitude `|r × v| * mu`.
    pub angular_momentum: f64,
    /// Interaction strength `G*m1*m2`.
    pub gamma: f64,
    /// Semi-latus-rectum-like constant `l² / (gamma*mu)`.
    pub c: f64,
    /// Inverse-radius offset `A`; `eps = A*c`.
    pub a: f64,
    pub eccentricity: f64,
}

impl ConicParameters {
    /// Derive the conic from an initial state.
    pub fn from_state(params: &PhysicalParameters, state: &State) -> Result<Self, ConicError> {
        state.validate()?;
        let r_hat = vector::normalize(&state.position).ok_or(PhysicsError::SingularPosition)?;
        if r_hat[0] == 0.0 {
            return Err(ConicError::DegenerateAxis);
        }
        let mu = params.reduced_mass();
        let l = vector::norm(&vector::cross(&state.position, &state.velocity)) * mu;
        Self::build(params, l, state.radius(), r_hat[0])
    }

    /// Conic through a periapsis at distance `rmin` moving at `vmin`
    /// perpendicular to the radius.
    pub fn from_periapsis(
        params: &PhysicalParameters,
        rmin: f64,
        vmin: f64,
    ) -> Result<Self, ConicError> {
        if !(rmin.is_finite() && vmin.is_finite()) {
            return Err(PhysicsError::NonFinite {
                quantity: "periapsis",
            }
            .into());
        }
        if rmin == 0.0 {
            return Err(PhysicsError::SingularPosition.into());
        }
        let l = rmin * params.reduced_mass() * vmin;
        Self::build(params, l, rmin, 1.0)
    }

    fn build(
        params: &PhysicalParameters,
        l: f64,
        radius: f64,
        r_hat_x: f64,
    ) -> Result<Self, ConicError> {
        let mu = params.reduced_mass();
        let gamma = params.gamma();
        let c = l * l / (gamma * mu);
        if c == 0.0 {
            // Radial (zero angular momentum) motion has no conic.
            return Err(PhysicsError::NonFinite {
                quantity: "orbital constant",
            }
            .into());
        }
        let a = (1.0 / radius - 1.0 / c) / r_hat_x;
        let eccentricity = a * c;
        log::debug!(
            "conic: mu={mu:.6} l={l:.6} gamma={gamma:.6} c={c:.6} A={a:.6} eps={eccentricity:.6}"
        );
        Ok(Self {
            reduced_mass: mu,
            angular_momentum: l,
            gamma,
            c,
            a,
            eccentricity,
        })
    }

    /// Distance from the primary at orbital phase `phi`.
    #[inline]
    pub fn distance(&self, phi: f64) -> f64 {
        self.c / (1.0 + self.eccentricity * phi.cos())
    }

    /// Point on the conic in the x–z plane at phase `phi`.
    pub fn point(&self, phi: f64) -> Vector3 {
        let r = self.distance(phi);
        [r * phi.cos(), 0.0, r * phi.sin()]
    }

    /// Approximate orbital phase after `time`, from a second-order expansion
    /// in the eccentricity. Only meaningful for nearly circular orbits.
    pub fn phase(&self, time: f64) -> f64 {
        let e = self.eccentricity;
        let e2 = e * e;
        let secular = 0.5 * e2 * time + time;
        let periodic = 2.0 * e * time.sin() + 0.25 * e2 * (2.0 * time).sin();
        (secular + periodic) / (self.reduced_mass * self.angular_momentum)
    }

    pub fn kind(&self) -> ConicKind {
        ConicKind::from_eccentricity(self.eccentricity)
    }

    /// Closed polyline of `segments + 1` points spanning one revolution; the
    /// last point repeats the first.
    pub fn sample(&self, segments: usize) -> Result<Vec<Vector3>, ConicError> {
        if segments == 0 {
            return Err(ConicError::NoSegments);
        }
        let delta_phi = TAU / segments as f64;
        Ok((0..=segments)
            .map(|i| self.point(delta_phi * (i % segments) as f64))
            .collect())
    }
}
