//! Core primitives shared by every crate in the two-body workspace: vector
//! helpers, the body state, physical parameters, and the conserved-quantity
//! oracle used to validate and drive the solvers.

pub mod conserved;
pub mod error;
pub mod params;
pub mod state;

pub use conserved::{EnergyBaseline, angular_momentum, energy};
pub use error::PhysicsError;
pub use params::PhysicalParameters;
pub use state::State;

/// Numerical defaults shared across the solvers.
pub mod constants {
    /// Gravitational constant used when a scenario does not specify one.
    pub const DEFAULT_G: f64 = 1.0;
    /// Default energy-error tolerance for the adaptive integrator.
    pub const DEFAULT_TOLERANCE: f64 = 1.0e-8;
    /// Hard ceiling on integrator substeps per external update.
    pub const MAX_SUBSTEPS: usize = 200;
    /// Default multiplier applied to `|v|²` when seeding the substep count.
    pub const DEFAULT_SEED_FACTOR: f64 = 1.1;
    /// Relative time-residual tolerance of the universal-variable solvers.
    pub const KEPLER_TOLERANCE: f64 = 1.0e-8;
    /// Newton iteration budget of the Goodyear propagator.
    pub const GOODYEAR_MAX_ITERATIONS: usize = 20;
    /// Halley iteration budget of the Danby–Stumpff propagator.
    pub const DANBY_MAX_ITERATIONS: usize = 10;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in whatever length/velocity units the scenario uses.
    pub type Vector3 = [f64; 3];

    /// The zero vector.
    pub const ZERO: Vector3 = [0.0; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_squared(v: &Vector3) -> f64 {
        dot(v, v)
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// `sa * a + sb * b`, the shape every Lagrange-coefficient update takes.
    #[inline]
    pub fn combine(a: &Vector3, sa: f64, b: &Vector3, sb: f64) -> Vector3 {
        [
            sa * a[0] + sb * b[0],
            sa * a[1] + sb * b[1],
            sa * a[2] + sb * b[2],
        ]
    }

    /// Unit vector along `v`, or `None` for the zero vector.
    #[inline]
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if n > 0.0 { Some(scale(v, 1.0 / n)) } else { None }
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }
}
