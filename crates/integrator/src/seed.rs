//! Policies for the first substep count tried on each advance.

use std::fmt::Debug;

use orbit_core::State;
use orbit_core::constants::DEFAULT_SEED_FACTOR;

/// Picks the initial substep count for an advance; the integrator clamps the
/// result into its allowed range.
pub trait SubstepSeed: Debug {
    fn seed(&self, state: &State) -> usize;
}

/// `floor(factor * |v|²)`.
///
/// The default factor of 1.1 was tuned for scenarios with `G*m1` around 1000;
/// other unit scales usually want a different factor or a fixed seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSquaredSeed {
    pub factor: f64,
}

impl Default for SpeedSquaredSeed {
    fn default() -> Self {
        Self {
            factor: DEFAULT_SEED_FACTOR,
        }
    }
}

impl SubstepSeed for SpeedSquaredSeed {
    fn seed(&self, state: &State) -> usize {
        let estimate = (self.factor * state.speed_squared()).floor();
        if estimate.is_finite() && estimate > 0.0 {
            estimate as usize
        } else {
            1
        }
    }
}

/// Always start from the same substep count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSeed(pub usize);

impl SubstepSeed for FixedSeed {
    fn seed(&self, _state: &State) -> usize {
        self.0
    }
}
