use crate::constants::DEFAULT_G;
use crate::error::PhysicsError;

/// Masses and gravitational constant of one primary/secondary pair.
///
/// Values are validated on construction and never change afterwards; every
/// session carries its own copy instead of sharing a process-wide `G`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParameters {
    m1: f64,
    m2: f64,
    g: f64,
}

impl PhysicalParameters {
    /// Validate and build a parameter set.
    pub fn new(m1: f64, m2: f64, g: f64) -> Result<Self, PhysicsError> {
        if !(m1.is_finite() && m1 > 0.0) {
            return Err(PhysicsError::InvalidMass {
                name: "m1",
                value: m1,
            });
        }
        if !(m2.is_finite() && m2 > 0.0) {
            return Err(PhysicsError::InvalidMass {
                name: "m2",
                value: m2,
            });
        }
        if !(g.is_finite() && g > 0.0) {
            return Err(PhysicsError::InvalidGravitationalConstant(g));
        }
        Ok(Self { m1, m2, g })
    }

    /// Parameters with the simulation-convenience `G = 1`.
    pub fn with_default_g(m1: f64, m2: f64) -> Result<Self, PhysicsError> {
        Self::new(m1, m2, DEFAULT_G)
    }

    pub fn m1(&self) -> f64 {
        self.m1
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    /// Reduced mass `m1*m2/(m1+m2)`.
    #[inline]
    pub fn reduced_mass(&self) -> f64 {
        self.m1 * self.m2 / (self.m1 + self.m2)
    }

    /// Reduced mass times `G`.
    #[inline]
    pub fn mug(&self) -> f64 {
        self.reduced_mass() * self.g
    }

    /// Interaction strength `G*m1*m2`.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.g * self.m1 * self.m2
    }

    /// Gravitational parameter `G*m1` of the primary, treated as fixed at the origin.
    ///
    /// This is the field the integrator's acceleration law uses, so it is also the
    /// `mu` handed to the closed-form propagators.
    #[inline]
    pub fn gravitational_parameter(&self) -> f64 {
        self.g * self.m1
    }
}
