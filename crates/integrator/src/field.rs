use orbit_core::vector::{self, Vector3};
use orbit_core::{PhysicalParameters, PhysicsError};

/// Point-mass gravity of a primary fixed at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralField {
    gm: f64,
}

impl CentralField {
    pub fn new(gm: f64) -> Self {
        Self { gm }
    }

    pub fn from_parameters(params: &PhysicalParameters) -> Self {
        Self::new(params.gravitational_parameter())
    }

    pub fn gm(&self) -> f64 {
        self.gm
    }

    /// `a(r) = -G*m1 * r̂ / |r|²`.
    pub fn acceleration(&self, position: &Vector3) -> Result<Vector3, PhysicsError> {
        let r2 = vector::norm_squared(position);
        if r2 == 0.0 {
            return Err(PhysicsError::SingularPosition);
        }
        if !r2.is_finite() {
            return Err(PhysicsError::NonFinite {
                quantity: "position",
            });
        }
        let r = r2.sqrt();
        Ok(vector::scale(position, -self.gm / (r2 * r)))
    }
}
