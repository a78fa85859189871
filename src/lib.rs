//! Two-body orbit engine.
//!
//! Member crates are re-exported here so the binaries and integration tests
//! depend on a single façade: the conserved-quantity oracle and shared types
//! ([`physics`]), the analytic conic ([`conic`]), the closed-form propagators
//! ([`kepler`]), the adaptive symplectic integrator ([`integrator`]) and the
//! session that runs both solutions side by side ([`session`]).

pub use orbit_config as config;
pub use orbit_conic as conic;
pub use orbit_core as physics;
pub use orbit_export as export;
pub use orbit_integrator as integrator;
pub use orbit_kepler as kepler;
pub use orbit_session as session;

pub mod run;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
