//! Drive a session for a fixed number of frames and collect its telemetry.

use std::io::{self, Write};
use std::path::Path;

use orbit_export::telemetry::{self, Record};
use orbit_export::trajectory::{self, ConicSummary, Metadata};
use orbit_session::{OrbitSession, SessionError, TickDiagnostics};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("frame length and time scale must be finite, got dt={dt} scale={scale}")]
    InvalidFrame { dt: f64, scale: f64 },
}

/// Frame loop settings. Each frame advances the session by `dt * time_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    pub ticks: u64,
    pub dt: f64,
    pub time_scale: f64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            time_scale: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub total_substeps: usize,
    pub max_energy_error: f64,
    /// Ticks where the integrator hit its substep ceiling.
    pub capped_ticks: u64,
    /// Ticks where the closed-form propagator did not converge.
    pub unconverged_propagations: u64,
    pub max_divergence: f64,
    pub final_divergence: f64,
}

/// Build the telemetry row for the session's current state.
pub fn record_for(session: &OrbitSession, diagnostics: &TickDiagnostics) -> Record {
    let integrated = session.integrator_state();
    let propagated = session.propagator_state();
    Record {
        tick: diagnostics.tick,
        elapsed: diagnostics.elapsed,
        substeps: diagnostics.substeps_used,
        energy_error: diagnostics.energy_error,
        max_energy_error: diagnostics.max_energy_error,
        integrator_converged: diagnostics.integrator_converged,
        propagator_converged: diagnostics.propagator_converged,
        propagator_iterations: diagnostics.propagator_iterations,
        integrator_position: integrated.position,
        integrator_velocity: integrated.velocity,
        propagator_position: propagated.position,
        propagator_velocity: propagated.velocity,
        divergence: diagnostics.divergence,
        angular_momentum_divergence: diagnostics.angular_momentum_divergence,
    }
}

/// Tick the session `options.ticks` times, streaming one CSV row per tick
/// when a telemetry writer is supplied.
pub fn run(
    session: &mut OrbitSession,
    options: &RunOptions,
    mut telemetry_out: Option<&mut dyn Write>,
) -> Result<RunSummary, RunError> {
    let delta = options.dt * options.time_scale;
    if !delta.is_finite() {
        return Err(RunError::InvalidFrame {
            dt: options.dt,
            scale: options.time_scale,
        });
    }

    if let Some(writer) = telemetry_out.as_deref_mut() {
        telemetry::write_header(writer)?;
    }

    let mut summary = RunSummary::default();
    for _ in 0..options.ticks {
        let diagnostics = session.tick(delta)?;
        if let Some(writer) = telemetry_out.as_deref_mut() {
            record_for(session, &diagnostics).write_to(writer)?;
        }

        summary.ticks = diagnostics.tick;
        summary.elapsed = diagnostics.elapsed;
        summary.total_substeps += diagnostics.substeps_used;
        summary.max_energy_error = diagnostics.max_energy_error;
        if !diagnostics.integrator_converged {
            summary.capped_ticks += 1;
        }
        if !diagnostics.propagator_converged {
            summary.unconverged_propagations += 1;
        }
        summary.max_divergence = summary.max_divergence.max(diagnostics.divergence);
        summary.final_divergence = diagnostics.divergence;
    }

    if let Some(writer) = telemetry_out {
        writer.flush()?;
    }
    Ok(summary)
}

/// Sample the session's conic and write it as a JSON sidecar.
pub fn write_trajectory(
    session: &OrbitSession,
    name: &str,
    segments: usize,
    output: &Path,
) -> Result<usize, RunError> {
    let conic = session.require_conic()?;
    let points = conic.sample(segments).map_err(SessionError::from)?;
    // The marker follows the conic's phase approximation, not either solver.
    let marker_time = session.elapsed();
    let params = session.parameters();
    let meta = Metadata {
        name,
        m1: params.m1(),
        m2: params.m2(),
        g: params.g(),
        kind: conic.kind().label(),
        conic: ConicSummary {
            reduced_mass: conic.reduced_mass,
            angular_momentum: conic.angular_momentum,
            gamma: conic.gamma,
            c: conic.c,
            a: conic.a,
            eccentricity: conic.eccentricity,
        },
        marker: conic.point(conic.phase(marker_time)),
        marker_time,
    };
    trajectory::write_sidecar(output, &meta, &points)?;
    Ok(points.len())
}
