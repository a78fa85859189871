//! Export helpers for CSV and JSON artifacts.

pub mod telemetry {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    pub const HEADER: &str = concat!(
        "tick,elapsed,substeps,energy_error,max_energy_error,",
        "integrator_converged,propagator_converged,propagator_iterations,",
        "int_x,int_y,int_z,int_vx,int_vy,int_vz,",
        "prop_x,prop_y,prop_z,prop_vx,prop_vy,prop_vz,",
        "divergence,angular_momentum_divergence"
    );

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the telemetry CSV header.
    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One telemetry row per session tick.
    #[derive(Debug, Clone, Copy)]
    pub struct Record {
        pub tick: u64,
        pub elapsed: f64,
        pub substeps: usize,
        pub energy_error: f64,
        pub max_energy_error: f64,
        pub integrator_converged: bool,
        pub propagator_converged: bool,
        pub propagator_iterations: usize,
        pub integrator_position: [f64; 3],
        pub integrator_velocity: [f64; 3],
        pub propagator_position: [f64; 3],
        pub propagator_velocity: [f64; 3],
        pub divergence: f64,
        pub angular_momentum_divergence: f64,
    }

    impl Record {
        /// Serialize the record to CSV in header order.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            let [ix, iy, iz] = self.integrator_position;
            let [ivx, ivy, ivz] = self.integrator_velocity;
            let [px, py, pz] = self.propagator_position;
            let [pvx, pvy, pvz] = self.propagator_velocity;
            writeln!(
                writer,
                concat!(
                    "{},{:.9},{},{:.6e},{:.6e},{},{},{},",
                    "{:.12},{:.12},{:.12},{:.12},{:.12},{:.12},",
                    "{:.12},{:.12},{:.12},{:.12},{:.12},{:.12},",
                    "{:.6e},{:.6e}"
                ),
                self.tick,
                self.elapsed,
                self.substeps,
                self.energy_error,
                self.max_energy_error,
                self.integrator_converged,
                self.propagator_converged,
                self.propagator_iterations,
                ix,
                iy,
                iz,
                ivx,
                ivy,
                ivz,
                px,
                py,
                pz,
                pvx,
                pvy,
                pvz,
                self.divergence,
                self.angular_momentum_divergence,
            )
        }
    }
}

pub mod trajectory {
    use chrono::{SecondsFormat, Utc};
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Conic constants carried alongside the sampled points.
    #[derive(Debug, Clone, Copy, Serialize)]
    pub struct ConicSummary {
        pub reduced_mass: f64,
        pub angular_momentum: f64,
        pub gamma: f64,
        pub c: f64,
        pub a: f64,
        pub eccentricity: f64,
    }

    /// Metadata describing the orbit the trajectory was sampled from.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub name: &'a str,
        pub m1: f64,
        pub m2: f64,
        pub g: f64,
        pub kind: &'a str,
        pub conic: ConicSummary,
        /// Position on the conic reached after `marker_time`.
        pub marker: [f64; 3],
        pub marker_time: f64,
    }

    #[derive(Serialize)]
    struct TrajectorySidecar<'a> {
        name: &'a str,
        generated_utc: String,
        m1: f64,
        m2: f64,
        g: f64,
        kind: &'a str,
        conic: ConicSummary,
        segments: usize,
        marker: [f64; 3],
        marker_time: f64,
        points: &'a [[f64; 3]],
    }

    /// Write the sampled conic as a pretty-printed JSON document.
    pub fn write_sidecar(
        output: &Path,
        meta: &Metadata<'_>,
        points: &[[f64; 3]],
    ) -> io::Result<()> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let sidecar = TrajectorySidecar {
            name: meta.name,
            generated_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            m1: meta.m1,
            m2: meta.m2,
            g: meta.g,
            kind: meta.kind,
            conic: meta.conic,
            segments: points.len().saturating_sub(1),
            marker: meta.marker,
            marker_time: meta.marker_time,
            points,
        };

        to_writer_pretty(File::create(output)?, &sidecar)?;
        Ok(())
    }
}
