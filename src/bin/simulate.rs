use anyhow::{Context, anyhow, bail};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use two_body_orbits::config::{self, OrbitConfig, PropagatorChoice, StepperChoice};
use two_body_orbits::export::telemetry;
use two_body_orbits::kepler::Propagator;
use two_body_orbits::run::{self, RunOptions};
use two_body_orbits::session;

/// Run a two-body orbit and compare the closed-form and integrated solutions.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Two-body orbit simulator (closed-form vs. symplectic)"
)]
struct Cli {
    /// Scenario file (YAML list, TOML record or directory of TOML files)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Orbit name within the scenario file (case-insensitive; defaults to the first)
    #[arg(long)]
    name: Option<String>,

    /// Primary mass
    #[arg(long)]
    m1: Option<f64>,

    /// Secondary mass
    #[arg(long)]
    m2: Option<f64>,

    /// Gravitational constant
    #[arg(long)]
    g: Option<f64>,

    /// Initial position as x,y,z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    position: Option<[f64; 3]>,

    /// Initial velocity as x,y,z
    #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
    velocity: Option<[f64; 3]>,

    /// Number of frames to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Frame length before time scaling
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Simulated time per unit of frame time (overrides the scenario)
    #[arg(long)]
    time_scale: Option<f64>,

    /// Closed-form propagator (overrides the scenario)
    #[arg(long, value_enum)]
    propagator: Option<PropagatorArg>,

    /// Integration kernel (overrides the scenario)
    #[arg(long, value_enum)]
    stepper: Option<StepperArg>,

    /// Energy tolerance per tick (overrides the scenario)
    #[arg(long)]
    tolerance: Option<f64>,

    /// Telemetry CSV output (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Sampled conic JSON output
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// Conic segments for the trajectory output (overrides the scenario)
    #[arg(long)]
    segments: Option<usize>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PropagatorArg {
    Goodyear,
    Danby,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StepperArg {
    Verlet,
    Yoshida,
}

impl From<PropagatorArg> for PropagatorChoice {
    fn from(arg: PropagatorArg) -> Self {
        match arg {
            PropagatorArg::Goodyear => PropagatorChoice::Goodyear,
            PropagatorArg::Danby => PropagatorChoice::Danby,
        }
    }
}

impl From<StepperArg> for StepperChoice {
    fn from(arg: StepperArg) -> Self {
        match arg {
            StepperArg::Verlet => StepperChoice::Verlet,
            StepperArg::Yoshida => StepperChoice::Yoshida,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let orbit = resolve_orbit(&cli)?;
    orbit
        .validate()
        .with_context(|| format!("orbit '{}' is not usable", orbit.name))?;

    let mut session = session::from_config(&orbit)?;
    let options = RunOptions {
        ticks: cli.ticks,
        dt: cli.dt,
        time_scale: orbit.time_scale,
    };

    let summary = match &cli.csv {
        Some(path) => {
            let mut writer = telemetry::writer_for_path(path)
                .with_context(|| format!("cannot open {}", path.display()))?;
            run::run(&mut session, &options, Some(writer.as_mut()))?
        }
        None => run::run(&mut session, &options, None)?,
    };

    if let Some(path) = &cli.trajectory {
        let points =
            run::write_trajectory(&session, &orbit.name, orbit.trajectory_segments, path)?;
        log::info!("wrote {} trajectory points to {}", points, path.display());
    }

    // Keep stdout clean when telemetry is streamed there.
    let streaming = cli.csv.as_deref().is_some_and(|p| p.as_os_str() == "-");
    let report = format!(
        concat!(
            "orbit: {}\n",
            "propagator: {} | stepper: {} | tolerance: {:e}\n",
            "ticks: {} | elapsed: {:.6} | substeps: {}\n",
            "max energy error: {:e} | capped ticks: {}\n",
            "unconverged propagations: {} | max divergence: {:e} | final divergence: {:e}"
        ),
        orbit.name,
        session.propagator().name(),
        session.integrator().stepper_name(),
        session.integrator().tolerance(),
        summary.ticks,
        summary.elapsed,
        summary.total_substeps,
        summary.max_energy_error,
        summary.capped_ticks,
        summary.unconverged_propagations,
        summary.max_divergence,
        summary.final_divergence,
    );
    if streaming {
        eprintln!("{report}");
    } else {
        println!("{report}");
    }
    if let Some(conic) = session.conic() {
        log::info!(
            "conic: {} (eps={:.6}, c={:.6})",
            conic.kind().label(),
            conic.eccentricity,
            conic.c
        );
    }

    Ok(())
}

fn resolve_orbit(cli: &Cli) -> anyhow::Result<OrbitConfig> {
    let mut orbit = match &cli.config {
        Some(path) => {
            let orbits = config::load_orbits(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            match &cli.name {
                Some(name) => config::find_orbit(&orbits, name)
                    .cloned()
                    .ok_or_else(|| anyhow!("orbit '{}' not found in {}", name, path.display()))?,
                None => orbits
                    .into_iter()
                    .next()
                    .ok_or_else(|| anyhow!("no orbits defined in {}", path.display()))?,
            }
        }
        None => {
            let (Some(m1), Some(m2), Some(position), Some(velocity)) =
                (cli.m1, cli.m2, cli.position, cli.velocity)
            else {
                bail!(
                    "either --config or all of --m1, --m2, --position and --velocity are required"
                );
            };
            OrbitConfig::new(cli.name.as_deref().unwrap_or("cli"), m1, m2, position, velocity)
        }
    };

    if cli.config.is_some() {
        if let Some(m1) = cli.m1 {
            orbit.m1 = m1;
        }
        if let Some(m2) = cli.m2 {
            orbit.m2 = m2;
        }
        if let Some(position) = cli.position {
            orbit.position = position;
        }
        if let Some(velocity) = cli.velocity {
            orbit.velocity = velocity;
        }
    }
    if let Some(g) = cli.g {
        orbit.g = g;
    }
    if let Some(scale) = cli.time_scale {
        orbit.time_scale = scale;
    }
    if let Some(propagator) = cli.propagator {
        orbit.propagator = propagator.into();
    }
    if let Some(stepper) = cli.stepper {
        orbit.integrator.stepper = stepper.into();
    }
    if let Some(tolerance) = cli.tolerance {
        orbit.integrator.tolerance = tolerance;
    }
    if let Some(segments) = cli.segments {
        orbit.trajectory_segments = segments;
    }
    Ok(orbit)
}

fn parse_vector(raw: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{raw}'"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|err| format!("invalid component '{part}': {err}"))?;
    }
    Ok(out)
}
