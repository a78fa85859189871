//! Configuration models and loaders for orbit scenarios.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Upper bound accepted for `integrator.max_substeps`.
pub const SUBSTEP_CEILING: usize = 200;

/// One orbit scenario: the physical pair, the initial state, and solver settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrbitConfig {
    pub name: String,
    pub m1: f64,
    pub m2: f64,
    #[serde(default = "default_g")]
    pub g: f64,
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    /// Multiplier applied to each external frame delta before it reaches the solvers.
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    #[serde(default = "default_segments")]
    pub trajectory_segments: usize,
    #[serde(default)]
    pub propagator: PropagatorChoice,
    #[serde(default)]
    pub integrator: IntegratorConfig,
}

/// Closed-form propagator named in a scenario.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PropagatorChoice {
    #[default]
    Goodyear,
    Danby,
}

/// Stepping kernel named in a scenario.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepperChoice {
    #[default]
    Verlet,
    Yoshida,
}

/// Adaptive integrator settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IntegratorConfig {
    #[serde(default)]
    pub stepper: StepperChoice,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_substeps")]
    pub max_substeps: usize,
    #[serde(default = "default_seed_factor")]
    pub seed_factor: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            stepper: StepperChoice::default(),
            tolerance: default_tolerance(),
            max_substeps: default_max_substeps(),
            seed_factor: default_seed_factor(),
        }
    }
}

fn default_g() -> f64 {
    1.0
}

fn default_time_scale() -> f64 {
    0.05
}

fn default_segments() -> usize {
    128
}

fn default_tolerance() -> f64 {
    1.0e-8
}

fn default_max_substeps() -> usize {
    SUBSTEP_CEILING
}

fn default_seed_factor() -> f64 {
    1.1
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("orbit `{name}` is invalid: {reason}")]
    Invalid { name: String, reason: String },
}

impl OrbitConfig {
    /// Scenario with every optional field at its default.
    pub fn new(name: &str, m1: f64, m2: f64, position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            name: name.to_string(),
            m1,
            m2,
            g: default_g(),
            position,
            velocity,
            time_scale: default_time_scale(),
            trajectory_segments: default_segments(),
            propagator: PropagatorChoice::default(),
            integrator: IntegratorConfig::default(),
        }
    }

    /// Check the physical and numerical settings before a session is built from them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            name: self.name.clone(),
            reason,
        };

        for (label, value) in [("m1", self.m1), ("m2", self.m2), ("g", self.g)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{label} must be positive and finite, got {value}")));
            }
        }
        if !self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite()) {
            return Err(invalid("initial state has non-finite components".to_string()));
        }
        if self.position.iter().all(|c| *c == 0.0) {
            return Err(invalid("initial position must not be the origin".to_string()));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(invalid(format!(
                "time_scale must be positive and finite, got {}",
                self.time_scale
            )));
        }
        if self.trajectory_segments == 0 {
            return Err(invalid("trajectory_segments must be at least 1".to_string()));
        }
        let integrator = &self.integrator;
        if !(integrator.tolerance.is_finite() && integrator.tolerance > 0.0) {
            return Err(invalid(format!(
                "integrator.tolerance must be positive and finite, got {}",
                integrator.tolerance
            )));
        }
        if !(1..=SUBSTEP_CEILING).contains(&integrator.max_substeps) {
            return Err(invalid(format!(
                "integrator.max_substeps must lie in 1..={SUBSTEP_CEILING}, got {}",
                integrator.max_substeps
            )));
        }
        if !(integrator.seed_factor.is_finite() && integrator.seed_factor > 0.0) {
            return Err(invalid(format!(
                "integrator.seed_factor must be positive and finite, got {}",
                integrator.seed_factor
            )));
        }
        Ok(())
    }
}

/// Load and validate orbit scenarios from a YAML list, a TOML record, or a
/// directory of TOML records.
pub fn load_orbits<P: AsRef<Path>>(path: P) -> Result<Vec<OrbitConfig>, ConfigError> {
    let orbits: Vec<OrbitConfig> = load_records(path)?;
    for orbit in &orbits {
        orbit.validate()?;
    }
    Ok(orbits)
}

/// Case-insensitive lookup by scenario name.
pub fn find_orbit<'a>(orbits: &'a [OrbitConfig], name: &str) -> Option<&'a OrbitConfig> {
    let upper = name.to_uppercase();
    orbits.iter().find(|orbit| orbit.name.to_uppercase() == upper)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
