use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::emitter::Emitter;
use crate::solver::{ParamError, SolverParams, StepParams};
use crate::state::StateError;

/// Default config file, looked up in the working directory.
pub const DEFAULT_PATH: &str = "plume.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid parameter: {0}")]
    Invalid(#[from] ParamError),
    #[error("invalid grid: {0}")]
    Grid(#[from] StateError),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub solver: SolverParams,
    pub step: StepParams,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Interior resolution N.
    pub size: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub frames: usize,
    /// Log diagnostics every this many frames; 0 logs only the summary.
    pub log_every: usize,
    pub emitter: Emitter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            solver: SolverParams::default(),
            step: StepParams::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 128 }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            log_every: 60,
            emitter: Emitter::default(),
        }
    }
}

impl Config {
    /// Check every range the solver relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size == 0 {
            return Err(StateError::InvalidResolution(0).into());
        }
        self.solver.validate()?;
        self.step.validate()?;
        self.run.emitter.validate()?;
        Ok(())
    }
}

/// Parse and validate a YAML config document.
pub fn parse(contents: &str) -> Result<Config, ConfigError> {
    let cfg: Config = serde_yaml::from_str(contents)?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read, parse and validate a config file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    parse(&contents)
}

/// Load `plume.yaml` from the working directory, falling back to defaults
/// when it is missing or unusable.
pub fn load() -> Config {
    load_or_default(Path::new(DEFAULT_PATH))
}

/// Load `path` if it exists, otherwise defaults. Errors are logged and
/// replaced by defaults.
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.grid.size, 128);
        assert_eq!(cfg.solver.dt, 0.1);
        assert_eq!(cfg.solver.diff, 0.0001);
        assert_eq!(cfg.solver.visc, 0.0001);
        assert_eq!(cfg.step.iterations, 8);
        assert_eq!(cfg.step.buoyancy, 0.0);
        assert_eq!(cfg.run.frames, 600);
        assert_eq!(cfg.run.log_every, 60);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "solver:\n  visc: 0.01\nstep:\n  vorticity: 3.0\n";
        let cfg = parse(yaml).unwrap();
        assert_eq!(cfg.solver.visc, 0.01);
        assert_eq!(cfg.solver.diff, 0.0001); // default
        assert_eq!(cfg.step.vorticity, 3.0);
        assert_eq!(cfg.step.fade, 0.995); // default
        assert_eq!(cfg.grid.size, 128); // default
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
grid:
  size: 64
solver:
  dt: 0.05
  diff: 0.0002
  visc: 0.0003
step:
  buoyancy: 0.2
  cooling: 0.97
  damping: 0.99
  fade: 0.98
  vorticity: 4.0
  iterations: 12
  burn_rate: 0.001
run:
  frames: 100
  log_every: 10
  emitter:
    x: 32
    y: 60
    radius: 3.0
    density: 2.0
    temperature: 1.5
    vx: 0.0
    vy: -1.0
"#;
        let cfg = parse(yaml).unwrap();
        assert_eq!(cfg.grid.size, 64);
        assert_eq!(cfg.solver.dt, 0.05);
        assert_eq!(cfg.solver.diff, 0.0002);
        assert_eq!(cfg.solver.visc, 0.0003);
        assert_eq!(cfg.step.buoyancy, 0.2);
        assert_eq!(cfg.step.cooling, 0.97);
        assert_eq!(cfg.step.damping, 0.99);
        assert_eq!(cfg.step.fade, 0.98);
        assert_eq!(cfg.step.vorticity, 4.0);
        assert_eq!(cfg.step.iterations, 12);
        assert_eq!(cfg.step.burn_rate, 0.001);
        assert_eq!(cfg.run.frames, 100);
        assert_eq!(cfg.run.log_every, 10);
        assert_eq!(cfg.run.emitter.x, 32);
        assert_eq!(cfg.run.emitter.y, 60);
        assert_eq!(cfg.run.emitter.radius, 3.0);
        assert_eq!(cfg.run.emitter.vy, -1.0);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let err = parse("step:\n  damping: 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn test_zero_grid_rejected() {
        let err = parse("grid:\n  size: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Grid(StateError::InvalidResolution(0))));
    }

    #[test]
    fn test_unbounded_emitter_radius_rejected() {
        let err = parse("run:\n  emitter:\n    radius: .inf\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ParamError::OutOfRange { name: "emitter.radius", .. })), "got {err}");
        let err = parse("run:\n  emitter:\n    radius: -2.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("plume-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "step: [1, 2").unwrap();
        let cfg = load_or_default(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.grid.size, 128);
    }

    #[test]
    fn test_example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("plume.example.yaml");
        let cfg = load_from(&path).unwrap();
        assert_eq!(cfg.grid.size, 128);
        assert_eq!(cfg.run.emitter.radius, 4.0);
    }

    #[test]
    fn test_malformed_yaml_rejected() {
        let err = parse("step: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = load_from(Path::new("definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let cfg = load_or_default(Path::new("definitely/not/plume.yaml"));
        assert_eq!(cfg.solver.visc, 0.0001);
        assert_eq!(cfg.grid.size, 128);
    }
}
