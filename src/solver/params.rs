use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A parameter outside the range the solver is built for.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("{name} must be in {range}, got {value}")]
    OutOfRange {
        name: &'static str,
        range: &'static str,
        value: f64,
    },
    #[error("iterations must be at least 1")]
    ZeroIterations,
}

fn check(name: &'static str, range: &'static str, value: f64, ok: bool) -> Result<(), ParamError> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ParamError::OutOfRange { name, range, value })
    }
}

/// Parameters fixed at solver construction. `visc` and `diff` may be
/// changed between steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Time increment per step.
    pub dt: f64,
    /// Scalar (density/temperature) diffusion rate.
    pub diff: f64,
    /// Velocity diffusion rate.
    pub visc: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            diff: 0.0001,
            visc: 0.0001,
        }
    }
}

impl SolverParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        check("dt", "(0, inf)", self.dt, self.dt > 0.0)?;
        check("diff", "[0, inf)", self.diff, self.diff >= 0.0)?;
        check("visc", "[0, inf)", self.visc, self.visc >= 0.0)?;
        Ok(())
    }
}

/// Per-frame parameters passed to every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    /// Upward acceleration per unit temperature. 0 disables buoyancy and
    /// clears temperature every frame.
    pub buoyancy: f64,
    /// Multiplier applied to temperature each frame when buoyancy is active.
    pub cooling: f64,
    /// Multiplier applied to velocity each frame.
    pub damping: f64,
    /// Multiplier applied to density each frame.
    pub fade: f64,
    /// Vorticity confinement strength.
    pub vorticity: f64,
    /// Gauss-Seidel sweeps for diffusion and pressure solves.
    pub iterations: usize,
    /// Density subtracted each frame before fading, clamped at zero. 0 disables.
    pub burn_rate: f64,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            buoyancy: 0.0,
            cooling: 0.99,
            damping: 0.999,
            fade: 0.995,
            vorticity: 0.0,
            iterations: 8,
            burn_rate: 0.0,
        }
    }
}

impl StepParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        check("buoyancy", "[0, inf)", self.buoyancy, self.buoyancy >= 0.0)?;
        check("cooling", "(0, 1]", self.cooling, self.cooling > 0.0 && self.cooling <= 1.0)?;
        check("damping", "(0, 1]", self.damping, self.damping > 0.0 && self.damping <= 1.0)?;
        check("fade", "(0, 1]", self.fade, self.fade > 0.0 && self.fade <= 1.0)?;
        check("vorticity", "[0, inf)", self.vorticity, self.vorticity >= 0.0)?;
        check("burn_rate", "[0, inf)", self.burn_rate, self.burn_rate >= 0.0)?;
        if self.iterations == 0 {
            return Err(ParamError::ZeroIterations);
        }
        Ok(())
    }
}
