mod boundary;
mod core;
pub mod diagnostics;
mod forces;
mod params;

// Re-export public API
pub use boundary::{set_bnd, FieldType};
pub use self::core::{advect, diffuse, lin_solve, project};
pub use params::{ParamError, SolverParams, StepParams};

use crate::state::{FrameSnapshot, Grid, SimState, StateError};
use forces::{apply_buoyancy, apply_decay, vorticity_confinement};

/// Position inside one simulation step. Every step walks the whole
/// sequence in order; there is no branching between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ForcesApplied,
    VelocityDiffused,
    VelocityProjected,
    VelocityAdvected,
    VelocityProjectedFinal,
    ScalarsDiffused,
    ScalarsAdvected,
    Decayed,
}

impl Stage {
    /// Stages executed by one step, in order. The solver returns to `Idle`
    /// after the last one.
    pub const SEQUENCE: [Stage; 8] = [
        Stage::ForcesApplied,
        Stage::VelocityDiffused,
        Stage::VelocityProjected,
        Stage::VelocityAdvected,
        Stage::VelocityProjectedFinal,
        Stage::ScalarsDiffused,
        Stage::ScalarsAdvected,
        Stage::Decayed,
    ];
}

/// Run the work that moves the simulation into `stage`.
fn run_stage(stage: Stage, state: &mut SimState, params: &SolverParams, step: &StepParams) {
    let dt = params.dt;
    let iter = step.iterations;
    let grid = state.grid;

    match stage {
        Stage::Idle => {}
        Stage::ForcesApplied => {
            apply_buoyancy(&mut state.vy, &state.temperature, step.buoyancy, grid);
            vorticity_confinement(state, step.vorticity, dt);
        }
        Stage::VelocityDiffused => {
            diffuse(FieldType::Vx, &mut state.vx0, &state.vx, params.visc, dt, iter, grid);
            diffuse(FieldType::Vy, &mut state.vy0, &state.vy, params.visc, dt, iter, grid);
        }
        Stage::VelocityProjected => {
            project(&mut state.vx0, &mut state.vy0, &mut state.pressure, &mut state.divergence, iter, grid);
        }
        Stage::VelocityAdvected => {
            advect(FieldType::Vx, &mut state.vx, &state.vx0, &state.vx0, &state.vy0, dt, grid);
            advect(FieldType::Vy, &mut state.vy, &state.vy0, &state.vx0, &state.vy0, dt, grid);
        }
        Stage::VelocityProjectedFinal => {
            project(&mut state.vx, &mut state.vy, &mut state.pressure, &mut state.divergence, iter, grid);
        }
        Stage::ScalarsDiffused => {
            diffuse(FieldType::Scalar, &mut state.density0, &state.density, params.diff, dt, iter, grid);
            diffuse(FieldType::Scalar, &mut state.temperature0, &state.temperature, params.diff, dt, iter, grid);
        }
        Stage::ScalarsAdvected => {
            advect(FieldType::Scalar, &mut state.density, &state.density0, &state.vx, &state.vy, dt, grid);
            advect(FieldType::Scalar, &mut state.temperature, &state.temperature0, &state.vx, &state.vy, dt, grid);
        }
        Stage::Decayed => apply_decay(state, step),
    }
}

/// Full fluid simulation step.
///
/// Velocity is diffused into the scratch buffers, projected, advected back
/// along itself and projected again; the scalars then ride the final
/// divergence-free velocity.
///
/// `on_stage` is called after each stage completes, in `Stage::SEQUENCE`
/// order.
pub fn fluid_step<F>(state: &mut SimState, params: &SolverParams, step: &StepParams, mut on_stage: F)
where
    F: FnMut(Stage),
{
    for stage in Stage::SEQUENCE {
        run_stage(stage, state, params, step);
        on_stage(stage);
    }
}

/// Owning solver: field store, construction parameters and frame counter.
///
/// `step` borrows the solver mutably for the whole sequence, so callers only
/// ever see it at `Stage::Idle`.
pub struct Solver {
    state: SimState,
    params: SolverParams,
    frame: u64,
}

impl Solver {
    /// Allocate every buffer for an `n` x `n` interior. Fails only for `n == 0`.
    pub fn new(n: usize, params: SolverParams) -> Result<Self, StateError> {
        let state = SimState::new(n)?;
        log::debug!(
            "solver created: n={} dt={} diff={} visc={}",
            n, params.dt, params.diff, params.visc
        );
        Ok(Self { state, params, frame: 0 })
    }

    /// Advance the simulation by one time increment.
    pub fn step(&mut self, step: &StepParams) {
        let frame = self.frame;
        fluid_step(&mut self.state, &self.params, step, |stage| {
            log::trace!("frame {} stage {:?} complete", frame, stage);
        });
        self.frame += 1;
    }

    /// Zero every field and restart the frame counter.
    pub fn reset(&mut self) {
        self.state.reset();
        self.frame = 0;
        log::debug!("solver reset");
    }

    pub fn add_density(&mut self, x: i32, y: i32, amount: f64) {
        self.state.add_density(x, y, amount);
    }

    pub fn add_temperature(&mut self, x: i32, y: i32, amount: f64) {
        self.state.add_temperature(x, y, amount);
    }

    pub fn add_velocity(&mut self, x: i32, y: i32, dx: f64, dy: f64) {
        self.state.add_velocity(x, y, dx, dy);
    }

    pub fn set_viscosity(&mut self, visc: f64) {
        self.params.visc = visc;
    }

    pub fn set_diffusion(&mut self, diff: f64) {
        self.params.diff = diff;
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn grid(&self) -> Grid {
        self.state.grid()
    }

    /// Buffer offset for grid coordinates, clamped into the padded range.
    pub fn index(&self, x: i32, y: i32) -> usize {
        self.state.grid().idx(x, y)
    }

    pub fn density(&self) -> &[f64] {
        self.state.density()
    }

    pub fn temperature(&self) -> &[f64] {
        self.state.temperature()
    }

    pub fn vx(&self) -> &[f64] {
        self.state.vx()
    }

    pub fn vy(&self) -> &[f64] {
        self.state.vy()
    }

    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        self.state.snapshot_into(dst);
    }

    /// Number of completed steps since construction or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
