use thiserror::Error;

/// Errors raised while building simulation state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("grid resolution must be positive, got {0}")]
    InvalidResolution(usize),
}

/// Square simulation grid with a one-cell halo on every side.
///
/// Interior cells live at `1..=n` on both axes; `0` and `n + 1` are halo
/// cells holding boundary values. Every field buffer is `(n + 2)^2` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    n: usize,
}

impl Grid {
    pub fn new(n: usize) -> Result<Self, StateError> {
        if n == 0 {
            return Err(StateError::InvalidResolution(n));
        }
        Ok(Self { n })
    }

    /// Interior resolution N.
    #[inline(always)]
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Padded row stride, N + 2.
    #[inline(always)]
    pub const fn stride(&self) -> usize {
        self.n + 2
    }

    /// Length of every field buffer.
    pub const fn size(&self) -> usize {
        self.stride() * self.stride()
    }

    /// Convert 2D coordinates to a buffer offset, clamping into [0, N+1].
    /// Out-of-range input lands on the nearest halo cell.
    #[inline(always)]
    pub fn idx(&self, x: i32, y: i32) -> usize {
        let max = (self.n + 1) as i32;
        let x = x.clamp(0, max) as usize;
        let y = y.clamp(0, max) as usize;
        x + self.stride() * y
    }

    /// Fast index for cells known to be in [0, N+1] on both axes.
    #[inline(always)]
    pub const fn idx_inner(&self, x: usize, y: usize) -> usize {
        x + (self.n + 2) * y
    }
}

/// Field store owned by the solver. Buffers are allocated once and only
/// ever zero-filled afterwards.
pub struct SimState {
    pub(crate) grid: Grid,
    pub(crate) vx: Vec<f64>,
    pub(crate) vy: Vec<f64>,
    pub(crate) vx0: Vec<f64>,
    pub(crate) vy0: Vec<f64>,
    pub(crate) density: Vec<f64>,
    pub(crate) density0: Vec<f64>,
    pub(crate) temperature: Vec<f64>,
    pub(crate) temperature0: Vec<f64>,
    /// Pressure solved during projection.
    pub(crate) pressure: Vec<f64>,
    /// Divergence source for the pressure solve.
    pub(crate) divergence: Vec<f64>,
    /// Curl snapshot (omega = dvy/dx - dvx/dy) read by vorticity confinement.
    pub(crate) curl: Vec<f64>,
    /// |omega|, kept separately so its gradient can be taken after boundary fill.
    pub(crate) curl_abs: Vec<f64>,
}

impl SimState {
    pub fn new(n: usize) -> Result<Self, StateError> {
        let grid = Grid::new(n)?;
        let size = grid.size();
        Ok(Self {
            grid,
            vx: vec![0.0; size],
            vy: vec![0.0; size],
            vx0: vec![0.0; size],
            vy0: vec![0.0; size],
            density: vec![0.0; size],
            density0: vec![0.0; size],
            temperature: vec![0.0; size],
            temperature0: vec![0.0; size],
            pressure: vec![0.0; size],
            divergence: vec![0.0; size],
            curl: vec![0.0; size],
            curl_abs: vec![0.0; size],
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Zero every buffer, live and scratch.
    pub fn reset(&mut self) {
        for buf in [
            &mut self.vx,
            &mut self.vy,
            &mut self.vx0,
            &mut self.vy0,
            &mut self.density,
            &mut self.density0,
            &mut self.temperature,
            &mut self.temperature0,
            &mut self.pressure,
            &mut self.divergence,
            &mut self.curl,
            &mut self.curl_abs,
        ] {
            buf.fill(0.0);
        }
    }

    pub fn add_density(&mut self, x: i32, y: i32, amount: f64) {
        let ii = self.grid.idx(x, y);
        self.density[ii] += amount;
    }

    pub fn add_temperature(&mut self, x: i32, y: i32, amount: f64) {
        let ii = self.grid.idx(x, y);
        self.temperature[ii] += amount;
    }

    pub fn add_velocity(&mut self, x: i32, y: i32, dx: f64, dy: f64) {
        let ii = self.grid.idx(x, y);
        self.vx[ii] += dx;
        self.vy[ii] += dy;
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn vx(&self) -> &[f64] {
        &self.vx
    }

    pub fn vy(&self) -> &[f64] {
        &self.vy
    }

    /// Copy the public fields into a pre-allocated snapshot, avoiding allocation.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        if dst.grid != self.grid {
            *dst = FrameSnapshot::new_empty(self.grid);
        }
        dst.density.copy_from_slice(&self.density);
        dst.temperature.copy_from_slice(&self.temperature);
        dst.vx.copy_from_slice(&self.vx);
        dst.vy.copy_from_slice(&self.vy);
    }
}

/// Owned copy of the fields a renderer reads once per frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub grid: Grid,
    pub density: Vec<f64>,
    pub temperature: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
}

impl FrameSnapshot {
    /// Pre-allocate a snapshot buffer matching the given grid.
    pub fn new_empty(grid: Grid) -> Self {
        let size = grid.size();
        FrameSnapshot {
            grid,
            density: vec![0.0; size],
            temperature: vec![0.0; size],
            vx: vec![0.0; size],
            vy: vec![0.0; size],
        }
    }
}
