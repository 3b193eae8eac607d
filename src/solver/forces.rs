use crate::state::{Grid, SimState};
use super::boundary::{set_bnd, FieldType};
use super::core::EPSILON;
use super::params::StepParams;

/// Apply buoyancy force: hot fluid rises.
/// vy -= T * buoyancy, with negative y pointing up.
pub(super) fn apply_buoyancy(vy: &mut [f64], temperature: &[f64], buoyancy: f64, grid: Grid) {
    if buoyancy <= 0.0 {
        return;
    }
    let n = grid.n();
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            vy[ii] -= temperature[ii] * buoyancy;
        }
    }
    set_bnd(FieldType::Vy, vy, grid);
}

/// Vorticity confinement: counteracts numerical diffusion by amplifying
/// existing vortical structures (Fedkiw et al. 2001).
///
/// Curl is written to `state.curl` / `state.curl_abs` before any velocity
/// is touched, so every cell reads the same pre-pass snapshot.
pub(super) fn vorticity_confinement(state: &mut SimState, epsilon: f64, dt: f64) {
    if epsilon <= 0.0 {
        return;
    }
    let grid = state.grid;
    let n = grid.n();
    let stride = grid.stride();

    // Compute vorticity: omega = dvy/dx - dvx/dy
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            let dvydx = (state.vy[ii + 1] - state.vy[ii - 1]) * 0.5;
            let dvxdy = (state.vx[ii + stride] - state.vx[ii - stride]) * 0.5;
            let w = dvydx - dvxdy;
            state.curl[ii] = w;
            state.curl_abs[ii] = w.abs();
        }
    }
    set_bnd(FieldType::Scalar, &mut state.curl_abs, grid);

    // Compute grad|omega| and apply confinement force: f = epsilon*(N_hat x omega)
    let scale = dt * epsilon;
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            let eta_x = (state.curl_abs[ii + 1] - state.curl_abs[ii - 1]) * 0.5;
            let eta_y = (state.curl_abs[ii + stride] - state.curl_abs[ii - stride]) * 0.5;
            let len = (eta_x * eta_x + eta_y * eta_y).sqrt() + EPSILON;
            let norm_x = eta_x / len;
            let norm_y = eta_y / len;

            let w = state.curl[ii];
            // 2D cross product: f_x = ny*omega, f_y = -nx*omega
            state.vx[ii] += scale * norm_y * w;
            state.vy[ii] -= scale * norm_x * w;
        }
    }
    set_bnd(FieldType::Vx, &mut state.vx, grid);
    set_bnd(FieldType::Vy, &mut state.vy, grid);
}

/// Per-frame friction, fade and cooling.
pub(super) fn apply_decay(state: &mut SimState, step: &StepParams) {
    for v in state.vx.iter_mut().chain(state.vy.iter_mut()) {
        *v *= step.damping;
    }

    if step.burn_rate > 0.0 {
        for d in state.density.iter_mut() {
            *d = (*d - step.burn_rate).max(0.0) * step.fade;
        }
    } else {
        for d in state.density.iter_mut() {
            *d *= step.fade;
        }
    }

    if step.buoyancy > 0.0 {
        for t in state.temperature.iter_mut() {
            *t *= step.cooling;
        }
    } else {
        state.temperature.fill(0.0);
    }
}
