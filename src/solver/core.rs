use crate::state::Grid;
use super::boundary::{set_bnd, FieldType};

/// Floor for denominators that can reach zero.
pub(crate) const EPSILON: f64 = 1e-10;

/// Gauss-Seidel iterative linear solver.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
pub fn lin_solve(field_type: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, grid: Grid) {
    let n = grid.n();
    let stride = grid.stride();
    let c_inv = 1.0 / c.max(EPSILON);
    for _ in 0..iter {
        for j in 1..=n {
            let row = j * stride;
            for i in 1..=n {
                let ii = row + i;
                let neighbors = x[ii - 1] + x[ii + 1] + x[ii - stride] + x[ii + stride];
                x[ii] = (x0[ii] + a * neighbors) * c_inv;
            }
        }
        set_bnd(field_type, x, grid);
    }
}

/// Diffusion step: spreads the field over time.
/// a = dt * diff * N^2, c = 1 + 4a
pub fn diffuse(field_type: FieldType, x: &mut [f64], x0: &[f64], diff: f64, dt: f64, iter: usize, grid: Grid) {
    let n_f = grid.n() as f64;
    let a = dt * diff * n_f * n_f;
    let c = 1.0 + 4.0 * a;
    // Initialize x from x0
    x.copy_from_slice(x0);
    if a == 0.0 {
        set_bnd(field_type, x, grid);
        return;
    }
    lin_solve(field_type, x, x0, a, c, iter, grid);
}

/// Split a clamped sample coordinate into its lower cell and the weight of
/// the upper cell. `k + 0.5` gives `(k, 0.5)`.
#[inline(always)]
pub(crate) fn split_coord(v: f64) -> (usize, f64) {
    let base = v.floor();
    (base as usize, v - base)
}

/// Semi-Lagrangian advection: traces particles backwards through velocity field.
pub fn advect(field_type: FieldType, d: &mut [f64], d0: &[f64], vx: &[f64], vy: &[f64], dt: f64, grid: Grid) {
    let n = grid.n();
    let n_f = n as f64;
    let dt0 = dt * n_f;
    let lo = 0.5;
    let hi = n_f + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            // Trace backwards, keeping all four samples inside the padded grid
            let x = (i as f64 - dt0 * vx[ii]).clamp(lo, hi);
            let y = (j as f64 - dt0 * vy[ii]).clamp(lo, hi);

            let (i0, s1) = split_coord(x);
            let (j0, t1) = split_coord(y);
            let i1 = i0 + 1;
            let j1 = j0 + 1;
            let s0 = 1.0 - s1;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[grid.idx_inner(i0, j0)] + t1 * d0[grid.idx_inner(i0, j1)])
                + s1 * (t0 * d0[grid.idx_inner(i1, j0)] + t1 * d0[grid.idx_inner(i1, j1)]);
        }
    }
    set_bnd(field_type, d, grid);
}

/// Pressure projection: enforces incompressibility (divergence-free velocity field).
pub fn project(vx: &mut [f64], vy: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, grid: Grid) {
    let n = grid.n();
    let stride = grid.stride();
    let h = 1.0 / n as f64;

    // Calculate divergence
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            div[ii] = -0.5 * h * (vx[ii + 1] - vx[ii - 1] + vy[ii + stride] - vy[ii - stride]);
            p[ii] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, grid);
    set_bnd(FieldType::Scalar, p, grid);

    // Solve for pressure
    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0, iter, grid);

    // Subtract pressure gradient from velocity
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            vx[ii] -= 0.5 * (p[ii + 1] - p[ii - 1]) / h;
            vy[ii] -= 0.5 * (p[ii + stride] - p[ii - stride]) / h;
        }
    }
    set_bnd(FieldType::Vx, vx, grid);
    set_bnd(FieldType::Vy, vy, grid);
}
