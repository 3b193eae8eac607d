use crate::state::Grid;

/// Central-difference divergence at an interior cell, in grid units.
fn divergence_at(vx: &[f64], vy: &[f64], grid: Grid, i: usize, j: usize) -> f64 {
    let stride = grid.stride();
    let ii = grid.idx_inner(i, j);
    0.5 * (vx[ii + 1] - vx[ii - 1] + vy[ii + stride] - vy[ii - stride])
}

/// Largest |div v| over interior cells.
pub fn max_divergence(vx: &[f64], vy: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    let mut max = 0.0_f64;
    for j in 1..=n {
        for i in 1..=n {
            max = max.max(divergence_at(vx, vy, grid, i, j).abs());
        }
    }
    max
}

/// Sum of |div v| over interior cells.
pub fn divergence_sum(vx: &[f64], vy: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            sum += divergence_at(vx, vy, grid, i, j).abs();
        }
    }
    sum
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <vx² + vy²>.
pub fn compute_kinetic_energy(vx: &[f64], vy: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            sum += vx[ii] * vx[ii] + vy[ii] * vy[ii];
        }
    }
    0.5 * sum / (n * n) as f64
}

/// Sum of a scalar field over interior cells.
pub fn total(field: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    (1..=n)
        .flat_map(|j| (1..=n).map(move |i| (i, j)))
        .map(|(i, j)| field[grid.idx_inner(i, j)])
        .sum()
}

/// Largest interior value of a scalar field.
pub fn max_value(field: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    let mut max = f64::NEG_INFINITY;
    for j in 1..=n {
        for i in 1..=n {
            max = max.max(field[grid.idx_inner(i, j)]);
        }
    }
    max
}

/// Largest interior speed |v|.
pub fn max_speed(vx: &[f64], vy: &[f64], grid: Grid) -> f64 {
    let n = grid.n();
    let mut max = 0.0_f64;
    for j in 1..=n {
        for i in 1..=n {
            let ii = grid.idx_inner(i, j);
            max = max.max((vx[ii] * vx[ii] + vy[ii] * vy[ii]).sqrt());
        }
    }
    max
}
