use crate::state::Grid;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Density, temperature, pressure: zero-gradient (insulated) walls.
    Scalar,
    /// Horizontal velocity: negated at the left/right walls.
    Vx,
    /// Vertical velocity: negated at the top/bottom walls.
    Vy,
}

/// Fill the halo ring of `x` from its interior neighbours.
///
/// Halo cells copy the adjacent interior value, negated where the field is
/// the velocity component normal to that wall. Corners take the average of
/// their two adjacent halo cells.
pub fn set_bnd(field_type: FieldType, x: &mut [f64], grid: Grid) {
    let n = grid.n();
    let sx = if field_type == FieldType::Vx { -1.0 } else { 1.0 };
    let sy = if field_type == FieldType::Vy { -1.0 } else { 1.0 };

    for i in 1..=n {
        // Left/right walls
        x[grid.idx_inner(0, i)] = sx * x[grid.idx_inner(1, i)];
        x[grid.idx_inner(n + 1, i)] = sx * x[grid.idx_inner(n, i)];
        // Top/bottom walls
        x[grid.idx_inner(i, 0)] = sy * x[grid.idx_inner(i, 1)];
        x[grid.idx_inner(i, n + 1)] = sy * x[grid.idx_inner(i, n)];
    }

    x[grid.idx_inner(0, 0)] = 0.5 * (x[grid.idx_inner(1, 0)] + x[grid.idx_inner(0, 1)]);
    x[grid.idx_inner(0, n + 1)] = 0.5 * (x[grid.idx_inner(1, n + 1)] + x[grid.idx_inner(0, n)]);
    x[grid.idx_inner(n + 1, 0)] = 0.5 * (x[grid.idx_inner(n, 0)] + x[grid.idx_inner(n + 1, 1)]);
    x[grid.idx_inner(n + 1, n + 1)] = 0.5 * (x[grid.idx_inner(n, n + 1)] + x[grid.idx_inner(n + 1, n)]);
}
