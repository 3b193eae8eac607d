use serde::Deserialize;

use crate::solver::{ParamError, Solver};

/// Fixed circular source feeding density, heat and momentum into the grid
/// once per frame, weighted by a Gaussian falloff from its centre.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Emitter {
    pub x: i32,
    pub y: i32,
    /// Cells farther than this from the centre receive nothing.
    pub radius: f64,
    pub density: f64,
    pub temperature: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            x: 64,
            y: 120,
            radius: 4.0,
            density: 1.0,
            temperature: 0.5,
            vx: 0.0,
            vy: -0.5,
        }
    }
}

impl Emitter {
    /// Radius must be finite and non-negative; the rates must be finite.
    pub fn validate(&self) -> Result<(), ParamError> {
        let checks = [
            ("emitter.radius", "[0, inf)", self.radius, self.radius >= 0.0),
            ("emitter.density", "finite", self.density, true),
            ("emitter.temperature", "finite", self.temperature, true),
            ("emitter.vx", "finite", self.vx, true),
            ("emitter.vy", "finite", self.vy, true),
        ];
        for (name, range, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ParamError::OutOfRange { name, range, value });
            }
        }
        Ok(())
    }

    /// Falloff weight for a cell offset (dx, dy) from the centre.
    pub fn weight(&self, dx: i64, dy: i64) -> f64 {
        let d2 = (dx * dx + dy * dy) as f64;
        if self.radius <= 0.0 {
            return if d2 == 0.0 { 1.0 } else { 0.0 };
        }
        if d2 > self.radius * self.radius {
            return 0.0;
        }
        let sigma = 0.5 * self.radius;
        (-d2 / (2.0 * sigma * sigma)).exp()
    }

    /// Add one frame of emission. Cells outside the interior are skipped so
    /// nothing lands in the halo. Bounds are computed in `i64` so extreme
    /// centres or radii clip to the grid instead of overflowing.
    pub fn emit(&self, solver: &mut Solver) {
        let n = solver.grid().n() as i64;
        let r = self.radius.max(0.0).ceil().min(i32::MAX as f64) as i64;
        let (cx, cy) = (self.x as i64, self.y as i64);
        for y in (cy - r).max(1)..=(cy + r).min(n) {
            for x in (cx - r).max(1)..=(cx + r).min(n) {
                let w = self.weight(x - cx, y - cy);
                if w == 0.0 {
                    continue;
                }
                // 1 <= x, y <= n, which came from a usize grid size that fits i32
                let (xi, yi) = (x as i32, y as i32);
                solver.add_density(xi, yi, self.density * w);
                solver.add_temperature(xi, yi, self.temperature * w);
                solver.add_velocity(xi, yi, self.vx * w, self.vy * w);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::diagnostics::total;
    use crate::solver::SolverParams;

    #[test]
    fn test_weight_peaks_at_center() {
        let e = Emitter { radius: 4.0, ..Emitter::default() };
        assert_eq!(e.weight(0, 0), 1.0);
        assert!(e.weight(1, 0) < 1.0);
        assert!(e.weight(2, 0) < e.weight(1, 0));
        assert_eq!(e.weight(5, 0), 0.0, "outside radius");
    }

    #[test]
    fn test_zero_radius_is_single_cell() {
        let e = Emitter { radius: 0.0, ..Emitter::default() };
        assert_eq!(e.weight(0, 0), 1.0);
        assert_eq!(e.weight(1, 0), 0.0);
    }

    #[test]
    fn test_emit_adds_weighted_density() {
        let mut solver = Solver::new(16, SolverParams::default()).unwrap();
        let e = Emitter { x: 8, y: 8, radius: 2.0, density: 2.0, ..Emitter::default() };
        e.emit(&mut solver);
        let g = solver.grid();
        assert_eq!(solver.density()[g.idx(8, 8)], 2.0);
        assert!(solver.density()[g.idx(9, 8)] > 0.0);
        assert_eq!(solver.density()[g.idx(11, 8)], 0.0);
        assert!(solver.vy()[g.idx(8, 8)] < 0.0);
    }

    #[test]
    fn test_emit_huge_radius_clips_to_grid() {
        let mut solver = Solver::new(8, SolverParams::default()).unwrap();
        let e = Emitter { x: 4, y: 4, radius: 1e12, ..Emitter::default() };
        e.emit(&mut solver);
        let g = solver.grid();
        assert!(solver.density().iter().all(|v| v.is_finite()));
        assert_eq!(solver.density()[g.idx(4, 4)], 1.0);
    }

    #[test]
    fn test_emit_extreme_center_is_noop() {
        let mut solver = Solver::new(8, SolverParams::default()).unwrap();
        for (x, y) in [(i32::MIN, 4), (4, i32::MAX), (i32::MAX, i32::MIN)] {
            let e = Emitter { x, y, radius: 3.0, ..Emitter::default() };
            e.emit(&mut solver);
        }
        assert!(solver.density().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_validate_rejects_bad_radius() {
        assert_eq!(Emitter::default().validate(), Ok(()));
        for radius in [-1.0, f64::INFINITY, f64::NAN] {
            let e = Emitter { radius, ..Emitter::default() };
            assert!(
                matches!(e.validate(), Err(ParamError::OutOfRange { name: "emitter.radius", .. })),
                "radius {} should be rejected",
                radius
            );
        }
        let e = Emitter { vy: f64::NAN, ..Emitter::default() };
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_emit_skips_halo() {
        let mut solver = Solver::new(8, SolverParams::default()).unwrap();
        let e = Emitter { x: 1, y: 8, radius: 3.0, ..Emitter::default() };
        e.emit(&mut solver);
        let g = solver.grid();
        for k in 0..=9 {
            assert_eq!(solver.density()[g.idx(0, k)], 0.0, "left halo at y={}", k);
            assert_eq!(solver.density()[g.idx(k, 9)], 0.0, "bottom halo at x={}", k);
        }
        assert!(total(solver.density(), g) > 0.0);
    }
}
