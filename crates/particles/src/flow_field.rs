//! The per-frame grid of flow directions.
//!
//! Each cell samples coherent noise at `(x * increment, y * increment, z)`,
//! turns the sample into an angle and stores the unit vector for that angle.
//! The whole grid is rebuilt every frame from the current z-offset.

use flowfield_core::error::EngineError;
use flowfield_core::field::VectorField;
use flowfield_core::noise_source::NoiseSource;
use glam::DVec2;
use std::f64::consts::TAU;

/// Maps a noise sample in `[0, 1)` to an angle in `[0, turns * 2π)`.
pub fn angle_for_noise(n: f64, turns: f64) -> f64 {
    n * TAU * turns
}

/// Grid of unit flow vectors covering the canvas.
#[derive(Debug, Clone)]
pub struct FlowField {
    grid: VectorField,
    cell_scale: f64,
    increment: f64,
    angle_turns: f64,
}

impl FlowField {
    /// Sizes the grid to `floor(width / cell_scale) × floor(height / cell_scale)`.
    ///
    /// Every cell starts as the unit x-axis vector until the first
    /// [`recompute`](Self::recompute).
    pub fn new(
        width: f64,
        height: f64,
        cell_scale: f64,
        increment: f64,
        angle_turns: f64,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            grid: VectorField::for_canvas(width, height, cell_scale)?,
            cell_scale,
            increment,
            angle_turns,
        })
    }

    /// Rebuilds every cell from `noise` at depth `z_offset`.
    ///
    /// Rows are visited outer, columns inner. The caller owns the clock and
    /// advances `z_offset` afterwards.
    pub fn recompute(&mut self, noise: &dyn NoiseSource, z_offset: f64) {
        let cols = self.grid.cols();
        let rows = self.grid.rows();
        let inc = self.increment;
        let turns = self.angle_turns;
        let data = self.grid.data_mut();
        for y in 0..rows {
            let yoff = y as f64 * inc;
            for x in 0..cols {
                let xoff = x as f64 * inc;
                let angle = angle_for_noise(noise.noise(xoff, yoff, z_offset), turns);
                data[x + y * cols] = DVec2::from_angle(angle);
            }
        }
    }

    /// Flow vector of the cell containing `position`, clamped onto the grid.
    pub fn lookup(&self, position: DVec2) -> DVec2 {
        self.grid.sample_at(position, self.cell_scale)
    }

    pub fn grid(&self) -> &VectorField {
        &self.grid
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowfield_core::noise_source::PerlinNoise;

    struct ConstantNoise(f64);

    impl NoiseSource for ConstantNoise {
        fn noise(&self, _x: f64, _y: f64, _z: f64) -> f64 {
            self.0
        }
    }

    /// Returns the x noise coordinate so each column gets a distinct angle.
    struct ColumnNoise;

    impl NoiseSource for ColumnNoise {
        fn noise(&self, x: f64, _y: f64, _z: f64) -> f64 {
            x
        }
    }

    fn default_field() -> FlowField {
        FlowField::new(800.0, 800.0, 20.0, 0.1, 4.0).unwrap()
    }

    #[test]
    fn default_canvas_gives_40_by_40_grid() {
        let field = default_field();
        assert_eq!(field.cols(), 40);
        assert_eq!(field.rows(), 40);
        assert_eq!(field.grid().len(), 1600);
    }

    #[test]
    fn new_propagates_grid_errors() {
        assert!(FlowField::new(800.0, 800.0, 0.0, 0.1, 4.0).is_err());
        assert!(FlowField::new(10.0, 800.0, 20.0, 0.1, 4.0).is_err());
    }

    #[test]
    fn noise_zero_points_along_x_axis() {
        assert_eq!(angle_for_noise(0.0, 4.0), 0.0);
        let mut field = default_field();
        field.recompute(&ConstantNoise(0.0), 0.0);
        assert!(field.grid().data().iter().all(|&v| v == DVec2::new(1.0, 0.0)));
    }

    #[test]
    fn noise_just_below_one_stays_below_eight_pi() {
        let n = 1.0 - 1e-9;
        let angle = angle_for_noise(n, 4.0);
        assert!(angle < 4.0 * TAU);
        assert!(angle > 4.0 * TAU - 1e-6);

        let mut field = default_field();
        field.recompute(&ConstantNoise(n), 0.0);
        let v = field.grid().data()[0];
        assert!((v.x - 1.0).abs() < 1e-9);
        assert!(v.y < 0.0, "approaches the x axis from below, got {v}");
    }

    #[test]
    fn recompute_stores_cells_row_major() {
        let mut field = FlowField::new(60.0, 40.0, 20.0, 0.1, 1.0).unwrap();
        field.recompute(&ColumnNoise, 0.0);
        let data = field.grid().data();
        for y in 0..2 {
            for x in 0..3 {
                let expected = DVec2::from_angle(angle_for_noise(x as f64 * 0.1, 1.0));
                assert_eq!(data[x + y * 3], expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn lookup_clamps_positions_on_or_past_the_boundary() {
        let mut field = FlowField::new(60.0, 40.0, 20.0, 0.1, 1.0).unwrap();
        field.recompute(&ColumnNoise, 0.0);
        let last_col = field.grid().data()[2];
        assert_eq!(field.lookup(DVec2::new(60.0, 40.0)), last_col);
        assert_eq!(field.lookup(DVec2::new(1000.0, 0.0)), last_col);
        assert_eq!(
            field.lookup(DVec2::new(-5.0, -5.0)),
            field.grid().data()[0]
        );
    }

    #[test]
    fn recompute_is_deterministic() {
        let noise = PerlinNoise::with_seed(7);
        let mut a = default_field();
        let mut b = default_field();
        a.recompute(&noise, 0.37);
        b.recompute(&noise, 0.37);
        assert_eq!(a.grid().data(), b.grid().data());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_cell_is_a_unit_vector(seed: u32, z in 0.0_f64..100.0) {
                let noise = PerlinNoise::with_seed(seed);
                let mut field = FlowField::new(200.0, 160.0, 20.0, 0.1, 4.0).unwrap();
                field.recompute(&noise, z);
                for (x, y, v) in field.grid().iter() {
                    prop_assert!(
                        (v.length() - 1.0).abs() < 1e-12,
                        "cell ({x}, {y}) has length {}", v.length()
                    );
                }
            }

            #[test]
            fn angle_stays_below_full_span(n in 0.0_f64..1.0, turns in 0.1_f64..10.0) {
                let angle = angle_for_noise(n, turns);
                prop_assert!(angle >= 0.0 && angle <= turns * TAU);
            }
        }
    }
}
