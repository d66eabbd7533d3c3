//! Two-dimensional grid of direction vectors.
//!
//! A `VectorField` stores `cols * rows` [`DVec2`] values in row-major layout,
//! so cell `(x, y)` lives at flat index `x + y * cols`. Unlike a toroidal
//! scalar grid, out-of-range coordinates are clamped onto the nearest edge
//! cell: the grid covers a bounded canvas and positions sitting exactly on
//! the far boundary must still resolve to a valid cell.

use crate::error::EngineError;
use glam::DVec2;

/// A 2D grid of vectors with clamped cell addressing.
#[derive(Debug, Clone)]
pub struct VectorField {
    cols: usize,
    rows: usize,
    data: Vec<DVec2>,
}

impl VectorField {
    /// Creates a grid with every cell set to the unit x-axis vector.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `cols * rows` overflows `usize`.
    pub fn new(cols: usize, rows: usize) -> Result<Self, EngineError> {
        if cols == 0 || rows == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = cols.checked_mul(rows).ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            cols,
            rows,
            data: vec![DVec2::X; len],
        })
    }

    /// Sizes a grid to cover a canvas: `floor(width / scale) × floor(height / scale)`.
    ///
    /// Returns `EngineError::InvalidParameter` for a non-positive or non-finite
    /// scale and `EngineError::InvalidDimensions` when the canvas is smaller
    /// than a single cell on either axis.
    pub fn for_canvas(width: f64, height: f64, scale: f64) -> Result<Self, EngineError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(EngineError::invalid_param(
                "cell_scale",
                format!("must be a positive finite number, got {scale}"),
            ));
        }
        if !(width.is_finite() && height.is_finite()) {
            return Err(EngineError::InvalidDimensions);
        }
        let cols = (width / scale).floor();
        let rows = (height / scale).floor();
        if cols < 1.0 || rows < 1.0 || cols > usize::MAX as f64 || rows > usize::MAX as f64 {
            return Err(EngineError::InvalidDimensions);
        }
        Self::new(cols as usize, rows as usize)
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read-only access to the row-major cells.
    pub fn data(&self) -> &[DVec2] {
        &self.data
    }

    /// Mutable access to the row-major cells for wholesale recomputation.
    pub fn data_mut(&mut self) -> &mut [DVec2] {
        &mut self.data
    }

    /// Flat index of an in-range cell.
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.cols
    }

    /// Flat index of the cell nearest to `(x, y)`, clamping both coordinates
    /// into `[0, cols-1] × [0, rows-1]`.
    pub fn clamped_index(&self, x: i64, y: i64) -> usize {
        let xi = x.clamp(0, self.cols as i64 - 1) as usize;
        let yi = y.clamp(0, self.rows as i64 - 1) as usize;
        self.index(xi, yi)
    }

    /// Vector stored in the cell nearest to `(x, y)`.
    pub fn get(&self, x: i64, y: i64) -> DVec2 {
        self.data[self.clamped_index(x, y)]
    }

    /// Vector of the cell containing a canvas position, where each cell is
    /// `scale` units wide.
    ///
    /// NaN coordinates resolve to cell 0 on that axis.
    pub fn sample_at(&self, position: DVec2, scale: f64) -> DVec2 {
        let cx = (position.x / scale).floor() as i64;
        let cy = (position.y / scale).floor() as i64;
        self.get(cx, cy)
    }

    /// Iterates over all cells yielding `(x, y, vector)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, DVec2)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.cols;
            let y = i / self.cols;
            (x, y, v)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_every_cell() {
        let field = VectorField::new(4, 3).unwrap();
        assert_eq!(field.cols(), 4);
        assert_eq!(field.rows(), 3);
        assert_eq!(field.len(), 12);
        assert!(field.data().iter().all(|&v| v == DVec2::X));
    }

    #[test]
    fn new_with_zero_dimension_returns_error() {
        assert!(matches!(
            VectorField::new(0, 5),
            Err(EngineError::InvalidDimensions)
        ));
        assert!(matches!(
            VectorField::new(5, 0),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn new_with_overflow_dimensions_returns_error() {
        assert!(VectorField::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn for_canvas_floors_dimensions() {
        let field = VectorField::for_canvas(800.0, 800.0, 20.0).unwrap();
        assert_eq!(field.cols(), 40);
        assert_eq!(field.rows(), 40);

        let field = VectorField::for_canvas(810.0, 399.0, 20.0).unwrap();
        assert_eq!(field.cols(), 40);
        assert_eq!(field.rows(), 19);
    }

    #[test]
    fn for_canvas_rejects_bad_scale() {
        for scale in [0.0, -20.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    VectorField::for_canvas(800.0, 800.0, scale),
                    Err(EngineError::InvalidParameter { .. })
                ),
                "scale {scale} should be rejected"
            );
        }
    }

    #[test]
    fn for_canvas_rejects_canvas_smaller_than_a_cell() {
        assert!(matches!(
            VectorField::for_canvas(19.0, 800.0, 20.0),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn last_cell_of_40_by_40_grid_is_1599() {
        let field = VectorField::new(40, 40).unwrap();
        assert_eq!(field.index(39, 39), 1599);
        assert_eq!(field.index(39, 39), field.len() - 1);
        assert_eq!(field.index(0, 1), 40);
    }

    #[test]
    fn clamped_index_pins_out_of_range_coordinates() {
        let field = VectorField::new(40, 40).unwrap();
        assert_eq!(field.clamped_index(40, 40), 1599);
        assert_eq!(field.clamped_index(-1, -7), 0);
        assert_eq!(field.clamped_index(1000, 0), 39);
        assert_eq!(field.clamped_index(0, 1000), 39 * 40);
    }

    #[test]
    fn get_reads_row_major_cell_and_clamps() {
        let mut field = VectorField::new(4, 4).unwrap();
        field.data_mut()[2 + 3 * 4] = DVec2::Y;
        assert_eq!(field.get(2, 3), DVec2::Y);
        assert_eq!(field.get(2, 9), DVec2::Y);
    }

    #[test]
    fn sample_at_far_boundary_uses_last_cell() {
        let mut field = VectorField::new(40, 40).unwrap();
        field.data_mut()[1599] = DVec2::NEG_Y;
        // Exactly on the right/bottom edge: floor(800 / 20) = 40, clamped to 39.
        assert_eq!(field.sample_at(DVec2::new(800.0, 800.0), 20.0), DVec2::NEG_Y);
        assert_eq!(field.sample_at(DVec2::new(799.9, 799.9), 20.0), DVec2::NEG_Y);
    }

    #[test]
    fn sample_at_negative_position_uses_first_cell() {
        let mut field = VectorField::new(4, 4).unwrap();
        field.data_mut()[0] = DVec2::NEG_X;
        assert_eq!(field.sample_at(DVec2::new(-0.5, -3.0), 20.0), DVec2::NEG_X);
    }

    #[test]
    fn iter_yields_row_major_order() {
        let mut field = VectorField::new(3, 2).unwrap();
        field.data_mut()[4] = DVec2::Y;
        let cells: Vec<(usize, usize, DVec2)> = field.iter().collect();
        assert_eq!(cells.len(), 6);
        assert_eq!((cells[1].0, cells[1].1), (1, 0));
        assert_eq!((cells[3].0, cells[3].1), (0, 1));
        assert_eq!(cells[4], (1, 1, DVec2::Y));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn clamped_index_always_in_range(
                cols in 1_usize..=64,
                rows in 1_usize..=64,
                x in -1000_i64..=1000,
                y in -1000_i64..=1000,
            ) {
                let field = VectorField::new(cols, rows).unwrap();
                prop_assert!(field.clamped_index(x, y) < field.len());
            }

            #[test]
            fn sample_at_never_panics(
                px in prop::num::f64::ANY,
                py in prop::num::f64::ANY,
                scale in 0.5_f64..100.0,
            ) {
                let field = VectorField::new(40, 40).unwrap();
                let v = field.sample_at(DVec2::new(px, py), scale);
                prop_assert_eq!(v, DVec2::X);
            }
        }
    }
}
