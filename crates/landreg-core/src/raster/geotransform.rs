use serde::{Deserialize, Serialize};

use super::Extent;

/// North-up affine georeferencing.
///
/// `origin_x`/`origin_y` is the upper-left corner of the upper-left cell.
/// Both cell sizes are positive; rows run southwards from the origin:
/// ```text
/// x = origin_x + col * res_x
/// y = origin_y - row * res_y
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub res_x: f64,
    pub res_y: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, res_x: f64, res_y: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            res_x,
            res_y,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            origin_x: self.origin_x + dx,
            origin_y: self.origin_y + dy,
            ..*self
        }
    }

    /// Bounding box of a `rows x cols` grid.
    pub fn extent(&self, rows: usize, cols: usize) -> Extent {
        Extent {
            xmin: self.origin_x,
            xmax: self.origin_x + cols as f64 * self.res_x,
            ymin: self.origin_y - rows as f64 * self.res_y,
            ymax: self.origin_y,
        }
    }

    /// Map coordinates of a cell centre.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.res_x,
            self.origin_y - (row as f64 + 0.5) * self.res_y,
        )
    }

    /// The `(row, col)` of the cell containing a map coordinate.
    ///
    /// Points exactly on the east or south edge belong to the last column or
    /// row; anything else outside the grid is `None`.
    pub fn cell_of(&self, x: f64, y: f64, rows: usize, cols: usize) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let col_f = (x - self.origin_x) / self.res_x;
        let row_f = (self.origin_y - y) / self.res_y;
        if col_f < 0.0 || row_f < 0.0 || col_f > cols as f64 || row_f > rows as f64 {
            return None;
        }
        let col = (col_f.floor() as usize).min(cols - 1);
        let row = (row_f.floor() as usize).min(rows - 1);
        Some((row, col))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}
