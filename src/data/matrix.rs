//! Matrix value sources.

use ndarray::Array2;

/// Read-only access to a rectangular grid of cell values.
///
/// Callers check bounds before calling [`MatrixSource::value_at`].
pub trait MatrixSource {
    /// Number of columns (x extent).
    fn width(&self) -> usize;

    /// Number of rows (y extent).
    fn height(&self) -> usize;

    /// Value of the cell at column `x`, row `y`.
    fn value_at(&self, x: usize, y: usize) -> f64;

    /// Minimum and maximum over all finite cells, if any.
    fn value_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = self.value_at(x, y);
                if v.is_finite() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
        if min <= max {
            Some((min, max))
        } else {
            None
        }
    }

    /// Whether `(x, y)` addresses a cell of this matrix.
    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width() as u64 && (y as u64) < self.height() as u64
    }
}

/// Extent of a displayed object in data units.
pub trait RangeProvider {
    /// Lower and upper bound along x.
    fn x_range(&self) -> (f64, f64);

    /// Lower and upper bound along y.
    fn y_range(&self) -> (f64, f64);
}

impl<M: MatrixSource + ?Sized> RangeProvider for M {
    fn x_range(&self) -> (f64, f64) {
        (0.0, self.width() as f64)
    }

    fn y_range(&self) -> (f64, f64) {
        (0.0, self.height() as f64)
    }
}

/// In-memory matrix backed by an `ndarray` grid.
///
/// Rows are indexed by y (row 0 is the bottom of the display), columns by x.
#[derive(Debug, Clone)]
pub struct Matrix {
    /// Display name (variable or file name).
    pub name: String,
    data: Array2<f64>,
    min_max: Option<(f64, f64)>,
}

impl Matrix {
    /// Wrap a grid, pre-computing its value range.
    pub fn new(name: impl Into<String>, data: Array2<f64>) -> Self {
        let min_max = data
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            });
        Self {
            name: name.into(),
            data,
            min_max,
        }
    }

    /// Build a matrix by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        name: impl Into<String>,
        width: usize,
        height: usize,
        f: impl Fn(usize, usize) -> f64,
    ) -> Self {
        let data = Array2::from_shape_fn((height, width), |(y, x)| f(x, y));
        Self::new(name, data)
    }

    /// Underlying grid, indexed `[y, x]`.
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
}

impl MatrixSource for Matrix {
    fn width(&self) -> usize {
        self.data.ncols()
    }

    fn height(&self) -> usize {
        self.data.nrows()
    }

    fn value_at(&self, x: usize, y: usize) -> f64 {
        self.data[[y, x]]
    }

    fn value_range(&self) -> Option<(f64, f64)> {
        self.min_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_indexes_by_x_then_y() {
        let m = Matrix::from_fn("m", 3, 2, |x, y| (10 * y + x) as f64);
        assert_eq!(m.width(), 3);
        assert_eq!(m.height(), 2);
        assert_eq!(m.value_at(2, 1), 12.0);
        assert_eq!(m.value_range(), Some((0.0, 12.0)));
    }

    #[test]
    fn value_range_skips_non_finite() {
        let m = Matrix::from_fn("m", 2, 2, |x, _| if x == 0 { f64::NAN } else { 4.0 });
        assert_eq!(m.value_range(), Some((4.0, 4.0)));
    }

    #[test]
    fn extent_matches_dimensions() {
        let m = Matrix::from_fn("m", 5, 7, |_, _| 0.0);
        assert_eq!(m.x_range(), (0.0, 5.0));
        assert_eq!(m.y_range(), (0.0, 7.0));
        assert!(m.contains(4, 6));
        assert!(!m.contains(5, 0));
        assert!(!m.contains(-1, 0));
    }
}
