use serde::{Serialize, Deserialize};

/// Dense row-major grid of `f64` values.
///
/// Used for both the fractional index (values in [0, 1]) and the percentage
/// index (values in [0, 100]).  `data[r][c]` addresses row `r`, column `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![value; cols]; rows]
        }
    }

    /// Builds a matrix from nested rows.
    ///
    /// # Panics
    /// Panics if the rows are not all the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, |row| row.len());
        assert!(
            data.iter().all(|row| row.len() == cols),
            "Matrix rows must all have the same length"
        );
        Matrix {
            rows: data.len(),
            cols,
            data
        }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect()
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Number of cells (`rows * cols`).
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Arithmetic mean of all cells, or `None` for an empty matrix.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / self.len() as f64)
    }

    /// Smallest and largest cell, or `None` for an empty matrix.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.iter().fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_data_infers_shape() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!((m.rows, m.cols), (2, 3));
        assert_eq!(m.len(), 6);
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn from_data_rejects_ragged_rows() {
        Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
    }

    #[test]
    fn mean_and_extremes() {
        let m = Matrix::from_data(vec![vec![-1.0, 4.0], vec![2.5, 0.5]]);
        assert_relative_eq!(m.mean().unwrap(), 1.5);
        assert_eq!(m.min_max(), Some((-1.0, 4.0)));
    }

    #[test]
    fn empty_matrix_has_no_statistics() {
        let m = Matrix::default();
        assert!(m.is_empty());
        assert_eq!(m.mean(), None);
        assert_eq!(m.min_max(), None);
    }

    #[test]
    fn map_preserves_shape() {
        let m = Matrix::filled(3, 2, 0.25).map(|x| x * 100.0);
        assert_eq!((m.rows, m.cols), (3, 2));
        assert!(m.iter().all(|x| x == 25.0));
    }
}
