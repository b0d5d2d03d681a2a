use crate::error::HpiError;

/// Single-channel brightness grid with one `u8` per source pixel.
///
/// Rows follow the image height, columns the image width.  The grid is
/// always rectangular and non-empty, and cannot be mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl IntensityMatrix {
    /// Builds an intensity matrix from nested rows.
    ///
    /// Fails with `HpiError::Decode` if there are no cells or the rows are
    /// not all the same length.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<IntensityMatrix, HpiError> {
        let cols = rows.first().map_or(0, |row| row.len());
        if rows.is_empty() || cols == 0 {
            return Err(HpiError::Decode("image has zero area".into()));
        }
        if rows.iter().any(|row| row.len() != cols) {
            return Err(HpiError::Decode("intensity rows have unequal lengths".into()));
        }
        let n_rows = rows.len();
        Ok(IntensityMatrix {
            rows: n_rows,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Builds an intensity matrix from a flat row-major buffer.
    pub fn from_raw(rows: usize, cols: usize, data: Vec<u8>) -> Result<IntensityMatrix, HpiError> {
        if rows == 0 || cols == 0 {
            return Err(HpiError::Decode(format!("image has zero area ({}x{})", cols, rows)));
        }
        if data.len() != rows * cols {
            return Err(HpiError::Decode(format!(
                "expected {} intensity values for {}x{}, got {}",
                rows * cols, cols, rows, data.len()
            )));
        }
        Ok(IntensityMatrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Iterates the rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.data.chunks_exact(self.cols)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().copied()
    }

    /// Global minimum and maximum, found in a single pass.
    pub fn min_max(&self) -> (u8, u8) {
        self.data.iter().fold((u8::MAX, u8::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}
