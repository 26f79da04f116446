use std::{fmt, ops::Index};

use super::{CorrelationError, check_coefficient};

/// Largest difference tolerated between mirrored entries in
/// [`CorrelationMatrix::from_rows`].
const SYMMETRY_TOLERANCE: f64 = 1e-12;

/// A symmetric matrix of correlation coefficients between the inputs of one
/// propagation call.
///
/// Only the strict upper triangle is stored, packed row by row; the diagonal
/// is implicitly 1. Entries `(i, j)` and `(j, i)` are the same entry.
/// A new matrix describes independent inputs (all off-diagonal entries 0).
///
/// ```
/// use errbar_propagate::CorrelationMatrix;
///
/// let mut corr = CorrelationMatrix::new(3);
/// corr.set(0, 2, -0.5).unwrap();
///
/// assert_eq!(corr.get(2, 0), Ok(-0.5));
/// assert_eq!(corr.get(1, 1), Ok(1.0));
/// assert!(corr.get(0, 3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    size: usize,
    upper: Vec<f64>,
}

impl CorrelationMatrix {
    /// Creates a `size`-by-`size` matrix of uncorrelated inputs.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            upper: vec![0.0; size * size.saturating_sub(1) / 2],
        }
    }

    /// Builds a matrix from full rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are not square, the diagonal is not 1,
    /// the matrix is not symmetric, or a coefficient lies outside `[-1, 1]`.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, CorrelationError> {
        let size = rows.len();
        let mut matrix = Self::new(size);

        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(CorrelationError::NotSquare {
                    row,
                    len: values.len(),
                    expected: size,
                });
            }
        }

        for row in 0..size {
            let diagonal = rows[row].as_ref()[row];
            let unit = (diagonal - 1.0).abs() <= SYMMETRY_TOLERANCE;
            if !unit {
                return Err(CorrelationError::Diagonal {
                    index: row,
                    value: diagonal,
                });
            }

            for column in (row + 1)..size {
                let upper = rows[row].as_ref()[column];
                let lower = rows[column].as_ref()[row];
                let symmetric = (upper - lower).abs() <= SYMMETRY_TOLERANCE;
                if !symmetric {
                    return Err(CorrelationError::NotSymmetric {
                        row,
                        column,
                        upper,
                        lower,
                    });
                }
                matrix.set(row, column, upper)?;
            }
        }

        Ok(matrix)
    }

    /// Returns the number of inputs the matrix describes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix describes no inputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the coefficient between inputs `i` and `j`.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::IndexOutOfRange`] if either index is not
    /// below [`len`](Self::len).
    pub fn get(&self, i: usize, j: usize) -> Result<f64, CorrelationError> {
        self.check_bounds(i, j)?;
        if i == j {
            return Ok(1.0);
        }
        Ok(self.upper[self.offset(i, j)])
    }

    /// Sets the coefficient between inputs `i` and `j` (and `j` and `i`).
    ///
    /// Setting a diagonal entry to 1 is accepted and has no effect.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of range, the coefficient is
    /// outside `[-1, 1]` or NaN, or a diagonal entry is set to anything but 1.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<(), CorrelationError> {
        self.check_bounds(i, j)?;
        check_coefficient(value)?;

        if i == j {
            #[allow(clippy::float_cmp)]
            let unit = value == 1.0;
            return if unit {
                Ok(())
            } else {
                Err(CorrelationError::Diagonal { index: i, value })
            };
        }

        let offset = self.offset(i, j);
        self.upper[offset] = value;
        Ok(())
    }

    fn check_bounds(&self, i: usize, j: usize) -> Result<(), CorrelationError> {
        if i < self.size && j < self.size {
            Ok(())
        } else {
            Err(CorrelationError::IndexOutOfRange {
                row: i,
                column: j,
                size: self.size,
            })
        }
    }

    /// Position of off-diagonal entry `(i, j)` in the packed upper triangle.
    fn offset(&self, i: usize, j: usize) -> usize {
        let (row, column) = if i < j { (i, j) } else { (j, i) };
        row * (2 * self.size - row - 1) / 2 + (column - row - 1)
    }
}

/// Indexes the matrix as `matrix[(i, j)]`.
///
/// # Panics
///
/// Panics if either index is out of range.
impl Index<(usize, usize)> for CorrelationMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.size && j < self.size,
            "index ({i}, {j}) is out of range for a {size}x{size} correlation matrix",
            size = self.size,
        );
        if i == j {
            &1.0
        } else {
            &self.upper[self.offset(i, j)]
        }
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.size {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for j in 0..self.size {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self[(i, j)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
