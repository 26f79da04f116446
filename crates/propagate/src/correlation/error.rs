use errbar_core::VariableId;
use thiserror::Error;

/// Errors that can occur when storing or reading correlation coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CorrelationError {
    /// An entry already exists for the pair; use `set` to overwrite it.
    #[error("correlation entry for ({first}, {second}) already exists; use `set` to overwrite it")]
    DuplicateEntry {
        first: VariableId,
        second: VariableId,
    },

    #[error("no correlation entry for ({first}, {second})")]
    MissingEntry {
        first: VariableId,
        second: VariableId,
    },

    /// A variable's correlation with itself is always 1 and cannot be stored.
    #[error("correlation of {id} with itself is fixed at 1")]
    SelfCorrelation { id: VariableId },

    /// The value has no identity, so it cannot be keyed in a store.
    #[error("value is not tracked and has no identity")]
    Untracked,

    #[error("index ({row}, {column}) is out of range for a {size}x{size} correlation matrix")]
    IndexOutOfRange {
        row: usize,
        column: usize,
        size: usize,
    },

    /// Diagonal entries are fixed at 1.
    #[error("diagonal entry ({index}, {index}) must be 1, got {value}")]
    Diagonal { index: usize, value: f64 },

    #[error("correlation coefficient must lie in [-1, 1], got {value}")]
    InvalidCoefficient { value: f64 },

    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("matrix is not symmetric at ({row}, {column}): {upper} != {lower}")]
    NotSymmetric {
        row: usize,
        column: usize,
        upper: f64,
        lower: f64,
    },
}
