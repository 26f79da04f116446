use thiserror::Error;

/// Errors that can occur when creating or updating an [`Uncertain`] value.
///
/// [`Uncertain`]: crate::Uncertain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UncertainError {
    /// The uncertainty was negative or not comparable to zero (NaN).
    #[error("uncertainty must be non-negative")]
    NegativeUncertainty,
}

/// Errors that can occur when summarizing a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatisticsError {
    #[error("sample is empty")]
    EmptySample,

    /// The sample has no degrees of freedom left after the reduction.
    #[error("sample of {len} values is too small for a degrees-of-freedom reduction of {reduction}")]
    TooFewSamples { len: usize, reduction: usize },
}
