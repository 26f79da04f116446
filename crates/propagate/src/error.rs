use std::convert::Infallible;

use thiserror::Error;

/// Errors that can occur during propagation.
///
/// `E` is the error type of the propagated function; it is [`Infallible`] for
/// functions that cannot fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PropagationError<E = Infallible> {
    /// The correlation matrix does not have one row per input.
    #[error("correlation matrix is {matrix}x{matrix} but there are {inputs} inputs")]
    DimensionMismatch { matrix: usize, inputs: usize },

    /// The result has zero uncertainty, so its correlation coefficients are
    /// undefined.
    #[error("result has zero uncertainty; correlation coefficients are undefined")]
    ZeroUncertainty,

    /// The propagated function failed.
    #[error("function evaluation failed")]
    Function(#[source] E),
}
