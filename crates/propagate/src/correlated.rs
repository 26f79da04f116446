use std::{fmt, ops::Deref};

use errbar_core::Uncertain;

/// A propagated result together with its correlation to each input.
///
/// Coefficients are indexed like the inputs of the call that produced the
/// result. Exact inputs have a coefficient of zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Correlated<N, U = N> {
    value: Uncertain<N, U>,
    coefficients: Vec<f64>,
}

impl<N, U> Correlated<N, U> {
    pub(crate) fn new(value: Uncertain<N, U>, coefficients: Vec<f64>) -> Self {
        Self {
            value,
            coefficients,
        }
    }

    /// Returns the result.
    pub fn value(&self) -> &Uncertain<N, U> {
        &self.value
    }

    /// Returns the correlation between the result and input `index`.
    #[must_use]
    pub fn coefficient(&self, index: usize) -> Option<f64> {
        self.coefficients.get(index).copied()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Consumes the wrapper and returns the result and its coefficients.
    pub fn into_parts(self) -> (Uncertain<N, U>, Vec<f64>) {
        (self.value, self.coefficients)
    }
}

impl<N, U> Deref for Correlated<N, U> {
    type Target = Uncertain<N, U>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<N: fmt::Display, U: fmt::Display> fmt::Display for Correlated<N, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
