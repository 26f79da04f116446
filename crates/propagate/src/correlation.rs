mod error;
mod matrix;
mod store;

pub use error::CorrelationError;
pub use matrix::CorrelationMatrix;
pub use store::{CorrelationStore, global_store};

use errbar_core::VariableId;

/// Checks that `value` is a valid correlation coefficient.
fn check_coefficient(value: f64) -> Result<(), CorrelationError> {
    if (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CorrelationError::InvalidCoefficient { value })
    }
}

/// A source of correlation coefficients between the inputs of one
/// propagation call, addressed by input position.
pub trait Correlation {
    /// Returns the coefficient between inputs `i` and `j`.
    ///
    /// Only called with `i != j` and both indices below the input count.
    fn coefficient(&self, i: usize, j: usize) -> f64;

    /// Returns the number of inputs this source describes, if it is sized.
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Treats every pair of inputs as uncorrelated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Independent;

impl Correlation for Independent {
    fn coefficient(&self, _i: usize, _j: usize) -> f64 {
        0.0
    }
}

impl Correlation for CorrelationMatrix {
    fn coefficient(&self, i: usize, j: usize) -> f64 {
        self.get(i, j).unwrap_or(0.0)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<C: Correlation + ?Sized> Correlation for &C {
    fn coefficient(&self, i: usize, j: usize) -> f64 {
        (**self).coefficient(i, j)
    }

    fn dimension(&self) -> Option<usize> {
        (**self).dimension()
    }
}

/// Looks up coefficients in a store by the identities of the inputs.
///
/// Untracked inputs are uncorrelated with everything.
#[derive(Debug)]
pub(crate) struct StoreLookup<'a> {
    store: &'a CorrelationStore<f64>,
    ids: Vec<Option<VariableId>>,
}

impl<'a> StoreLookup<'a> {
    pub(crate) fn new(store: &'a CorrelationStore<f64>, ids: Vec<Option<VariableId>>) -> Self {
        Self { store, ids }
    }
}

impl Correlation for StoreLookup<'_> {
    fn coefficient(&self, i: usize, j: usize) -> f64 {
        match (self.ids.get(i).copied().flatten(), self.ids.get(j).copied().flatten()) {
            (Some(a), Some(b)) => self.store.get_with_ids(a, b),
            _ => 0.0,
        }
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn independent_inputs() {
        assert_relative_eq!(Independent.coefficient(0, 1), 0.0);
        assert_eq!(Independent.dimension(), None);
    }

    #[test]
    fn store_lookup_skips_untracked_inputs() {
        let x = VariableId::next();
        let y = VariableId::next();

        let mut store = CorrelationStore::new();
        store.add_with_ids(x, y, 0.25).unwrap();

        let lookup = StoreLookup::new(&store, vec![Some(x), None, Some(y)]);
        assert_relative_eq!(lookup.coefficient(0, 2), 0.25);
        assert_relative_eq!(lookup.coefficient(2, 0), 0.25);
        assert_relative_eq!(lookup.coefficient(0, 1), 0.0);
        assert_eq!(lookup.dimension(), Some(3));

        // The same variable passed twice is fully correlated with itself.
        let lookup = StoreLookup::new(&store, vec![Some(x), Some(x)]);
        assert_relative_eq!(lookup.coefficient(0, 1), 1.0);
    }
}
