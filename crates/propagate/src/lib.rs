//! Numerical uncertainty propagation for errbar.
//!
//! Uncertainty is propagated through ordinary Rust functions by finite
//! differences: no derivatives, no special number types inside the function.
//!
//! - [`propagate`] and friends — evaluate a function at the nominal point and
//!   once per uncertain input, then combine the deviations
//! - [`Arguments`], [`Apply`] — tuples of up to twenty mixed inputs, or a `Vec`
//! - [`CorrelationMatrix`] — correlations between the inputs of one call
//! - [`CorrelationStore`], [`global_store`] — correlations between tracked
//!   variables, updated as results are derived from them
//! - [`Propagator`], [`Config`] — the configurable form of the free functions

mod arguments;
mod config;
mod correlated;
mod correlation;
mod error;
mod propagator;

pub use arguments::{Apply, Arguments};
pub use config::{Config, ConfigError};
pub use correlated::Correlated;
pub use correlation::{
    Correlation, CorrelationError, CorrelationMatrix, CorrelationStore, Independent, global_store,
};
pub use error::PropagationError;
pub use propagator::{
    Propagated, Propagator, propagate, propagate_and_correlate,
    propagate_and_correlate_with_matrix, propagate_tracked, propagate_with_matrix,
    propagate_with_store, try_propagate, try_propagate_and_correlate, try_propagate_tracked,
    try_propagate_with_store,
};
