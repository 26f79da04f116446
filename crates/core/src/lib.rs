//! Core types for errbar, a numerical uncertainty propagation library.
//!
//! This crate defines the values that propagation works on:
//!
//! - [`Uncertain`] — a nominal value paired with a non-negative uncertainty
//! - [`Tracked`] — an uncertain value with a [`VariableId`] for correlation tracking
//! - [`Measure`] — reads plain numbers, `uom` quantities, and uncertain values
//!   uniformly, treating anything without an uncertainty as exact
//! - [`Magnitude`], [`Displacement`] — the linear structure propagation needs
//!   from inputs and results, including types whose differences have a
//!   different type (offset scales)
//! - [`statistics`] — sample summaries used by [`Uncertain::from_samples`]
//! - [`sigfig`] — rounding helpers used by [`Uncertain::normalize`]

mod error;
mod magnitude;
mod measure;
mod tracked;
mod uncertain;

pub mod sigfig;
pub mod statistics;

pub use error::{StatisticsError, UncertainError};
pub use magnitude::{Displacement, Magnitude};
pub use measure::{
    Measure, identity_of, is_uncertain, lower_of, nominal_of, uncertainty_of, upper_of,
};
pub use statistics::SampleSpread;
pub use tracked::{Tracked, VariableId};
pub use uncertain::Uncertain;
