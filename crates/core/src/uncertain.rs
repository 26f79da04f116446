use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Div, Sub},
};

use num_traits::Zero;

use crate::{
    Magnitude, SampleSpread, StatisticsError, UncertainError,
    sigfig::{last_figure_exponent, round_to_decade, sigfig_round},
    statistics::{mean, standard_deviation, standard_error_of_mean},
};

/// A nominal value paired with its uncertainty.
///
/// The uncertainty is typically one standard deviation. Its type `U` defaults
/// to the nominal type `N`, but may differ when `N` lives on an offset scale:
/// an uncertain absolute temperature carries a temperature interval.
///
/// The uncertainty is validated to be non-negative on construction and on
/// every update.
///
/// # Examples
///
/// ```
/// use errbar_core::Uncertain;
///
/// let x = Uncertain::new(2.1_f64, 0.1).unwrap();
/// assert_eq!(x.to_string(), "2.1 +/- 0.1");
/// assert!((x.upper() - 2.2).abs() < 1e-12);
///
/// assert!(Uncertain::new(2.1, -0.1).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uncertain<N, U = N> {
    nominal: N,
    uncertainty: U,
}

impl<N, U> Uncertain<N, U>
where
    U: PartialOrd + Zero,
{
    /// Creates an uncertain value.
    ///
    /// # Errors
    ///
    /// Returns [`UncertainError::NegativeUncertainty`] if `uncertainty` is
    /// negative or NaN.
    pub fn new(nominal: N, uncertainty: U) -> Result<Self, UncertainError> {
        check_uncertainty(&uncertainty)?;
        Ok(Self {
            nominal,
            uncertainty,
        })
    }

    /// Creates a value with zero uncertainty.
    pub fn exact(nominal: N) -> Self {
        Self {
            nominal,
            uncertainty: U::zero(),
        }
    }

    /// Replaces the uncertainty.
    ///
    /// # Errors
    ///
    /// Returns [`UncertainError::NegativeUncertainty`] if `uncertainty` is
    /// negative or NaN, leaving the current value unchanged.
    pub fn set_uncertainty(&mut self, uncertainty: U) -> Result<(), UncertainError> {
        check_uncertainty(&uncertainty)?;
        self.uncertainty = uncertainty;
        Ok(())
    }
}

impl<N, U> Uncertain<N, U> {
    /// Creates an uncertain value without validating the uncertainty.
    ///
    /// The caller guarantees that `uncertainty` is non-negative.
    pub fn new_unchecked(nominal: N, uncertainty: U) -> Self {
        Self {
            nominal,
            uncertainty,
        }
    }

    /// Replaces the nominal value.
    pub fn set_nominal(&mut self, nominal: N) {
        self.nominal = nominal;
    }

    /// Consumes the value and returns `(nominal, uncertainty)`.
    pub fn into_parts(self) -> (N, U) {
        (self.nominal, self.uncertainty)
    }
}

impl<N: Clone, U: Clone> Uncertain<N, U> {
    /// Returns the nominal value.
    pub fn nominal(&self) -> N {
        self.nominal.clone()
    }

    /// Returns the uncertainty.
    pub fn uncertainty(&self) -> U {
        self.uncertainty.clone()
    }

    /// Returns `uncertainty / nominal`.
    pub fn relative_uncertainty<R>(&self) -> R
    where
        U: Div<N, Output = R>,
    {
        self.uncertainty() / self.nominal()
    }
}

impl<N, U> Uncertain<N, U>
where
    N: Clone + Add<U, Output = N>,
    U: Clone,
{
    /// Returns `nominal + uncertainty`.
    pub fn upper(&self) -> N {
        self.nominal() + self.uncertainty()
    }
}

impl<N, U> Uncertain<N, U>
where
    N: Clone + Sub<U, Output = N>,
    U: Clone,
{
    /// Returns `nominal - uncertainty`.
    pub fn lower(&self) -> N {
        self.nominal() - self.uncertainty()
    }
}

impl<N, U> Uncertain<N, U>
where
    N: Magnitude,
    U: Magnitude,
{
    /// Rounds the value for display.
    ///
    /// The uncertainty is rounded to `sig_figs` significant figures and the
    /// nominal value is rounded to the same decimal position, so the two may
    /// end up with a different number of significant figures. Positions are
    /// compared in canonical units, which keeps a nominal value in meters and
    /// an uncertainty in centimeters aligned.
    ///
    /// Rounding happens on canonical magnitudes, so for a quantity in a unit
    /// that is not a power of ten of the base unit (an inch, a pound) the
    /// value read back in that unit generally has a different number of
    /// significant figures.
    ///
    /// A zero uncertainty rounds the nominal value to `sig_figs` significant
    /// figures. Zero significant figures is treated as one.
    ///
    /// ```
    /// use errbar_core::Uncertain;
    ///
    /// let x = Uncertain::new(1.23456, 0.98765).unwrap();
    /// assert_eq!(x.normalize(2).to_string(), "1.23 +/- 0.99");
    /// ```
    #[must_use]
    pub fn normalize(&self, sig_figs: usize) -> Self {
        let uncertainty = sigfig_round(self.uncertainty.magnitude(), sig_figs);
        let nominal = self.nominal.magnitude();

        #[allow(clippy::float_cmp)]
        let nominal = if uncertainty == 0.0 {
            sigfig_round(nominal, sig_figs)
        } else {
            round_to_decade(nominal, last_figure_exponent(uncertainty, sig_figs))
        };

        Self {
            nominal: self.nominal.with_magnitude(nominal),
            uncertainty: self.uncertainty.with_magnitude(uncertainty),
        }
    }
}

impl<N: Magnitude> Uncertain<N, N> {
    /// Summarizes a sample as its mean and spread.
    ///
    /// The nominal value is the sample mean. The uncertainty is the standard
    /// error of the mean or the sample standard deviation, as selected by
    /// `spread`; both use one degree-of-freedom reduction.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample has fewer than two values.
    pub fn from_samples(sample: &[N], spread: SampleSpread) -> Result<Self, StatisticsError> {
        let nominal = mean(sample)?;
        let uncertainty = match spread {
            SampleSpread::StandardError => standard_error_of_mean(sample)?,
            SampleSpread::StandardDeviation => standard_deviation(sample, 1)?,
        };
        Ok(Self {
            nominal,
            uncertainty,
        })
    }
}

impl<N, U> TryFrom<(N, U)> for Uncertain<N, U>
where
    U: PartialOrd + Zero,
{
    type Error = UncertainError;

    fn try_from((nominal, uncertainty): (N, U)) -> Result<Self, Self::Error> {
        Self::new(nominal, uncertainty)
    }
}

impl<N: fmt::Display, U: fmt::Display> fmt::Display for Uncertain<N, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} +/- {}", self.nominal, self.uncertainty)
    }
}

fn check_uncertainty<U: PartialOrd + Zero>(uncertainty: &U) -> Result<(), UncertainError> {
    match uncertainty.partial_cmp(&U::zero()) {
        Some(Ordering::Greater | Ordering::Equal) => Ok(()),
        Some(Ordering::Less) | None => Err(UncertainError::NegativeUncertainty),
    }
}
