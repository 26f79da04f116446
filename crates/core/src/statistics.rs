//! Descriptive statistics over samples.
//!
//! Every function works on any [`Magnitude`], so a sample of `uom` times is
//! summarized just like a sample of plain floats. Spreads are returned in the
//! sample's own type; the variance, whose unit is the square of the sample's,
//! is returned as an `f64` in squared canonical units.

use crate::{Magnitude, Measure, StatisticsError};

/// How a sample's spread becomes the uncertainty of its mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleSpread {
    /// Standard deviation divided by the square root of the sample size.
    #[default]
    StandardError,
    /// The sample standard deviation itself.
    StandardDeviation,
}

/// Returns the arithmetic mean of a sample.
///
/// # Errors
///
/// Returns [`StatisticsError::EmptySample`] if the sample is empty.
pub fn mean<T: Magnitude>(sample: &[T]) -> Result<T, StatisticsError> {
    let first = sample.first().ok_or(StatisticsError::EmptySample)?;
    Ok(first.with_magnitude(mean_magnitude(sample)))
}

/// Returns the variance of a sample in squared canonical units.
///
/// The sum of squared deviations is divided by `len - dof_reduction`: a
/// reduction of 1 gives the unbiased estimate, 0 the population variance.
///
/// # Errors
///
/// Returns an error if the sample is empty or has no more values than
/// `dof_reduction`.
pub fn variance<T: Magnitude>(sample: &[T], dof_reduction: usize) -> Result<f64, StatisticsError> {
    if sample.is_empty() {
        return Err(StatisticsError::EmptySample);
    }
    if sample.len() <= dof_reduction {
        return Err(StatisticsError::TooFewSamples {
            len: sample.len(),
            reduction: dof_reduction,
        });
    }

    let mu = mean_magnitude(sample);
    let sum_of_squares: f64 = sample
        .iter()
        .map(|x| {
            let deviation = x.magnitude() - mu;
            deviation * deviation
        })
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let dof = (sample.len() - dof_reduction) as f64;
    Ok(sum_of_squares / dof)
}

/// Returns the standard deviation of a sample.
///
/// # Errors
///
/// Returns an error under the same conditions as [`variance`].
pub fn standard_deviation<T: Magnitude>(
    sample: &[T],
    dof_reduction: usize,
) -> Result<T, StatisticsError> {
    let spread = variance(sample, dof_reduction)?.sqrt();
    Ok(sample[0].with_magnitude(spread))
}

/// Returns the standard error of the mean, `stdev / sqrt(len)`.
///
/// Uses the unbiased standard deviation.
///
/// # Errors
///
/// Returns an error if the sample has fewer than two values.
pub fn standard_error_of_mean<T: Magnitude>(sample: &[T]) -> Result<T, StatisticsError> {
    let spread = variance(sample, 1)?.sqrt();
    #[allow(clippy::cast_precision_loss)]
    let n = sample.len() as f64;
    Ok(sample[0].with_magnitude(spread / n.sqrt()))
}

/// Returns how many combined standard uncertainties separate two values.
///
/// `z = |a - b| / sqrt(u_a^2 + u_b^2)`, computed on canonical magnitudes.
/// Either value may be exact; two exact, unequal values give infinity.
pub fn z_score<A, B>(a: &A, b: &B) -> f64
where
    A: Measure + ?Sized,
    B: Measure + ?Sized,
    A::Value: Magnitude,
    A::Uncertainty: Magnitude,
    B::Value: Magnitude,
    B::Uncertainty: Magnitude,
{
    let difference = (a.nominal().magnitude() - b.nominal().magnitude()).abs();
    let ua = a.uncertainty().magnitude();
    let ub = b.uncertainty().magnitude();
    difference / ua.hypot(ub)
}

fn mean_magnitude<T: Magnitude>(sample: &[T]) -> f64 {
    let sum: f64 = sample.iter().map(Magnitude::magnitude).sum();
    #[allow(clippy::cast_precision_loss)]
    let n = sample.len() as f64;
    sum / n
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::Time,
        time::{millisecond, second},
    };

    use crate::Uncertain;

    const SAMPLE: [f64; 10] = [
        0.431, 0.603, 0.504, 0.581, 0.588, 0.644, 0.595, 0.534, 0.563, 0.578,
    ];

    #[test]
    fn statistics_of_doubles() {
        assert_relative_eq!(mean(&SAMPLE).unwrap(), 0.5621, epsilon = 1e-12);

        assert_relative_eq!(
            variance(&SAMPLE, 1).unwrap(),
            0.003_566_322_222_222_222,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            variance(&SAMPLE, 0).unwrap(),
            0.003_209_69,
            epsilon = 1e-12
        );

        assert_relative_eq!(
            standard_deviation(&SAMPLE, 1).unwrap(),
            0.059_718_692_402_146_764,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            standard_deviation(&SAMPLE, 0).unwrap(),
            0.056_654_126_063_332_75,
            epsilon = 1e-12
        );

        assert_relative_eq!(
            standard_error_of_mean(&SAMPLE).unwrap(),
            0.059_718_692_402_146_764 / 10_f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn statistics_of_quantities() {
        let sample: Vec<Time> = SAMPLE.iter().map(|&t| Time::new::<second>(t)).collect();

        assert_relative_eq!(mean(&sample).unwrap().get::<second>(), 0.5621, epsilon = 1e-12);
        assert_relative_eq!(
            variance(&sample, 1).unwrap(),
            0.003_566_322_222_222_222,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            standard_deviation(&sample, 1).unwrap().get::<millisecond>(),
            59.718_692_402_146_764,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            standard_deviation(&sample, 0).unwrap().get::<millisecond>(),
            56.654_126_063_332_75,
            epsilon = 1e-9
        );
    }

    #[test]
    fn empty_and_small_samples() {
        let empty: [f64; 0] = [];
        assert_eq!(mean(&empty), Err(StatisticsError::EmptySample));
        assert_eq!(variance(&empty, 0), Err(StatisticsError::EmptySample));
        assert_eq!(
            standard_error_of_mean(&[1.0]),
            Err(StatisticsError::TooFewSamples {
                len: 1,
                reduction: 1
            })
        );

        // A single value has a population variance of zero.
        assert_relative_eq!(variance(&[4.0], 0).unwrap(), 0.0);
    }

    #[test]
    fn z_scores() {
        let a = Uncertain::new(10.0, 0.3).unwrap();
        let b = Uncertain::new(9.0, 0.4).unwrap();
        assert_relative_eq!(z_score(&a, &b), 2.0, epsilon = 1e-12);

        // An exact reference value contributes no uncertainty.
        assert_relative_eq!(z_score(&a, &9.4), 2.0, epsilon = 1e-12);
    }
}
