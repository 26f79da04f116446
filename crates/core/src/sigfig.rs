//! Significant-figure rounding helpers.

/// Returns the exponent of `x` written in scientific notation.
///
/// For example `1234.0` is `1.234e3` and has exponent `3`, while `0.0098` is
/// `9.8e-3` and has exponent `-3`. Zero and non-finite values have exponent `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn scientific_exponent(x: f64) -> i32 {
    if x == 0.0 || !x.is_finite() {
        return 0;
    }
    x.abs().log10().floor() as i32
}

/// Rounds `x` to the nearest multiple of `10^exponent`.
///
/// Negative exponents round to decimal places: `round_to_decade(1.23456, -2)`
/// is `1.23`.
///
/// Returns `x` unchanged when the decade is beyond the range of `f64` or
/// finer than `x` can resolve.
#[must_use]
pub fn round_to_decade(x: f64, exponent: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10_f64.powi(exponent.saturating_abs());
    if !scale.is_finite() {
        return x;
    }
    let scaled = if exponent < 0 { x * scale } else { x / scale };
    if !scaled.is_finite() {
        return x;
    }
    if exponent < 0 {
        scaled.round() / scale
    } else {
        scaled.round() * scale
    }
}

/// Rounds `x` to `n` significant figures.
///
/// Zero significant figures is treated as one.
#[must_use]
pub fn sigfig_round(x: f64, n: usize) -> f64 {
    round_to_decade(x, last_figure_exponent(x, n))
}

/// Returns the decade of the `n`th significant figure of `x`.
pub(crate) fn last_figure_exponent(x: f64, n: usize) -> i32 {
    let extra = i32::try_from(n.max(1) - 1).unwrap_or(i32::MAX);
    scientific_exponent(x).saturating_sub(extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn exponents() {
        assert_eq!(scientific_exponent(1.23456), 0);
        assert_eq!(scientific_exponent(0.98765), -1);
        assert_eq!(scientific_exponent(-1234.0), 3);
        assert_eq!(scientific_exponent(0.0098), -3);
        assert_eq!(scientific_exponent(0.0), 0);
        assert_eq!(scientific_exponent(f64::NAN), 0);
    }

    #[test]
    fn rounds_to_significant_figures() {
        assert_relative_eq!(sigfig_round(1.23456, 1), 1.0);
        assert_relative_eq!(sigfig_round(1.23456, 2), 1.2);
        assert_relative_eq!(sigfig_round(1.23456, 3), 1.23);
        assert_relative_eq!(sigfig_round(1.23456, 4), 1.235);

        assert_relative_eq!(sigfig_round(-0.0045678, 2), -0.0046);
        assert_relative_eq!(sigfig_round(98_765.0, 2), 99_000.0);
    }

    #[test]
    fn rounding_can_carry_into_next_decade() {
        assert_relative_eq!(sigfig_round(0.98765, 1), 1.0);
        assert_relative_eq!(sigfig_round(9.96, 2), 10.0);
    }

    #[test]
    fn zero_figures_means_one() {
        assert_relative_eq!(sigfig_round(1.23456, 0), 1.0);
    }

    #[test]
    fn rounds_to_decade() {
        assert_relative_eq!(round_to_decade(1.23456, -2), 1.23);
        assert_relative_eq!(round_to_decade(1234.5, 2), 1200.0);
        assert_relative_eq!(round_to_decade(0.0, 3), 0.0);
    }

    #[test]
    fn out_of_range_decades_leave_value_unchanged() {
        assert_eq!(sigfig_round(1.0, 400), 1.0);
        assert_eq!(sigfig_round(0.123, usize::MAX), 0.123);
        assert_eq!(round_to_decade(1e300, -11), 1e300);
        assert_eq!(round_to_decade(5.0, 400), 5.0);
        assert_eq!(round_to_decade(5.0, i32::MIN), 5.0);
    }
}
