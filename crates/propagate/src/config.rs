use thiserror::Error;

/// Configuration for a [`Propagator`](crate::Propagator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    zero_tolerance: f64,
}

/// Errors that can occur when validating a propagator config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("zero_tolerance must be finite and non-negative")]
    ZeroTolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zero_tolerance: 1e-12,
        }
    }
}

impl Config {
    /// Creates a new config with a validated tolerance.
    ///
    /// A combined variance of at most `zero_tolerance` times the largest
    /// squared deviation of the same call is treated as exactly zero, so fully
    /// correlated terms that cancel analytically leave no rounding noise.
    ///
    /// # Errors
    ///
    /// Returns an error if `zero_tolerance` is negative or non-finite.
    pub fn new(zero_tolerance: f64) -> Result<Self, ConfigError> {
        if !zero_tolerance.is_finite() || zero_tolerance < 0.0 {
            return Err(ConfigError::ZeroTolerance);
        }

        Ok(Self { zero_tolerance })
    }

    /// Returns the relative tolerance below which a variance is zero.
    #[must_use]
    pub fn zero_tolerance(&self) -> f64 {
        self.zero_tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_tolerance() {
        assert!(Config::new(0.0).is_ok());
        assert!(Config::new(1e-6).is_ok());
        assert_eq!(Config::new(-1e-6), Err(ConfigError::ZeroTolerance));
        assert_eq!(Config::new(f64::NAN), Err(ConfigError::ZeroTolerance));
        assert_eq!(Config::new(f64::INFINITY), Err(ConfigError::ZeroTolerance));
    }

    #[test]
    fn default_matches_new() {
        assert_eq!(Config::default(), Config::new(1e-12).unwrap());
    }
}
