use std::ops::{Add, Sub};

use num_traits::Zero;
use uom::si::{Dimension, Quantity, Units};

use crate::{Magnitude, Tracked, Uncertain, VariableId};

/// A value that can be read as exact or uncertain.
///
/// This is what lets error propagation accept a mix of plain numbers,
/// `uom` quantities, and uncertain values: each argument is projected through
/// this trait, and exact values behave as if their uncertainty were zero.
///
/// An [`Uncertain`] reports `is_uncertain() == true` even when its uncertainty
/// happens to be zero; only types without an uncertainty are exact.
pub trait Measure {
    /// The type of the nominal value and its bounds.
    type Value;

    /// The type of the uncertainty.
    type Uncertainty;

    fn nominal(&self) -> Self::Value;

    /// Returns the uncertainty, or zero for exact values.
    fn uncertainty(&self) -> Self::Uncertainty;

    /// Returns `nominal + uncertainty`.
    fn upper(&self) -> Self::Value;

    /// Returns `nominal - uncertainty`.
    fn lower(&self) -> Self::Value;

    fn is_uncertain(&self) -> bool;

    /// Returns the identity used for correlation tracking, if any.
    fn identity(&self) -> Option<VariableId> {
        None
    }
}

macro_rules! exact_numbers {
    ($($t:ty),+ $(,)?) => {
        $(
            impl Measure for $t {
                type Value = $t;
                type Uncertainty = $t;

                fn nominal(&self) -> $t {
                    *self
                }

                fn uncertainty(&self) -> $t {
                    <$t as Zero>::zero()
                }

                fn upper(&self) -> $t {
                    *self
                }

                fn lower(&self) -> $t {
                    *self
                }

                fn is_uncertain(&self) -> bool {
                    false
                }
            }
        )+
    };
}

exact_numbers!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! exact_quantities {
    ($($v:ty),+ $(,)?) => {
        $(
            impl<D, U> Measure for Quantity<D, U, $v>
            where
                D: Dimension + ?Sized,
                U: Units<$v> + ?Sized,
            {
                type Value = Self;
                type Uncertainty = Self;

                fn nominal(&self) -> Self {
                    *self
                }

                fn uncertainty(&self) -> Self {
                    self.with_magnitude(0.0)
                }

                fn upper(&self) -> Self {
                    *self
                }

                fn lower(&self) -> Self {
                    *self
                }

                fn is_uncertain(&self) -> bool {
                    false
                }
            }
        )+
    };
}

exact_quantities!(f32, f64);

impl<N, U> Measure for Uncertain<N, U>
where
    N: Clone + Add<U, Output = N> + Sub<U, Output = N>,
    U: Clone,
{
    type Value = N;
    type Uncertainty = U;

    fn nominal(&self) -> N {
        Uncertain::nominal(self)
    }

    fn uncertainty(&self) -> U {
        Uncertain::uncertainty(self)
    }

    fn upper(&self) -> N {
        Uncertain::upper(self)
    }

    fn lower(&self) -> N {
        Uncertain::lower(self)
    }

    fn is_uncertain(&self) -> bool {
        true
    }
}

impl<N, U> Measure for Tracked<N, U>
where
    N: Clone + Add<U, Output = N> + Sub<U, Output = N>,
    U: Clone,
{
    type Value = N;
    type Uncertainty = U;

    fn nominal(&self) -> N {
        self.as_uncertain().nominal()
    }

    fn uncertainty(&self) -> U {
        self.as_uncertain().uncertainty()
    }

    fn upper(&self) -> N {
        self.as_uncertain().upper()
    }

    fn lower(&self) -> N {
        self.as_uncertain().lower()
    }

    fn is_uncertain(&self) -> bool {
        true
    }

    fn identity(&self) -> Option<VariableId> {
        self.id()
    }
}

impl<T: Measure + ?Sized> Measure for &T {
    type Value = T::Value;
    type Uncertainty = T::Uncertainty;

    fn nominal(&self) -> T::Value {
        (**self).nominal()
    }

    fn uncertainty(&self) -> T::Uncertainty {
        (**self).uncertainty()
    }

    fn upper(&self) -> T::Value {
        (**self).upper()
    }

    fn lower(&self) -> T::Value {
        (**self).lower()
    }

    fn is_uncertain(&self) -> bool {
        (**self).is_uncertain()
    }

    fn identity(&self) -> Option<VariableId> {
        (**self).identity()
    }
}

/// Returns the nominal value of `x`, or `x` itself if it is exact.
pub fn nominal_of<M: Measure + ?Sized>(x: &M) -> M::Value {
    x.nominal()
}

/// Returns the uncertainty of `x`, or zero if it is exact.
pub fn uncertainty_of<M: Measure + ?Sized>(x: &M) -> M::Uncertainty {
    x.uncertainty()
}

/// Returns the upper bound of `x`, or `x` itself if it is exact.
pub fn upper_of<M: Measure + ?Sized>(x: &M) -> M::Value {
    x.upper()
}

/// Returns the lower bound of `x`, or `x` itself if it is exact.
pub fn lower_of<M: Measure + ?Sized>(x: &M) -> M::Value {
    x.lower()
}

pub fn is_uncertain<M: Measure + ?Sized>(x: &M) -> bool {
    x.is_uncertain()
}

/// Returns the tracking identity of `x`, or `None` for untracked values.
pub fn identity_of<M: Measure + ?Sized>(x: &M) -> Option<VariableId> {
    x.identity()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::Length,
        length::{centimeter, meter},
    };

    #[test]
    fn plain_numbers_are_exact() {
        let x = 10.0;

        assert!(!is_uncertain(&x));
        assert!(!is_uncertain(&1));
        assert_relative_eq!(nominal_of(&x), 10.0);
        assert_relative_eq!(uncertainty_of(&x), 0.0);
        assert_relative_eq!(upper_of(&x), 10.0);
        assert_relative_eq!(lower_of(&x), 10.0);

        assert_eq!(nominal_of(&1), 1);
        assert_eq!(uncertainty_of(&1), 0);
        assert_eq!(upper_of(&1), 1);
        assert_eq!(lower_of(&1), 1);
        assert_eq!(identity_of(&1), None);
    }

    #[test]
    fn uncertain_values_expose_their_bounds() {
        let y = Uncertain::new(20.0, 2.0).unwrap();

        assert!(is_uncertain(&y));
        assert_relative_eq!(nominal_of(&y), 20.0);
        assert_relative_eq!(uncertainty_of(&y), 2.0);
        assert_relative_eq!(upper_of(&y), 22.0);
        assert_relative_eq!(lower_of(&y), 18.0);
        assert_eq!(identity_of(&y), None);

        let zero = Uncertain::<f64>::exact(3.0);
        assert!(is_uncertain(&zero), "capability, not magnitude, decides");
    }

    #[test]
    fn quantities_are_exact() {
        let length = Length::new::<centimeter>(150.0);

        assert!(!is_uncertain(&length));
        assert_relative_eq!(nominal_of(&length).get::<meter>(), 1.5);
        assert_relative_eq!(uncertainty_of(&length).get::<meter>(), 0.0);
        assert_relative_eq!(upper_of(&length).get::<meter>(), 1.5);
    }

    #[test]
    fn tracked_values_report_identity() {
        let x = Tracked::new(Uncertain::new(3.0, 0.1).unwrap());

        assert!(is_uncertain(&x));
        assert_eq!(identity_of(&x), x.id());
        assert!(identity_of(&x).is_some());
        assert_relative_eq!(upper_of(&x), 3.1);

        // References forward to the value they point at.
        assert_eq!(identity_of(&&x), x.id());
    }
}
