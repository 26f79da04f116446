use std::{marker::PhantomData, ops::Sub};

use uom::si::{Dimension, Quantity, Units};

/// A value with a linear magnitude expressible as an `f64`.
///
/// The magnitude is measured in the type's canonical unit: the value itself
/// for plain floats, and the SI base unit for [`uom`] quantities. Two values
/// of the same type can therefore be compared, summed, and scaled through
/// their magnitudes regardless of the display units they were created with.
///
/// New values are always built from an existing one with
/// [`with_magnitude`](Magnitude::with_magnitude). Some types (offset scales,
/// for example) have no meaningful literal zero, so a template value carries
/// whatever the type needs besides the number.
///
/// [`uom`]: https://docs.rs/uom/
pub trait Magnitude: Copy {
    /// Returns the magnitude in canonical units.
    fn magnitude(&self) -> f64;

    /// Returns a value of the same type with the given canonical magnitude.
    #[must_use]
    fn with_magnitude(&self, magnitude: f64) -> Self;
}

impl Magnitude for f64 {
    fn magnitude(&self) -> f64 {
        *self
    }

    fn with_magnitude(&self, magnitude: f64) -> Self {
        magnitude
    }
}

impl Magnitude for f32 {
    fn magnitude(&self) -> f64 {
        f64::from(*self)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn with_magnitude(&self, magnitude: f64) -> Self {
        magnitude as f32
    }
}

impl<D, U> Magnitude for Quantity<D, U, f64>
where
    D: Dimension + ?Sized,
    U: Units<f64> + ?Sized,
{
    fn magnitude(&self) -> f64 {
        self.value
    }

    fn with_magnitude(&self, magnitude: f64) -> Self {
        Quantity {
            dimension: PhantomData,
            units: PhantomData,
            value: magnitude,
        }
    }
}

impl<D, U> Magnitude for Quantity<D, U, f32>
where
    D: Dimension + ?Sized,
    U: Units<f32> + ?Sized,
{
    fn magnitude(&self) -> f64 {
        f64::from(self.value)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn with_magnitude(&self, magnitude: f64) -> Self {
        Quantity {
            dimension: PhantomData,
            units: PhantomData,
            value: magnitude as f32,
        }
    }
}

/// The signed change between two values of a type.
///
/// For most types the change has the same type as the values, but not for
/// all of them: the difference of two absolute temperatures is a temperature
/// interval, and the difference of two instants is a duration. The change
/// type is whatever `Self - Self` produces, as long as it has a [`Magnitude`].
pub trait Displacement {
    type Delta: Magnitude;

    /// Returns `self - origin`.
    fn displacement_from(&self, origin: &Self) -> Self::Delta;
}

impl<T, D> Displacement for T
where
    T: Clone + Sub<Output = D>,
    D: Magnitude,
{
    type Delta = D;

    fn displacement_from(&self, origin: &Self) -> D {
        self.clone() - origin.clone()
    }
}
