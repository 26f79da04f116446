use errbar_core::{Measure, VariableId};

/// The inputs of one propagation call.
///
/// Implemented for tuples of up to twenty [`Measure`] values, each of which
/// may have its own type, and for `Vec<M>` of any length. The propagator only
/// ever sees inputs through this trait, so its algorithm is written once for
/// every arity.
pub trait Arguments {
    /// The nominal values, in the shape the propagated function accepts.
    type Values;

    /// Returns the number of inputs.
    fn len(&self) -> usize;

    /// Returns `true` if there are no inputs.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every input at its nominal value.
    fn nominals(&self) -> Self::Values;

    /// Returns every input at its nominal value, except input `index` which is
    /// at its upper bound.
    fn perturbed(&self, index: usize) -> Self::Values;

    /// Returns `true` if input `index` carries an uncertainty.
    fn is_uncertain(&self, index: usize) -> bool;

    /// Returns the tracking identity of input `index`, if any.
    fn identity(&self, index: usize) -> Option<VariableId>;
}

/// A function that can be called with the values of some [`Arguments`].
///
/// Closures taking `N` parameters implement `Apply` for `N`-tuples, and
/// closures taking a slice implement it for vectors:
///
/// ```
/// use errbar_propagate::Apply;
///
/// let area = |w: f64, h: f64| w * h;
/// assert_eq!(area.apply((2.0, 3.0)), 6.0);
///
/// let total = |xs: &[f64]| xs.iter().sum::<f64>();
/// assert_eq!(total.apply(vec![1.0, 2.0, 3.0]), 6.0);
/// ```
pub trait Apply<Values> {
    type Output;

    fn apply(&self, values: Values) -> Self::Output;
}

impl<M: Measure> Arguments for Vec<M> {
    type Values = Vec<M::Value>;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn nominals(&self) -> Self::Values {
        self.iter().map(Measure::nominal).collect()
    }

    fn perturbed(&self, index: usize) -> Self::Values {
        self.iter()
            .enumerate()
            .map(|(i, arg)| if i == index { arg.upper() } else { arg.nominal() })
            .collect()
    }

    fn is_uncertain(&self, index: usize) -> bool {
        self.get(index).is_some_and(Measure::is_uncertain)
    }

    fn identity(&self, index: usize) -> Option<VariableId> {
        self.get(index).and_then(Measure::identity)
    }
}

impl<F, V, R> Apply<Vec<V>> for F
where
    F: Fn(&[V]) -> R,
{
    type Output = R;

    fn apply(&self, values: Vec<V>) -> R {
        self(&values)
    }
}

macro_rules! tuple_arguments {
    ($len:literal; $($index:tt => $arg:ident),+) => {
        impl<$($arg: Measure),+> Arguments for ($($arg,)+) {
            type Values = ($(<$arg as Measure>::Value,)+);

            fn len(&self) -> usize {
                $len
            }

            fn nominals(&self) -> Self::Values {
                ($(self.$index.nominal(),)+)
            }

            fn perturbed(&self, index: usize) -> Self::Values {
                ($(
                    if index == $index {
                        self.$index.upper()
                    } else {
                        self.$index.nominal()
                    },
                )+)
            }

            fn is_uncertain(&self, index: usize) -> bool {
                match index {
                    $($index => self.$index.is_uncertain(),)+
                    _ => false,
                }
            }

            fn identity(&self, index: usize) -> Option<VariableId> {
                match index {
                    $($index => self.$index.identity(),)+
                    _ => None,
                }
            }
        }

        impl<Func, Out, $($arg),+> Apply<($($arg,)+)> for Func
        where
            Func: Fn($($arg),+) -> Out,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn apply(&self, ($($arg,)+): ($($arg,)+)) -> Out {
                self($($arg),+)
            }
        }
    };
}

tuple_arguments!(1; 0 => A0);
tuple_arguments!(2; 0 => A0, 1 => A1);
tuple_arguments!(3; 0 => A0, 1 => A1, 2 => A2);
tuple_arguments!(4; 0 => A0, 1 => A1, 2 => A2, 3 => A3);
tuple_arguments!(5; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4);
tuple_arguments!(6; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5);
tuple_arguments!(7; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6);
tuple_arguments!(8; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7);
tuple_arguments!(9; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8);
tuple_arguments!(10; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9);
tuple_arguments!(11; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10);
tuple_arguments!(12; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11);
tuple_arguments!(13; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12);
tuple_arguments!(14; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13);
tuple_arguments!(15; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14);
tuple_arguments!(16; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14, 15 => A15);
tuple_arguments!(17; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14, 15 => A15, 16 => A16);
tuple_arguments!(18; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14, 15 => A15, 16 => A16, 17 => A17);
tuple_arguments!(19; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14, 15 => A15, 16 => A16, 17 => A17, 18 => A18);
tuple_arguments!(20; 0 => A0, 1 => A1, 2 => A2, 3 => A3, 4 => A4, 5 => A5, 6 => A6, 7 => A7, 8 => A8, 9 => A9, 10 => A10, 11 => A11, 12 => A12, 13 => A13, 14 => A14, 15 => A15, 16 => A16, 17 => A17, 18 => A18, 19 => A19);

#[cfg(test)]
mod tests {
    use super::*;

    use errbar_core::{Tracked, Uncertain};

    #[test]
    fn heterogeneous_tuple() {
        let x = Uncertain::new(2.0, 0.5).unwrap();
        let args = (x, 3_i32, Uncertain::new(1.0_f32, 0.25).unwrap());

        assert_eq!(args.len(), 3);
        assert_eq!(args.nominals(), (2.0, 3, 1.0));
        assert_eq!(args.perturbed(0), (2.5, 3, 1.0));
        assert_eq!(args.perturbed(1), (2.0, 3, 1.0));
        assert_eq!(args.perturbed(2), (2.0, 3, 1.25));

        assert!(args.is_uncertain(0));
        assert!(!args.is_uncertain(1));
        assert!(args.is_uncertain(2));
        assert!(!args.is_uncertain(3));
    }

    #[test]
    fn identities_follow_tracked_inputs() {
        let x = Tracked::new(Uncertain::new(1.0, 0.1).unwrap());
        let args = (&x, 2.0);

        assert_eq!(args.identity(0), x.id());
        assert_eq!(args.identity(1), None);
        assert_eq!(args.identity(7), None);
    }

    #[test]
    fn vector_of_inputs() {
        let args = vec![
            Uncertain::new(1.0, 0.1).unwrap(),
            Uncertain::new(2.0, 0.2).unwrap(),
        ];

        assert_eq!(Arguments::len(&args), 2);
        assert_eq!(args.nominals(), vec![1.0, 2.0]);
        assert_eq!(args.perturbed(1), vec![1.0, 2.2]);
        assert!(Arguments::is_uncertain(&args, 1));
        assert!(!Arguments::is_uncertain(&args, 2));
    }

    #[test]
    fn closures_apply_to_tuples() {
        let f = |a: f64, b: i32, c: f32| a * f64::from(b) + f64::from(c);
        assert_eq!(f.apply((2.0, 3, 1.0)), 7.0);
    }
}
