use std::{any::type_name, convert::Infallible};

use errbar_core::{Displacement, Magnitude, Tracked, Uncertain, VariableId};
use tracing::{debug, trace, warn};

use crate::{
    Apply, Arguments, Config, Correlated, PropagationError,
    correlation::{Correlation, CorrelationMatrix, CorrelationStore, Independent, StoreLookup, global_store},
};

/// The result of propagating uncertainty through a function returning `R`.
///
/// The uncertainty has the type of a difference of two results, which is `R`
/// itself for most types.
pub type Propagated<R> = Uncertain<R, <R as Displacement>::Delta>;

/// Propagates uncertainty through functions by finite differences.
///
/// For a function `f` of `n` inputs, the propagator evaluates `f` once at the
/// nominal values and once more per uncertain input, with that input moved to
/// its upper bound. Each difference from the nominal result is the deviation
/// `d_k` of input `k`, and the deviations are combined as
///
/// ```text
/// u = sqrt( sum_k d_k^2 + 2 sum_{i<j} c_ij d_i d_j )
/// ```
///
/// where `c_ij` comes from the correlation source of the call. Exact inputs are
/// never perturbed and contribute nothing.
///
/// The free functions of this crate ([`propagate`], [`propagate_with_matrix`],
/// and the rest) use `Propagator::default()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Propagator {
    config: Config,
}

/// Nominal result and per-input deviations, before combination.
struct Sweep<R: Displacement> {
    nominal: R,
    zero: R::Delta,
    deviations: Vec<f64>,
}

impl<R: Displacement> Sweep<R> {
    fn into_uncertain(self, total: f64) -> Propagated<R> {
        Uncertain::new_unchecked(self.nominal, self.zero.with_magnitude(total))
    }
}

/// Combined uncertainty and each input's share of it.
struct Combined {
    total: f64,
    /// `d_k + sum_{j != k} c_kj d_j` for each input `k`.
    spread: Vec<f64>,
}

impl Combined {
    /// Returns the correlation between the result and each input.
    ///
    /// Returns `None` if the total is zero, where correlation is undefined.
    fn coefficients(&self) -> Option<Vec<f64>> {
        if self.total == 0.0 {
            return None;
        }
        Some(
            self.spread
                .iter()
                .map(|s| (s / self.total).clamp(-1.0, 1.0))
                .collect(),
        )
    }
}

impl Propagator {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> Config {
        self.config
    }

    /// Propagates uncertainty through `f`, treating all inputs as independent.
    pub fn propagate<A, F>(&self, f: F, args: A) -> Propagated<F::Output>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let Ok(sweep) = sweep(&args, |values| Ok::<_, Infallible>(f.apply(values)));
        let combined = self.combine(&sweep.deviations, &Independent);
        sweep.into_uncertain(combined.total)
    }

    /// Propagates uncertainty through `f` with input correlations from a matrix.
    ///
    /// Entry `(i, j)` of `matrix` is the correlation between inputs `i` and `j`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::DimensionMismatch`] if the matrix size is not
    /// the number of inputs.
    pub fn propagate_with_matrix<A, F>(
        &self,
        f: F,
        matrix: &CorrelationMatrix,
        args: A,
    ) -> Result<Propagated<F::Output>, PropagationError>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let (sweep, combined) =
            self.estimate(&args, matrix, |values| Ok::<_, Infallible>(f.apply(values)))?;
        Ok(sweep.into_uncertain(combined.total))
    }

    /// Propagates uncertainty through `f` with correlations from a store.
    ///
    /// Correlations between tracked inputs are read from `store`; untracked
    /// inputs are independent of everything. The result gets a fresh identity,
    /// and its correlation with every tracked input is written back to `store`
    /// so later calls see it. Nothing is written if the result has zero
    /// uncertainty.
    pub fn propagate_with_store<A, F>(
        &self,
        f: F,
        store: &mut CorrelationStore,
        args: A,
    ) -> Tracked<F::Output, <F::Output as Displacement>::Delta>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let Ok(sweep) = sweep(&args, |values| Ok::<_, Infallible>(f.apply(values)));
        self.track(store, &args, sweep)
    }

    /// Same as [`propagate_with_store`](Self::propagate_with_store), using the
    /// process-wide store from [`global_store`].
    ///
    /// The store is locked only after every evaluation of `f`, so `f` may
    /// itself use the global store.
    pub fn propagate_tracked<A, F>(
        &self,
        f: F,
        args: A,
    ) -> Tracked<F::Output, <F::Output as Displacement>::Delta>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let Ok(sweep) = sweep(&args, |values| Ok::<_, Infallible>(f.apply(values)));
        self.track(&mut global_store(), &args, sweep)
    }

    /// Propagates uncertainty through `f` and returns the correlation between
    /// the result and each input, treating all inputs as independent.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::ZeroUncertainty`] if the result has zero
    /// uncertainty.
    pub fn propagate_and_correlate<A, F>(
        &self,
        f: F,
        args: A,
    ) -> Result<Correlated<F::Output, <F::Output as Displacement>::Delta>, PropagationError>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let (sweep, combined) =
            self.estimate(&args, &Independent, |values| Ok::<_, Infallible>(f.apply(values)))?;
        correlate(sweep, &combined)
    }

    /// Propagates uncertainty through `f` with input correlations from a
    /// matrix, and returns the correlation between the result and each input.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::DimensionMismatch`] if the matrix size is not
    /// the number of inputs, and [`PropagationError::ZeroUncertainty`] if the
    /// result has zero uncertainty.
    pub fn propagate_and_correlate_with_matrix<A, F>(
        &self,
        f: F,
        matrix: &CorrelationMatrix,
        args: A,
    ) -> Result<Correlated<F::Output, <F::Output as Displacement>::Delta>, PropagationError>
    where
        A: Arguments,
        F: Apply<A::Values>,
        F::Output: Displacement,
    {
        let (sweep, combined) =
            self.estimate(&args, matrix, |values| Ok::<_, Infallible>(f.apply(values)))?;
        correlate(sweep, &combined)
    }

    /// Propagates uncertainty through a fallible function.
    ///
    /// Pass [`Independent`] for uncorrelated inputs or a `&CorrelationMatrix`.
    /// The first failed evaluation ends the call.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::DimensionMismatch`] if `correlation` has a
    /// size other than the number of inputs, and [`PropagationError::Function`]
    /// if any evaluation of `f` fails.
    pub fn try_propagate<A, F, C, R, E>(
        &self,
        f: F,
        correlation: C,
        args: A,
    ) -> Result<Propagated<R>, PropagationError<E>>
    where
        A: Arguments,
        F: Apply<A::Values, Output = Result<R, E>>,
        C: Correlation,
        R: Displacement,
    {
        let (sweep, combined) = self.estimate(&args, &correlation, |values| f.apply(values))?;
        Ok(sweep.into_uncertain(combined.total))
    }

    /// Propagates uncertainty through a fallible function and returns the
    /// correlation between the result and each input.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`try_propagate`](Self::try_propagate), and
    /// [`PropagationError::ZeroUncertainty`] if the result has zero uncertainty.
    pub fn try_propagate_and_correlate<A, F, C, R, E>(
        &self,
        f: F,
        correlation: C,
        args: A,
    ) -> Result<Correlated<R, R::Delta>, PropagationError<E>>
    where
        A: Arguments,
        F: Apply<A::Values, Output = Result<R, E>>,
        C: Correlation,
        R: Displacement,
    {
        let (sweep, combined) = self.estimate(&args, &correlation, |values| f.apply(values))?;
        correlate(sweep, &combined)
    }

    /// Fallible form of [`propagate_with_store`](Self::propagate_with_store).
    ///
    /// The store is left untouched if any evaluation fails.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Function`] if any evaluation of `f` fails.
    pub fn try_propagate_with_store<A, F, R, E>(
        &self,
        f: F,
        store: &mut CorrelationStore,
        args: A,
    ) -> Result<Tracked<R, R::Delta>, PropagationError<E>>
    where
        A: Arguments,
        F: Apply<A::Values, Output = Result<R, E>>,
        R: Displacement,
    {
        let sweep = sweep(&args, |values| f.apply(values)).map_err(PropagationError::Function)?;
        Ok(self.track(store, &args, sweep))
    }

    /// Fallible form of [`propagate_tracked`](Self::propagate_tracked).
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Function`] if any evaluation of `f` fails.
    pub fn try_propagate_tracked<A, F, R, E>(
        &self,
        f: F,
        args: A,
    ) -> Result<Tracked<R, R::Delta>, PropagationError<E>>
    where
        A: Arguments,
        F: Apply<A::Values, Output = Result<R, E>>,
        R: Displacement,
    {
        let sweep = sweep(&args, |values| f.apply(values)).map_err(PropagationError::Function)?;
        Ok(self.track(&mut global_store(), &args, sweep))
    }

    /// Checks the correlation size, evaluates, and combines.
    fn estimate<A, C, R, E>(
        &self,
        args: &A,
        correlation: &C,
        eval: impl Fn(A::Values) -> Result<R, E>,
    ) -> Result<(Sweep<R>, Combined), PropagationError<E>>
    where
        A: Arguments,
        C: Correlation + ?Sized,
        R: Displacement,
    {
        check_dimension(correlation, args.len())?;
        let sweep = sweep(args, eval).map_err(PropagationError::Function)?;
        let combined = self.combine(&sweep.deviations, correlation);
        Ok((sweep, combined))
    }

    /// Combines deviations into a total uncertainty.
    fn combine<C: Correlation + ?Sized>(&self, deviations: &[f64], correlation: &C) -> Combined {
        let spread: Vec<f64> = deviations
            .iter()
            .enumerate()
            .map(|(k, &d_k)| {
                deviations
                    .iter()
                    .enumerate()
                    .filter(|&(j, &d_j)| j != k && d_j != 0.0)
                    .fold(d_k, |s, (j, &d_j)| s + correlation.coefficient(k, j) * d_j)
            })
            .collect();

        let variance: f64 = deviations.iter().zip(&spread).map(|(d, s)| d * s).sum();
        let largest = deviations.iter().fold(0.0_f64, |max, d| max.max(d * d));

        // Round-off can leave a variance slightly on either side of zero.
        let band = self.config.zero_tolerance() * largest;
        let total = if variance.abs() <= band {
            0.0
        } else {
            if variance < 0.0 {
                warn!(variance, "negative variance, correlations are inconsistent");
            }
            variance.sqrt()
        };

        debug!(
            inputs = deviations.len(),
            uncertainty = total,
            correlation = type_name::<C>(),
            "propagated uncertainty"
        );

        Combined { total, spread }
    }

    /// Combines a sweep against `store`, then records the result's correlations.
    fn track<A, R>(
        &self,
        store: &mut CorrelationStore,
        args: &A,
        sweep: Sweep<R>,
    ) -> Tracked<R, R::Delta>
    where
        A: Arguments,
        R: Displacement,
    {
        let ids = (0..args.len()).map(|index| args.identity(index)).collect();
        let combined = self.combine(&sweep.deviations, &StoreLookup::new(store, ids));

        let id = VariableId::next();
        if let Some(coefficients) = combined.coefficients() {
            for (index, coefficient) in coefficients.into_iter().enumerate() {
                let Some(input) = args.identity(index) else {
                    continue;
                };
                if let Err(error) = store.set_with_ids(input, id, coefficient) {
                    warn!(%error, %input, result = %id, "skipped correlation entry");
                }
            }
        }

        Tracked::with_id(sweep.into_uncertain(combined.total), id)
    }
}

/// Evaluates at the nominal point and once per uncertain input.
fn sweep<A, R, E>(args: &A, eval: impl Fn(A::Values) -> Result<R, E>) -> Result<Sweep<R>, E>
where
    A: Arguments,
    R: Displacement,
{
    let nominal = eval(args.nominals())?;
    let zero = nominal.displacement_from(&nominal);

    let mut deviations = Vec::with_capacity(args.len());
    for index in 0..args.len() {
        let deviation = if args.is_uncertain(index) {
            eval(args.perturbed(index))?.displacement_from(&nominal).magnitude()
        } else {
            zero.magnitude()
        };
        trace!(index, deviation, "evaluated input");
        deviations.push(deviation);
    }

    Ok(Sweep {
        nominal,
        zero,
        deviations,
    })
}

fn correlate<R, E>(sweep: Sweep<R>, combined: &Combined) -> Result<Correlated<R, R::Delta>, PropagationError<E>>
where
    R: Displacement,
{
    let coefficients = combined
        .coefficients()
        .ok_or(PropagationError::ZeroUncertainty)?;
    Ok(Correlated::new(sweep.into_uncertain(combined.total), coefficients))
}

fn check_dimension<C, E>(correlation: &C, inputs: usize) -> Result<(), PropagationError<E>>
where
    C: Correlation + ?Sized,
{
    match correlation.dimension() {
        Some(matrix) if matrix != inputs => {
            Err(PropagationError::DimensionMismatch { matrix, inputs })
        }
        _ => Ok(()),
    }
}

/// Propagates uncertainty through `f`, treating all inputs as independent.
///
/// Inputs are a tuple of up to twenty values, each a plain number, a `uom`
/// quantity, or an uncertain value, or a `Vec` of one such type. Closure
/// parameter types must be written out.
///
/// # Examples
///
/// ```
/// use errbar_core::Uncertain;
/// use errbar_propagate::propagate;
///
/// let x = Uncertain::new(1.0, 0.1).unwrap();
/// let y = Uncertain::new(2.0, 0.2).unwrap();
///
/// let sum = propagate(|x: f64, y: f64| x + y, (x, y));
/// assert!((sum.nominal() - 3.0).abs() < 1e-12);
/// assert!((sum.uncertainty() - 0.05_f64.sqrt()).abs() < 1e-12);
///
/// // Plain numbers are exact.
/// let scaled = propagate(|x: f64, k: f64| k * x, (x, 3.0));
/// assert!((scaled.uncertainty() - 0.3).abs() < 1e-12);
/// ```
pub fn propagate<A, F>(f: F, args: A) -> Propagated<F::Output>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate(f, args)
}

/// Propagates uncertainty through `f` with input correlations from a matrix.
///
/// # Errors
///
/// See [`Propagator::propagate_with_matrix`].
pub fn propagate_with_matrix<A, F>(
    f: F,
    matrix: &CorrelationMatrix,
    args: A,
) -> Result<Propagated<F::Output>, PropagationError>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate_with_matrix(f, matrix, args)
}

/// Propagates uncertainty through `f` with correlations from a store.
///
/// See [`Propagator::propagate_with_store`].
pub fn propagate_with_store<A, F>(
    f: F,
    store: &mut CorrelationStore,
    args: A,
) -> Tracked<F::Output, <F::Output as Displacement>::Delta>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate_with_store(f, store, args)
}

/// Propagates uncertainty through `f` with correlations from the global store.
///
/// See [`Propagator::propagate_tracked`].
pub fn propagate_tracked<A, F>(f: F, args: A) -> Tracked<F::Output, <F::Output as Displacement>::Delta>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate_tracked(f, args)
}

/// Propagates uncertainty through `f` and correlates the result with each input.
///
/// # Errors
///
/// See [`Propagator::propagate_and_correlate`].
pub fn propagate_and_correlate<A, F>(
    f: F,
    args: A,
) -> Result<Correlated<F::Output, <F::Output as Displacement>::Delta>, PropagationError>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate_and_correlate(f, args)
}

/// Propagates uncertainty through `f` with input correlations from a matrix,
/// and correlates the result with each input.
///
/// # Errors
///
/// See [`Propagator::propagate_and_correlate_with_matrix`].
pub fn propagate_and_correlate_with_matrix<A, F>(
    f: F,
    matrix: &CorrelationMatrix,
    args: A,
) -> Result<Correlated<F::Output, <F::Output as Displacement>::Delta>, PropagationError>
where
    A: Arguments,
    F: Apply<A::Values>,
    F::Output: Displacement,
{
    Propagator::default().propagate_and_correlate_with_matrix(f, matrix, args)
}

/// Propagates uncertainty through a fallible function.
///
/// # Errors
///
/// See [`Propagator::try_propagate`].
pub fn try_propagate<A, F, C, R, E>(
    f: F,
    correlation: C,
    args: A,
) -> Result<Propagated<R>, PropagationError<E>>
where
    A: Arguments,
    F: Apply<A::Values, Output = Result<R, E>>,
    C: Correlation,
    R: Displacement,
{
    Propagator::default().try_propagate(f, correlation, args)
}

/// Propagates uncertainty through a fallible function and correlates the
/// result with each input.
///
/// # Errors
///
/// See [`Propagator::try_propagate_and_correlate`].
pub fn try_propagate_and_correlate<A, F, C, R, E>(
    f: F,
    correlation: C,
    args: A,
) -> Result<Correlated<R, R::Delta>, PropagationError<E>>
where
    A: Arguments,
    F: Apply<A::Values, Output = Result<R, E>>,
    C: Correlation,
    R: Displacement,
{
    Propagator::default().try_propagate_and_correlate(f, correlation, args)
}

/// Propagates uncertainty through a fallible function with correlations from
/// a store.
///
/// # Errors
///
/// See [`Propagator::try_propagate_with_store`].
pub fn try_propagate_with_store<A, F, R, E>(
    f: F,
    store: &mut CorrelationStore,
    args: A,
) -> Result<Tracked<R, R::Delta>, PropagationError<E>>
where
    A: Arguments,
    F: Apply<A::Values, Output = Result<R, E>>,
    R: Displacement,
{
    Propagator::default().try_propagate_with_store(f, store, args)
}

/// Propagates uncertainty through a fallible function with correlations from
/// the global store.
///
/// # Errors
///
/// See [`Propagator::try_propagate_tracked`].
pub fn try_propagate_tracked<A, F, R, E>(
    f: F,
    args: A,
) -> Result<Tracked<R, R::Delta>, PropagationError<E>>
where
    A: Arguments,
    F: Apply<A::Values, Output = Result<R, E>>,
    R: Displacement,
{
    Propagator::default().try_propagate_tracked(f, args)
}
