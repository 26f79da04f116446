use std::{
    collections::{BTreeMap, btree_map::Entry},
    sync::{LazyLock, Mutex, MutexGuard, PoisonError},
};

use errbar_core::{Measure, VariableId};
use num_traits::{One, Zero};
use tracing::trace;

use super::{CorrelationError, check_coefficient};

static GLOBAL_STORE: LazyLock<Mutex<CorrelationStore>> =
    LazyLock::new(|| Mutex::new(CorrelationStore::new()));

/// Locks and returns the process-wide correlation store.
///
/// The store is created on first access and lives for the rest of the
/// process. Entries are never evicted; use [`CorrelationStore::forget`] to
/// drop the entries of variables that are no longer needed.
///
/// The guard holds a lock: do not call `global_store` again, directly or from
/// a propagated function, while a guard is alive.
pub fn global_store() -> MutexGuard<'static, CorrelationStore> {
    GLOBAL_STORE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Correlation coefficients between tracked variables, keyed by identity.
///
/// Keys are unordered pairs: `(a, b)` and `(b, a)` name the same entry. A
/// variable is always fully correlated with itself, so self-pairs are never
/// stored and always read as one.
///
/// Two lookups are offered:
///
/// - [`get`](Self::get) and [`get_with_ids`](Self::get_with_ids) read a
///   missing entry as zero (uncorrelated); propagation uses these.
/// - [`require`](Self::require) and [`require_with_ids`](Self::require_with_ids)
///   fail with [`CorrelationError::MissingEntry`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationStore<T = f64> {
    entries: BTreeMap<(VariableId, VariableId), T>,
}

impl<T> Default for CorrelationStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CorrelationStore<T> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns the number of stored pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no pairs are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry involving `id` and returns how many were removed.
    pub fn forget(&mut self, id: VariableId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|&(a, b), _| a != id && b != id);
        before - self.entries.len()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over stored pairs in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, VariableId, &T)> {
        self.entries.iter().map(|(&(a, b), value)| (a, b, value))
    }
}

impl<T: Copy + Into<f64>> CorrelationStore<T> {
    /// Adds an entry for the pair `(a, b)`.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::DuplicateEntry`] if the pair already has an
    /// entry, in either order, [`CorrelationError::SelfCorrelation`] if
    /// `a == b`, and [`CorrelationError::InvalidCoefficient`] if `value` is
    /// outside `[-1, 1]` or NaN.
    pub fn add_with_ids(&mut self, a: VariableId, b: VariableId, value: T) -> Result<(), CorrelationError> {
        let key = key(a, b)?;
        check_coefficient(value.into())?;
        match self.entries.entry(key) {
            Entry::Occupied(_) => Err(CorrelationError::DuplicateEntry {
                first: a,
                second: b,
            }),
            Entry::Vacant(entry) => {
                trace!(%a, %b, "adding correlation entry");
                entry.insert(value);
                Ok(())
            }
        }
    }

    /// Sets the entry for the pair `(a, b)`, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::SelfCorrelation`] if `a == b` and
    /// [`CorrelationError::InvalidCoefficient`] if `value` is outside
    /// `[-1, 1]` or NaN.
    pub fn set_with_ids(&mut self, a: VariableId, b: VariableId, value: T) -> Result<Option<T>, CorrelationError> {
        let key = key(a, b)?;
        check_coefficient(value.into())?;
        trace!(%a, %b, "setting correlation entry");
        Ok(self.entries.insert(key, value))
    }

    /// Adds an entry for two tracked values.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::Untracked`] if either value has no identity,
    /// otherwise as [`add_with_ids`](Self::add_with_ids).
    pub fn add<A, B>(&mut self, a: &A, b: &B, value: T) -> Result<(), CorrelationError>
    where
        A: Measure + ?Sized,
        B: Measure + ?Sized,
    {
        let (a, b) = identities(a, b)?;
        self.add_with_ids(a, b, value)
    }

    /// Sets the entry for two tracked values, returning the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::Untracked`] if either value has no identity,
    /// otherwise as [`set_with_ids`](Self::set_with_ids).
    pub fn set<A, B>(&mut self, a: &A, b: &B, value: T) -> Result<Option<T>, CorrelationError>
    where
        A: Measure + ?Sized,
        B: Measure + ?Sized,
    {
        let (a, b) = identities(a, b)?;
        self.set_with_ids(a, b, value)
    }
}

impl<T: Copy + Zero + One> CorrelationStore<T> {
    /// Returns the coefficient for `(a, b)`, or zero if there is no entry.
    #[must_use]
    pub fn get_with_ids(&self, a: VariableId, b: VariableId) -> T {
        match key(a, b) {
            Ok(key) => self.entries.get(&key).copied().unwrap_or_else(T::zero),
            Err(_) => T::one(),
        }
    }

    /// Returns the coefficient for `(a, b)`.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::MissingEntry`] if there is no entry.
    pub fn require_with_ids(&self, a: VariableId, b: VariableId) -> Result<T, CorrelationError> {
        match key(a, b) {
            Ok(key) => self
                .entries
                .get(&key)
                .copied()
                .ok_or(CorrelationError::MissingEntry {
                    first: a,
                    second: b,
                }),
            Err(_) => Ok(T::one()),
        }
    }

    /// Returns the coefficient for two values, or zero if there is no entry.
    ///
    /// Untracked values are uncorrelated with everything.
    pub fn get<A, B>(&self, a: &A, b: &B) -> T
    where
        A: Measure + ?Sized,
        B: Measure + ?Sized,
    {
        match identities(a, b) {
            Ok((a, b)) => self.get_with_ids(a, b),
            Err(_) => T::zero(),
        }
    }

    /// Returns the coefficient for two tracked values.
    ///
    /// # Errors
    ///
    /// Returns [`CorrelationError::Untracked`] if either value has no identity
    /// and [`CorrelationError::MissingEntry`] if there is no entry.
    pub fn require<A, B>(&self, a: &A, b: &B) -> Result<T, CorrelationError>
    where
        A: Measure + ?Sized,
        B: Measure + ?Sized,
    {
        let (a, b) = identities(a, b)?;
        self.require_with_ids(a, b)
    }
}

/// Orders a pair of identities so that both argument orders share a key.
fn key(a: VariableId, b: VariableId) -> Result<(VariableId, VariableId), CorrelationError> {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => Ok((a, b)),
        std::cmp::Ordering::Greater => Ok((b, a)),
        std::cmp::Ordering::Equal => Err(CorrelationError::SelfCorrelation { id: a }),
    }
}

fn identities<A, B>(a: &A, b: &B) -> Result<(VariableId, VariableId), CorrelationError>
where
    A: Measure + ?Sized,
    B: Measure + ?Sized,
{
    match (a.identity(), b.identity()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(CorrelationError::Untracked),
    }
}
