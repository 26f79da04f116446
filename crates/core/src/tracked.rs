use std::{
    fmt,
    num::NonZeroU64,
    ops::Deref,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::Uncertain;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A process-unique identity for a tracked variable.
///
/// Identities are minted from a global atomic counter, so they are unique
/// across threads. Untracked values have no identity at all (`None` wherever
/// an `Option<VariableId>` is expected).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(NonZeroU64);

impl VariableId {
    /// Returns a fresh identity, greater than every identity minted before it.
    #[must_use]
    pub fn next() -> Self {
        let raw = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        // The counter starts at one; wrapping would take 2^64 allocations.
        Self(NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN))
    }

    /// Returns the raw identity.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An uncertain value that carries an identity for correlation tracking.
///
/// Cloning keeps the identity: a copy of a variable is the same variable and
/// is fully correlated with the original. Call [`new_id`](Tracked::new_id) to
/// make a copy independent.
#[derive(Debug, Clone, PartialEq)]
pub struct Tracked<N, U = N> {
    value: Uncertain<N, U>,
    id: Option<VariableId>,
}

impl<N, U> Tracked<N, U> {
    /// Wraps a value with a fresh identity.
    pub fn new(value: Uncertain<N, U>) -> Self {
        Self {
            value,
            id: Some(VariableId::next()),
        }
    }

    /// Wraps a value under an existing identity.
    pub fn with_id(value: Uncertain<N, U>, id: VariableId) -> Self {
        Self {
            value,
            id: Some(id),
        }
    }

    /// Returns the identity, or `None` once it has been cleared.
    pub fn id(&self) -> Option<VariableId> {
        self.id
    }

    /// Assigns a fresh identity.
    pub fn new_id(&mut self) {
        self.id = Some(VariableId::next());
    }

    /// Removes the identity, turning the value into an untracked one.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Returns the wrapped value.
    pub fn as_uncertain(&self) -> &Uncertain<N, U> {
        &self.value
    }

    /// Consumes the wrapper and returns the wrapped value.
    pub fn into_inner(self) -> Uncertain<N, U> {
        self.value
    }
}

impl<N, U> From<Uncertain<N, U>> for Tracked<N, U> {
    fn from(value: Uncertain<N, U>) -> Self {
        Self::new(value)
    }
}

impl<N, U> Deref for Tracked<N, U> {
    type Target = Uncertain<N, U>;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<N: fmt::Display, U: fmt::Display> fmt::Display for Tracked<N, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}
