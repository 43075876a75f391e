//! One-time cached results.

use std::fmt;
use std::sync::OnceLock;

use crate::error::Result;

/// Holds the first result of an initializer, success or error.
///
/// Every later call replays the cached result without running the
/// initializer again. Concurrent first calls are serialized; exactly one
/// initializer runs.
///
/// ```
/// use std::cell::Cell;
/// use ghx::factory::Memo;
///
/// let calls = Cell::new(0);
/// let memo: Memo<u32> = Memo::new();
///
/// for _ in 0..3 {
///     let value = memo.get_or_init(|| {
///         calls.set(calls.get() + 1);
///         Ok(42)
///     });
///     assert_eq!(value.unwrap(), 42);
/// }
/// assert_eq!(calls.get(), 1);
/// ```
pub struct Memo<T> {
    cell: OnceLock<Result<T>>,
}

impl<T: Clone> Memo<T> {
    /// An empty holder.
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// The cached result, running `init` on first use.
    pub fn get_or_init<F>(&self, init: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        self.cell.get_or_init(init).clone()
    }

    /// Whether the initializer has run.
    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T: Clone> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.cell.get() {
            None => "pending",
            Some(Ok(_)) => "ok",
            Some(Err(_)) => "err",
        };
        f.debug_struct("Memo").field("state", &state).finish()
    }
}
