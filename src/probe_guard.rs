//! Debug-only guard around bucket probes.
//!
//! A dictionary calls user code (`KeyHash::hash_code`, `Eq::eq`) while its
//! bucket chains are being scanned or rebuilt. If that code reaches back into
//! the same dictionary the table may be observed mid-rebalance, so debug
//! builds panic on nested entry. Release builds compile the guard away.

use core::cell::Cell;
use core::marker::PhantomData;

/// Per-dictionary probe tracker. Public entry points start with
/// `let _probe = self.probe.enter("operation");`.
#[derive(Debug)]
pub(crate) struct ProbeGuard {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // Dictionaries are single-threaded; keep the guard !Send + !Sync.
    _single_thread: PhantomData<*mut ()>,
}

impl ProbeGuard {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _single_thread: PhantomData,
        }
    }

    /// Mark the start of `operation`. Debug builds panic if another
    /// operation on the same dictionary has not finished.
    #[inline]
    pub(crate) fn enter(&self, operation: &'static str) -> Probe<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!(
                    "dictionary re-entered by `{operation}` while `{outer}` was probing buckets"
                );
            }
            self.active.set(Some(operation));
            return Probe { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = operation;
            return Probe {
                _owner: PhantomData,
            };
        }
    }
}

impl Default for ProbeGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII marker returned by [`ProbeGuard::enter`].
pub(crate) struct Probe<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ProbeGuard,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        self.owner.active.set(None);
    }
}
