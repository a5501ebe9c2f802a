//! Observer types for the store.
//!
//! An Observer is a callback that receives the `(previous, next)` snapshot
//! pair after every update of the store it is registered on.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for one observer registration.
///
/// Each call to `subscribe` gets a fresh ID, even when the same observer is
/// registered more than once. Cancel handles refer to registrations by ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique registration ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

/// A shared change callback for snapshots of type `S`.
///
/// Cloning an `Observer` shares the callback, so clones have the same
/// identity for [`Store::unsubscribe`](super::Store::unsubscribe).
pub struct Observer<S> {
    /// The callback, invoked as `(previous, next)`.
    notify: Arc<dyn Fn(&S, &S) + Send + Sync>,
}

impl<S> Observer<S> {
    /// Create a new observer with the given notification callback.
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(&S, &S) + Send + Sync + 'static,
    {
        Self {
            notify: Arc::new(notify),
        }
    }

    /// Invoke the callback with the snapshots around one update.
    pub fn notify(&self, previous: &S, next: &S) {
        (self.notify)(previous, next);
    }

    /// Whether both observers share the same callback.
    pub fn same(&self, other: &Observer<S>) -> bool {
        // Compare data addresses only; vtable pointers are not unique.
        Arc::as_ptr(&self.notify) as *const u8 == Arc::as_ptr(&other.notify) as *const u8
    }
}

impl<S> Clone for Observer<S> {
    fn clone(&self) -> Self {
        Self {
            notify: Arc::clone(&self.notify),
        }
    }
}

impl<S> fmt::Debug for Observer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("ptr", &(Arc::as_ptr(&self.notify) as *const u8))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observer_ids_are_unique() {
        let id1 = ObserverId::new();
        let id2 = ObserverId::new();
        let id3 = ObserverId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn observer_notify_passes_both_snapshots() {
        use parking_lot::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let observer = Observer::new(move |previous: &i32, next: &i32| {
            seen_clone.lock().push((*previous, *next));
        });

        observer.notify(&1, &2);
        observer.notify(&2, &5);
        assert_eq!(*seen.lock(), vec![(1, 2), (2, 5)]);
    }

    #[test]
    fn clones_share_identity() {
        let a = Observer::new(|_: &i32, _: &i32| {});
        let b = a.clone();
        let c = Observer::new(|_: &i32, _: &i32| {});

        assert!(a.same(&b));
        assert!(!a.same(&c));
    }
}
