//! Store Implementation
//!
//! A Store holds the current state snapshot and an ordered list of observer
//! registrations.
//!
//! # How Stores Work
//!
//! 1. `read()` hands out the current snapshot as an `Arc<S>`.
//!
//! 2. `update(partial)` merges the partial into the current snapshot,
//!    producing a new `Arc<S>`, and swaps it in.
//!
//! 3. Every registered observer is then called with `(previous, next)`,
//!    in registration order.
//!
//! # Notification Passes
//!
//! The observer list is copied at the start of each update. No lock is held
//! while observers run, so an observer may read, update, subscribe, or
//! cancel on the same store. Changes to the list take effect from the next
//! pass on; the pass in progress always runs over its copy.
//!
//! A panicking observer is not caught. The panic unwinds out of `update` and
//! the observers after it in that pass are skipped. The new state is
//! already committed by then.
//!
//! # Memory Layout
//!
//! Each store consists of:
//! - A unique ID (8 bytes) and an optional label
//! - The current snapshot behind `Arc`
//! - The registrations, inline for the first few observers

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use smallvec::SmallVec;
use tracing::trace;

use super::observer::{Observer, ObserverId};
use super::state::ShallowMerge;
use super::subscription::{Registry, Subscription};

/// Unique identifier for a store.
///
/// Clones of a [`Store`] share the ID. The render binding compares IDs to
/// notice that a component was handed a different store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

type Registrations<S> = SmallVec<[(ObserverId, Observer<S>); 4]>;

struct StoreInner<S> {
    id: StoreId,
    label: Option<String>,
    state: RwLock<Arc<S>>,
    observers: RwLock<Registrations<S>>,
}

impl<S> Registry for StoreInner<S>
where
    S: Send + Sync,
{
    fn remove(&self, id: ObserverId) -> bool {
        // The removed callback is dropped after the lock is released.
        let removed = {
            let mut observers = self.observers.write();
            observers
                .iter()
                .position(|(existing, _)| *existing == id)
                .map(|index| observers.remove(index))
        };
        removed.is_some()
    }

    fn contains(&self, id: ObserverId) -> bool {
        self.observers
            .read()
            .iter()
            .any(|(existing, _)| *existing == id)
    }
}

/// An observable state container.
///
/// # Type Parameters
///
/// - `S`: The state type. Must implement [`ShallowMerge`] and be
///   Send + Sync so snapshots can be shared.
///
/// # Example
///
/// ```rust
/// use beacon_core::{StateMap, Store};
///
/// let store = Store::<StateMap>::default();
///
/// let subscription = store.subscribe(|previous, next| {
///     println!("{} -> {} keys", previous.len(), next.len());
/// });
///
/// store.update(StateMap::new().with("a", 1));
/// store.update(StateMap::new().with("b", 2));
/// assert_eq!(store.read().len(), 2);
///
/// subscription.cancel();
/// ```
pub struct Store<S> {
    inner: Arc<StoreInner<S>>,
}

impl<S> Store<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    /// Create a new store with the given initial state.
    pub fn new(initial: S) -> Self {
        Self::from_parts(initial, None)
    }

    /// Start configuring a store.
    pub fn builder() -> StoreBuilder<S> {
        StoreBuilder::new()
    }

    fn from_parts(initial: S, label: Option<String>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                id: StoreId::new(),
                label,
                state: RwLock::new(Arc::new(initial)),
                observers: RwLock::new(SmallVec::new()),
            }),
        }
    }

    /// Get the store's unique ID.
    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    /// Get the label given at construction, if any.
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Get the current snapshot.
    pub fn read(&self) -> Arc<S> {
        Arc::clone(&*self.inner.state.read())
    }

    /// Merge `partial` into the current state and notify all observers.
    ///
    /// Observers run synchronously, in registration order, before this
    /// returns. Each receives the snapshot from immediately before this
    /// update and the one it produced.
    ///
    /// # Panics
    ///
    /// Propagates a panic from any observer. Observers later in the pass are
    /// not called.
    pub fn update(&self, partial: S::Partial) {
        let observers: Registrations<S> = self.inner.observers.read().clone();

        let (previous, next) = {
            let state = self.inner.state.upgradable_read();
            let previous = Arc::clone(&*state);
            let next = Arc::new(previous.merge(partial));
            *RwLockUpgradableReadGuard::upgrade(state) = Arc::clone(&next);
            (previous, next)
        };

        trace!(
            store = self.inner.id.raw(),
            label = self.label().unwrap_or_default(),
            observers = observers.len(),
            "state updated"
        );

        for (_, observer) in observers.iter() {
            observer.notify(&previous, &next);
        }
    }

    /// Build the partial from the current snapshot, then update.
    pub fn update_with<F>(&self, f: F)
    where
        F: FnOnce(&S) -> S::Partial,
    {
        let partial = f(&self.read());
        self.update(partial);
    }

    /// Register a callback. See [`subscribe_observer`](Self::subscribe_observer).
    pub fn subscribe<F>(&self, notify: F) -> Subscription
    where
        F: Fn(&S, &S) + Send + Sync + 'static,
    {
        self.subscribe_observer(&Observer::new(notify))
    }

    /// Append a registration of `observer` to the end of the list.
    ///
    /// The same observer may be registered any number of times; every
    /// registration is notified and cancelled independently.
    pub fn subscribe_observer(&self, observer: &Observer<S>) -> Subscription {
        let observer_id = ObserverId::new();
        self.inner
            .observers
            .write()
            .push((observer_id, observer.clone()));

        trace!(
            store = self.inner.id.raw(),
            observer = observer_id.raw(),
            "observer subscribed"
        );

        let registry: Weak<dyn Registry> = Arc::downgrade(&self.inner) as Weak<dyn Registry>;
        Subscription::new(registry, self.inner.id, observer_id)
    }

    /// Remove the oldest registration of `observer`.
    ///
    /// Returns `false` if the observer is not registered. Later registrations
    /// of the same observer stay in place.
    pub fn unsubscribe(&self, observer: &Observer<S>) -> bool {
        let removed = {
            let mut observers = self.inner.observers.write();
            observers
                .iter()
                .position(|(_, existing)| existing.same(observer))
                .map(|index| observers.remove(index))
        };

        match removed {
            Some((observer_id, _)) => {
                trace!(
                    store = self.inner.id.raw(),
                    observer = observer_id.raw(),
                    "observer unsubscribed"
                );
                true
            }
            None => false,
        }
    }

    /// Get the number of active registrations.
    pub fn observer_count(&self) -> usize {
        self.inner.observers.read().len()
    }
}

impl<S> Store<S> {
    /// Whether both handles refer to the same store.
    pub fn same_store(&self, other: &Store<S>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S> Default for Store<S>
where
    S: ShallowMerge + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("observer_count", &self.inner.observers.read().len())
            .finish()
    }
}

/// Builder for a [`Store`].
pub struct StoreBuilder<S> {
    label: Option<String>,
    _state: std::marker::PhantomData<fn() -> S>,
}

impl<S> StoreBuilder<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            label: None,
            _state: std::marker::PhantomData,
        }
    }

    /// Attach a label to the store's tracing events and Debug output.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the store with the given initial state.
    pub fn build(self, initial: S) -> Store<S> {
        Store::from_parts(initial, self.label)
    }

    /// Build the store starting from `S::default()`.
    pub fn build_default(self) -> Store<S>
    where
        S: Default,
    {
        self.build(S::default())
    }
}

impl<S> Default for StoreBuilder<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
