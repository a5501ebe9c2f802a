//! Binding Implementation
//!
//! A Binding connects one consumer to one store. While attached it owns a
//! single observer registration whose only effect is to request a re-render
//! of the consumer.
//!
//! # Lifecycle
//!
//! 1. The first `sync` attaches: it subscribes the render trigger.
//!
//! 2. Later `sync` calls with the same store only read the state.
//!
//! 3. A `sync` with a different store releases the old registration before
//!    subscribing to the new store.
//!
//! 4. `detach` or dropping the binding releases the registration.
//!
//! The registration is held as a [`SubscriptionGuard`], so release also
//! happens when the owner unwinds.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::store::{ShallowMerge, Store, StoreId, SubscriptionGuard};

/// The host framework's "force a re-render" request for one component.
#[derive(Clone)]
pub struct RenderTrigger {
    request: Arc<dyn Fn() + Send + Sync>,
}

impl RenderTrigger {
    pub fn new<F>(request: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            request: Arc::new(request),
        }
    }

    /// Ask the host to re-render the component.
    pub fn request(&self) {
        (self.request)();
    }
}

impl fmt::Debug for RenderTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTrigger").finish_non_exhaustive()
    }
}

struct Attachment {
    store_id: StoreId,
    _guard: SubscriptionGuard,
}

/// Adapter between one consumer and the store it currently reads from.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use beacon_core::{Binding, RenderTrigger, StateMap, Store};
///
/// let renders = Arc::new(AtomicUsize::new(0));
/// let trigger = {
///     let renders = renders.clone();
///     RenderTrigger::new(move || {
///         renders.fetch_add(1, Ordering::SeqCst);
///     })
/// };
///
/// let store = Store::<StateMap>::default();
/// let mut binding = Binding::new();
///
/// let state = binding.sync(&store, &trigger);
/// assert!(state.is_empty());
///
/// store.update(StateMap::new().with("a", 1));
/// assert_eq!(renders.load(Ordering::SeqCst), 1);
/// assert_eq!(binding.sync(&store, &trigger).len(), 1);
/// ```
pub struct Binding<S> {
    attached: Option<Attachment>,
    _state: PhantomData<fn() -> S>,
}

impl<S> Binding<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    /// Create a detached binding.
    pub fn new() -> Self {
        Self {
            attached: None,
            _state: PhantomData,
        }
    }

    /// Make sure the binding observes `store`, then return its current state.
    ///
    /// Subscribes only when not yet attached to this store. Every
    /// notification from the store calls `trigger` once.
    pub fn sync(&mut self, store: &Store<S>, trigger: &RenderTrigger) -> Arc<S> {
        let current = self.attached.as_ref().map(|attachment| attachment.store_id);

        if current != Some(store.id()) {
            if let Some(previous) = self.attached.take() {
                debug!(
                    from = previous.store_id.raw(),
                    to = store.id().raw(),
                    "binding switching store"
                );
                drop(previous);
            }

            let trigger = trigger.clone();
            let subscription = store.subscribe(move |_, _| trigger.request());
            debug!(store = store.id().raw(), "binding attached");

            self.attached = Some(Attachment {
                store_id: store.id(),
                _guard: subscription.into_guard(),
            });
        }

        store.read()
    }

    /// Release the registration. Returns whether the binding was attached.
    pub fn detach(&mut self) -> bool {
        match self.attached.take() {
            Some(attachment) => {
                debug!(store = attachment.store_id.raw(), "binding detached");
                true
            }
            None => false,
        }
    }
}

impl<S> Binding<S> {
    /// The store this binding currently observes.
    pub fn attached_store(&self) -> Option<StoreId> {
        self.attached.as_ref().map(|attachment| attachment.store_id)
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}

impl<S> Default for Binding<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("attached_store", &self.attached_store())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
