//! Subscriptions
//!
//! A [`Subscription`] is the cancel handle returned by `Store::subscribe`.
//! It refers to one registration by [`ObserverId`] and reaches the store
//! through a weak reference, so holding a subscription never keeps a store
//! alive.
//!
//! Subscriptions are not generic over the state type. The store side of the
//! seam is the [`Registry`] trait, which the store's inner state implements
//! for every `S`.
//!
//! Dropping a `Subscription` leaves the observer registered. Convert it
//! with [`Subscription::into_guard`] to get scoped release instead.

use std::fmt;
use std::sync::Weak;

use tracing::trace;

use super::observer::ObserverId;
use super::store::StoreId;

/// The part of a store a subscription needs to manage its registration.
pub(crate) trait Registry: Send + Sync {
    /// Remove a registration. Returns whether it was present.
    fn remove(&self, id: ObserverId) -> bool;

    /// Whether a registration is still present.
    fn contains(&self, id: ObserverId) -> bool;
}

/// Cancel handle for one observer registration.
pub struct Subscription {
    store: Weak<dyn Registry>,
    store_id: StoreId,
    observer_id: ObserverId,
}

impl Subscription {
    pub(crate) fn new(store: Weak<dyn Registry>, store_id: StoreId, observer_id: ObserverId) -> Self {
        Self {
            store,
            store_id,
            observer_id,
        }
    }

    /// The registration this handle cancels.
    pub fn observer_id(&self) -> ObserverId {
        self.observer_id
    }

    /// The store the registration lives on.
    pub fn store_id(&self) -> StoreId {
        self.store_id
    }

    /// Remove this registration from the store.
    ///
    /// Idempotent: later calls, calls after the observer was removed some
    /// other way, and calls after the store was dropped are all no-ops.
    /// Other registrations of the same observer are unaffected.
    pub fn cancel(&self) {
        let removed = match self.store.upgrade() {
            Some(store) => store.remove(self.observer_id),
            None => false,
        };
        trace!(
            store = self.store_id.raw(),
            observer = self.observer_id.raw(),
            removed,
            "subscription cancelled"
        );
    }

    /// Whether the registration is still present on a live store.
    pub fn is_active(&self) -> bool {
        self.store
            .upgrade()
            .map(|store| store.contains(self.observer_id))
            .unwrap_or(false)
    }

    /// Turn this handle into a guard that cancels when dropped.
    pub fn into_guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("store_id", &self.store_id)
            .field("observer_id", &self.observer_id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Scoped subscription.
///
/// Dropping this guard cancels the registration. This covers every exit
/// path of the owner, including unwinding.
#[derive(Debug)]
#[must_use = "dropping the guard cancels the subscription immediately"]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl SubscriptionGuard {
    /// The underlying cancel handle.
    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.cancel();
    }
}
