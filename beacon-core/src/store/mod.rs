//! Observable State
//!
//! This module implements the store: a holder of immutable state snapshots
//! that notifies its observers whenever the snapshot is replaced.
//!
//! # Concepts
//!
//! ## Snapshots
//!
//! State is never mutated in place. Every update merges a partial into the
//! current value and produces a new `Arc<S>`, so a snapshot obtained from
//! `read()` stays valid and unchanged for as long as it is held.
//!
//! ## Shallow Merge
//!
//! Updates are partials. Top-level fields named in the partial replace the
//! current ones; everything else is carried over. Nested values are replaced
//! whole. See [`ShallowMerge`].
//!
//! ## Observers
//!
//! Observers are callbacks receiving `(previous, next)` after each update,
//! in registration order. `subscribe` returns a [`Subscription`] whose
//! `cancel` removes exactly that registration and may be called any number
//! of times.
//!
//! # Implementation Notes
//!
//! There is no global registry. Each store owns its snapshot and its
//! observer list, and any number of stores may coexist.

mod observer;
mod state;
mod store;
mod subscription;

pub use observer::{Observer, ObserverId};
pub use state::{ShallowMerge, StateMap};
pub use store::{Store, StoreBuilder, StoreId};
pub use subscription::{Subscription, SubscriptionGuard};
