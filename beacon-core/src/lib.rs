//! Beacon Core
//!
//! This crate provides a minimal observable state container and the glue
//! that lets a reactive UI host re-render components when that state
//! changes. It implements:
//!
//! - Stores holding immutable state snapshots with shallow-merge updates
//! - Ordered observer notification with idempotent cancellation
//! - A render binding and `use_store` hook for component code
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `store`: State snapshots, the merge trait, observers, and subscriptions
//! - `binding`: Render triggers, bindings, components, and hooks
//!
//! # Example
//!
//! ```rust
//! use beacon_core::{shallow_state, use_store, Component, RenderTrigger, Store};
//!
//! shallow_state! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Todos => TodosPatch {
//!         pub items: Vec<String>,
//!         pub filter: String,
//!     }
//! }
//!
//! let store = Store::<Todos>::default();
//!
//! // The host re-renders when asked; here it just logs.
//! let component = Component::mount(RenderTrigger::new(|| println!("render requested")));
//!
//! let count = component.render(|| use_store(&store).items.len());
//! assert_eq!(count, 0);
//!
//! store.update(TodosPatch {
//!     items: Some(vec!["write docs".into()]),
//!     ..Default::default()
//! });
//! // Prints "render requested"; the next render sees the new state.
//! assert_eq!(component.render(|| use_store(&store).items.len()), 1);
//! ```

pub mod binding;
pub mod error;
pub mod store;

pub use binding::{
    try_use_store, use_store, Binding, Component, ComponentId, RenderContext, RenderTrigger,
};
pub use error::{Error, Result};
pub use store::{
    Observer, ObserverId, ShallowMerge, StateMap, Store, StoreBuilder, StoreId, Subscription,
    SubscriptionGuard,
};
