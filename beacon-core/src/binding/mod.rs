//! Render Binding
//!
//! This module bridges the store's push-based notifications to a UI host
//! that re-renders components on demand.
//!
//! # Concepts
//!
//! ## Render Trigger
//!
//! The host's "please re-render this component" call, wrapped as a
//! [`RenderTrigger`]. The binding never renders by itself; it only asks.
//!
//! ## Binding
//!
//! A [`Binding`] owns one scoped subscription on one store. It subscribes on
//! attachment, moves to a new store when handed one, and releases its
//! subscription on every detachment path. Each store notification causes
//! exactly one render request. Nothing is buffered or coalesced.
//!
//! ## Components and Hooks
//!
//! A [`Component`] is the host-facing handle; [`use_store`] is the hook
//! called from inside `Component::render`. The component keeps one binding
//! per hook call site, so subscriptions happen on mount, not on every render.
//!
//! # Implementation Notes
//!
//! The component being rendered is found through a thread-local stack (see
//! [`RenderContext`]). Components are single-threaded; the render trigger is
//! Send + Sync because store observers are.

mod binding;
mod component;
mod context;
mod hook;

pub use binding::{Binding, RenderTrigger};
pub use component::{Component, ComponentId};
pub use context::RenderContext;
pub use hook::{try_use_store, use_store};
