//! Error types.
//!
//! Store operations do not fail. Errors only arise at the edges: converting
//! untyped JSON into a [`StateMap`](crate::StateMap), and misusing the
//! render hooks.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A JSON value used as map state was not an object.
    #[error("state must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// `use_store` was called while no component was rendering.
    #[error("use_store called outside of a component render")]
    OutsideRender,

    /// The hook at this position was bound to a different state type on a
    /// previous render. Hooks must be called in the same order every render.
    #[error("hook slot {slot} changed type between renders")]
    HookOrder { slot: usize },

    /// The component was rendered after it was unmounted.
    #[error("component is unmounted")]
    Unmounted,
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
