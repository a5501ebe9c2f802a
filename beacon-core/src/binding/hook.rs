//! Store hooks for component code.

use std::sync::Arc;

use super::context::RenderContext;
use crate::error::{Error, Result};
use crate::store::{ShallowMerge, Store};

/// Read `store` from inside a component render and keep the component
/// subscribed to it.
///
/// The first render that reaches this call subscribes the component; later
/// renders reuse that subscription. Passing a different store at the same
/// call site moves the subscription to the new store. The returned snapshot
/// is always read fresh.
///
/// # Panics
///
/// Panics when called outside [`Component::render`](super::Component::render),
/// or when this call site was bound to a different state type on an earlier
/// render. Use [`try_use_store`] to get these as errors.
pub fn use_store<S>(store: &Store<S>) -> Arc<S>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    match try_use_store(store) {
        Ok(state) => state,
        Err(err) => panic!("{err}"),
    }
}

/// Fallible form of [`use_store`].
pub fn try_use_store<S>(store: &Store<S>) -> Result<Arc<S>>
where
    S: ShallowMerge + Send + Sync + 'static,
{
    let component = RenderContext::current().ok_or(Error::OutsideRender)?;
    component.use_binding(store)
}
