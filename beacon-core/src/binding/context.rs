//! Render Context
//!
//! The render context tracks which component is currently rendering, so
//! that hooks such as [`use_store`](super::use_store) can find the
//! component's hook slots without being handed the component explicitly.
//!
//! # Implementation
//!
//! We use a thread-local stack. Entering a render pushes the component;
//! dropping the returned guard pops it. A parent rendering a child inside
//! its own render simply nests one level deeper.

use std::cell::RefCell;
use std::rc::Rc;

use super::component::{ComponentId, ComponentInner};

thread_local! {
    static RENDER_STACK: RefCell<Vec<Rc<ComponentInner>>> = const { RefCell::new(Vec::new()) };
}

/// Guard that pops the render context when dropped.
///
/// The stack stays balanced even if the render panics.
pub struct RenderContext {
    component_id: ComponentId,
}

impl RenderContext {
    /// Make `component` the current render target until the guard drops.
    pub(crate) fn enter(component: Rc<ComponentInner>) -> Self {
        let component_id = component.id();
        RENDER_STACK.with(|stack| stack.borrow_mut().push(component));
        Self { component_id }
    }

    /// The component currently rendering on this thread, if any.
    pub(crate) fn current() -> Option<Rc<ComponentInner>> {
        RENDER_STACK.with(|stack| stack.borrow().last().cloned())
    }

    /// Check if a render is in progress on this thread.
    pub fn is_active() -> bool {
        RENDER_STACK.with(|stack| !stack.borrow().is_empty())
    }

    /// Get the ID of the component currently rendering, if any.
    pub fn current_component() -> Option<ComponentId> {
        RENDER_STACK.with(|stack| stack.borrow().last().map(|component| component.id()))
    }

    /// Number of nested renders in progress on this thread.
    pub fn depth() -> usize {
        RENDER_STACK.with(|stack| stack.borrow().len())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        // Release the Rc outside the borrow.
        let popped = RENDER_STACK.with(|stack| stack.borrow_mut().pop());

        if let Some(component) = popped {
            debug_assert_eq!(
                component.id(),
                self.component_id,
                "RenderContext mismatch: expected {:?}, got {:?}",
                self.component_id,
                component.id()
            );
        }
    }
}
