//! Component Implementation
//!
//! A Component is a mounted consumer as the host framework sees it. The
//! host calls `render` whenever it decides to, and `unmount` when the
//! component leaves the tree.
//!
//! # How Components Work
//!
//! 1. `mount` creates the component with the host's render trigger. No
//!    store is observed until the first render uses one.
//!
//! 2. During `render`, each `use_store` call takes the next hook slot.
//!    A slot holds a [`Binding`], created on first use.
//!
//! 3. After a render, slots past the last hook used in that render are
//!    released.
//!
//! 4. `unmount`, or dropping the component, releases every slot.
//!
//! # Hook Order
//!
//! Slots are matched by call order, like hooks in other UI frameworks. A
//! slot that was bound to one state type and is later asked for another
//! reports [`Error::HookOrder`].

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::binding::{Binding, RenderTrigger};
use super::context::RenderContext;
use crate::error::{Error, Result};
use crate::store::{ShallowMerge, Store};

/// Unique identifier for a mounted component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(u64);

impl ComponentId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

pub(crate) struct ComponentInner {
    id: ComponentId,
    trigger: RenderTrigger,
    /// One `Binding<S>` per hook call, in call order.
    slots: RefCell<Vec<Box<dyn Any>>>,
    /// Next slot to hand out during the current render.
    cursor: Cell<usize>,
    mounted: Cell<bool>,
    render_count: Cell<usize>,
}

impl ComponentInner {
    pub(crate) fn id(&self) -> ComponentId {
        self.id
    }

    /// Take the next hook slot and sync its binding against `store`.
    pub(crate) fn use_binding<S>(&self, store: &Store<S>) -> Result<Arc<S>>
    where
        S: ShallowMerge + Send + Sync + 'static,
    {
        if !self.mounted.get() {
            return Err(Error::Unmounted);
        }

        let slot = self.cursor.get();
        self.cursor.set(slot + 1);

        let mut slots = self.slots.borrow_mut();
        if slot == slots.len() {
            slots.push(Box::new(Binding::<S>::new()));
        }

        let value: &mut dyn Any = slots
            .get_mut(slot)
            .ok_or(Error::HookOrder { slot })?
            .as_mut();
        let binding = value
            .downcast_mut::<Binding<S>>()
            .ok_or(Error::HookOrder { slot })?;

        Ok(binding.sync(store, &self.trigger))
    }

    fn release_slots(&self, keep: usize) -> usize {
        let released: Vec<Box<dyn Any>> = {
            let mut slots = self.slots.borrow_mut();
            if keep >= slots.len() {
                return 0;
            }
            slots.split_off(keep)
        };
        let count = released.len();
        // Dropping the bindings cancels their registrations.
        drop(released);
        count
    }
}

/// A mounted consumer of one or more stores.
///
/// # Example
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// use beacon_core::{use_store, Component, RenderTrigger, StateMap, Store};
///
/// let store = Store::<StateMap>::default();
/// let requests = Arc::new(AtomicUsize::new(0));
/// let trigger = {
///     let requests = requests.clone();
///     RenderTrigger::new(move || {
///         requests.fetch_add(1, Ordering::SeqCst);
///     })
/// };
///
/// let component = Component::mount(trigger);
/// let keys = component.render(|| use_store(&store).len());
/// assert_eq!(keys, 0);
///
/// store.update(StateMap::new().with("a", 1));
/// assert_eq!(requests.load(Ordering::SeqCst), 1);
/// assert_eq!(component.render(|| use_store(&store).len()), 1);
///
/// component.unmount();
/// assert_eq!(store.observer_count(), 0);
/// ```
pub struct Component {
    inner: Rc<ComponentInner>,
}

impl Component {
    /// Mount a component whose re-renders are requested through `trigger`.
    pub fn mount(trigger: RenderTrigger) -> Self {
        let inner = Rc::new(ComponentInner {
            id: ComponentId::new(),
            trigger,
            slots: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            mounted: Cell::new(true),
            render_count: Cell::new(0),
        });
        debug!(component = inner.id.raw(), "component mounted");
        Self { inner }
    }

    /// Get the component's unique ID.
    pub fn id(&self) -> ComponentId {
        self.inner.id
    }

    /// Run one render pass.
    ///
    /// # Panics
    ///
    /// Panics if the component is unmounted, including when `view` unmounts
    /// it. [`try_render`](Self::try_render) reports both cases as
    /// [`Error::Unmounted`].
    pub fn render<R, F>(&self, view: F) -> R
    where
        F: FnOnce() -> R,
    {
        match self.try_render(view) {
            Ok(output) => output,
            Err(err) => panic!("{err}"),
        }
    }

    /// Run one render pass, with this component's hooks available to `view`.
    ///
    /// If `view` unmounts the component, every slot is released once the
    /// pass ends and the pass returns [`Error::Unmounted`].
    pub fn try_render<R, F>(&self, view: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        if !self.inner.mounted.get() {
            return Err(Error::Unmounted);
        }

        self.inner.cursor.set(0);
        let output = {
            let _ctx = RenderContext::enter(Rc::clone(&self.inner));
            view()
        };

        if !self.inner.mounted.get() {
            let released = self.inner.release_slots(0);
            debug!(
                component = self.inner.id.raw(),
                released, "component unmounted during render"
            );
            return Err(Error::Unmounted);
        }

        let used = self.inner.cursor.get();
        let released = self.inner.release_slots(used);
        if released > 0 {
            debug!(
                component = self.inner.id.raw(),
                released, "released unused hook slots"
            );
        }

        self.inner.render_count.set(self.inner.render_count.get() + 1);
        Ok(output)
    }

    /// Release every binding. Later renders are rejected.
    ///
    /// Calling this more than once is a no-op.
    pub fn unmount(&self) {
        if !self.inner.mounted.replace(false) {
            return;
        }
        let slots = mem::take(&mut *self.inner.slots.borrow_mut());
        let released = slots.len();
        drop(slots);
        debug!(component = self.inner.id.raw(), released, "component unmounted");
    }

    /// Whether the component is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> usize {
        self.inner.render_count.get()
    }

    /// Number of hook slots currently held.
    pub fn binding_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }
}

impl Drop for Component {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.inner.id)
            .field("mounted", &self.is_mounted())
            .field("render_count", &self.render_count())
            .field("binding_count", &self.binding_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
