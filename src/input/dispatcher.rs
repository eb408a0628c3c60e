//! Routes semantic pointer events to the interested mouse handlers.
//!
//! The dispatcher owns two registries: handlers, indexed by declared
//! capability and by subscribed button, and adapters, each subscribed at
//! attach time. On every event it computes the interested subset (always
//! in registration order), invokes the matching callback, and threads the
//! opaque per-(handler, adapter) state value back into the next callback
//! for that pair.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::input::adapter::{MouseAdapter, PointerEvent};
use crate::input::handler::{Capabilities, MouseHandler};
use crate::types::MouseButton;
use crate::view::View;

/// Opaque gesture-local context carried per (handler, adapter) pair.
///
/// Handlers return one from a callback to stash context (say, a pivot
/// chosen at drag start) and receive it back on the next callback for the
/// same pair. Returning `None` keeps the previously stored value.
pub struct DispatchState(Box<dyn Any>);

impl DispatchState {
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl std::fmt::Debug for DispatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DispatchState(..)")
    }
}

/// Identity of a registered handler, derived from its allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AdapterId(usize);

fn handler_id(handler: &Rc<RefCell<dyn MouseHandler>>) -> HandlerId {
    HandlerId(Rc::as_ptr(handler) as *const () as usize)
}

fn adapter_id(adapter: &Rc<MouseAdapter>) -> AdapterId {
    AdapterId(Rc::as_ptr(adapter) as usize)
}

struct HandlerEntry {
    id: HandlerId,
    handler: Rc<RefCell<dyn MouseHandler>>,
    capabilities: Capabilities,
    state: HashMap<AdapterId, DispatchState>,
}

struct AdapterEntry {
    id: AdapterId,
    adapter: Rc<MouseAdapter>,
    _subscription: crate::events::Subscription,
}

#[derive(Default)]
struct DispatcherInner {
    handlers: Vec<HandlerEntry>,
    adapters: Vec<AdapterEntry>,
    // Derived indices, registration order preserved.
    hovering: Vec<HandlerId>,
    pressing: Vec<HandlerId>,
    dragging: Vec<HandlerId>,
    scrolling: Vec<HandlerId>,
    by_button: BTreeMap<MouseButton, Vec<HandlerId>>,
}

/// The gesture dispatcher.
pub struct GestureDispatcher {
    inner: Rc<RefCell<DispatcherInner>>,
}

impl GestureDispatcher {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(DispatcherInner::default())),
        }
    }

    /// Registers a handler under its declared capabilities and buttons.
    /// Registering the same handler again is a no-op.
    pub fn add(&self, handler: &Rc<RefCell<dyn MouseHandler>>) -> HandlerId {
        let id = handler_id(handler);
        let mut inner = self.inner.borrow_mut();
        if inner.handlers.iter().any(|entry| entry.id == id) {
            return id;
        }
        let capabilities = handler.borrow().capabilities();
        if capabilities.hovering {
            inner.hovering.push(id);
        }
        if capabilities.pressing {
            inner.pressing.push(id);
        }
        if capabilities.dragging {
            inner.dragging.push(id);
        }
        if capabilities.scrolling {
            inner.scrolling.push(id);
        }
        for button in &capabilities.buttons {
            inner.by_button.entry(*button).or_default().push(id);
        }
        tracing::debug!(?id, "registered mouse handler");
        inner.handlers.push(HandlerEntry {
            id,
            handler: Rc::clone(handler),
            capabilities,
            state: HashMap::new(),
        });
        id
    }

    /// Unregisters a handler, discarding its dispatch state across all
    /// adapters. Returns false if it was not registered.
    pub fn remove(&self, handler: &Rc<RefCell<dyn MouseHandler>>) -> bool {
        let id = handler_id(handler);
        let mut inner = self.inner.borrow_mut();
        let before = inner.handlers.len();
        inner.handlers.retain(|entry| entry.id != id);
        if inner.handlers.len() == before {
            return false;
        }
        inner.hovering.retain(|other| *other != id);
        inner.pressing.retain(|other| *other != id);
        inner.dragging.retain(|other| *other != id);
        inner.scrolling.retain(|other| *other != id);
        for handlers in inner.by_button.values_mut() {
            handlers.retain(|other| *other != id);
        }
        tracing::debug!(?id, "removed mouse handler");
        true
    }

    pub fn is_registered(&self, handler: &Rc<RefCell<dyn MouseHandler>>) -> bool {
        let id = handler_id(handler);
        self.inner.borrow().handlers.iter().any(|entry| entry.id == id)
    }

    pub fn handler_count(&self) -> usize {
        self.inner.borrow().handlers.len()
    }

    /// Subscribes to an adapter's semantic events. Attaching an already
    /// attached adapter is a no-op.
    pub fn attach(&self, adapter: &Rc<MouseAdapter>) {
        let id = adapter_id(adapter);
        if self
            .inner
            .borrow()
            .adapters
            .iter()
            .any(|entry| entry.id == id)
        {
            return;
        }
        let weak_inner: Weak<RefCell<DispatcherInner>> = Rc::downgrade(&self.inner);
        let weak_adapter = Rc::downgrade(adapter);
        let subscription = adapter.events().subscribe(move |event| {
            let (Some(inner), Some(adapter)) = (weak_inner.upgrade(), weak_adapter.upgrade())
            else {
                return;
            };
            route_event(&inner, id, &adapter, event);
        });
        self.inner.borrow_mut().adapters.push(AdapterEntry {
            id,
            adapter: Rc::clone(adapter),
            _subscription: subscription,
        });
        tracing::debug!("attached adapter to dispatcher");
    }

    /// Unsubscribes from an adapter and discards the dispatch state every
    /// handler held for it. Detaching an unattached adapter is a no-op.
    pub fn detach(&self, adapter: &Rc<MouseAdapter>) {
        let id = adapter_id(adapter);
        let mut inner = self.inner.borrow_mut();
        let before = inner.adapters.len();
        inner.adapters.retain(|entry| entry.id != id);
        if inner.adapters.len() == before {
            return;
        }
        for entry in inner.handlers.iter_mut() {
            entry.state.remove(&id);
        }
        tracing::debug!("detached adapter from dispatcher");
    }
}

impl Default for GestureDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the handlers interested in a button event: the intersection of
/// a capability index with the button's subscribers, in registration
/// order. An empty button index means nobody is interested.
fn overlap_button_set(
    inner: &DispatcherInner,
    capability_index: &[HandlerId],
    button: MouseButton,
) -> Vec<HandlerId> {
    match inner.by_button.get(&button) {
        Some(subscribed) if !subscribed.is_empty() => capability_index
            .iter()
            .filter(|id| subscribed.contains(id))
            .copied()
            .collect(),
        _ => Vec::new(),
    }
}

fn route_event(
    inner: &Rc<RefCell<DispatcherInner>>,
    adapter_id: AdapterId,
    adapter: &Rc<MouseAdapter>,
    event: &PointerEvent,
) {
    match *event {
        PointerEvent::Motion { to, from } => {
            // A press on a button nobody handles does not suppress
            // hovering; a press on any handled button suppresses it for
            // every hover handler, interested in that button or not.
            let hovering = if adapter.is_pressed(None) {
                let inner_ref = inner.borrow();
                !inner_ref.by_button.iter().any(|(button, handlers)| {
                    !handlers.is_empty() && adapter.is_pressed(Some(*button))
                })
            } else {
                true
            };
            if hovering {
                let targets = inner.borrow().hovering.clone();
                dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                    handler.hover(view, to, from, state)
                });
            }
        }
        PointerEvent::Pression { at, button } => {
            let targets = {
                let inner_ref = inner.borrow();
                overlap_button_set(&inner_ref, &inner_ref.pressing, button)
            };
            dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                handler.press(view, at, state)
            });
        }
        PointerEvent::StartDrag { at, button } => {
            let targets = {
                let inner_ref = inner.borrow();
                overlap_button_set(&inner_ref, &inner_ref.dragging, button)
            };
            dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                handler.start_drag(view, at, state)
            });
        }
        PointerEvent::Drag { to, from, button } => {
            let targets = {
                let inner_ref = inner.borrow();
                overlap_button_set(&inner_ref, &inner_ref.dragging, button)
            };
            dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                handler.drag(view, to, from, state)
            });
        }
        PointerEvent::StopDrag { at, button } => {
            let targets = {
                let inner_ref = inner.borrow();
                overlap_button_set(&inner_ref, &inner_ref.dragging, button)
            };
            dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                handler.stop_drag(view, at, state)
            });
        }
        PointerEvent::Scroll { at, delta } => {
            // Scroll carries no button; every scrolling handler hears it.
            let targets = inner.borrow().scrolling.clone();
            dispatch(inner, adapter_id, adapter, &targets, |handler, view, state| {
                handler.scroll(view, at, delta, state)
            });
        }
        // Clicks are the adapter's press/drag epilogue; nothing routes on
        // them.
        PointerEvent::Click { .. } => {}
    }
}

/// Invokes `invoke` for each target handler, threading dispatch state.
///
/// State handling per handler: the stored value is taken out, lent to the
/// callback, and either replaced by a `Some` return or put back on `None`.
/// A handler that unregisters itself mid-callback loses its state, which
/// is exactly the `remove` contract.
fn dispatch<F>(
    inner: &Rc<RefCell<DispatcherInner>>,
    adapter_id: AdapterId,
    adapter: &Rc<MouseAdapter>,
    targets: &[HandlerId],
    mut invoke: F,
) where
    F: FnMut(
        &mut dyn MouseHandler,
        &mut dyn View,
        Option<&DispatchState>,
    ) -> Option<DispatchState>,
{
    let Some(view) = adapter.view() else { return };
    for id in targets {
        let taken = {
            let mut inner_ref = inner.borrow_mut();
            let Some(entry) = inner_ref.handlers.iter_mut().find(|entry| entry.id == *id)
            else {
                continue;
            };
            (Rc::clone(&entry.handler), entry.state.remove(&adapter_id))
        };
        let (handler_rc, previous) = taken;
        let returned = {
            let mut handler = handler_rc.borrow_mut();
            let mut view_ref = view.borrow_mut();
            invoke(&mut *handler, &mut *view_ref, previous.as_ref())
        };
        let mut inner_ref = inner.borrow_mut();
        if let Some(entry) = inner_ref.handlers.iter_mut().find(|entry| entry.id == *id) {
            if let Some(state) = returned.or(previous) {
                entry.state.insert(adapter_id, state);
            }
        }
    }
}
