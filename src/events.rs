//! Typed event plumbing between the host widget, the adapter, and the
//! dispatcher.
//!
//! The hosting UI owns an [`EventSource<WidgetEvent>`] per view widget and
//! feeds native pointer events into it; everything downstream subscribes.
//! Subscriptions are RAII cancellation handles, so dropping a component
//! detaches it from its source without any host-framework signal machinery.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::types::{MouseButton, Point};

/// Raw widget events as delivered by the hosting toolkit.
///
/// Scroll deltas arrive pre-decoded into unit steps (or smooth fractions);
/// translating native direction enums is the host's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    ButtonPress { button: MouseButton, at: Point },
    ButtonRelease { button: MouseButton, at: Point },
    Motion { at: Point },
    Scroll { at: Point, delta: Point },
    Enter { at: Point },
    Leave,
    /// The widget allocation or the view transform changed.
    LayoutChanged,
}

type Callback<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Observers<E> {
    next_id: u64,
    entries: Vec<(u64, Callback<E>)>,
}

/// A single-threaded, multi-observer event stream.
pub struct EventSource<E> {
    inner: Rc<RefCell<Observers<E>>>,
}

impl<E> EventSource<E> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Observers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Registers an observer. The observer stays registered until the
    /// returned [`Subscription`] is cancelled or dropped.
    pub fn subscribe(&self, observer: impl FnMut(&E) + 'static) -> Subscription
    where
        E: 'static,
    {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            let callback: Callback<E> = Rc::new(RefCell::new(observer));
            inner.entries.push((id, callback));
            id
        };
        let weak: Weak<RefCell<Observers<E>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().entries.retain(|(i, _)| *i != id);
            }
        })
    }

    /// Delivers `event` to every live observer in subscription order.
    ///
    /// Observers may subscribe or cancel reentrantly: additions are not
    /// seen by the in-flight emission, removals are honored immediately.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, Callback<E>)> = self.inner.borrow().entries.clone();
        for (id, callback) in snapshot {
            let live = self.inner.borrow().entries.iter().any(|(i, _)| *i == id);
            if live {
                (&mut *callback.borrow_mut())(event);
            }
        }
    }

    /// Number of currently registered observers.
    pub fn observer_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl<E> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventSource<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// RAII handle for an observer registration.
///
/// Dropping the handle unsubscribes. Call [`Subscription::detach`] to keep
/// the observer registered for the lifetime of the source instead.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly unsubscribes the observer.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Leaves the observer registered forever.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}
