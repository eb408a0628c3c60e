//! Adapts a widget's raw pointer events into semantic gesture events.
//!
//! Native motion events arrive far faster than gesture updates are needed,
//! so motion is never processed inline: the adapter records the pending
//! position and schedules at most one idle callback per event-loop cycle,
//! at a priority that runs after input coalescing and before redraw. The
//! deferred callback classifies drags, re-reports pressure, and emits a
//! single [`PointerEvent::Motion`] spanning the first unprocessed position
//! and the latest one.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::constants::MOTION_IDLE_PRIORITY;
use crate::events::{EventSource, Subscription, WidgetEvent};
use crate::input::state::{Pressure, PressureMap};
use crate::scheduling::{Scheduler, SourceId};
use crate::types::{MouseButton, Point};
use crate::view::View;

/// Semantic pointer events emitted by a [`MouseAdapter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Batched pointer motion from `from` to `to`.
    Motion { to: Point, from: Point },
    /// A button is down; re-emitted on every motion batch while held.
    Pression { at: Point, button: MouseButton },
    /// A button was released; always follows the press, dragging or not.
    Click { at: Point, button: MouseButton },
    /// A held button moved for the first time.
    StartDrag { at: Point, button: MouseButton },
    /// Batched motion while a button drags.
    Drag {
        to: Point,
        from: Point,
        button: MouseButton,
    },
    /// A dragging button was released; precedes the matching `Click`.
    StopDrag { at: Point, button: MouseButton },
    /// Wheel scrolling, with the delta in unit steps.
    Scroll { at: Point, delta: Point },
}

struct AdapterInner {
    pressure: PressureMap,
    from_point: Option<Point>,
    current_point: Point,
    pending_motion: Option<SourceId>,
    freeze_depth: u32,
}

struct Attachment {
    view: Rc<RefCell<dyn View>>,
    _subscription: Subscription,
}

/// Wraps one widget's raw pointer events at a time.
///
/// Detaching fully unregisters the raw subscription, clears pressure
/// state, and synchronously cancels any pending batched-motion callback;
/// nothing fires against a widget the adapter no longer wraps.
pub struct MouseAdapter {
    scheduler: Rc<dyn Scheduler>,
    events: EventSource<PointerEvent>,
    inner: RefCell<AdapterInner>,
    attachment: RefCell<Option<Attachment>>,
    weak_self: Weak<MouseAdapter>,
}

impl MouseAdapter {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            scheduler,
            events: EventSource::new(),
            inner: RefCell::new(AdapterInner {
                pressure: PressureMap::new(),
                from_point: None,
                current_point: Point::ZERO,
                pending_motion: None,
                freeze_depth: 0,
            }),
            attachment: RefCell::new(None),
            weak_self: weak.clone(),
        })
    }

    /// The semantic event stream.
    pub fn events(&self) -> &EventSource<PointerEvent> {
        &self.events
    }

    /// Attaches to a widget: raw events from `source` are routed into
    /// [`press`](Self::press) / [`release`](Self::release) /
    /// [`motion`](Self::motion) / [`scroll`](Self::scroll), and `view` is
    /// what dispatched handlers will operate on. Replaces any previous
    /// attachment.
    pub fn attach(&self, view: Rc<RefCell<dyn View>>, source: &EventSource<WidgetEvent>) {
        self.detach();
        let weak = self.weak_self.clone();
        let subscription = source.subscribe(move |event| {
            let Some(adapter) = weak.upgrade() else { return };
            match *event {
                WidgetEvent::ButtonPress { button, at } => adapter.press(button, at),
                WidgetEvent::ButtonRelease { button, at } => adapter.release(button, at),
                WidgetEvent::Motion { at } => adapter.motion(at),
                WidgetEvent::Scroll { at, delta } => adapter.scroll(at, delta),
                WidgetEvent::Enter { .. }
                | WidgetEvent::Leave
                | WidgetEvent::LayoutChanged => {}
            }
        });
        *self.attachment.borrow_mut() = Some(Attachment {
            view,
            _subscription: subscription,
        });
        tracing::debug!("mouse adapter attached");
    }

    /// Detaches from the current widget, if any.
    pub fn detach(&self) {
        if self.attachment.borrow_mut().take().is_none() {
            return;
        }
        let pending = {
            let mut inner = self.inner.borrow_mut();
            inner.pressure.clear();
            inner.from_point = None;
            inner.pending_motion.take()
        };
        if let Some(id) = pending {
            self.scheduler.cancel(id);
        }
        tracing::debug!("mouse adapter detached");
    }

    /// The attached view, if any.
    pub fn view(&self) -> Option<Rc<RefCell<dyn View>>> {
        self.attachment
            .borrow()
            .as_ref()
            .map(|attachment| Rc::clone(&attachment.view))
    }

    /// Suspends event emission. Nests; every `freeze` needs a matching
    /// [`thaw`](Self::thaw). Pressure and position bookkeeping continue
    /// silently while frozen.
    pub fn freeze(&self) {
        self.inner.borrow_mut().freeze_depth += 1;
    }

    pub fn thaw(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.freeze_depth = inner.freeze_depth.saturating_sub(1);
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.borrow().freeze_depth > 0
    }

    /// True when the given button is pressed; with `None`, when any is.
    pub fn is_pressed(&self, button: Option<MouseButton>) -> bool {
        self.inner.borrow().pressure.is_pressed(button)
    }

    /// Reports a button press at `at`.
    pub fn press(&self, button: MouseButton, at: Point) {
        let frozen = {
            let mut inner = self.inner.borrow_mut();
            inner.pressure.press(button);
            inner.freeze_depth > 0
        };
        if !frozen {
            self.events.emit(&PointerEvent::Pression { at, button });
        }
    }

    /// Reports a button release at `at`. Untracked buttons are ignored.
    ///
    /// The button leaves the pressure map regardless of suspension, but
    /// only an unfrozen release emits `StopDrag`/`Click`.
    pub fn release(&self, button: MouseButton, at: Point) {
        let emit = {
            let inner = self.inner.borrow();
            match inner.pressure.get(button) {
                Some(pressure) if inner.freeze_depth == 0 => Some(pressure),
                Some(_) => None,
                None => return,
            }
        };
        if let Some(pressure) = emit {
            if pressure == Pressure::Dragging {
                self.events.emit(&PointerEvent::StopDrag { at, button });
            }
            self.events.emit(&PointerEvent::Click { at, button });
        }
        self.inner.borrow_mut().pressure.release(button);
    }

    /// Reports pointer motion. Nothing is emitted inline; processing is
    /// deferred to a single idle callback which absorbs any further
    /// motion reported before it runs.
    pub fn motion(&self, at: Point) {
        let schedule = {
            let mut inner = self.inner.borrow_mut();
            inner.current_point = at;
            if inner.pending_motion.is_some() {
                false
            } else {
                if inner.from_point.is_none() {
                    inner.from_point = Some(at);
                }
                true
            }
        };
        if schedule {
            let weak = self.weak_self.clone();
            let id = self.scheduler.add_idle(
                MOTION_IDLE_PRIORITY,
                Box::new(move || {
                    if let Some(adapter) = weak.upgrade() {
                        adapter.process_motion();
                    }
                }),
            );
            self.inner.borrow_mut().pending_motion = Some(id);
        }
    }

    /// Reports wheel scrolling; emitted immediately, never batched.
    pub fn scroll(&self, at: Point, delta: Point) {
        if !self.is_frozen() {
            self.events.emit(&PointerEvent::Scroll { at, delta });
        }
    }

    /// The deferred motion batch.
    fn process_motion(&self) {
        // The from-point must advance and stay consistent even if a
        // subscriber panics mid-dispatch.
        struct FromPointGuard<'a> {
            adapter: &'a MouseAdapter,
        }
        impl Drop for FromPointGuard<'_> {
            fn drop(&mut self) {
                let mut inner = self.adapter.inner.borrow_mut();
                inner.from_point = Some(inner.current_point);
            }
        }

        let (frozen, from, to) = {
            let mut inner = self.inner.borrow_mut();
            inner.pending_motion = None;
            (
                inner.freeze_depth > 0,
                inner.from_point,
                inner.current_point,
            )
        };
        let _guard = FromPointGuard { adapter: self };

        let Some(from) = from else { return };
        if frozen || from == to {
            return;
        }

        let started = self.inner.borrow_mut().pressure.start_drags();
        for button in started {
            self.events.emit(&PointerEvent::StartDrag { at: to, button });
        }
        let pressed = self.inner.borrow().pressure.pressed_buttons();
        for button in pressed {
            self.events.emit(&PointerEvent::Pression { at: to, button });
        }
        self.events.emit(&PointerEvent::Motion { to, from });
        let dragging = self.inner.borrow().pressure.dragging_buttons();
        for button in dragging {
            self.events.emit(&PointerEvent::Drag { to, from, button });
        }
    }
}

impl Drop for MouseAdapter {
    fn drop(&mut self) {
        if let Some(id) = self.inner.borrow_mut().pending_motion.take() {
            self.scheduler.cancel(id);
        }
    }
}
