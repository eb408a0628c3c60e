//! Drag-to-scroll navigation with edge-margin rolling.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DRAG_SPEED, DEFAULT_NAVIGATION_MARGIN, DEFAULT_ROLL_SPEED, MOTION_IDLE_PRIORITY,
    NAVIGATION_TICK,
};
use crate::events::{EventSource, Subscription, WidgetEvent};
use crate::prefs::PreferencesStore;
use crate::scheduling::{Continue, Scheduler, SourceId};
use crate::types::{CursorKind, MouseButton, Point, Size};
use crate::view::View;

use super::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragNavigatorConfig {
    /// Pan multiplier per sampled motion delta; the sign picks between
    /// dragging the image and dragging the view.
    pub speed: f64,
    /// Divide speeds by the magnification for zoom-independent feel.
    pub relative_speed: bool,
    /// Pan only while the primary button is held. When false, motion
    /// alone drives continuous panning.
    pub require_click: bool,
    /// Width of the edge band that triggers continuous rolling, in
    /// pixels.
    pub margin: f64,
    /// Continuous rolling speed inside the band, in pixels per second.
    pub roll_speed: f64,
}

impl Default for DragNavigatorConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_DRAG_SPEED,
            relative_speed: true,
            require_click: true,
            margin: DEFAULT_NAVIGATION_MARGIN,
            roll_speed: DEFAULT_ROLL_SPEED,
        }
    }
}

impl DragNavigatorConfig {
    pub fn load(store: &dyn PreferencesStore) -> Self {
        let defaults = Self::default();
        Self {
            speed: store.get_double("navi.drag.speed").unwrap_or(defaults.speed),
            relative_speed: store
                .get_bool("navi.drag.relative-speed")
                .unwrap_or(defaults.relative_speed),
            require_click: store
                .get_bool("navi.drag.require-click")
                .unwrap_or(defaults.require_click),
            margin: store
                .get_double("navi.drag.margin")
                .unwrap_or(defaults.margin),
            roll_speed: store
                .get_double("navi.drag.roll-speed")
                .unwrap_or(defaults.roll_speed),
        }
    }

    pub fn save(&self, store: &mut dyn PreferencesStore) {
        store.set_double("navi.drag.speed", self.speed);
        store.set_bool("navi.drag.relative-speed", self.relative_speed);
        store.set_bool("navi.drag.require-click", self.require_click);
        store.set_double("navi.drag.margin", self.margin);
        store.set_double("navi.drag.roll-speed", self.roll_speed);
    }
}

/// Scroll direction implied by a pointer near the widget edge.
///
/// Components are -1, 0 or 1. The plain margin band selects the primary
/// axis; a band twice as wide on the opposite axis turns an edge scroll
/// diagonal near the corners.
pub fn margin_direction(allocation: Size, margin: f64, at: Point) -> Point {
    let mut dx = if at.x < margin {
        -1.0
    } else if at.x > allocation.width - margin {
        1.0
    } else {
        0.0
    };
    let mut dy = if at.y < margin {
        -1.0
    } else if at.y > allocation.height - margin {
        1.0
    } else {
        0.0
    };

    let wide = margin * 2.0;
    if dx != 0.0 && dy == 0.0 {
        if at.y < wide {
            dy = -1.0;
        } else if at.y > allocation.height - wide {
            dy = 1.0;
        }
    } else if dy != 0.0 && dx == 0.0 {
        if at.x < wide {
            dx = -1.0;
        } else if at.x > allocation.width - wide {
            dx = 1.0;
        }
    }
    Point::new(dx, dy)
}

#[derive(Default)]
struct DragState {
    dragging: bool,
    last_point: Option<Point>,
    current_point: Point,
    pending_motion: Option<SourceId>,
    roll_timer: Option<SourceId>,
    last_tick: Duration,
    cursor: Option<CursorKind>,
}

struct DragCore {
    view: Rc<RefCell<dyn View>>,
    scheduler: Rc<dyn Scheduler>,
    config: DragNavigatorConfig,
    state: RefCell<DragState>,
    subscription: RefCell<Option<Subscription>>,
    weak_self: Weak<DragCore>,
}

/// Pans the view by sampled pointer deltas, with continuous rolling when
/// the pointer sits inside an edge margin band.
///
/// States: idle and dragging. With `require_click` off there is no idle;
/// motion alone pans. The margin check runs on its own ~30 Hz timer and
/// scrolls proportionally to real elapsed time, self-cancelling once the
/// pointer leaves all bands.
pub struct DragNavigator {
    core: Rc<DragCore>,
}

impl DragNavigator {
    pub fn attach(
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        config: DragNavigatorConfig,
    ) -> Self {
        let core = Rc::new_cyclic(|weak| DragCore {
            view,
            scheduler,
            config,
            state: RefCell::new(DragState::default()),
            subscription: RefCell::new(None),
            weak_self: weak.clone(),
        });
        let weak = core.weak_self.clone();
        let subscription = source.subscribe(move |event| {
            if let Some(core) = weak.upgrade() {
                core.on_widget_event(event);
            }
        });
        *core.subscription.borrow_mut() = Some(subscription);
        tracing::debug!("drag navigator attached");
        Self { core }
    }
}

impl Navigator for DragNavigator {
    fn detach(&self) {
        self.core.teardown();
    }
}

impl Drop for DragNavigator {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

impl DragCore {
    fn on_widget_event(&self, event: &WidgetEvent) {
        match *event {
            WidgetEvent::ButtonPress {
                button: MouseButton::Left,
                at,
            } => {
                let mut state = self.state.borrow_mut();
                state.dragging = true;
                state.last_point = Some(at);
                state.current_point = at;
            }
            WidgetEvent::ButtonRelease {
                button: MouseButton::Left,
                ..
            } => {
                self.state.borrow_mut().dragging = false;
            }
            WidgetEvent::Motion { at } => self.motion(at),
            WidgetEvent::Enter { at } => {
                // Resample so re-entry does not pan by the travel outside.
                let mut state = self.state.borrow_mut();
                state.last_point = Some(at);
                state.current_point = at;
            }
            WidgetEvent::Leave => {
                self.state.borrow_mut().last_point = None;
                self.stop_rolling();
            }
            _ => {}
        }
    }

    fn motion(&self, at: Point) {
        let schedule = {
            let mut state = self.state.borrow_mut();
            state.current_point = at;
            state.pending_motion.is_none()
        };
        if schedule {
            let weak = self.weak_self.clone();
            let id = self.scheduler.add_idle(
                MOTION_IDLE_PRIORITY,
                Box::new(move || {
                    if let Some(core) = weak.upgrade() {
                        core.process_motion();
                    }
                }),
            );
            self.state.borrow_mut().pending_motion = Some(id);
        }
    }

    fn process_motion(&self) {
        let (point, last, panning) = {
            let mut state = self.state.borrow_mut();
            state.pending_motion = None;
            let last = state.last_point;
            state.last_point = Some(state.current_point);
            (
                state.current_point,
                last,
                state.dragging || !self.config.require_click,
            )
        };
        if panning {
            if let Some(last) = last {
                let delta = point - last;
                if delta != Point::ZERO {
                    let mut view = self.view.borrow_mut();
                    let mut scale = self.config.speed;
                    if self.config.relative_speed {
                        scale /= view.magnification();
                    }
                    view.pan(delta.scale(scale));
                }
            }
        }
        self.update_rolling(point);
    }

    fn update_rolling(&self, point: Point) {
        let allocation = self.view.borrow().allocation();
        let direction = margin_direction(allocation, self.config.margin, point);
        if direction == Point::ZERO {
            // Departure is noticed by the timer itself.
            return;
        }
        self.apply_cursor(CursorKind::from_direction(direction));
        let start = {
            let mut state = self.state.borrow_mut();
            if state.roll_timer.is_none() {
                state.last_tick = self.scheduler.now();
                true
            } else {
                false
            }
        };
        if start {
            let weak = self.weak_self.clone();
            let id = self.scheduler.add_timer(
                NAVIGATION_TICK,
                Box::new(move || match weak.upgrade() {
                    Some(core) => core.roll_tick(),
                    None => Continue::Remove,
                }),
            );
            self.state.borrow_mut().roll_timer = Some(id);
            tracing::trace!("margin rolling started");
        }
    }

    fn roll_tick(&self) -> Continue {
        let now = self.scheduler.now();
        let dt = {
            let mut state = self.state.borrow_mut();
            let dt = now.saturating_sub(state.last_tick);
            state.last_tick = now;
            dt
        };
        let (pointer, allocation) = {
            let view = self.view.borrow();
            (view.pointer_position(), view.allocation())
        };
        let direction = pointer
            .map(|at| margin_direction(allocation, self.config.margin, at))
            .unwrap_or(Point::ZERO);
        if direction == Point::ZERO {
            self.state.borrow_mut().roll_timer = None;
            self.apply_cursor(None);
            tracing::trace!("margin rolling stopped");
            return Continue::Remove;
        }
        self.apply_cursor(CursorKind::from_direction(direction));
        let mut view = self.view.borrow_mut();
        let mut speed = self.config.roll_speed * dt.as_secs_f64();
        if self.config.relative_speed {
            speed /= view.magnification();
        }
        view.pan(direction.scale(speed));
        Continue::Keep
    }

    fn stop_rolling(&self) {
        let timer = self.state.borrow_mut().roll_timer.take();
        if let Some(id) = timer {
            self.scheduler.cancel(id);
            self.apply_cursor(None);
            tracing::trace!("margin rolling stopped");
        }
    }

    fn apply_cursor(&self, cursor: Option<CursorKind>) {
        let changed = {
            let mut state = self.state.borrow_mut();
            if state.cursor != cursor {
                state.cursor = cursor;
                true
            } else {
                false
            }
        };
        if changed {
            self.view.borrow_mut().set_cursor(cursor);
        }
    }

    fn teardown(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if subscription.is_none() {
            return;
        }
        drop(subscription);
        let (idle, timer, cursor) = {
            let mut state = self.state.borrow_mut();
            (
                state.pending_motion.take(),
                state.roll_timer.take(),
                state.cursor.take(),
            )
        };
        if let Some(id) = idle {
            self.scheduler.cancel(id);
        }
        if let Some(id) = timer {
            self.scheduler.cancel(id);
        }
        if cursor.is_some() {
            self.view.borrow_mut().set_cursor(None);
        }
        tracing::debug!("drag navigator detached");
    }
}

pub struct DragNavigatorFactory;

impl super::NavigatorFactory for DragNavigatorFactory {
    fn codename(&self) -> &'static str {
        "drag"
    }

    fn label(&self) -> &'static str {
        "Drag to Scroll"
    }

    fn create(
        &self,
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        store: &dyn PreferencesStore,
    ) -> Box<dyn Navigator> {
        let config = DragNavigatorConfig::load(store);
        Box::new(DragNavigator::attach(view, source, scheduler, config))
    }
}
