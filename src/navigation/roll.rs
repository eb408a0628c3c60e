//! Roll navigation: scroll along the pointer's offset from center.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_NAVIGATION_MARGIN, DEFAULT_ROLL_SPEED, DEFAULT_ROLL_THRESHOLD, NAVIGATION_TICK,
};
use crate::events::{EventSource, Subscription, WidgetEvent};
use crate::prefs::PreferencesStore;
use crate::scheduling::{Continue, Scheduler, SourceId};
use crate::types::{CursorKind, Point};
use crate::view::View;

use super::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollNavigatorConfig {
    /// Top rolling speed at the sphere edge, in pixels per second.
    pub speed: f64,
    /// Divide the speed by the magnification for zoom-independent feel.
    pub relative_speed: bool,
    /// Margin trimmed off the sphere radius; pointing inside it always
    /// rolls.
    pub margin: f64,
    /// Offset from center, in pixels, below which nothing rolls.
    pub threshold: f64,
}

impl Default for RollNavigatorConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_ROLL_SPEED,
            relative_speed: true,
            margin: DEFAULT_NAVIGATION_MARGIN,
            threshold: DEFAULT_ROLL_THRESHOLD,
        }
    }
}

impl RollNavigatorConfig {
    pub fn load(store: &dyn PreferencesStore) -> Self {
        let defaults = Self::default();
        Self {
            speed: store.get_double("navi.roll.speed").unwrap_or(defaults.speed),
            relative_speed: store
                .get_bool("navi.roll.relative-speed")
                .unwrap_or(defaults.relative_speed),
            margin: store
                .get_double("navi.roll.margin")
                .unwrap_or(defaults.margin),
            threshold: store
                .get_double("navi.roll.threshold")
                .unwrap_or(defaults.threshold),
        }
    }

    pub fn save(&self, store: &mut dyn PreferencesStore) {
        store.set_double("navi.roll.speed", self.speed);
        store.set_bool("navi.roll.relative-speed", self.relative_speed);
        store.set_double("navi.roll.margin", self.margin);
        store.set_double("navi.roll.threshold", self.threshold);
    }
}

#[derive(Default)]
struct RollState {
    timer: Option<SourceId>,
    last_tick: Duration,
    cursor: Option<CursorKind>,
}

struct RollCore {
    view: Rc<RefCell<dyn View>>,
    scheduler: Rc<dyn Scheduler>,
    config: RollNavigatorConfig,
    state: RefCell<RollState>,
    subscription: RefCell<Option<Subscription>>,
    weak_self: Weak<RollCore>,
}

/// Scrolls continuously in the direction of the pointer's offset from the
/// widget center.
///
/// The offset is normalized against a sphere radius of half the larger
/// widget dimension minus the margin. Past the activation threshold (or
/// inside the edge margin) a ~30 Hz timer scrolls with a speed that grows
/// by a cubic ease-out of the offset fraction, scaled by real elapsed
/// time; an 8-way cursor points along the roll. Leaving the widget
/// cancels immediately.
pub struct RollNavigator {
    core: Rc<RollCore>,
}

impl RollNavigator {
    pub fn attach(
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        config: RollNavigatorConfig,
    ) -> Self {
        let core = Rc::new_cyclic(|weak| RollCore {
            view,
            scheduler,
            config,
            state: RefCell::new(RollState::default()),
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
        tracing::debug!("roll navigator attached");
        Self { core }
    }
}

impl Navigator for RollNavigator {
    fn detach(&self) {
        self.core.teardown();
    }
}

impl Drop for RollNavigator {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

impl RollCore {
    fn on_widget_event(&self, event: &WidgetEvent) {
        match *event {
            WidgetEvent::Motion { at } | WidgetEvent::Enter { at } => {
                if let Some(offset) = self.active_offset(at) {
                    self.apply_cursor(CursorKind::from_direction(offset));
                    self.ensure_timer();
                }
            }
            WidgetEvent::Leave => self.stop(),
            _ => {}
        }
    }

    /// The pointer's center offset when it calls for rolling.
    fn active_offset(&self, at: Point) -> Option<Point> {
        let view = self.view.borrow();
        let allocation = view.allocation();
        let offset = at - allocation.center();
        let in_margin = at.x < self.config.margin
            || at.x > allocation.width - self.config.margin
            || at.y < self.config.margin
            || at.y > allocation.height - self.config.margin;
        if offset.length() > self.config.threshold || in_margin {
            Some(offset)
        } else {
            None
        }
    }

    fn ensure_timer(&self) {
        let start = {
            let mut state = self.state.borrow_mut();
            if state.timer.is_none() {
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
                    Some(core) => core.tick(),
                    None => Continue::Remove,
                }),
            );
            self.state.borrow_mut().timer = Some(id);
            tracing::trace!("rolling started");
        }
    }

    fn tick(&self) -> Continue {
        let now = self.scheduler.now();
        let dt = {
            let mut state = self.state.borrow_mut();
            let dt = now.saturating_sub(state.last_tick);
            state.last_tick = now;
            dt
        };
        let pointer = self.view.borrow().pointer_position();
        let offset = pointer.and_then(|at| self.active_offset(at));
        let Some(offset) = offset else {
            self.state.borrow_mut().timer = None;
            self.apply_cursor(None);
            tracing::trace!("rolling stopped");
            return Continue::Remove;
        };

        let length = offset.length();
        if length == 0.0 {
            return Continue::Keep;
        }
        self.apply_cursor(CursorKind::from_direction(offset));

        let allocation = self.view.borrow().allocation();
        let radius = allocation.width.max(allocation.height) / 2.0 - self.config.margin;
        let fraction = if radius > self.config.threshold {
            ((length - self.config.threshold) / (radius - self.config.threshold)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = 1.0 - (1.0 - fraction).powi(3);

        let mut view = self.view.borrow_mut();
        let mut speed = self.config.speed * eased * dt.as_secs_f64();
        if self.config.relative_speed {
            speed /= view.magnification();
        }
        view.pan(offset.scale(speed / length));
        Continue::Keep
    }

    fn stop(&self) {
        let timer = self.state.borrow_mut().timer.take();
        if let Some(id) = timer {
            self.scheduler.cancel(id);
            tracing::trace!("rolling stopped");
        }
        self.apply_cursor(None);
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
        self.stop();
        tracing::debug!("roll navigator detached");
    }
}

pub struct RollNavigatorFactory;

impl super::NavigatorFactory for RollNavigatorFactory {
    fn codename(&self) -> &'static str {
        "roll"
    }

    fn label(&self) -> &'static str {
        "Roll Around the Center"
    }

    fn create(
        &self,
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        store: &dyn PreferencesStore,
    ) -> Box<dyn Navigator> {
        let config = RollNavigatorConfig::load(store);
        Box::new(RollNavigator::attach(view, source, scheduler, config))
    }
}
