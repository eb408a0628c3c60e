//! Map navigation: absolute positioning from the pointer position.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAP_MARGIN, MOTION_IDLE_PRIORITY};
use crate::events::{EventSource, Subscription, WidgetEvent};
use crate::mapping::{map_rectangle, map_to_range, MapMode};
use crate::prefs::PreferencesStore;
use crate::scheduling::{Scheduler, SourceId};
use crate::types::{CursorKind, MouseButton, Point, Size};
use crate::view::View;

use super::Navigator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapNavigatorConfig {
    pub mode: MapMode,
    /// Margin subtracted from the allocation before mapping, in pixels.
    pub margin: f64,
    /// Track the pointer only while the primary button is held.
    pub require_click: bool,
}

impl Default for MapNavigatorConfig {
    fn default() -> Self {
        Self {
            mode: MapMode::default(),
            margin: DEFAULT_MAP_MARGIN,
            require_click: false,
        }
    }
}

impl MapNavigatorConfig {
    pub fn load(store: &dyn PreferencesStore) -> Self {
        let defaults = Self::default();
        Self {
            mode: store
                .get_string("navi.map.mode")
                .and_then(|code| MapMode::from_code(&code))
                .unwrap_or(defaults.mode),
            margin: store
                .get_double("navi.map.margin")
                .unwrap_or(defaults.margin),
            require_click: store
                .get_bool("navi.map.require-click")
                .unwrap_or(defaults.require_click),
        }
    }

    pub fn save(&self, store: &mut dyn PreferencesStore) {
        store.set_string("navi.map.mode", self.mode.code());
        store.set_double("navi.map.margin", self.margin);
        store.set_bool("navi.map.require-click", self.require_click);
    }
}

#[derive(Default)]
struct MapState {
    button_down: bool,
    pointer: Option<Point>,
    pending: Option<SourceId>,
}

struct MapCore {
    view: Rc<RefCell<dyn View>>,
    scheduler: Rc<dyn Scheduler>,
    config: MapNavigatorConfig,
    state: RefCell<MapState>,
    subscription: RefCell<Option<Subscription>>,
    weak_self: Weak<MapCore>,
}

/// Positions the view absolutely: the scroll value mirrors where the
/// pointer sits inside the margin-adjusted mapping rectangle. No inertia;
/// every qualifying motion and every layout change resets the position
/// outright. A crosshair cursor marks the mode for its whole lifetime.
pub struct MapNavigator {
    core: Rc<MapCore>,
}

impl MapNavigator {
    pub fn attach(
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        config: MapNavigatorConfig,
    ) -> Self {
        view.borrow_mut().set_cursor(Some(CursorKind::Crosshair));
        let core = Rc::new_cyclic(|weak| MapCore {
            view,
            scheduler,
            config,
            state: RefCell::new(MapState::default()),
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
        tracing::debug!("map navigator attached");
        Self { core }
    }
}

impl Navigator for MapNavigator {
    fn detach(&self) {
        self.core.teardown();
    }
}

impl Drop for MapNavigator {
    fn drop(&mut self) {
        self.core.teardown();
    }
}

impl MapCore {
    fn on_widget_event(&self, event: &WidgetEvent) {
        match *event {
            WidgetEvent::ButtonPress {
                button: MouseButton::Left,
                at,
            } => {
                {
                    let mut state = self.state.borrow_mut();
                    state.button_down = true;
                    state.pointer = Some(at);
                }
                self.schedule_refresh();
            }
            WidgetEvent::ButtonRelease {
                button: MouseButton::Left,
                ..
            } => {
                self.state.borrow_mut().button_down = false;
            }
            WidgetEvent::Motion { at } | WidgetEvent::Enter { at } => {
                let qualifying = {
                    let mut state = self.state.borrow_mut();
                    state.pointer = Some(at);
                    !self.config.require_click || state.button_down
                };
                if qualifying {
                    self.schedule_refresh();
                }
            }
            WidgetEvent::Leave => {
                self.state.borrow_mut().pointer = None;
            }
            WidgetEvent::LayoutChanged => self.schedule_refresh(),
            _ => {}
        }
    }

    fn schedule_refresh(&self) {
        if self.state.borrow().pending.is_some() {
            return;
        }
        let weak = self.weak_self.clone();
        let id = self.scheduler.add_idle(
            MOTION_IDLE_PRIORITY,
            Box::new(move || {
                if let Some(core) = weak.upgrade() {
                    core.refresh();
                }
            }),
        );
        self.state.borrow_mut().pending = Some(id);
    }

    /// Maps the current pointer position straight onto the content range.
    fn refresh(&self) {
        let (pointer, qualifying) = {
            let mut state = self.state.borrow_mut();
            state.pending = None;
            (
                state.pointer,
                !self.config.require_click || state.button_down,
            )
        };
        let mut view = self.view.borrow_mut();
        let pointer = pointer.or_else(|| view.pointer_position());
        let Some(pointer) = pointer else { return };
        if !qualifying {
            return;
        }
        let h = view.hadjustment();
        let v = view.vadjustment();
        let content = Size::new(h.upper - h.lower, v.upper - v.lower);
        let rect = map_rectangle(view.allocation(), self.config.margin, self.config.mode, content);
        let (tx, ty) = map_to_range(rect, pointer, &h, &v);
        view.adjust_to(tx, ty);
    }

    fn teardown(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if subscription.is_none() {
            return;
        }
        drop(subscription);
        let pending = self.state.borrow_mut().pending.take();
        if let Some(id) = pending {
            self.scheduler.cancel(id);
        }
        self.view.borrow_mut().set_cursor(None);
        tracing::debug!("map navigator detached");
    }
}

pub struct MapNavigatorFactory;

impl super::NavigatorFactory for MapNavigatorFactory {
    fn codename(&self) -> &'static str {
        "map"
    }

    fn label(&self) -> &'static str {
        "Point Like a Map"
    }

    fn create(
        &self,
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        store: &dyn PreferencesStore,
    ) -> Box<dyn Navigator> {
        let config = MapNavigatorConfig::load(store);
        Box::new(MapNavigator::attach(view, source, scheduler, config))
    }
}
