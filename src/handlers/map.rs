//! Jump the view like a minimap: a click maps linearly onto the content.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAP_MARGIN;
use crate::input::handler::{load_config_or, save_config};
use crate::input::{Capabilities, DispatchState, HandlerFactory, MouseHandler};
use crate::mapping::{map_rectangle, map_to_range, MapMode};
use crate::prefs::PreferencesStore;
use crate::types::{MouseButton, Point, Size};
use crate::view::View;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapClickConfig {
    /// Margin subtracted from the allocation before mapping, in pixels.
    pub margin: f64,
    pub mode: MapMode,
}

impl Default for MapClickConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MAP_MARGIN,
            mode: MapMode::default(),
        }
    }
}

/// On a primary-button press, jumps the view so the scroll position
/// mirrors where the click landed inside the margin-adjusted rectangle.
///
/// Because pressure is re-reported on every motion batch while the button
/// is held, holding and moving tracks the pointer like dragging a minimap
/// puck.
#[derive(Debug, Default)]
pub struct MapClickHandler {
    pub config: MapClickConfig,
}

impl MapClickHandler {
    pub fn new(config: MapClickConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for MapClickHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::press_on(MouseButton::Left)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn press(
        &mut self,
        view: &mut dyn View,
        at: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let h = view.hadjustment();
        let v = view.vadjustment();
        let content = Size::new(h.upper - h.lower, v.upper - v.lower);
        let rect = map_rectangle(view.allocation(), self.config.margin, self.config.mode, content);
        let (tx, ty) = map_to_range(rect, at, &h, &v);
        view.adjust_to(tx, ty);
        None
    }
}

pub struct MapClickFactory;

impl HandlerFactory for MapClickFactory {
    fn codename(&self) -> &'static str {
        "map"
    }

    fn label(&self) -> &'static str {
        "Click Like a Map"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(MapClickHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(map) = handler.as_any().downcast_ref::<MapClickHandler>() {
            save_config(self.codename(), &map.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, MapClickConfig::default());
        Rc::new(RefCell::new(MapClickHandler::new(config)))
    }
}
