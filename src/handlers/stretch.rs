//! Zoom the view by dragging away from a pivot.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::ZOOM_MIN_DISTANCE;
use crate::input::handler::{load_config_or, save_config};
use crate::input::{Capabilities, DispatchState, HandlerFactory, MouseHandler, Pivot};
use crate::prefs::PreferencesStore;
use crate::types::{MouseButton, Point};
use crate::view::{Pin, View};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragZoomConfig {
    /// Anchor the zoom keeps stationary; fixed fractional by default.
    pub pivot: Pivot,
}

impl Default for DragZoomConfig {
    fn default() -> Self {
        Self {
            pivot: Pivot::center(),
        }
    }
}

/// Captured at drag start: magnification per pixel of pivot distance, the
/// resolved pivot, and the content pin under it.
struct ZoomGesture {
    ratio: f64,
    pivot: Point,
    pin: Pin,
}

/// Stretches or shrinks the view on a middle-button drag.
///
/// Dragging away from the pivot magnifies, dragging toward it shrinks;
/// the distance is clamped from below so a grab right on the pivot cannot
/// produce an absurd ratio.
#[derive(Debug, Default)]
pub struct DragZoomHandler {
    pub config: DragZoomConfig,
}

impl DragZoomHandler {
    pub fn new(config: DragZoomConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for DragZoomHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::drag_on(MouseButton::Middle)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn start_drag(
        &mut self,
        view: &mut dyn View,
        at: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let pivot = self.config.pivot.resolve(view, at);
        let distance = (at - pivot).length().max(ZOOM_MIN_DISTANCE);
        Some(DispatchState::new(ZoomGesture {
            ratio: view.magnification() / distance,
            pivot,
            pin: view.get_pin(pivot),
        }))
    }

    fn drag(
        &mut self,
        view: &mut dyn View,
        to: Point,
        _from: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let Some(gesture) = state.and_then(|state| state.downcast_ref::<ZoomGesture>()) else {
            return None;
        };
        let distance = (to - gesture.pivot).length().max(ZOOM_MIN_DISTANCE);
        view.set_magnification(distance * gesture.ratio);
        view.adjust_to_pin(&gesture.pin);
        None
    }
}

pub struct DragZoomFactory;

impl HandlerFactory for DragZoomFactory {
    fn codename(&self) -> &'static str {
        "stretch"
    }

    fn label(&self) -> &'static str {
        "Drag to Zoom"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(DragZoomHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(zoom) = handler.as_any().downcast_ref::<DragZoomHandler>() {
            save_config(self.codename(), &zoom.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, DragZoomConfig::default());
        Rc::new(RefCell::new(DragZoomHandler::new(config)))
    }
}
