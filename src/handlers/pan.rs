//! Panning on pointer motion: the hover and drag variants.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DRAG_SPEED, DEFAULT_HOVER_SPEED};
use crate::input::handler::{load_config_or, save_config};
use crate::input::{Capabilities, DispatchState, HandlerFactory, MouseHandler};
use crate::prefs::PreferencesStore;
use crate::types::{CursorKind, MouseButton, Point};
use crate::view::View;

/// Tunables shared by the hover and drag pan handlers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanConfig {
    /// Displacement multiplier. The sign picks the feel: positive pans the
    /// view along the pointer, negative drags the image under it.
    pub speed: f64,
    /// Divide by the current magnification so perceived speed does not
    /// change with zoom.
    pub relative_speed: bool,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_HOVER_SPEED,
            relative_speed: true,
        }
    }
}

impl PanConfig {
    /// Drag-pan defaults: drag the image, not the view.
    pub fn dragging() -> Self {
        Self {
            speed: DEFAULT_DRAG_SPEED,
            relative_speed: true,
        }
    }
}

fn pan_by(view: &mut dyn View, to: Point, from: Point, config: &PanConfig) {
    let mut scale = config.speed;
    if config.relative_speed {
        scale /= view.magnification();
    }
    view.pan((to - from).scale(scale));
}

/// Pans the view as the pointer hovers, no button involved.
#[derive(Debug, Default)]
pub struct HoverPanHandler {
    pub config: PanConfig,
}

impl HoverPanHandler {
    pub fn new(config: PanConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for HoverPanHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::hover()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn hover(
        &mut self,
        view: &mut dyn View,
        to: Point,
        from: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        pan_by(view, to, from, &self.config);
        None
    }
}

/// Pans the view on a primary-button drag, showing a move cursor while
/// the drag lasts.
#[derive(Debug)]
pub struct DragPanHandler {
    pub config: PanConfig,
}

impl DragPanHandler {
    pub fn new(config: PanConfig) -> Self {
        Self { config }
    }
}

impl Default for DragPanHandler {
    fn default() -> Self {
        Self::new(PanConfig::dragging())
    }
}

impl MouseHandler for DragPanHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::drag_on(MouseButton::Left)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn start_drag(
        &mut self,
        view: &mut dyn View,
        _at: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        view.set_cursor(Some(CursorKind::Move));
        None
    }

    fn drag(
        &mut self,
        view: &mut dyn View,
        to: Point,
        from: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        pan_by(view, to, from, &self.config);
        None
    }

    fn stop_drag(
        &mut self,
        view: &mut dyn View,
        _at: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        view.set_cursor(None);
        None
    }
}

pub struct HoverPanFactory;

impl HandlerFactory for HoverPanFactory {
    fn codename(&self) -> &'static str {
        "hover"
    }

    fn label(&self) -> &'static str {
        "Move Mouse to Pan"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(HoverPanHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(pan) = handler.as_any().downcast_ref::<HoverPanHandler>() {
            save_config(self.codename(), &pan.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, PanConfig::default());
        Rc::new(RefCell::new(HoverPanHandler::new(config)))
    }
}

pub struct DragPanFactory;

impl HandlerFactory for DragPanFactory {
    fn codename(&self) -> &'static str {
        "drag"
    }

    fn label(&self) -> &'static str {
        "Drag to Pan"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(DragPanHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(pan) = handler.as_any().downcast_ref::<DragPanHandler>() {
            save_config(self.codename(), &pan.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, PanConfig::dragging());
        Rc::new(RefCell::new(DragPanHandler::new(config)))
    }
}
