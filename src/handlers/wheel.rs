//! Wheel-driven strategies: scroll to pan, zoom, or spin.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_WHEEL_PIXEL_SPEED, DEFAULT_WHEEL_RELATIVE_SPEED, DEFAULT_WHEEL_SPIN_EFFECT,
    DEFAULT_WHEEL_ZOOM_EFFECT,
};
use crate::input::handler::{load_config_or, save_config};
use crate::input::{Capabilities, DispatchState, HandlerFactory, MouseHandler, Pivot};
use crate::prefs::PreferencesStore;
use crate::types::Point;
use crate::view::View;

/// How wheel axes map onto content axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SwapMode {
    /// Vertical wheel scrolls vertically.
    #[default]
    None,
    /// Axes exchanged unconditionally.
    Swap,
    /// Vertical wheel motion drives whichever content axis has more
    /// room relative to the viewport.
    VerticalGreater,
    /// Horizontal wheel motion drives the greater axis.
    HorizontalGreater,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelPanConfig {
    /// Pixels per wheel tick when not scrolling relatively.
    pub pixel_speed: f64,
    /// Fraction of the viewport per wheel tick when scrolling relatively.
    pub relative_speed: f64,
    pub relative_scrolling: bool,
    pub inverse_horizontal: bool,
    pub inverse_vertical: bool,
    pub swap: SwapMode,
}

impl Default for WheelPanConfig {
    fn default() -> Self {
        Self {
            pixel_speed: DEFAULT_WHEEL_PIXEL_SPEED,
            relative_speed: DEFAULT_WHEEL_RELATIVE_SPEED,
            relative_scrolling: true,
            inverse_horizontal: false,
            inverse_vertical: false,
            swap: SwapMode::None,
        }
    }
}

/// Pans the view on wheel scrolling.
#[derive(Debug, Default)]
pub struct WheelPanHandler {
    pub config: WheelPanConfig,
}

impl WheelPanHandler {
    pub fn new(config: WheelPanConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for WheelPanHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::scroll()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn scroll(
        &mut self,
        view: &mut dyn View,
        _at: Point,
        delta: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let config = &self.config;
        let viewport = view.allocation();
        let mut shift = if config.relative_scrolling {
            delta.multiply(
                Point::new(viewport.width, viewport.height).scale(config.relative_speed),
            )
        } else {
            delta.scale(config.pixel_speed)
        };

        let h = view.hadjustment();
        let v = view.vadjustment();
        // Room left to scroll per axis, relative to the viewport.
        let unviewed_ratio = Point::new(
            (h.upper - h.lower) / viewport.width.max(1.0),
            (v.upper - v.lower) / viewport.height.max(1.0),
        );
        let swap = match config.swap {
            SwapMode::None => false,
            SwapMode::Swap => true,
            SwapMode::VerticalGreater => unviewed_ratio.is_wide(),
            SwapMode::HorizontalGreater => !unviewed_ratio.is_wide(),
        };
        if swap {
            shift = Point::new(shift.y, shift.x);
        }
        if config.inverse_horizontal {
            shift.x = -shift.x;
        }
        if config.inverse_vertical {
            shift.y = -shift.y;
        }
        view.pan(shift);
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelZoomConfig {
    /// Magnification multiplier per wheel tick.
    pub effect: f64,
    pub inverse: bool,
    /// Activate on the horizontal wheel axis instead of the vertical one.
    pub horizontal: bool,
    pub magnify_anchor: Pivot,
    pub minify_anchor: Pivot,
}

impl Default for WheelZoomConfig {
    fn default() -> Self {
        Self {
            effect: DEFAULT_WHEEL_ZOOM_EFFECT,
            inverse: false,
            horizontal: false,
            magnify_anchor: Pivot::center(),
            minify_anchor: Pivot::center(),
        }
    }
}

/// Zooms the view on wheel scrolling, anchored so the content under the
/// chosen anchor stays put.
#[derive(Debug, Default)]
pub struct WheelZoomHandler {
    pub config: WheelZoomConfig,
}

impl WheelZoomHandler {
    pub fn new(config: WheelZoomConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for WheelZoomHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::scroll()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn scroll(
        &mut self,
        view: &mut dyn View,
        at: Point,
        delta: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let config = &self.config;
        // Wheel-up means zoom in, hence the sign flip.
        let ticks = -(if config.horizontal { delta.x } else { delta.y });
        if ticks == 0.0 || config.effect == 0.0 {
            return None;
        }
        let power = if config.inverse {
            config.effect.powf(-ticks)
        } else {
            config.effect.powf(ticks)
        };
        let anchor = if power < 1.0 {
            &config.minify_anchor
        } else {
            &config.magnify_anchor
        };
        let anchor_point = anchor.resolve(view, at);
        let pin = view.get_pin(anchor_point);
        let magnification = view.magnification();
        view.set_magnification(magnification * power);
        view.adjust_to_pin(&pin);
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelSpinConfig {
    /// Degrees of rotation per wheel tick.
    pub effect: f64,
    /// Activate on the horizontal wheel axis instead of the vertical one.
    pub horizontal: bool,
    pub pivot: Pivot,
}

impl Default for WheelSpinConfig {
    fn default() -> Self {
        Self {
            effect: DEFAULT_WHEEL_SPIN_EFFECT,
            horizontal: false,
            pivot: Pivot::default(),
        }
    }
}

/// Rotates the view a fixed step per wheel tick, pin-anchored.
#[derive(Debug, Default)]
pub struct WheelSpinHandler {
    pub config: WheelSpinConfig,
}

impl WheelSpinHandler {
    pub fn new(config: WheelSpinConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for WheelSpinHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::scroll()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn scroll(
        &mut self,
        view: &mut dyn View,
        at: Point,
        delta: Point,
        _state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let config = &self.config;
        let ticks = -(if config.horizontal { delta.x } else { delta.y });
        if ticks == 0.0 {
            return None;
        }
        let anchor_point = config.pivot.resolve(view, at);
        let pin = view.get_pin(anchor_point);
        let rotation = view.rotation();
        view.set_rotation((rotation + config.effect * ticks).rem_euclid(360.0));
        view.adjust_to_pin(&pin);
        None
    }
}

pub struct WheelPanFactory;

impl HandlerFactory for WheelPanFactory {
    fn codename(&self) -> &'static str {
        "scroll"
    }

    fn label(&self) -> &'static str {
        "Scroll to Pan"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(WheelPanHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(pan) = handler.as_any().downcast_ref::<WheelPanHandler>() {
            save_config(self.codename(), &pan.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, WheelPanConfig::default());
        Rc::new(RefCell::new(WheelPanHandler::new(config)))
    }
}

pub struct WheelZoomFactory;

impl HandlerFactory for WheelZoomFactory {
    fn codename(&self) -> &'static str {
        "zoom"
    }

    fn label(&self) -> &'static str {
        "Scroll to Zoom"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(WheelZoomHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(zoom) = handler.as_any().downcast_ref::<WheelZoomHandler>() {
            save_config(self.codename(), &zoom.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, WheelZoomConfig::default());
        Rc::new(RefCell::new(WheelZoomHandler::new(config)))
    }
}

pub struct WheelSpinFactory;

impl HandlerFactory for WheelSpinFactory {
    fn codename(&self) -> &'static str {
        "gear"
    }

    fn label(&self) -> &'static str {
        "Scroll to Spin"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(WheelSpinHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(spin) = handler.as_any().downcast_ref::<WheelSpinHandler>() {
            save_config(self.codename(), &spin.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, WheelSpinConfig::default());
        Rc::new(RefCell::new(WheelSpinHandler::new(config)))
    }
}
