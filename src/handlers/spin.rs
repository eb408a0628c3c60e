//! Spin the view by dragging around a pivot.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SPIN_FREQUENCY, SPIN_SOFT_RADIUS, SPIN_THRESHOLD};
use crate::input::handler::{load_config_or, save_config};
use crate::input::{Capabilities, DispatchState, HandlerFactory, MouseHandler, Pivot};
use crate::prefs::PreferencesStore;
use crate::types::{MouseButton, Point};
use crate::view::{Pin, View};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// View turns per revolution of the pointer around the pivot.
    pub frequency: f64,
    pub pivot: Pivot,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_SPIN_FREQUENCY,
            pivot: Pivot::default(),
        }
    }
}

/// Gesture context captured at drag start: the resolved pivot and the
/// content pin under it, valid until the drag stops.
struct SpinGesture {
    pivot: Point,
    pin: Pin,
}

/// Rotates the view on a secondary-button drag.
///
/// The rotation delta is the pointer's angular travel around the pivot
/// times the frequency, softened near the pivot and suppressed entirely
/// inside a small dead zone where the lever arm is all jitter.
#[derive(Debug, Default)]
pub struct DragSpinHandler {
    pub config: SpinConfig,
}

impl DragSpinHandler {
    pub fn new(config: SpinConfig) -> Self {
        Self { config }
    }
}

impl MouseHandler for DragSpinHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::drag_on(MouseButton::Right)
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
        let pin = view.get_pin(pivot);
        Some(DispatchState::new(SpinGesture { pivot, pin }))
    }

    fn drag(
        &mut self,
        view: &mut dyn View,
        to: Point,
        from: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let Some(gesture) = state.and_then(|state| state.downcast_ref::<SpinGesture>()) else {
            return None;
        };

        let to_arm = to - gesture.pivot;
        let from_arm = from - gesture.pivot;

        let mut effect =
            (to_arm.angle_degrees() - from_arm.angle_degrees()) * self.config.frequency;
        // Normalize into (-180, 180] so the short way around wins.
        effect %= 360.0;
        if effect > 180.0 {
            effect -= 360.0;
        } else if effect <= -180.0 {
            effect += 360.0;
        }

        let square_distance = to_arm.square_length();
        if square_distance > SPIN_THRESHOLD * SPIN_THRESHOLD {
            let square_soft_radius = SPIN_SOFT_RADIUS * SPIN_SOFT_RADIUS;
            if square_distance < square_soft_radius {
                effect *= square_distance / square_soft_radius;
            }
            view.set_rotation((view.rotation() + effect).rem_euclid(360.0));
            view.adjust_to_pin(&gesture.pin);
        }
        None
    }
}

pub struct DragSpinFactory;

impl HandlerFactory for DragSpinFactory {
    fn codename(&self) -> &'static str {
        "spin"
    }

    fn label(&self) -> &'static str {
        "Drag to Spin"
    }

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>> {
        Rc::new(RefCell::new(DragSpinHandler::default()))
    }

    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    ) {
        let handler = handler.borrow();
        if let Some(spin) = handler.as_any().downcast_ref::<DragSpinHandler>() {
            save_config(self.codename(), &spin.config, store);
        }
    }

    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>> {
        let config = load_config_or(self.codename(), store, SpinConfig::default());
        Rc::new(RefCell::new(DragSpinHandler::new(config)))
    }
}
