//! The mouse handler contract.
//!
//! A handler is an independent policy object declaring, at construction,
//! which event classes it understands and which buttons it listens to.
//! The dispatcher captures the declaration at registration time; to
//! reconfigure a handler's capabilities, replace the instance.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::input::dispatcher::DispatchState;
use crate::prefs::PreferencesStore;
use crate::types::{MouseButton, Point};
use crate::view::View;

/// What a handler wants to hear about.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    /// Motion with no relevant button pressed.
    pub hovering: bool,
    /// Button pressure, including re-reports while held.
    pub pressing: bool,
    /// Drag start/continue/stop.
    pub dragging: bool,
    /// Wheel scrolling.
    pub scrolling: bool,
    /// Buttons this handler listens to, for pressing and dragging.
    pub buttons: BTreeSet<MouseButton>,
}

impl Capabilities {
    pub fn hover() -> Self {
        Self {
            hovering: true,
            ..Self::default()
        }
    }

    pub fn press_on(button: MouseButton) -> Self {
        Self {
            pressing: true,
            buttons: BTreeSet::from([button]),
            ..Self::default()
        }
    }

    pub fn drag_on(button: MouseButton) -> Self {
        Self {
            dragging: true,
            buttons: BTreeSet::from([button]),
            ..Self::default()
        }
    }

    pub fn scroll() -> Self {
        Self {
            scrolling: true,
            ..Self::default()
        }
    }

    /// Adds another subscribed button.
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.buttons.insert(button);
        self
    }
}

/// A gesture policy object invoked by the dispatcher.
///
/// Every callback receives the adapter's view, the event geometry, and the
/// dispatch state stored for this (handler, adapter) pair; returning
/// `Some` replaces that state, returning `None` keeps it. Unused callbacks
/// keep their no-op defaults.
pub trait MouseHandler {
    fn capabilities(&self) -> Capabilities;

    /// For factory settings persistence.
    fn as_any(&self) -> &dyn Any;

    fn press(
        &mut self,
        view: &mut dyn View,
        at: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, at, state);
        None
    }

    fn hover(
        &mut self,
        view: &mut dyn View,
        to: Point,
        from: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, to, from, state);
        None
    }

    fn start_drag(
        &mut self,
        view: &mut dyn View,
        at: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, at, state);
        None
    }

    fn drag(
        &mut self,
        view: &mut dyn View,
        to: Point,
        from: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, to, from, state);
        None
    }

    fn stop_drag(
        &mut self,
        view: &mut dyn View,
        at: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, at, state);
        None
    }

    fn scroll(
        &mut self,
        view: &mut dyn View,
        at: Point,
        delta: Point,
        state: Option<&DispatchState>,
    ) -> Option<DispatchState> {
        let _ = (view, at, delta, state);
        None
    }
}

/// Wraps a handler for registration with the dispatcher.
pub fn shared<H: MouseHandler + 'static>(handler: H) -> Rc<RefCell<dyn MouseHandler>> {
    Rc::new(RefCell::new(handler))
}

/// Where a transform gesture pivots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Pivot {
    /// The pointer position at the relevant moment.
    Pointer,
    /// A fixed fractional widget coordinate.
    Fixed { fraction: Point },
}

impl Pivot {
    /// The widget center.
    pub fn center() -> Self {
        Pivot::Fixed {
            fraction: Point::CENTER,
        }
    }

    /// Resolves to a widget point for the given pointer position.
    pub fn resolve(&self, view: &dyn View, pointer: Point) -> Point {
        match self {
            Pivot::Pointer => pointer,
            Pivot::Fixed { fraction } => {
                let allocation = view.allocation();
                Point::new(
                    fraction.x * allocation.width,
                    fraction.y * allocation.height,
                )
            }
        }
    }
}

impl Default for Pivot {
    fn default() -> Self {
        Pivot::Pointer
    }
}

/// Creates handlers and moves their settings through the preference
/// store. Settings-widget construction belongs to the hosting UI; these
/// are the apply/load hooks only.
pub trait HandlerFactory {
    /// Stable identifier used in preference keys.
    fn codename(&self) -> &'static str;

    /// Human-readable menu label.
    fn label(&self) -> &'static str;

    fn create_default(&self) -> Rc<RefCell<dyn MouseHandler>>;

    /// Persists a handler's settings under the factory's codename.
    fn save_settings(
        &self,
        handler: &Rc<RefCell<dyn MouseHandler>>,
        store: &mut dyn PreferencesStore,
    );

    /// Builds a handler from stored settings, falling back to defaults
    /// for anything missing or malformed.
    fn load_settings(&self, store: &dyn PreferencesStore) -> Rc<RefCell<dyn MouseHandler>>;
}

/// Preference key for a factory's settings blob.
pub(crate) fn settings_key(codename: &str) -> String {
    format!("mouse-handler.{codename}")
}

/// Serializes a config value into the store under the factory codename.
pub(crate) fn save_config<C: Serialize>(
    codename: &str,
    config: &C,
    store: &mut dyn PreferencesStore,
) {
    match serde_json::to_string(config) {
        Ok(blob) => store.set_string(&settings_key(codename), &blob),
        Err(error) => {
            tracing::warn!(codename, %error, "could not serialize handler settings");
        }
    }
}

/// Reads a config value back, falling back when absent or malformed.
pub(crate) fn load_config_or<C: for<'de> Deserialize<'de>>(
    codename: &str,
    store: &dyn PreferencesStore,
    fallback: C,
) -> C {
    let Some(blob) = store.get_string(&settings_key(codename)) else {
        return fallback;
    };
    match serde_json::from_str(&blob) {
        Ok(config) => config,
        Err(error) => {
            tracing::warn!(codename, %error, "ignoring malformed handler settings");
            fallback
        }
    }
}
