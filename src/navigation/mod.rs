//! Autonomous navigators.
//!
//! A navigator is an alternative interaction mode that bypasses the
//! gesture dispatcher entirely: it subscribes to a widget's raw events,
//! attaches directly to the view, and repositions scrolling continuously,
//! using an idle callback to batch motion and a ~30 Hz timer while its
//! trigger condition holds.
//!
//! Only one navigator should be attached to a given view at a time.
//! Detaching (or dropping) a navigator synchronously cancels its raw
//! subscription, pending idle callback, and running timer; no callback
//! ever fires against a view the navigator has let go of.
//!
//! Tunables are plain config values passed at attachment and persisted
//! explicitly through the preference store at the settings boundary.

mod drag;
mod map;
mod roll;

pub use drag::{margin_direction, DragNavigator, DragNavigatorConfig, DragNavigatorFactory};
pub use map::{MapNavigator, MapNavigatorConfig, MapNavigatorFactory};
pub use roll::{RollNavigator, RollNavigatorConfig, RollNavigatorFactory};

use std::cell::RefCell;
use std::rc::Rc;

use crate::events::EventSource;
use crate::events::WidgetEvent;
use crate::prefs::PreferencesStore;
use crate::scheduling::Scheduler;
use crate::view::View;

/// A live navigator attachment.
pub trait Navigator {
    /// Cancels the raw subscription and any pending idle or timer source.
    /// Idempotent; also runs on drop.
    fn detach(&self);
}

/// Creates navigators and moves their settings through the preference
/// store; the registry the hosting UI builds its mode menu from.
pub trait NavigatorFactory {
    /// Stable identifier used in preference keys.
    fn codename(&self) -> &'static str;

    /// Human-readable menu label.
    fn label(&self) -> &'static str;

    /// Attaches a new navigator to `view`, configured from `store`.
    fn create(
        &self,
        view: Rc<RefCell<dyn View>>,
        source: &EventSource<WidgetEvent>,
        scheduler: Rc<dyn Scheduler>,
        store: &dyn PreferencesStore,
    ) -> Box<dyn Navigator>;
}

/// Every built-in navigator factory, in menu order.
pub fn standard_navigators() -> Vec<Box<dyn NavigatorFactory>> {
    vec![
        Box::new(DragNavigatorFactory),
        Box::new(RollNavigatorFactory),
        Box::new(MapNavigatorFactory),
    ]
}
