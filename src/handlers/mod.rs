//! Mouse handler strategies.
//!
//! Each handler is an independent policy object over the shared
//! [`MouseHandler`](crate::input::MouseHandler) contract: pan on hover or
//! drag, jump the view like a minimap on click, spin or zoom around a
//! pivot on drag, and the wheel-driven variants of pan/zoom/spin.
//!
//! Handlers carry their own serde config and come with a
//! [`HandlerFactory`] for the settings boundary; `standard_handlers()`
//! lists every built-in factory in menu order.

mod map;
mod pan;
mod spin;
mod stretch;
mod wheel;

pub use map::{MapClickConfig, MapClickFactory, MapClickHandler};
pub use pan::{DragPanFactory, DragPanHandler, HoverPanFactory, HoverPanHandler, PanConfig};
pub use spin::{DragSpinFactory, DragSpinHandler, SpinConfig};
pub use stretch::{DragZoomConfig, DragZoomFactory, DragZoomHandler};
pub use wheel::{
    SwapMode, WheelPanConfig, WheelPanFactory, WheelPanHandler, WheelSpinConfig,
    WheelSpinFactory, WheelSpinHandler, WheelZoomConfig, WheelZoomFactory, WheelZoomHandler,
};

use crate::input::HandlerFactory;

/// Every built-in handler factory, in menu order.
pub fn standard_handlers() -> Vec<Box<dyn HandlerFactory>> {
    vec![
        Box::new(DragPanFactory),
        Box::new(HoverPanFactory),
        Box::new(MapClickFactory),
        Box::new(DragSpinFactory),
        Box::new(DragZoomFactory),
        Box::new(WheelPanFactory),
        Box::new(WheelZoomFactory),
        Box::new(WheelSpinFactory),
    ]
}
