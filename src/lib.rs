//! panview — the mouse-interaction layer of an image viewer.
//!
//! This crate decides *what adjustment to request* from a scrollable,
//! zoomable, rotatable view given pointer motion; it renders nothing and
//! owns no toolkit types. The hosting UI feeds raw pointer events into an
//! [`events::EventSource`], implements [`view::View`] over its image
//! widget, and provides a [`scheduling::Scheduler`] over its event loop.
//!
//! Three layers build on that seam:
//!
//! - [`input`]: the [`input::MouseAdapter`] coalesces raw events into
//!   semantic gestures (pression, click, drag start/continue/stop, batched
//!   motion), and the [`input::GestureDispatcher`] routes them to
//!   registered [`input::MouseHandler`]s by declared capability and
//!   button.
//! - [`handlers`]: the built-in strategies — pan on hover, drag or wheel,
//!   minimap-style click jumps, pivot-anchored spin and zoom.
//! - [`navigation`]: autonomous modes that bypass the dispatcher and move
//!   the view continuously from the pointer position alone.

pub mod constants;
pub mod events;
pub mod handlers;
pub mod input;
pub mod mapping;
pub mod navigation;
pub mod prefs;
pub mod scheduling;
pub mod types;
pub mod view;

pub use events::{EventSource, Subscription, WidgetEvent};
pub use input::{
    shared, Capabilities, DispatchState, GestureDispatcher, HandlerFactory, MouseAdapter,
    MouseHandler, Pivot, PointerEvent,
};
pub use navigation::{Navigator, NavigatorFactory};
pub use types::{CursorKind, MouseButton, Point, Rect, Size};
pub use view::{Adjustment, Pin, View};
