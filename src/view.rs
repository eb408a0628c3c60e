//! The view collaborator contract.
//!
//! The interaction layer never renders anything; it decides what adjustment
//! to request from a view object given pointer motion. [`View`] is the seam
//! to the hosting image-view widget: scrollable-range adjustments,
//! magnification, rotation, and the pin operation used to keep a content
//! point stationary under a widget point across zoom/rotate transforms.

use crate::types::{CursorKind, Point, Size};

/// One axis of the scrollable range, mirroring a toolkit adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub lower: f64,
    pub upper: f64,
    pub page_size: f64,
    pub value: f64,
}

impl Adjustment {
    pub fn new(lower: f64, upper: f64, page_size: f64) -> Self {
        Self {
            lower,
            upper,
            page_size,
            value: lower,
        }
    }

    /// The scrollable extent: `upper - lower - page_size`, never negative.
    pub fn scrollable(&self) -> f64 {
        (self.upper - self.lower - self.page_size).max(0.0)
    }

    /// Largest legal `value`.
    pub fn max_value(&self) -> f64 {
        self.lower + self.scrollable()
    }

    /// Clamps a candidate value into `[lower, max_value]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.max_value())
    }
}

/// A content-space anchor captured from a widget-space point.
///
/// `content` is where the point lives in content coordinates at capture
/// time; `anchor` is the widget point it was captured under. A view's
/// [`View::adjust_to_pin`] repositions scrolling so `content` returns under
/// `anchor` after a transform change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub content: Point,
    pub anchor: Point,
}

/// The image-view widget as seen by handlers and navigators.
///
/// Implemented by the hosting UI layer; the test suite carries a mock with
/// a full scroll/zoom/rotate transform model.
pub trait View {
    fn magnification(&self) -> f64;
    fn set_magnification(&mut self, magnification: f64);

    /// Rotation in degrees, clockwise.
    fn rotation(&self) -> f64;
    fn set_rotation(&mut self, degrees: f64);

    fn hadjustment(&self) -> Adjustment;
    fn vadjustment(&self) -> Adjustment;

    /// Sets both adjustment values without clamping; use [`View::adjust_to`]
    /// for the clamped form.
    fn set_scroll(&mut self, x: f64, y: f64);

    /// Current widget allocation in pixels.
    fn allocation(&self) -> Size;

    /// Pointer position in widget coordinates, if the pointer is over the
    /// widget.
    fn pointer_position(&self) -> Option<Point>;

    /// Captures a content-space pin under the given widget point.
    fn get_pin(&self, at: Point) -> Pin;

    /// Scrolls so the pin's content point returns under its anchor.
    fn adjust_to_pin(&mut self, pin: &Pin);

    fn set_cursor(&mut self, cursor: Option<CursorKind>);

    /// Scrolls to `(x, y)`, clamped into the scrollable range.
    fn adjust_to(&mut self, x: f64, y: f64) {
        let h = self.hadjustment();
        let v = self.vadjustment();
        self.set_scroll(h.clamp(x), v.clamp(y));
    }

    /// Scrolls by a widget-space displacement, clamped to content bounds.
    fn pan(&mut self, delta: Point) {
        let h = self.hadjustment();
        let v = self.vadjustment();
        self.adjust_to(h.value + delta.x, v.value + delta.y);
    }
}
