//! Map-rectangle geometry shared by the map-click handler and the map
//! navigator.
//!
//! Both components linearly map a pointer position inside a margin-adjusted
//! widget rectangle onto the content's scrollable range. The rectangle
//! construction and the range mapping live here so the two stay
//! bit-for-bit identical.

use serde::{Deserialize, Serialize};

use crate::types::{Point, Rect, Size};
use crate::view::Adjustment;

/// How the mapping rectangle is derived from the widget allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    /// The margin-adjusted allocation, as is.
    Raw,
    /// Cropped to a centered square over the smaller side.
    Square,
    /// Cropped to a centered rectangle proportional to the content.
    #[default]
    Proportional,
}

impl MapMode {
    /// Stable code used in preference storage.
    pub fn code(self) -> &'static str {
        match self {
            MapMode::Raw => "raw",
            MapMode::Square => "square",
            MapMode::Proportional => "proportional",
        }
    }

    pub fn from_code(code: &str) -> Option<MapMode> {
        match code {
            "raw" => Some(MapMode::Raw),
            "square" => Some(MapMode::Square),
            "proportional" => Some(MapMode::Proportional),
            _ => None,
        }
    }
}

/// Builds the mapping rectangle for a widget of `allocation` size.
///
/// The margin is subtracted first; a dimension that comes out degenerate
/// (≤ 0) is expanded to a minimum of 1 and recentered. `content` is only
/// consulted in [`MapMode::Proportional`].
pub fn map_rectangle(allocation: Size, margin: f64, mode: MapMode, content: Size) -> Rect {
    let mut rect = Rect::new(
        margin,
        margin,
        allocation.width - margin * 2.0,
        allocation.height - margin * 2.0,
    );

    if rect.width <= 0.0 {
        let diff = 1.0 - rect.width;
        rect.width += diff;
        rect.x -= diff / 2.0;
    }
    if rect.height <= 0.0 {
        let diff = 1.0 - rect.height;
        rect.height += diff;
        rect.y -= diff / 2.0;
    }

    match mode {
        MapMode::Raw => rect,
        MapMode::Square => {
            let smallest_side = rect.width.min(rect.height);
            let half_width_diff = (rect.width - smallest_side) / 2.0;
            let half_height_diff = (rect.height - smallest_side) / 2.0;
            Rect::new(
                rect.x + half_width_diff,
                rect.y + half_height_diff,
                rect.width - half_width_diff * 2.0,
                rect.height - half_height_diff * 2.0,
            )
        }
        MapMode::Proportional => {
            let full_width = content.width.max(1.0);
            let full_height = content.height.max(1.0);
            let smallest_ratio = (rect.width / full_width).min(rect.height / full_height);
            let transformed_width = smallest_ratio * full_width;
            let transformed_height = smallest_ratio * full_height;
            let half_width_diff = (rect.width - transformed_width) / 2.0;
            let half_height_diff = (rect.height - transformed_height) / 2.0;
            Rect::new(
                rect.x + half_width_diff,
                rect.y + half_height_diff,
                rect.width - half_width_diff * 2.0,
                rect.height - half_height_diff * 2.0,
            )
        }
    }
}

/// Maps a widget point clamped into `rect` onto the scrollable range of
/// both adjustments, returning the target `(x, y)` adjustment values.
pub fn map_to_range(rect: Rect, at: Point, h: &Adjustment, v: &Adjustment) -> (f64, f64) {
    let x = (at.x - rect.x).clamp(0.0, rect.width);
    let y = (at.y - rect.y).clamp(0.0, rect.height);
    let tx = x / rect.width * h.scrollable() + h.lower;
    let ty = y / rect.height * v.scrollable() + v.lower;
    (tx, ty)
}
