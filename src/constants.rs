//! Interaction-layer constants.
//!
//! Centralizes magic numbers and default tunables so handler and navigator
//! defaults are defined in one place.

use std::time::Duration;

// ============================================================================
// Scheduling
// ============================================================================

/// Period of the continuous-navigation timers (~30 Hz).
pub const NAVIGATION_TICK: Duration = Duration::from_millis(33);

/// Idle priority for batched motion processing.
///
/// Chosen to run after the host has coalesced input but before it redraws,
/// so a frame never paints a stale gesture.
pub const MOTION_IDLE_PRIORITY: crate::scheduling::IdlePriority =
    crate::scheduling::IdlePriority::BEFORE_REDRAW;

// ============================================================================
// Panning
// ============================================================================

/// Default hover-pan speed factor.
pub const DEFAULT_HOVER_SPEED: f64 = 1.0;

/// Default drag-pan speed factor; negative drags the image, not the view.
pub const DEFAULT_DRAG_SPEED: f64 = -1.0;

// ============================================================================
// Spinning
// ============================================================================

/// Pointer distance from the pivot below which rotation is suppressed,
/// in pixels. Kills jitter from tiny lever arms.
pub const SPIN_THRESHOLD: f64 = 5.0;

/// Radius around the pivot inside which rotation is scaled down, in pixels.
pub const SPIN_SOFT_RADIUS: f64 = 25.0;

/// Default number of view turns per revolution around the pivot.
pub const DEFAULT_SPIN_FREQUENCY: f64 = 1.0;

// ============================================================================
// Zooming
// ============================================================================

/// Minimum pivot-to-pointer distance used in drag-zoom ratios, in pixels.
pub const ZOOM_MIN_DISTANCE: f64 = 10.0;

/// Default magnification multiplier per wheel tick.
pub const DEFAULT_WHEEL_ZOOM_EFFECT: f64 = 2.0;

/// Default rotation per wheel tick, in degrees.
pub const DEFAULT_WHEEL_SPIN_EFFECT: f64 = 30.0;

/// Default fixed wheel-pan speed, in pixels per tick.
pub const DEFAULT_WHEEL_PIXEL_SPEED: f64 = 300.0;

/// Default wheel-pan speed as a fraction of the viewport per tick.
pub const DEFAULT_WHEEL_RELATIVE_SPEED: f64 = 0.3;

// ============================================================================
// Mapping
// ============================================================================

/// Default margin subtracted from the widget allocation before mapping a
/// click position onto the content range, in pixels.
pub const DEFAULT_MAP_MARGIN: f64 = 32.0;

// ============================================================================
// Navigators
// ============================================================================

/// Default width of the edge band that triggers continuous scrolling.
pub const DEFAULT_NAVIGATION_MARGIN: f64 = 24.0;

/// Default continuous-scroll speed, in pixels per second.
pub const DEFAULT_ROLL_SPEED: f64 = 500.0;

/// Default pointer offset from center that activates the roll navigator,
/// in pixels.
pub const DEFAULT_ROLL_THRESHOLD: f64 = 32.0;
