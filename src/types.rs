//! Shared geometry and identity primitives for the interaction layer.
//!
//! Everything here is toolkit-neutral: points are plain `f64` pairs in
//! widget coordinates, and cursors are named shapes the hosting UI maps
//! onto whatever its toolkit provides.

use serde::{Deserialize, Serialize};

/// A point (or displacement vector) in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
    /// The fractional center of a unit square.
    pub const CENTER: Point = Point { x: 0.5, y: 0.5 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise product with another point.
    pub fn multiply(self, other: Point) -> Point {
        Point::new(self.x * other.x, self.y * other.y)
    }

    /// Uniform scale by a scalar.
    pub fn scale(self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }

    /// Euclidean length of the vector from the origin.
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Squared length; avoids the square root in threshold tests.
    pub fn square_length(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Angle of the vector in degrees, as given by `atan2`.
    pub fn angle_degrees(self) -> f64 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Rotate the vector by `radians` around the origin.
    pub fn spin(self, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// True when the vector is wider than it is tall.
    pub fn is_wide(self) -> bool {
        self.x > self.y
    }
}

impl std::ops::Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// A widget allocation in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// An axis-aligned rectangle in widget coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn center(self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A mouse button identity.
///
/// The numbering follows the conventional 1/2/3 assignment for
/// left/middle/right; anything else is carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

impl MouseButton {
    /// Maps a native button number to a `MouseButton`.
    pub fn from_number(number: u8) -> Self {
        match number {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            other => MouseButton::Other(other),
        }
    }
}

/// Named cursor shapes requested by handlers and navigators.
///
/// The eight compass variants are used by the rolling navigators to point
/// along the current scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    /// Four-way "grab and move" cursor shown while drag-panning.
    Move,
    /// Crosshair shown while a map navigator owns the widget.
    Crosshair,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CursorKind {
    /// Picks the compass cursor matching a direction vector's octant.
    pub fn from_direction(direction: Point) -> Option<CursorKind> {
        if direction.x == 0.0 && direction.y == 0.0 {
            return None;
        }
        // Octants are 45 degrees wide, centered on the compass directions.
        let angle = direction.angle_degrees();
        let octant = ((angle + 382.5) / 45.0) as usize % 8;
        Some(match octant {
            0 => CursorKind::East,
            1 => CursorKind::SouthEast,
            2 => CursorKind::South,
            3 => CursorKind::SouthWest,
            4 => CursorKind::West,
            5 => CursorKind::NorthWest,
            6 => CursorKind::North,
            _ => CursorKind::NorthEast,
        })
    }
}
