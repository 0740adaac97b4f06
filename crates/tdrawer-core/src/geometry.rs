#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Rectangles live in integer screen pixels. Pointer positions are `f32`
//! because touch hardware reports sub-pixel coordinates; hit tests compare
//! the two directly without rounding.

/// A screen-space rectangle used for layout bounds and hit testing.
///
/// Origin at top-left, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (alias for x).
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge.
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge.
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero or negative area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a pointer position lies inside the rectangle.
    ///
    /// Both edges are inclusive: a touch landing exactly on the right or
    /// bottom border still counts as a hit.
    #[inline]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x as f32
            && x <= self.right() as f32
            && y >= self.y as f32
            && y <= self.bottom() as f32
    }

    /// Same rectangle moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Same origin and width with a different height.
    #[inline]
    #[must_use]
    pub const fn with_height(&self, height: i32) -> Rect {
        Rect::new(self.x, self.y, self.width, height)
    }
}

/// A pointer position in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Absolute per-axis distance to `other`.
    #[inline]
    #[must_use]
    pub fn abs_delta(self, other: Point) -> (f32, f32) {
        ((self.x - other.x).abs(), (self.y - other.y).abs())
    }
}
