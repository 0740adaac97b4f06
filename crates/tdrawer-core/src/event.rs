#![forbid(unsafe_code)]

//! Canonical touch event types.
//!
//! Hosts translate their platform pointer events into [`TouchEvent`] before
//! handing them to the drawer. Positions are raw screen coordinates, not
//! relative to any view.
//!
//! # Design Notes
//!
//! - Only the primary pointer is modeled; secondary pointers are the host's
//!   concern and should be filtered before dispatch.
//! - `time_ms` is a monotonic timestamp with an arbitrary epoch. It is only
//!   ever differenced, so hosts may pass frame time or uptime.

use bitflags::bitflags;

use crate::geometry::Point;

/// Identifier of the pointer that produced an event.
pub type PointerId = u32;

/// Phase of a touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TouchAction {
    /// First contact; opens a sequence.
    Down,
    /// Contact moved.
    Move,
    /// Contact lifted; closes the sequence.
    Up,
    /// Sequence aborted by the host (focus loss, parent steal).
    Cancel,
}

impl TouchAction {
    /// Whether this action ends the current sequence.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A single pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TouchEvent {
    pub action: TouchAction,
    pub pointer_id: PointerId,
    pub position: Point,
    pub time_ms: u64,
}

impl TouchEvent {
    /// Create an event for pointer 0.
    #[must_use]
    pub const fn new(action: TouchAction, x: f32, y: f32, time_ms: u64) -> Self {
        Self {
            action,
            pointer_id: 0,
            position: Point::new(x, y),
            time_ms,
        }
    }

    #[must_use]
    pub const fn down(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Down, x, y, time_ms)
    }

    #[must_use]
    pub const fn moved(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Move, x, y, time_ms)
    }

    #[must_use]
    pub const fn up(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Up, x, y, time_ms)
    }

    #[must_use]
    pub const fn cancel(x: f32, y: f32, time_ms: u64) -> Self {
        Self::new(TouchAction::Cancel, x, y, time_ms)
    }

    /// Same event attributed to a different pointer.
    #[must_use]
    pub const fn with_pointer(mut self, pointer_id: PointerId) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    #[inline]
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.position.x
    }

    #[inline]
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.position.y
    }
}

bitflags! {
    /// Container edges a touch-down landed on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EdgeFlags: u8 {
        const LEFT   = 0b0001;
        const TOP    = 0b0010;
        const RIGHT  = 0b0100;
        const BOTTOM = 0b1000;
    }
}
