#![forbid(unsafe_code)]

//! Reference [`DragSurface`]: vertical pointer tracking plus spring slides.
//!
//! # State Machine
//!
//! ```text
//!   Idle ──(slop crossed + try_capture)──▶ Dragging ──(up)──▶ Idle
//!     ▲  ──(capture_child)──────────────▶    │                 │
//!     │                                      └──(cancel)──▶ Idle
//!     └──(spring at rest)── Settling ◀──(smooth_slide_to)──────┘
//! ```
//!
//! # Invariants
//!
//! 1. Only one pointer is tracked; events from other pointers are ignored
//!    until the tracked sequence ends.
//! 2. Pointer-driven moves go through `clamp_vertical`, so the drawer's
//!    bounds and drag intent are updated on every drag tick. Settle frames
//!    follow the spring directly and leave the intent alone.
//! 3. A finished slide lands on the exact integer target.
//!
//! # Failure Modes
//!
//! - Moves that arrive without a prior down are ignored.
//! - A down during a slide captures the view mid-flight if the callback
//!   allows it; otherwise the slide keeps running.

use std::time::Duration;

use tdrawer_core::animation::Spring;
use tdrawer_core::{EdgeFlags, Point, PointerId, Rect, TouchAction, TouchEvent, trace};

use crate::config::DEFAULT_TOUCH_SLOP;
use crate::surface::{DragCallback, DragState, DragSurface};

/// Width of the edge-tracking band in pixels.
pub const DEFAULT_EDGE_SIZE: i32 = 20;

/// Thresholds for the reference drag surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideSurfaceConfig {
    /// Vertical movement (px) before a drag may start.
    pub touch_slop: i32,
    /// Edge-tracking band width (px).
    pub edge_size: i32,
    /// Container edges that report `on_edge_touched`.
    pub tracked_edges: EdgeFlags,
    /// Spring stiffness for slides. Damping is always critical.
    pub stiffness: f64,
}

impl Default for SlideSurfaceConfig {
    fn default() -> Self {
        Self {
            touch_slop: DEFAULT_TOUCH_SLOP,
            edge_size: DEFAULT_EDGE_SIZE,
            tracked_edges: EdgeFlags::BOTTOM,
            stiffness: tdrawer_core::animation::spring::DEFAULT_SLIDE_STIFFNESS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    position: Point,
    time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PointerTrack {
    pointer_id: PointerId,
    initial: Point,
    /// Y already applied to the view; carries fractional remainders.
    applied_y: f32,
    last: Sample,
    previous: Option<Sample>,
}

impl PointerTrack {
    fn new(event: &TouchEvent) -> Self {
        Self {
            pointer_id: event.pointer_id,
            initial: event.position,
            applied_y: event.y(),
            last: Sample {
                position: event.position,
                time_ms: event.time_ms,
            },
            previous: None,
        }
    }

    fn record(&mut self, event: &TouchEvent) {
        self.previous = Some(self.last);
        self.last = Sample {
            position: event.position,
            time_ms: event.time_ms,
        };
    }

    /// Velocity in px/s from the last two samples.
    fn velocity(&self) -> (f32, f32) {
        let Some(previous) = self.previous else {
            return (0.0, 0.0);
        };
        let dt_ms = self.last.time_ms.saturating_sub(previous.time_ms);
        if dt_ms == 0 {
            return (0.0, 0.0);
        }
        let secs = dt_ms as f32 / 1000.0;
        (
            (self.last.position.x - previous.position.x) / secs,
            (self.last.position.y - previous.position.y) / secs,
        )
    }
}

/// Vertical drag tracker with spring-driven slides.
#[derive(Debug, Clone)]
pub struct SlideSurface {
    config: SlideSurfaceConfig,
    top: i32,
    state: DragState,
    track: Option<PointerTrack>,
    spring: Spring,
}

impl Default for SlideSurface {
    fn default() -> Self {
        Self::new(SlideSurfaceConfig::default())
    }
}

impl SlideSurface {
    #[must_use]
    pub fn new(config: SlideSurfaceConfig) -> Self {
        Self {
            config,
            top: 0,
            state: DragState::Idle,
            track: None,
            spring: Spring::new(0.0, 0.0)
                .with_stiffness(config.stiffness)
                .critically_damped(),
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SlideSurfaceConfig {
        &self.config
    }

    /// Target of the in-flight slide, if settling.
    #[must_use]
    pub fn slide_target(&self) -> Option<i32> {
        (self.state == DragState::Settling).then(|| self.spring.target() as i32)
    }

    fn edges_at(&self, container: Rect, at: Point) -> EdgeFlags {
        let size = self.config.edge_size as f32;
        let mut edges = EdgeFlags::empty();
        if at.x - (container.left() as f32) < size {
            edges |= EdgeFlags::LEFT;
        }
        if at.y - (container.top() as f32) < size {
            edges |= EdgeFlags::TOP;
        }
        if (container.right() as f32) - at.x < size {
            edges |= EdgeFlags::RIGHT;
        }
        if (container.bottom() as f32) - at.y < size {
            edges |= EdgeFlags::BOTTOM;
        }
        edges & self.config.tracked_edges
    }

    fn begin(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback, capture_now: bool) {
        self.track = Some(PointerTrack::new(event));
        let under = callback.is_drawer_under(event.x(), event.y());
        if (capture_now || self.state == DragState::Settling) && under {
            self.try_capture(event, callback);
        }
        let edges = self.edges_at(callback.container(), event.position);
        if !edges.is_empty() {
            callback.on_edge_touched(edges, event.pointer_id);
        }
    }

    fn try_capture(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback) -> bool {
        if self.state == DragState::Dragging {
            return true;
        }
        let is_drawer = callback.is_drawer_under(event.x(), event.y());
        if callback.try_capture(is_drawer, event.pointer_id) {
            self.start_drag(event.pointer_id, event.y());
            true
        } else {
            false
        }
    }

    fn start_drag(&mut self, pointer_id: PointerId, y: f32) {
        self.spring.halt();
        self.state = DragState::Dragging;
        if let Some(track) = self.track.as_mut() {
            track.pointer_id = pointer_id;
            track.applied_y = y;
        }
        trace!(target: "tdrawer.surface", pointer_id, top = self.top, "drag captured");
    }

    fn past_slop(&self, track: &PointerTrack, at: Point, callback: &dyn DragCallback) -> bool {
        callback.vertical_drag_range() > 0
            && (at.y - track.initial.y).abs() > self.config.touch_slop as f32
    }

    /// `apply` is false on the intercept path, where a captured drag only
    /// tracks the pointer and the view stays put.
    fn on_move(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback, apply: bool) {
        let Some(mut track) = self.track else {
            return;
        };
        if track.pointer_id != event.pointer_id {
            return;
        }
        track.record(event);

        if self.state != DragState::Dragging {
            self.track = Some(track);
            if self.past_slop(&track, event.position, callback) {
                self.try_capture(event, callback);
            }
            return;
        }

        if !apply {
            track.applied_y = event.y();
            self.track = Some(track);
            return;
        }

        let idy = (event.y() - track.applied_y) as i32;
        track.applied_y += idy as f32;
        self.track = Some(track);
        if idy != 0 {
            self.drag_to(self.top.saturating_add(idy), idy, callback);
        }
    }

    fn drag_to(&mut self, proposed: i32, dy: i32, callback: &mut dyn DragCallback) {
        let clamped = callback.clamp_vertical(proposed, dy);
        if clamped != self.top {
            let moved = clamped - self.top;
            self.top = clamped;
            callback.on_position_changed(clamped, moved);
        }
    }

    fn finish(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback) {
        let Some(mut track) = self.track.take() else {
            return;
        };
        if track.pointer_id != event.pointer_id {
            self.track = Some(track);
            return;
        }
        if self.state != DragState::Dragging {
            return;
        }
        self.state = DragState::Idle;
        match event.action {
            TouchAction::Up => {
                track.record(event);
                let (vx, vy) = track.velocity();
                trace!(target: "tdrawer.surface", top = self.top, vx, vy, "drag released");
                callback.on_released(self.top, vx, vy);
            }
            _ => {
                trace!(target: "tdrawer.surface", top = self.top, "drag cancelled");
                callback.on_cancelled(self.top);
            }
        }
    }

    fn dispatch(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback, owned: bool) {
        match event.action {
            TouchAction::Down => self.begin(event, callback, owned),
            TouchAction::Move => self.on_move(event, callback, owned),
            TouchAction::Up | TouchAction::Cancel => self.finish(event, callback),
        }
    }
}

impl DragSurface for SlideSurface {
    fn view_top(&self) -> i32 {
        self.top
    }

    fn place_view(&mut self, top: i32) {
        self.spring.halt();
        if self.state == DragState::Settling {
            self.state = DragState::Idle;
        }
        self.top = top;
    }

    fn drag_state(&self) -> DragState {
        self.state
    }

    fn capture_child(&mut self, pointer_id: PointerId) {
        let y = self.track.map_or(0.0, |t| t.last.position.y);
        self.start_drag(pointer_id, y);
    }

    fn smooth_slide_to(&mut self, top: i32) -> bool {
        self.track = None;
        if top == self.top {
            self.spring.halt();
            self.state = DragState::Idle;
            return false;
        }
        self.spring.retarget(f64::from(self.top), f64::from(top));
        self.state = DragState::Settling;
        trace!(target: "tdrawer.surface", from = self.top, to = top, "slide started");
        true
    }

    fn continue_settling(&mut self, dt: Duration, callback: &mut dyn DragCallback) -> bool {
        if self.state != DragState::Settling {
            return false;
        }
        self.spring.advance(dt);
        let next = self.spring.position().round() as i32;
        if next != self.top {
            let dy = next - self.top;
            self.top = next;
            callback.on_position_changed(next, dy);
        }
        if self.spring.is_at_rest() {
            self.state = DragState::Idle;
        }
        self.state == DragState::Settling
    }

    fn should_intercept(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback) -> bool {
        self.dispatch(event, callback, false);
        self.state == DragState::Dragging
    }

    fn process_touch(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback) {
        self.dispatch(event, callback, true);
    }

    fn abort(&mut self) {
        self.spring.halt();
        self.track = None;
        self.state = DragState::Idle;
    }
}
