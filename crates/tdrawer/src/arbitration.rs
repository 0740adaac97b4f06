#![forbid(unsafe_code)]

//! Per-sequence touch arbitration.
//!
//! Decides, event by event, whether a touch sequence belongs to the drawer
//! or to the content beneath it. Two gestures compete:
//!
//! - **Main drag**: a sequence that starts on the drawer's cap strip is only
//!   stolen once it travels further than the touch slop vertically. Any
//!   other sequence defers entirely to the drag surface.
//! - **Edge close**: a mostly-horizontal swipe that starts within the edge
//!   band of either side of the drawer closes it. It fires at most once per
//!   sequence and consumes the rest of the sequence. It never fires once the
//!   main drag has captured the sequence.
//!
//! # State Machine
//!
//! ```text
//!            down (edge band)
//!   Idle ─────────────────────▶ EdgeCandidate ──(edge swipe)──▶ Accepted
//!     │                              │
//!     │ down                         │ surface + tap agree
//!     ▼                              ▼
//!   Evaluating ──(surface + tap)──▶ Accepted
//!     │
//!     └──(capture refused)──▶ Rejected
//! ```
//!
//! Up and cancel always end the session.

use tdrawer_core::{Point, Rect, TouchAction, TouchEvent, debug, trace};

use crate::settle::DragIntent;

/// Where the current sequence stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArbitrationPhase {
    /// No sequence in progress.
    #[default]
    Idle,
    /// Waiting for slop or for the surface to claim the sequence.
    Evaluating,
    /// Started in an edge band; an edge close may still fire.
    EdgeCandidate,
    /// The drawer owns the sequence.
    Accepted,
    /// The drawer refused to capture; content keeps the sequence.
    Rejected,
}

/// State of one touch sequence, from down to up or cancel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    pub start: Point,
    pub last: Point,
    /// Down landed on the drawer's cap strip.
    pub on_top: bool,
    /// Down landed within the edge band.
    pub on_edge: bool,
    /// Direction of the first vertical tick after capture.
    pub intent: Option<DragIntent>,
    pub phase: ArbitrationPhase,
    /// The edge close already fired for this sequence.
    pub edge_closed: bool,
}

impl GestureSession {
    fn new(start: Point, on_top: bool, on_edge: bool, close_on_edge: bool) -> Self {
        Self {
            start,
            last: start,
            on_top,
            on_edge,
            intent: None,
            phase: if on_edge && close_on_edge {
                ArbitrationPhase::EdgeCandidate
            } else {
                ArbitrationPhase::Evaluating
            },
            edge_closed: false,
        }
    }
}

/// What the drawer should do with an intercepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterceptStep {
    /// Close the drawer and take the event.
    EdgeClose,
    /// The edge close already fired; take the event and do nothing else.
    Consume,
    /// Ask the drag surface. The drawer intercepts only if `tap` is also set.
    Consult { tap: bool },
}

/// Capture permission for the main drag.
///
/// A sequence that started on the cap strip ignores the nested scroll
/// check; any other sequence needs both the check and the drawer under the
/// pointer.
#[inline]
#[must_use]
pub const fn can_capture(enable_drag: bool, on_top: bool, can_drag: bool, is_handle_drawer: bool) -> bool {
    if !enable_drag {
        return false;
    }
    if on_top {
        return is_handle_drawer;
    }
    can_drag && is_handle_drawer
}

/// Whether `x` lies within `band` pixels of either horizontal side of
/// `drawer`, inclusive.
#[must_use]
pub fn is_on_edge(x: f32, drawer: Rect, band: i32) -> bool {
    let left = drawer.left() as f32;
    let right = drawer.right() as f32;
    let band = band as f32;
    (x >= left && x <= left + band) || (x >= right - band && x <= right)
}

/// Tracks the active [`GestureSession`] and classifies intercepted events.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchArbiter {
    touch_slop: i32,
    edge_band: i32,
    session: Option<GestureSession>,
}

impl TouchArbiter {
    #[must_use]
    pub fn new(touch_slop: i32, edge_band: i32) -> Self {
        Self {
            touch_slop,
            edge_band,
            session: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn touch_slop(&self) -> i32 {
        self.touch_slop
    }

    #[inline]
    #[must_use]
    pub fn edge_band(&self) -> i32 {
        self.edge_band
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> ArbitrationPhase {
        self.session.map_or(ArbitrationPhase::Idle, |s| s.phase)
    }

    /// Whether the edge close fired for the current sequence.
    #[must_use]
    pub fn edge_closed(&self) -> bool {
        self.session.is_some_and(|s| s.edge_closed)
    }

    /// Open a session for a touch-down. Replaces any stale session.
    pub fn begin(&mut self, event: &TouchEvent, on_top: bool, drawer: Option<Rect>, close_on_edge: bool) {
        let on_edge = drawer.is_some_and(|d| is_on_edge(event.x(), d, self.edge_band));
        let session = GestureSession::new(event.position, on_top, on_edge, close_on_edge);
        trace!(
            target: "tdrawer.touch",
            x = event.x(),
            y = event.y(),
            on_top,
            on_edge,
            "sequence started"
        );
        self.session = Some(session);
    }

    /// Track a move and test it for the edge-close swipe.
    ///
    /// Returns true exactly once per sequence, on the move that fires the
    /// close.
    pub fn check_edge(&mut self, event: &TouchEvent, close_on_edge: bool) -> bool {
        let slop = self.touch_slop as f32;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.edge_closed || event.action != TouchAction::Move {
            return false;
        }
        session.last = event.position;
        if session.phase == ArbitrationPhase::Accepted {
            return false;
        }

        let (dx, dy) = event.position.abs_delta(session.start);
        if close_on_edge && session.on_edge && dx > slop / 2.0 && dy < dx {
            session.edge_closed = true;
            session.phase = ArbitrationPhase::Accepted;
            debug!(target: "tdrawer.touch", dx, dy, "edge swipe closes drawer");
            return true;
        }
        false
    }

    /// Classify an event on the intercept path.
    ///
    /// Without a session (a move with no down) the event is simply offered
    /// to the surface.
    pub fn intercept(&mut self, event: &TouchEvent, close_on_edge: bool) -> InterceptStep {
        if self.edge_closed() {
            return InterceptStep::Consume;
        }
        if self.check_edge(event, close_on_edge) {
            return InterceptStep::EdgeClose;
        }
        let Some(session) = self.session.as_ref() else {
            return InterceptStep::Consult { tap: true };
        };
        let tap = !session.on_top
            || (event.action == TouchAction::Move
                && (event.y() - session.start.y).abs() > self.touch_slop as f32);
        InterceptStep::Consult { tap }
    }

    /// Record the combined intercept decision for the current event.
    pub fn record_decision(&mut self, intercepted: bool) {
        if let Some(session) = self.session.as_mut()
            && intercepted
            && session.phase != ArbitrationPhase::Accepted
        {
            session.phase = ArbitrationPhase::Accepted;
            trace!(target: "tdrawer.touch", "sequence accepted");
        }
    }

    /// Record the outcome of a capture attempt.
    pub fn record_capture(&mut self, allowed: bool) {
        if let Some(session) = self.session.as_mut() {
            session.phase = match (allowed, session.phase) {
                (true, _) => ArbitrationPhase::Accepted,
                (false, ArbitrationPhase::Accepted) => ArbitrationPhase::Accepted,
                (false, _) => ArbitrationPhase::Rejected,
            };
        }
    }

    /// Record the drag direction of the current sequence. Only the first
    /// call after capture sticks.
    pub fn record_intent(&mut self, intent: DragIntent) {
        if let Some(session) = self.session.as_mut()
            && session.intent.is_none()
        {
            session.intent = Some(intent);
        }
    }

    /// Drop the session at the end of a sequence.
    pub fn end(&mut self) {
        if let Some(session) = self.session.take() {
            trace!(target: "tdrawer.touch", phase = ?session.phase, "sequence ended");
        }
    }
}
