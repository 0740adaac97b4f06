#![forbid(unsafe_code)]

//! Drag surface collaborator.
//!
//! A [`DragSurface`] owns low-level pointer tracking and the settle
//! animation of the drawer's view. The drawer supplies policy through
//! [`DragCallback`]: whether a capture is allowed, how far the view may
//! move, and what happens on release.
//!
//! Callbacks never receive the surface itself. Work that needs the surface
//! (starting a slide, capturing on an edge touch) is queued by the callback
//! as a [`SurfaceCommand`] and applied by the drawer after the surface call
//! returns.

use std::time::Duration;

use tdrawer_core::{EdgeFlags, PointerId, Rect, TouchEvent};

/// Activity of a drag surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragState {
    /// Not tracking a drag and not animating.
    #[default]
    Idle,
    /// Following a captured pointer.
    Dragging,
    /// Animating toward a slide target.
    Settling,
}

/// Policy hooks the drawer provides to its drag surface.
pub trait DragCallback {
    /// Whether a drag may start. `is_drawer` is true when the drawer's view
    /// is the topmost view under the pointer.
    fn try_capture(&mut self, is_drawer: bool, pointer_id: PointerId) -> bool;

    /// A touch-down landed on the tracked container edges.
    fn on_edge_touched(&mut self, edges: EdgeFlags, pointer_id: PointerId);

    /// Constrain a proposed top. `dy` is the delta from the previous tick.
    fn clamp_vertical(&mut self, proposed_top: i32, dy: i32) -> i32;

    /// The view's top changed to `top`.
    fn on_position_changed(&mut self, top: i32, dy: i32);

    /// The captured pointer was released with the view at `top`.
    fn on_released(&mut self, top: i32, x_velocity: f32, y_velocity: f32);

    /// The captured pointer was cancelled with the view at `top`.
    fn on_cancelled(&mut self, top: i32);

    /// Vertical range the view may travel. Zero disables vertical capture.
    fn vertical_drag_range(&self) -> i32;

    /// Whether the drawer's view lies under `(x, y)`.
    fn is_drawer_under(&self, x: f32, y: f32) -> bool;

    /// On-screen container bounds, used for edge tracking.
    fn container(&self) -> Rect;
}

/// Low-level pointer tracking and slide animation for the drawer's view.
pub trait DragSurface {
    /// Current top of the drawer's view relative to the container.
    fn view_top(&self) -> i32;

    /// Place the view at `top` immediately (layout pass).
    fn place_view(&mut self, top: i32);

    fn drag_state(&self) -> DragState;

    /// Capture the drawer's view for `pointer_id`, bypassing `try_capture`.
    fn capture_child(&mut self, pointer_id: PointerId);

    /// Start animating the view toward `top`. Returns true if motion is
    /// required, false if the view is already there.
    fn smooth_slide_to(&mut self, top: i32) -> bool;

    /// Advance an in-flight slide by one frame of `dt`. Returns true while
    /// another frame is needed.
    fn continue_settling(&mut self, dt: Duration, callback: &mut dyn DragCallback) -> bool;

    /// Whether the surface wants to take over the current touch sequence.
    fn should_intercept(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback) -> bool;

    /// Feed an event the drawer has taken ownership of.
    fn process_touch(&mut self, event: &TouchEvent, callback: &mut dyn DragCallback);

    /// Drop any capture and stop any slide where it is.
    fn abort(&mut self);
}

/// Deferred surface work queued from inside a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCommand {
    SlideTo { top: i32 },
    Capture { pointer_id: PointerId },
}
