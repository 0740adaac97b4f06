#![forbid(unsafe_code)]

//! Core: geometry, touch events, and hit testing for `tdrawer`.
//!
//! # Role
//! `tdrawer-core` holds the platform-neutral primitives the drawer is built
//! on. It knows nothing about drawer states; the `tdrawer` crate owns the
//! gesture state machine.
//!
//! # Primary responsibilities
//! - **Geometry**: screen rectangles and pointer positions.
//! - **Event**: canonical touch events and edge flags.
//! - **Hit testing**: locating the front-most scrollable node under a point.
//! - **Animation**: the spring used to slide the drawer between states.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod hit;
pub mod logging;

pub use event::{EdgeFlags, PointerId, TouchAction, TouchEvent};
pub use geometry::{Point, Rect};
pub use hit::{HitNode, NodeSnapshot, ScrollRegion, find_scrollable_target, is_under};

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
