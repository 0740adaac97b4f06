#![forbid(unsafe_code)]

//! Three-position gesture drawer.
//!
//! # Role
//! `tdrawer` decides where a bottom drawer rests (Fill, Hover or Close),
//! which touch sequences it steals from the content beneath it, and where a
//! released drag settles. Rendering and measurement belong to the host.
//!
//! # Primary responsibilities
//! - **State geometry**: [`state`] maps each state to a top offset.
//! - **Arbitration**: [`arbitration`] decides interception per sequence,
//!   including the edge-close swipe.
//! - **Settle policy**: [`settle`] classifies a released top.
//! - **Controller**: [`TertiaryDrawer`] ties these to a [`DragSurface`] and
//!   notifies [`StatusListener`]s.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tdrawer::{DrawerConfig, DrawerState, TertiaryDrawer};
//! use tdrawer_core::Rect;
//!
//! let config = DrawerConfig::default().with_heights(1000, 400);
//! let mut drawer = TertiaryDrawer::new(config)?;
//! drawer.on_layout(Rect::new(0, 0, 500, 1000), 1000);
//! drawer.change_drawer_state(DrawerState::Hover);
//! while drawer.compute_scroll(Duration::from_millis(16)) {}
//! assert_eq!(drawer.view_top(), 600);
//! # Ok::<(), tdrawer::DrawerConfigError>(())
//! ```

pub mod arbitration;
pub mod config;
pub mod drawer;
pub mod listener;
pub mod settle;
pub mod slide_surface;
pub mod state;
pub mod surface;

pub use arbitration::{ArbitrationPhase, GestureSession, TouchArbiter, can_capture};
pub use config::{DrawerConfig, DrawerConfigError};
pub use drawer::{DrawerFlags, TertiaryDrawer};
pub use listener::{StatusListener, StatusListeners, Visibility, VisibilityListener};
pub use settle::{DragIntent, SettleDecision, SettleRule};
pub use slide_surface::{SlideSurface, SlideSurfaceConfig};
pub use state::{DrawerState, HeightProxy, HeightSpec, LiveHeights, StateGeometry};
pub use surface::{DragCallback, DragState, DragSurface, SurfaceCommand};
