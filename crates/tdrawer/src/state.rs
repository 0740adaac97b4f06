#![forbid(unsafe_code)]

//! Drawer rest states and the geometry they map to.
//!
//! A state is a tag. Its on-screen placement comes from [`geometry`], a pure
//! function of the state, the current [`HeightSpec`], and the container
//! height. Nothing here is cached: hosts with content-dependent heights plug
//! in a [`HeightProxy`] and every query re-reads it.
//!
//! # Invariants
//!
//! For heights ordered `fill >= hover >= close`,
//! `top(Fill) <= top(Hover) <= top(Close)`.

use std::cell::Cell;

/// One of the three rest positions of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DrawerState {
    /// Hidden below the container's bottom edge.
    #[default]
    Close,
    /// Partially visible.
    Hover,
    /// Fully open.
    Fill,
}

impl DrawerState {
    /// All states ordered from highest on screen to lowest.
    pub const ALL: [DrawerState; 3] = [DrawerState::Fill, DrawerState::Hover, DrawerState::Close];

    /// Decode the integer form used by attribute-style configuration.
    ///
    /// `0` is Close, `1` is Hover, anything else is Fill.
    #[must_use]
    pub const fn from_index(index: i32) -> Self {
        match index {
            0 => Self::Close,
            1 => Self::Hover,
            _ => Self::Fill,
        }
    }

    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::Close => 0,
            Self::Hover => 1,
            Self::Fill => 2,
        }
    }
}

/// Live source of drawer heights and settle thresholds.
///
/// Values may change at any time; the drawer reads them on every geometry
/// query and every settle decision.
pub trait HeightProxy {
    fn fill_height(&self) -> i32;
    fn hover_height(&self) -> i32;
    fn close_height(&self) -> i32;
    /// Expand threshold for releases between Fill and Hover.
    fn top_expand_height(&self) -> i32;
    /// Collapse threshold for releases between Hover and Close.
    fn bottom_collapse_height(&self) -> i32;
}

/// Settle thresholds supplied by a [`HeightProxy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleThresholds {
    pub top_expand: i32,
    pub bottom_collapse: i32,
}

/// Resolved heights for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeightSpec {
    pub fill: i32,
    pub hover: i32,
    pub close: i32,
    /// Present only when heights come from a proxy.
    pub thresholds: Option<SettleThresholds>,
}

impl HeightSpec {
    /// Static heights from configuration. Close is always fully hidden.
    #[must_use]
    pub const fn fixed(fill: i32, hover: i32) -> Self {
        Self {
            fill,
            hover,
            close: 0,
            thresholds: None,
        }
    }

    /// Snapshot a proxy.
    #[must_use]
    pub fn from_proxy(proxy: &dyn HeightProxy) -> Self {
        Self {
            fill: proxy.fill_height(),
            hover: proxy.hover_height(),
            close: proxy.close_height(),
            thresholds: Some(SettleThresholds {
                top_expand: proxy.top_expand_height(),
                bottom_collapse: proxy.bottom_collapse_height(),
            }),
        }
    }

    /// Visible height of the drawer in `state`.
    #[inline]
    #[must_use]
    pub const fn height(&self, state: DrawerState) -> i32 {
        match state {
            DrawerState::Fill => self.fill,
            DrawerState::Hover => self.hover,
            DrawerState::Close => self.close,
        }
    }
}

/// Placement of a state inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateGeometry {
    /// Offset of the drawer's top edge from the container's top edge.
    pub top: i32,
    /// Visible height of the drawer.
    pub height: i32,
}

/// Geometry of `state` for a container `container_height` pixels tall.
#[inline]
#[must_use]
pub const fn geometry(state: DrawerState, spec: &HeightSpec, container_height: i32) -> StateGeometry {
    let height = spec.height(state);
    StateGeometry {
        top: container_height.saturating_sub(height),
        height,
    }
}

/// Top offset of `state`.
#[inline]
#[must_use]
pub const fn top(state: DrawerState, spec: &HeightSpec, container_height: i32) -> i32 {
    geometry(state, spec, container_height).top
}

/// Interior-mutable [`HeightProxy`] for hosts whose heights track content.
///
/// Share it with the drawer through an `Rc` and update the cells as content
/// is measured.
#[derive(Debug, Default)]
pub struct LiveHeights {
    pub fill: Cell<i32>,
    pub hover: Cell<i32>,
    pub close: Cell<i32>,
    pub top_expand: Cell<i32>,
    pub bottom_collapse: Cell<i32>,
}

impl LiveHeights {
    #[must_use]
    pub fn new(fill: i32, hover: i32, close: i32) -> Self {
        Self {
            fill: Cell::new(fill),
            hover: Cell::new(hover),
            close: Cell::new(close),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_thresholds(self, top_expand: i32, bottom_collapse: i32) -> Self {
        self.top_expand.set(top_expand);
        self.bottom_collapse.set(bottom_collapse);
        self
    }
}

impl HeightProxy for LiveHeights {
    fn fill_height(&self) -> i32 {
        self.fill.get()
    }

    fn hover_height(&self) -> i32 {
        self.hover.get()
    }

    fn close_height(&self) -> i32 {
        self.close.get()
    }

    fn top_expand_height(&self) -> i32 {
        self.top_expand.get()
    }

    fn bottom_collapse_height(&self) -> i32 {
        self.bottom_collapse.get()
    }
}
