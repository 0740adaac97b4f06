#![forbid(unsafe_code)]

//! Drawer configuration.
//!
//! [`DrawerConfig`] carries the values a host would otherwise read from
//! layout attributes. Pixel quantities are already scaled; the edge band is
//! the one value given in density-independent units because its size should
//! feel the same on every screen.

use std::fmt;

use crate::state::DrawerState;

/// Default touch slop in pixels.
pub const DEFAULT_TOUCH_SLOP: i32 = 8;

/// Default width of the edge-close band in density-independent pixels.
pub const DEFAULT_EDGE_BAND_DP: f32 = 50.0;

/// Construction-time drawer settings.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DrawerConfig {
    /// Whether the drawer may be put into following mode (default: true).
    pub following_scroll: bool,
    /// Visible height in Fill, in pixels (default: 0).
    pub fill_height: i32,
    /// Visible height in Hover, in pixels (default: 0).
    pub hover_height: i32,
    /// State applied on first layout (default: Close).
    pub default_state: DrawerState,
    /// Movement in pixels before a touch counts as a drag (default: 8).
    pub touch_slop: i32,
    /// Edge-close band width in dp (default: 50).
    pub edge_band_dp: f32,
    /// Pixels per dp (default: 1.0).
    pub density: f32,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self {
            following_scroll: true,
            fill_height: 0,
            hover_height: 0,
            default_state: DrawerState::Close,
            touch_slop: DEFAULT_TOUCH_SLOP,
            edge_band_dp: DEFAULT_EDGE_BAND_DP,
            density: 1.0,
        }
    }
}

impl DrawerConfig {
    #[must_use]
    pub fn with_heights(mut self, fill_height: i32, hover_height: i32) -> Self {
        self.fill_height = fill_height;
        self.hover_height = hover_height;
        self
    }

    #[must_use]
    pub fn with_default_state(mut self, state: DrawerState) -> Self {
        self.default_state = state;
        self
    }

    #[must_use]
    pub fn with_following_scroll(mut self, enabled: bool) -> Self {
        self.following_scroll = enabled;
        self
    }

    #[must_use]
    pub fn with_touch_slop(mut self, slop: i32) -> Self {
        self.touch_slop = slop;
        self
    }

    #[must_use]
    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    #[must_use]
    pub fn with_edge_band_dp(mut self, dp: f32) -> Self {
        self.edge_band_dp = dp;
        self
    }

    /// Edge band width in pixels, rounded to nearest.
    #[must_use]
    pub fn edge_band_px(&self) -> i32 {
        dp_to_px(self.edge_band_dp, self.density)
    }

    /// Check that the values describe a usable drawer.
    pub fn validate(&self) -> Result<(), DrawerConfigError> {
        for (field, value) in [
            ("fill_height", self.fill_height),
            ("hover_height", self.hover_height),
            ("touch_slop", self.touch_slop),
        ] {
            if value < 0 {
                return Err(DrawerConfigError::NegativeValue { field, value });
            }
        }
        if self.hover_height > self.fill_height {
            return Err(DrawerConfigError::HoverAboveFill {
                fill_height: self.fill_height,
                hover_height: self.hover_height,
            });
        }
        if !(self.density.is_finite() && self.density > 0.0) {
            return Err(DrawerConfigError::InvalidDensity {
                density: self.density,
            });
        }
        if !(self.edge_band_dp.is_finite() && self.edge_band_dp >= 0.0) {
            return Err(DrawerConfigError::InvalidEdgeBand {
                dp: self.edge_band_dp,
            });
        }
        Ok(())
    }
}

/// Convert density-independent pixels to pixels, rounding half up.
#[inline]
#[must_use]
pub fn dp_to_px(dp: f32, density: f32) -> i32 {
    (dp * density + 0.5) as i32
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawerConfigError {
    NegativeValue { field: &'static str, value: i32 },
    HoverAboveFill { fill_height: i32, hover_height: i32 },
    InvalidDensity { density: f32 },
    InvalidEdgeBand { dp: f32 },
}

impl fmt::Display for DrawerConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeValue { field, value } => {
                write!(f, "invalid {field} value {value} (must be >= 0)")
            }
            Self::HoverAboveFill {
                fill_height,
                hover_height,
            } => write!(
                f,
                "hover_height {hover_height} exceeds fill_height {fill_height}"
            ),
            Self::InvalidDensity { density } => {
                write!(f, "invalid density {density} (must be finite and > 0)")
            }
            Self::InvalidEdgeBand { dp } => {
                write!(f, "invalid edge band width {dp}dp (must be finite and >= 0)")
            }
        }
    }
}

impl std::error::Error for DrawerConfigError {}
