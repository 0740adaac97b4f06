#![forbid(unsafe_code)]

//! Drag clamping and release-time settle policy.
//!
//! When a drag is released the drawer must come to rest in one of its
//! three states. The released top is classified against the two adjacent
//! intervals, (Fill, Hover) first and then (Hover, Close), and exactly one
//! interval decides.
//!
//! # Rules
//!
//! - **Midpoint** (static heights): the half of the interval the top lies
//!   in wins.
//! - **Threshold** (heights from a proxy): asymmetric. While opening, the
//!   upper state wins once the drawer is more than `threshold` above the
//!   lower state's top. While closing, the upper state only wins if the
//!   drawer is still within `threshold` of the upper state's top. Small
//!   gestures therefore snap in their direction of travel.
//! - **Nearest**: the released top lies outside both intervals, which only
//!   happens when heights change mid-drag. The nearest state wins.
//!
//! Release velocity is deliberately not an input.

use crate::state::{DrawerState, HeightSpec, top};

/// Direction the user was moving the drawer on the last movement tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragIntent {
    /// Moving up, revealing more of the drawer.
    Open,
    /// Moving down or stationary.
    Close,
}

impl DragIntent {
    /// Intent recorded from a vertical movement delta.
    #[inline]
    #[must_use]
    pub const fn from_dy(dy: i32) -> Self {
        if dy < 0 { Self::Open } else { Self::Close }
    }
}

/// Which rule produced a settle decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleRule {
    Midpoint { midpoint: i32 },
    Threshold { threshold: i32 },
    Nearest,
}

/// Outcome of classifying a released top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDecision {
    pub released_top: i32,
    pub target: DrawerState,
    /// The `(begin, end)` interval that decided, if any.
    pub interval: Option<(DrawerState, DrawerState)>,
    pub rule: SettleRule,
}

/// Clamp a proposed top into `[top(Fill), top(Close)]`.
///
/// Tolerates misordered heights by clamping to whichever bound is lower.
#[must_use]
pub fn clamp_top(proposed: i32, spec: &HeightSpec, container_height: i32) -> i32 {
    let fill = top(DrawerState::Fill, spec, container_height);
    let close = top(DrawerState::Close, spec, container_height);
    proposed.max(fill.min(close)).min(fill.max(close))
}

/// Decide which state a drag released at `released_top` settles into.
#[must_use]
pub fn settle(
    released_top: i32,
    intent: DragIntent,
    spec: &HeightSpec,
    container_height: i32,
) -> SettleDecision {
    closest_between(
        DrawerState::Fill,
        DrawerState::Hover,
        released_top,
        intent,
        spec,
        container_height,
    )
    .or_else(|| {
        closest_between(
            DrawerState::Hover,
            DrawerState::Close,
            released_top,
            intent,
            spec,
            container_height,
        )
    })
    .unwrap_or_else(|| nearest(released_top, spec, container_height))
}

fn closest_between(
    begin: DrawerState,
    end: DrawerState,
    cur: i32,
    intent: DragIntent,
    spec: &HeightSpec,
    container_height: i32,
) -> Option<SettleDecision> {
    let begin_top = top(begin, spec, container_height);
    let end_top = top(end, spec, container_height);
    if cur < begin_top || cur > end_top {
        return None;
    }

    let (target, rule) = match spec.thresholds {
        Some(thresholds) => {
            let threshold = if begin == DrawerState::Fill {
                thresholds.top_expand
            } else {
                thresholds.bottom_collapse
            };
            let begin_wins = match intent {
                DragIntent::Open => cur < end_top.saturating_sub(threshold),
                DragIntent::Close => cur < begin_top.saturating_add(threshold),
            };
            (
                if begin_wins { begin } else { end },
                SettleRule::Threshold { threshold },
            )
        }
        None => {
            let midpoint = ((i64::from(begin_top) + i64::from(end_top)) / 2) as i32;
            (
                if cur < midpoint { begin } else { end },
                SettleRule::Midpoint { midpoint },
            )
        }
    };

    Some(SettleDecision {
        released_top: cur,
        target,
        interval: Some((begin, end)),
        rule,
    })
}

fn nearest(cur: i32, spec: &HeightSpec, container_height: i32) -> SettleDecision {
    let target = DrawerState::ALL
        .into_iter()
        .min_by_key(|state| top(*state, spec, container_height).abs_diff(cur))
        .unwrap_or(DrawerState::Close);
    SettleDecision {
        released_top: cur,
        target,
        interval: None,
        rule: SettleRule::Nearest,
    }
}
