#![forbid(unsafe_code)]

//! The drawer controller.
//!
//! [`TertiaryDrawer`] owns the committed [`DrawerState`], the interaction
//! flags, and the observers. It sits between the host's event routing and a
//! [`DragSurface`]:
//!
//! ```text
//!   host ──dispatch_touch──▶ check can_drag, cap strip, blank strip
//!        ──on_intercept_touch──▶ TouchArbiter ──▶ DragSurface::should_intercept
//!        ──on_touch_event──▶ DragSurface::process_touch
//!        ──compute_scroll──▶ DragSurface::continue_settling
//!                                  │
//!                         DragCallback (DrawerCore)
//!                                  │
//!                  clamp, settle, notify, queue SurfaceCommand
//! ```
//!
//! The policy half (`DrawerCore`) is split from the surface so that the
//! surface can borrow it mutably as its callback. Anything the callback needs
//! the surface to do is queued and applied once the surface call returns.
//!
//! # Coordinates
//!
//! Touch positions and the container passed to [`TertiaryDrawer::on_layout`]
//! share one screen space. The drawer's top is kept relative to the
//! container.

use std::rc::Rc;
use std::time::Duration;

use tdrawer_core::{
    EdgeFlags, HitNode, PointerId, Rect, TouchAction, TouchEvent, debug, find_scrollable_target,
    is_under, trace,
};

use crate::arbitration::{GestureSession, InterceptStep, TouchArbiter, can_capture};
use crate::config::{DrawerConfig, DrawerConfigError};
use crate::listener::{StatusListener, StatusListeners, Visibility, VisibilityListener};
use crate::settle::{DragIntent, clamp_top, settle};
use crate::slide_surface::{SlideSurface, SlideSurfaceConfig};
use crate::state::{DrawerState, HeightProxy, HeightSpec, StateGeometry, geometry, top};
use crate::surface::{DragCallback, DragState, DragSurface, SurfaceCommand};

/// Interaction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerFlags {
    /// Host switch for all drag capture.
    pub enable_drag: bool,
    /// Nested content is at its origin, so dragging may start from it.
    pub can_drag: bool,
    /// Horizontal edge swipes close the drawer.
    pub close_on_edge: bool,
    /// Following mode may be entered.
    pub can_following_scroll: bool,
    /// Following mode is active: the drawer tracks external scroll instead
    /// of direct gestures.
    pub is_following_scroll: bool,
}

impl DrawerFlags {
    fn from_config(config: &DrawerConfig) -> Self {
        Self {
            enable_drag: true,
            can_drag: true,
            close_on_edge: false,
            can_following_scroll: config.following_scroll,
            is_following_scroll: false,
        }
    }
}

/// Policy half of the drawer. Implements [`DragCallback`] for the surface.
pub(crate) struct DrawerCore {
    config: DrawerConfig,
    state: DrawerState,
    flags: DrawerFlags,
    touch_on_drawer_top: bool,
    arbiter: TouchArbiter,
    intent: DragIntent,
    listeners: StatusListeners,
    visibility: Visibility,
    visibility_listener: Option<Rc<dyn VisibilityListener>>,
    height_proxy: Option<Rc<dyn HeightProxy>>,
    container: Rect,
    drawer_height: Option<i32>,
    view_top: i32,
    scroll_y: i32,
    commands: Vec<SurfaceCommand>,
}

impl std::fmt::Debug for DrawerCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawerCore")
            .field("state", &self.state)
            .field("flags", &self.flags)
            .field("container", &self.container)
            .field("drawer_height", &self.drawer_height)
            .field("view_top", &self.view_top)
            .field("scroll_y", &self.scroll_y)
            .field("listeners", &self.listeners)
            .field("has_height_proxy", &self.height_proxy.is_some())
            .finish()
    }
}

impl DrawerCore {
    fn new(config: DrawerConfig) -> Self {
        Self {
            state: config.default_state,
            flags: DrawerFlags::from_config(&config),
            touch_on_drawer_top: false,
            arbiter: TouchArbiter::new(config.touch_slop, config.edge_band_px()),
            intent: DragIntent::Open,
            listeners: StatusListeners::new(),
            visibility: Visibility::Visible,
            visibility_listener: None,
            height_proxy: None,
            container: Rect::default(),
            drawer_height: None,
            view_top: 0,
            scroll_y: 0,
            commands: Vec::new(),
            config,
        }
    }

    fn height_spec(&self) -> HeightSpec {
        match &self.height_proxy {
            Some(proxy) => HeightSpec::from_proxy(proxy.as_ref()),
            None => HeightSpec::fixed(self.config.fill_height, self.config.hover_height),
        }
    }

    fn state_top(&self, state: DrawerState) -> i32 {
        top(state, &self.height_spec(), self.container.height)
    }

    /// On-screen rectangle of the drawer, once laid out.
    fn drawer_rect(&self) -> Option<Rect> {
        self.drawer_height.map(|height| {
            Rect::new(
                self.container.x,
                self.container.y.saturating_add(self.view_top),
                self.container.width,
                height,
            )
        })
    }

    fn is_under_drawer_top(&self, x: f32, y: f32) -> bool {
        let cap = self.height_spec().height(self.state);
        is_under(self.drawer_rect().map(|r| r.with_height(cap)), x, y)
    }

    fn is_under_drawer_blank(&self, x: f32, y: f32) -> bool {
        let Some(drawer) = self.drawer_rect() else {
            return false;
        };
        let fill_top = self.container.y.saturating_add(self.state_top(DrawerState::Fill));
        x >= drawer.left() as f32
            && x <= drawer.right() as f32
            && y >= fill_top as f32
            && y <= drawer.top() as f32
    }

    fn can_capture(&self, is_handle_drawer: bool) -> bool {
        can_capture(
            self.flags.enable_drag,
            self.touch_on_drawer_top,
            self.flags.can_drag,
            is_handle_drawer,
        )
    }

    fn change_drawer_state(&mut self, target: DrawerState) {
        if self.flags.is_following_scroll {
            debug!(target: "tdrawer.state", requested = ?target, "state change ignored while following");
            return;
        }
        self.state = target;
        let slide_top = self.state_top(target);
        // Before the first layout there is nothing to slide; on_layout places the view.
        if self.drawer_height.is_some() {
            self.commands.push(SurfaceCommand::SlideTo { top: slide_top });
        }
        debug!(target: "tdrawer.state", state = ?target, top = slide_top, "state committed");
        self.listeners.emit_state_change(target);
    }

    fn scroll(&mut self, to_y: i32) -> i32 {
        let Some(height) = self.drawer_height else {
            return self.scroll_y;
        };
        let max_y = height.saturating_sub(self.state_top(DrawerState::Fill));
        let mut applied = to_y.min(max_y).max(0);
        if self.view_top != max_y {
            applied = 0;
        }
        self.scroll_y = applied;
        applied
    }
}

impl DragCallback for DrawerCore {
    fn try_capture(&mut self, is_drawer: bool, pointer_id: PointerId) -> bool {
        let allowed = self.can_capture(is_drawer) && !self.flags.is_following_scroll;
        trace!(
            target: "tdrawer.touch",
            pointer_id,
            is_drawer,
            on_top = self.touch_on_drawer_top,
            can_drag = self.flags.can_drag,
            allowed,
            "capture requested"
        );
        self.arbiter.record_capture(allowed);
        allowed
    }

    fn on_edge_touched(&mut self, edges: EdgeFlags, pointer_id: PointerId) {
        if edges == EdgeFlags::BOTTOM
            && self.drawer_height.is_some()
            && self.flags.enable_drag
            && !self.flags.is_following_scroll
        {
            trace!(target: "tdrawer.touch", pointer_id, "bottom edge captures drawer");
            self.commands.push(SurfaceCommand::Capture { pointer_id });
        }
    }

    fn clamp_vertical(&mut self, proposed_top: i32, dy: i32) -> i32 {
        self.intent = DragIntent::from_dy(dy);
        self.arbiter.record_intent(self.intent);
        clamp_top(proposed_top, &self.height_spec(), self.container.height)
    }

    fn on_position_changed(&mut self, top: i32, _dy: i32) {
        self.view_top = top;
        self.listeners.emit_dragging(top);
    }

    fn on_released(&mut self, top: i32, x_velocity: f32, y_velocity: f32) {
        let decision = settle(top, self.intent, &self.height_spec(), self.container.height);
        debug!(
            target: "tdrawer.settle",
            released_top = decision.released_top,
            intent = ?self.intent,
            settled = ?decision.target,
            rule = ?decision.rule,
            x_velocity,
            y_velocity,
            "drag released"
        );
        self.change_drawer_state(decision.target);
    }

    fn on_cancelled(&mut self, top: i32) {
        let home = self.state_top(self.state);
        debug!(target: "tdrawer.settle", top, home, state = ?self.state, "drag cancelled");
        self.commands.push(SurfaceCommand::SlideTo { top: home });
    }

    fn vertical_drag_range(&self) -> i32 {
        i32::from(self.drawer_height.is_some())
    }

    fn is_drawer_under(&self, x: f32, y: f32) -> bool {
        is_under(self.drawer_rect(), x, y)
    }

    fn container(&self) -> Rect {
        self.container
    }
}

/// Three-position drawer controller.
///
/// Generic over the [`DragSurface`] that tracks pointers and animates the
/// view; [`SlideSurface`] is used by default.
#[derive(Debug)]
pub struct TertiaryDrawer<S: DragSurface = SlideSurface> {
    core: DrawerCore,
    surface: S,
    /// The drawer owns the current sequence (see [`Self::handle_touch`]).
    owns_sequence: bool,
}

impl TertiaryDrawer<SlideSurface> {
    /// Build a drawer with the reference surface, tuned from `config`.
    pub fn new(config: DrawerConfig) -> Result<Self, DrawerConfigError> {
        let surface = SlideSurface::new(SlideSurfaceConfig {
            touch_slop: config.touch_slop,
            ..SlideSurfaceConfig::default()
        });
        Self::with_surface(config, surface)
    }
}

impl<S: DragSurface> TertiaryDrawer<S> {
    /// Build a drawer around a host-provided surface.
    pub fn with_surface(config: DrawerConfig, surface: S) -> Result<Self, DrawerConfigError> {
        config.validate()?;
        Ok(Self {
            core: DrawerCore::new(config),
            surface,
            owns_sequence: false,
        })
    }

    fn flush(&mut self) {
        for command in std::mem::take(&mut self.core.commands) {
            match command {
                SurfaceCommand::SlideTo { top } => {
                    self.surface.smooth_slide_to(top);
                }
                SurfaceCommand::Capture { pointer_id } => {
                    self.surface.capture_child(pointer_id);
                    self.core.arbiter.record_capture(true);
                }
            }
        }
        self.core.view_top = self.surface.view_top();
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    /// Commit `target` and slide toward it. Listeners are told once per
    /// call, even if the drawer is already there. Ignored while following.
    pub fn change_drawer_state(&mut self, target: DrawerState) {
        self.core.change_drawer_state(target);
        self.flush();
    }

    /// Re-apply the current state, typically after the first layout.
    pub fn reset_drawer_layout(&mut self) {
        self.change_drawer_state(self.core.state);
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> DrawerState {
        self.core.state
    }

    /// Heights in effect right now: the proxy if one is set.
    #[must_use]
    pub fn height_spec(&self) -> HeightSpec {
        self.core.height_spec()
    }

    #[must_use]
    pub fn state_geometry(&self, state: DrawerState) -> StateGeometry {
        geometry(state, &self.core.height_spec(), self.core.container.height)
    }

    /// Current top of the drawer relative to the container.
    #[inline]
    #[must_use]
    pub fn view_top(&self) -> i32 {
        self.surface.view_top()
    }

    #[inline]
    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.surface.drag_state()
    }

    #[inline]
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &DrawerConfig {
        &self.core.config
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn flags(&self) -> DrawerFlags {
        self.core.flags
    }

    pub fn set_enable_drag(&mut self, enable: bool) {
        self.core.flags.enable_drag = enable;
    }

    #[inline]
    #[must_use]
    pub fn is_enable_drag(&self) -> bool {
        self.core.flags.enable_drag
    }

    /// Result of the latest nested scroll check.
    #[inline]
    #[must_use]
    pub fn can_drag(&self) -> bool {
        self.core.flags.can_drag
    }

    pub fn set_close_on_edge(&mut self, close_on_edge: bool) {
        self.core.flags.close_on_edge = close_on_edge;
    }

    #[inline]
    #[must_use]
    pub fn is_close_on_edge(&self) -> bool {
        self.core.flags.close_on_edge
    }

    /// Allow or forbid following mode. Forbidding it also leaves the mode.
    pub fn set_following_scroll(&mut self, enabled: bool) {
        self.core.flags.can_following_scroll = enabled;
        if !enabled {
            self.core.flags.is_following_scroll = false;
        }
    }

    #[inline]
    #[must_use]
    pub fn can_following_scroll(&self) -> bool {
        self.core.flags.can_following_scroll
    }

    /// Enter or leave following mode. Entering is ignored when the
    /// capability is off.
    pub fn set_is_following_scroll(&mut self, following: bool) {
        if following && !self.core.flags.can_following_scroll {
            debug!(target: "tdrawer.state", "following mode not allowed; ignored");
            return;
        }
        self.core.flags.is_following_scroll = following;
    }

    #[inline]
    #[must_use]
    pub fn is_following_scroll(&self) -> bool {
        self.core.flags.is_following_scroll
    }

    // ------------------------------------------------------------------
    // Follow scroll
    // ------------------------------------------------------------------

    /// Shift the drawer's content by `to_y` while the drawer rests at the
    /// bottom of its travel. Returns the applied offset.
    pub fn scroll(&mut self, to_y: i32) -> i32 {
        self.core.scroll(to_y)
    }

    #[inline]
    #[must_use]
    pub fn drawer_scroll_y(&self) -> i32 {
        self.core.scroll_y
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    /// Register a listener. Returns false if it was already registered.
    pub fn add_status_listener(&mut self, listener: Rc<dyn StatusListener>) -> bool {
        self.core.listeners.add(listener)
    }

    pub fn remove_status_listener(&mut self, listener: &Rc<dyn StatusListener>) -> bool {
        self.core.listeners.remove(listener)
    }

    pub fn set_visibility_listener(&mut self, listener: Option<Rc<dyn VisibilityListener>>) {
        self.core.visibility_listener = listener;
    }

    /// Update visibility, notifying the listener only on change.
    pub fn set_visibility(&mut self, visibility: Visibility) {
        if visibility == self.core.visibility {
            return;
        }
        self.core.visibility = visibility;
        if let Some(listener) = &self.core.visibility_listener {
            listener.on_visibility_change(visibility);
        }
    }

    #[inline]
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.core.visibility
    }

    /// Install or clear a live height source. Takes effect on the next
    /// geometry query.
    pub fn set_content_height_proxy(&mut self, proxy: Option<Rc<dyn HeightProxy>>) {
        self.core.height_proxy = proxy;
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Record container bounds and the measured drawer height, place the
    /// drawer, and return its layout rectangle.
    ///
    /// A drag in progress keeps its live position. A slide in progress keeps
    /// its live position and is redirected to the state's new top.
    pub fn on_layout(&mut self, container: Rect, drawer_height: i32) -> Rect {
        self.core.container = container;
        self.core.drawer_height = Some(drawer_height.max(0));
        let top = match self.surface.drag_state() {
            DragState::Dragging => self.surface.view_top(),
            DragState::Settling => {
                let target = self.core.state_top(self.core.state);
                if self.surface.smooth_slide_to(target) {
                    trace!(target: "tdrawer.surface", to = target, "slide redirected by layout");
                }
                self.surface.view_top()
            }
            DragState::Idle => {
                let top = self.core.state_top(self.core.state);
                self.surface.place_view(top);
                top
            }
        };
        self.core.view_top = top;
        self.core.scroll(0);
        Rect::new(
            container.x,
            container.y.saturating_add(top),
            container.width,
            drawer_height.max(0),
        )
    }

    /// Whether `(x, y)` hits the drawer's cap strip: the drawer's width by
    /// the current state's visible height.
    #[must_use]
    pub fn is_under_drawer_top(&self, x: f32, y: f32) -> bool {
        self.core.is_under_drawer_top(x, y)
    }

    /// Whether `(x, y)` hits the blank strip between the Fill position and
    /// the drawer's current top.
    #[must_use]
    pub fn is_under_drawer_blank(&self, x: f32, y: f32) -> bool {
        self.core.is_under_drawer_blank(x, y)
    }

    // ------------------------------------------------------------------
    // Touch intake
    // ------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn gesture(&self) -> Option<&GestureSession> {
        self.core.arbiter.session()
    }

    /// First look at every event, before any routing decision.
    ///
    /// Checks nested content for scroll position and, on a down, records
    /// whether the touch landed on the cap strip or the blank strip.
    pub fn dispatch_touch(&mut self, event: &TouchEvent, content: Option<&dyn HitNode>) {
        let (x, y) = (event.x(), event.y());
        if let Some(root) = content {
            match find_scrollable_target(root, x, y) {
                Some(region) => self.core.flags.can_drag = !region.can_scroll_backward(),
                None if event.action == TouchAction::Down => self.core.flags.can_drag = true,
                None => {}
            }
        }
        if event.action == TouchAction::Down {
            self.core.touch_on_drawer_top = self.core.is_under_drawer_top(x, y);
            if self.core.is_under_drawer_blank(x, y) {
                trace!(target: "tdrawer.touch", x, y, "down on blank strip");
                self.core.listeners.emit_scroll_on_blank();
            }
        }
    }

    fn begin_sequence(&mut self, event: &TouchEvent) {
        let drawer = self.core.drawer_rect();
        let close_on_edge = self.core.flags.close_on_edge;
        let on_top = self.core.touch_on_drawer_top;
        self.core.arbiter.begin(event, on_top, drawer, close_on_edge);
    }

    /// Whether the drawer takes the sequence away from its content.
    pub fn on_intercept_touch(&mut self, event: &TouchEvent) -> bool {
        if event.action == TouchAction::Down {
            self.begin_sequence(event);
        }

        if self.core.flags.is_following_scroll {
            let intercepted = self.surface.should_intercept(event, &mut self.core);
            self.flush();
            self.finish_if_terminal(event);
            return intercepted;
        }

        let close_on_edge = self.core.flags.close_on_edge;
        let intercepted = match self.core.arbiter.intercept(event, close_on_edge) {
            InterceptStep::EdgeClose => {
                self.core.change_drawer_state(DrawerState::Close);
                self.flush();
                true
            }
            InterceptStep::Consume => true,
            InterceptStep::Consult { tap } => {
                let accepts = self.surface.should_intercept(event, &mut self.core);
                self.flush();
                let intercepted = tap && accepts;
                self.core.arbiter.record_decision(intercepted);
                intercepted
            }
        };
        self.finish_if_terminal(event);
        intercepted
    }

    /// Handle an event the drawer owns. Returns whether it was consumed.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if event.action == TouchAction::Down && self.core.arbiter.session().is_none() {
            self.begin_sequence(event);
        }
        if self.core.arbiter.edge_closed() {
            self.finish_if_terminal(event);
            return true;
        }
        let close_on_edge = self.core.flags.close_on_edge;
        if !self.core.flags.is_following_scroll && self.core.arbiter.check_edge(event, close_on_edge) {
            self.core.change_drawer_state(DrawerState::Close);
            self.flush();
            return true;
        }

        self.surface.process_touch(event, &mut self.core);
        self.flush();
        let handled = self.core.touch_on_drawer_top
            || self.core.can_capture(self.core.is_drawer_under(event.x(), event.y()));
        self.finish_if_terminal(event);
        handled
    }

    fn finish_if_terminal(&mut self, event: &TouchEvent) {
        if event.action.is_terminal() {
            self.core.arbiter.end();
        }
    }

    /// Route one event the way a view hierarchy would.
    ///
    /// Once the drawer intercepts, or claims an unhandled down, the rest of
    /// the sequence goes straight to [`Self::on_touch_event`]. Content is
    /// assumed to claim a down whenever a scrollable node lies under it.
    /// Returns whether the drawer owns the event.
    pub fn handle_touch(&mut self, event: &TouchEvent, content: Option<&dyn HitNode>) -> bool {
        self.dispatch_touch(event, content);
        if event.action == TouchAction::Down {
            self.owns_sequence = false;
        }

        let owned = if self.owns_sequence {
            self.on_touch_event(event)
        } else if self.on_intercept_touch(event) {
            self.owns_sequence = true;
            true
        } else if event.action == TouchAction::Down
            && content.is_none_or(|root| find_scrollable_target(root, event.x(), event.y()).is_none())
        {
            self.owns_sequence = self.on_touch_event(event);
            self.owns_sequence
        } else {
            false
        };

        if event.action.is_terminal() {
            self.owns_sequence = false;
            self.core.arbiter.end();
        }
        owned
    }

    // ------------------------------------------------------------------
    // Frames
    // ------------------------------------------------------------------

    /// Advance an in-flight slide by `dt`. Emits `on_moving` when the drawer
    /// moved and returns whether another frame is needed.
    pub fn compute_scroll(&mut self, dt: Duration) -> bool {
        let before = self.surface.view_top();
        let more = self.surface.continue_settling(dt, &mut self.core);
        self.flush();
        let after = self.surface.view_top();
        if after != before {
            self.core.listeners.emit_moving(after);
        }
        more
    }

    /// Run frames of `dt` until the drawer is at rest. Returns the number of
    /// frames run, capped at `max_frames`.
    pub fn settle_frames(&mut self, dt: Duration, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.compute_scroll(dt) {
            frames += 1;
        }
        frames
    }

    /// Drop any capture or slide and forget the current sequence. The
    /// committed state is unchanged.
    pub fn abort(&mut self) {
        self.surface.abort();
        self.core.arbiter.end();
        self.core.view_top = self.surface.view_top();
        self.owns_sequence = false;
    }
}
