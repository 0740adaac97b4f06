//! End-to-end drawer behavior through a scripted host.
//!
//! Every test lays a drawer out in a 500x1000 container and drives it with
//! touch events, the way a view hierarchy would.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tdrawer::{
    ArbitrationPhase, DragIntent, DragState, DrawerConfig, DrawerState, LiveHeights,
    StatusListener, TertiaryDrawer,
};
use tdrawer_core::{HitNode, NodeSnapshot, Rect, TouchEvent};

const CONTAINER: Rect = Rect::new(0, 0, 500, 1000);
const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 1000;

#[derive(Default)]
struct Recorder {
    states: RefCell<Vec<DrawerState>>,
    dragging: RefCell<Vec<i32>>,
    moving: RefCell<Vec<i32>>,
}

impl StatusListener for Recorder {
    fn on_moving(&self, top: i32) {
        self.moving.borrow_mut().push(top);
    }

    fn on_dragging(&self, offset: i32) {
        self.dragging.borrow_mut().push(offset);
    }

    fn on_state_change(&self, state: DrawerState) {
        self.states.borrow_mut().push(state);
    }
}

fn laid_out(state: DrawerState) -> (TertiaryDrawer, Rc<Recorder>) {
    let config = DrawerConfig::default()
        .with_heights(1000, 400)
        .with_default_state(state);
    let mut drawer = TertiaryDrawer::new(config).expect("valid config");
    drawer.on_layout(CONTAINER, 1000);
    let recorder = Rc::new(Recorder::default());
    drawer.add_status_listener(recorder.clone());
    (drawer, recorder)
}

/// Drag vertically from `from_y` to `to_y` at x = 250 and release.
fn drag(drawer: &mut TertiaryDrawer, from_y: f32, to_y: f32) {
    drawer.handle_touch(&TouchEvent::down(250.0, from_y, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, to_y, 16), None);
    drawer.handle_touch(&TouchEvent::up(250.0, to_y, 32), None);
}

fn settle(drawer: &mut TertiaryDrawer) {
    drawer.settle_frames(FRAME, MAX_FRAMES);
    assert_eq!(drawer.drag_state(), DragState::Idle, "slide did not finish");
}

// ---------------------------------------------------------------------------
// Programmatic transitions
// ---------------------------------------------------------------------------

#[test]
fn change_state_is_idempotent_and_notifies_each_call() {
    let (mut drawer, rec) = laid_out(DrawerState::Close);
    drawer.change_drawer_state(DrawerState::Fill);
    settle(&mut drawer);
    let first = drawer.view_top();

    drawer.change_drawer_state(DrawerState::Fill);
    settle(&mut drawer);

    assert_eq!(drawer.view_top(), first);
    assert_eq!(first, 0);
    assert_eq!(*rec.states.borrow(), vec![DrawerState::Fill, DrawerState::Fill]);
}

#[test]
fn round_trip_returns_to_initial_offset() {
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    let initial = drawer.view_top();
    for state in [DrawerState::Fill, DrawerState::Close, DrawerState::Hover] {
        drawer.change_drawer_state(state);
        settle(&mut drawer);
    }
    assert_eq!(drawer.view_top(), initial);
    assert_eq!(drawer.state(), DrawerState::Hover);
}

#[test]
fn slide_reports_moving_and_dragging() {
    let (mut drawer, rec) = laid_out(DrawerState::Close);
    drawer.change_drawer_state(DrawerState::Hover);
    settle(&mut drawer);
    assert_eq!(rec.moving.borrow().last(), Some(&600));
    assert_eq!(*rec.moving.borrow(), *rec.dragging.borrow());
}

#[test]
fn following_mode_ignores_change_state() {
    let (mut drawer, rec) = laid_out(DrawerState::Close);
    drawer.set_is_following_scroll(true);
    drawer.change_drawer_state(DrawerState::Fill);
    assert_eq!(drawer.state(), DrawerState::Close);
    assert_eq!(drawer.view_top(), 1000);
    assert!(rec.states.borrow().is_empty());
    assert!(!drawer.compute_scroll(FRAME));
}

#[test]
fn following_mode_refuses_drag() {
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.set_is_following_scroll(true);
    drag(&mut drawer, 650.0, 300.0);
    assert_eq!(drawer.view_top(), 600);
    assert!(rec.states.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Settle
// ---------------------------------------------------------------------------

#[test]
fn midpoint_settle_below_hover() {
    // top(Hover) = 600, top(Close) = 1000, midpoint 800.
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drag(&mut drawer, 650.0, 900.0);
    assert_eq!(drawer.state(), DrawerState::Close);
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 1000);

    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drag(&mut drawer, 650.0, 800.0);
    assert_eq!(drawer.state(), DrawerState::Hover);
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 600);
}

#[test]
fn threshold_settle_with_height_proxy() {
    let proxy = Rc::new(LiveHeights::new(1000, 400, 0).with_thresholds(50, 0));

    // Opening to 530: more than 50 above top(Hover), so Fill.
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.set_content_height_proxy(Some(proxy.clone()));
    drag(&mut drawer, 650.0, 580.0);
    assert_eq!(drawer.state(), DrawerState::Fill);

    // Opening to 560: within 50 of top(Hover), so Hover.
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.set_content_height_proxy(Some(proxy));
    drag(&mut drawer, 650.0, 610.0);
    assert_eq!(drawer.state(), DrawerState::Hover);
}

#[test]
fn proxy_heights_apply_on_next_layout() {
    let proxy = Rc::new(LiveHeights::new(900, 300, 100));
    let (mut drawer, _rec) = laid_out(DrawerState::Close);
    drawer.set_content_height_proxy(Some(proxy.clone()));
    drawer.on_layout(CONTAINER, 1000);
    assert_eq!(drawer.view_top(), 900);

    proxy.close.set(0);
    drawer.on_layout(CONTAINER, 1000);
    assert_eq!(drawer.view_top(), 1000);
}

#[test]
fn cancel_keeps_committed_state_and_slides_home() {
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.handle_touch(&TouchEvent::down(250.0, 650.0, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 900.0, 16), None);
    assert_eq!(drawer.view_top(), 850);
    drawer.handle_touch(&TouchEvent::cancel(250.0, 900.0, 32), None);

    assert_eq!(drawer.state(), DrawerState::Hover);
    assert!(rec.states.borrow().is_empty());
    assert!(drawer.gesture().is_none());
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 600);
}

// ---------------------------------------------------------------------------
// Arbitration
// ---------------------------------------------------------------------------

fn scroller(offset: i32) -> NodeSnapshot {
    NodeSnapshot::container(Rect::new(0, 0, 500, 2000))
        .with_child(NodeSnapshot::scrollable(Rect::new(0, 0, 500, 2000), offset))
}

#[test]
fn cap_sequence_intercepts_only_past_slop() {
    let content = scroller(0);
    let content: Option<&dyn HitNode> = Some(&content);

    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    let down = TouchEvent::down(250.0, 650.0, 0);
    drawer.dispatch_touch(&down, content);
    assert!(!drawer.on_intercept_touch(&down));

    let below_slop = TouchEvent::moved(250.0, 657.0, 16);
    drawer.dispatch_touch(&below_slop, content);
    assert!(!drawer.on_intercept_touch(&below_slop));

    let past_slop = TouchEvent::moved(250.0, 659.0, 32);
    drawer.dispatch_touch(&past_slop, content);
    assert!(drawer.on_intercept_touch(&past_slop));
    assert_eq!(drawer.gesture().map(|g| g.phase), Some(ArbitrationPhase::Accepted));
}

#[test]
fn exactly_slop_does_not_intercept() {
    let content = scroller(0);
    let content: Option<&dyn HitNode> = Some(&content);
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    assert!(!drawer.handle_touch(&TouchEvent::down(250.0, 650.0, 0), content));
    assert!(!drawer.handle_touch(&TouchEvent::moved(250.0, 642.0, 16), content));
    assert!(drawer.handle_touch(&TouchEvent::moved(250.0, 641.0, 32), content));
}

#[test]
fn edge_swipe_closes_once_and_consumes_sequence() {
    let content = scroller(0);
    let content: Option<&dyn HitNode> = Some(&content);
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.set_close_on_edge(true);

    assert!(!drawer.handle_touch(&TouchEvent::down(10.0, 800.0, 0), content));
    assert!(drawer.handle_touch(&TouchEvent::moved(30.0, 802.0, 16), content));
    assert_eq!(drawer.state(), DrawerState::Close);

    assert!(drawer.handle_touch(&TouchEvent::moved(60.0, 700.0, 32), content));
    assert!(drawer.handle_touch(&TouchEvent::moved(90.0, 400.0, 48), content));
    drawer.handle_touch(&TouchEvent::up(90.0, 400.0, 64), content);

    assert_eq!(*rec.states.borrow(), vec![DrawerState::Close]);
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 1000);
}

#[test]
fn edge_swipe_needs_close_on_edge() {
    let content = scroller(0);
    let content: Option<&dyn HitNode> = Some(&content);
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.handle_touch(&TouchEvent::down(10.0, 800.0, 0), content);
    drawer.handle_touch(&TouchEvent::moved(60.0, 802.0, 16), content);
    assert_eq!(drawer.state(), DrawerState::Hover);
    assert!(rec.states.borrow().is_empty());
}

#[test]
fn edge_band_drag_owned_by_drawer_stays_a_drag() {
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.set_close_on_edge(true);

    assert!(drawer.handle_touch(&TouchEvent::down(10.0, 650.0, 0), None));
    assert_eq!(drawer.drag_state(), DragState::Dragging);
    assert!(drawer.handle_touch(&TouchEvent::moved(10.0, 630.0, 16), None));
    assert_eq!(drawer.view_top(), 580);

    // Mostly horizontal drift from inside the edge band.
    assert!(drawer.handle_touch(&TouchEvent::moved(45.0, 625.0, 32), None));
    assert_eq!(drawer.state(), DrawerState::Hover);
    assert_eq!(drawer.view_top(), 575);
    assert_eq!(drawer.drag_state(), DragState::Dragging);

    drawer.handle_touch(&TouchEvent::up(45.0, 625.0, 48), None);
    assert_eq!(drawer.state(), DrawerState::Hover);
    assert!(!rec.states.borrow().contains(&DrawerState::Close));
}

#[test]
fn nested_scroll_check_tracks_content() {
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);

    let scrolled = scroller(40);
    drawer.dispatch_touch(&TouchEvent::down(250.0, 700.0, 0), Some(&scrolled));
    assert!(!drawer.can_drag());

    let at_origin = scroller(0);
    drawer.dispatch_touch(&TouchEvent::moved(250.0, 710.0, 16), Some(&at_origin));
    assert!(drawer.can_drag());

    drawer.dispatch_touch(&TouchEvent::moved(250.0, 720.0, 32), Some(&scrolled));
    assert!(!drawer.can_drag());
    let empty = NodeSnapshot::container(Rect::new(0, 0, 500, 2000));
    drawer.dispatch_touch(&TouchEvent::moved(250.0, 730.0, 48), Some(&empty));
    assert!(!drawer.can_drag(), "a move without a scroller keeps the last result");
    drawer.dispatch_touch(&TouchEvent::down(250.0, 730.0, 64), Some(&empty));
    assert!(drawer.can_drag());
}

#[test]
fn settling_drawer_caught_only_when_content_at_origin() {
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.change_drawer_state(DrawerState::Close);
    drawer.compute_scroll(FRAME);
    let mid = drawer.view_top();
    assert!(mid > 600 && mid < 900, "mid = {mid}");

    // Close has no cap strip, so the nested scroll check decides.
    let y = (mid + 100) as f32;
    let scrolled = scroller(40);
    let down = TouchEvent::down(250.0, y, 0);
    drawer.dispatch_touch(&down, Some(&scrolled));
    assert!(!drawer.on_intercept_touch(&down));
    assert_eq!(drawer.drag_state(), DragState::Settling);
    drawer.on_intercept_touch(&TouchEvent::cancel(250.0, y, 8));

    let at_origin = scroller(0);
    let top = drawer.view_top();
    let down = TouchEvent::down(250.0, (top + 100) as f32, 16);
    drawer.dispatch_touch(&down, Some(&at_origin));
    drawer.on_intercept_touch(&down);
    assert_eq!(drawer.drag_state(), DragState::Dragging);
    assert_eq!(drawer.view_top(), top);
}

#[test]
fn bottom_edge_pull_opens_closed_drawer() {
    let (mut drawer, _rec) = laid_out(DrawerState::Close);
    drawer.handle_touch(&TouchEvent::down(250.0, 995.0, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 980.0, 16), None);
    assert!(drawer.handle_touch(&TouchEvent::moved(250.0, 500.0, 32), None));
    assert_eq!(drawer.view_top(), 520);
    drawer.handle_touch(&TouchEvent::up(250.0, 500.0, 48), None);
    assert_eq!(drawer.state(), DrawerState::Hover);
}

#[test]
fn disabled_drag_blocks_bottom_edge_pull() {
    let (mut drawer, _rec) = laid_out(DrawerState::Close);
    drawer.set_enable_drag(false);
    drawer.handle_touch(&TouchEvent::down(250.0, 995.0, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 500.0, 16), None);
    drawer.handle_touch(&TouchEvent::up(250.0, 500.0, 32), None);
    assert_eq!(drawer.view_top(), 1000);
    assert_eq!(drawer.state(), DrawerState::Close);
}

#[test]
fn drag_is_clamped_to_fill_and_close() {
    let (mut drawer, rec) = laid_out(DrawerState::Hover);
    drawer.handle_touch(&TouchEvent::down(250.0, 650.0, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, -900.0, 16), None);
    assert_eq!(drawer.view_top(), 0);
    drawer.handle_touch(&TouchEvent::moved(250.0, 2500.0, 32), None);
    assert_eq!(drawer.view_top(), 1000);
    assert!(rec.dragging.borrow().iter().all(|top| (0..=1000).contains(top)));
}

#[test]
fn layout_during_drag_keeps_live_top() {
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.handle_touch(&TouchEvent::down(250.0, 650.0, 0), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 450.0, 16), None);
    let rect = drawer.on_layout(CONTAINER, 1000);
    assert_eq!(rect.y, 400);
    assert_eq!(drawer.view_top(), 400);
}

#[test]
fn layout_during_slide_redirects_to_new_container() {
    let (mut drawer, _rec) = laid_out(DrawerState::Close);
    drawer.change_drawer_state(DrawerState::Hover);
    drawer.compute_scroll(FRAME);
    assert_eq!(drawer.drag_state(), DragState::Settling);

    let shorter = Rect::new(0, 0, 500, 800);
    drawer.on_layout(shorter, 1000);
    assert_eq!(drawer.surface().slide_target(), Some(400));
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 400);
    assert_eq!(drawer.view_top(), drawer.state_geometry(DrawerState::Hover).top);
}

#[test]
fn layout_during_slide_picks_up_proxy_heights() {
    let proxy = Rc::new(LiveHeights::new(1000, 400, 0));
    let (mut drawer, _rec) = laid_out(DrawerState::Close);
    drawer.set_content_height_proxy(Some(proxy.clone()));
    drawer.change_drawer_state(DrawerState::Hover);
    drawer.compute_scroll(FRAME);

    proxy.hover.set(300);
    drawer.on_layout(CONTAINER, 1000);
    settle(&mut drawer);
    assert_eq!(drawer.state(), DrawerState::Hover);
    assert_eq!(drawer.view_top(), 700);
}

#[test]
fn state_change_before_first_layout_is_placed_by_layout() {
    let config = DrawerConfig::default().with_heights(1000, 400);
    let mut drawer = TertiaryDrawer::new(config).expect("valid config");
    drawer.change_drawer_state(DrawerState::Hover);
    assert_eq!(drawer.state(), DrawerState::Hover);
    assert_eq!(drawer.drag_state(), DragState::Idle);

    drawer.on_layout(CONTAINER, 1000);
    assert_eq!(drawer.drag_state(), DragState::Idle);
    assert_eq!(drawer.view_top(), 600);
}

#[test]
fn caught_slide_released_in_place_keeps_drag_intent() {
    let proxy = Rc::new(LiveHeights::new(1000, 400, 0).with_thresholds(50, 0));
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.set_content_height_proxy(Some(proxy));

    // Opening drag to 350 settles to Fill.
    drag(&mut drawer, 650.0, 400.0);
    assert_eq!(drawer.state(), DrawerState::Fill);
    settle(&mut drawer);
    assert_eq!(drawer.view_top(), 0);

    // The slide back down to Hover must not count as a closing drag.
    drawer.change_drawer_state(DrawerState::Hover);
    for _ in 0..MAX_FRAMES {
        drawer.compute_scroll(FRAME);
        if drawer.view_top() > 100 {
            break;
        }
    }
    let caught = drawer.view_top();
    assert!(caught > 100 && caught < 500, "caught = {caught}");

    let y = (caught + 100) as f32;
    assert!(drawer.handle_touch(&TouchEvent::down(250.0, y, 100), None));
    assert_eq!(drawer.drag_state(), DragState::Dragging);
    drawer.handle_touch(&TouchEvent::up(250.0, y, 116), None);
    assert_eq!(drawer.state(), DrawerState::Fill);
}

#[test]
fn session_intent_set_by_first_drag_tick() {
    let (mut drawer, _rec) = laid_out(DrawerState::Hover);
    drawer.handle_touch(&TouchEvent::down(250.0, 650.0, 0), None);
    assert_eq!(drawer.gesture().and_then(|g| g.intent), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 600.0, 16), None);
    drawer.handle_touch(&TouchEvent::moved(250.0, 700.0, 32), None);
    assert_eq!(drawer.gesture().and_then(|g| g.intent), Some(DragIntent::Open));
    assert_eq!(drawer.gesture().map(|g| g.phase), Some(ArbitrationPhase::Accepted));
}
