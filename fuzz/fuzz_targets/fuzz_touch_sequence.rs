#![no_main]

use std::rc::Rc;
use std::time::Duration;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tdrawer::{DrawerConfig, DrawerState, LiveHeights, TertiaryDrawer};
use tdrawer_core::{NodeSnapshot, Rect, TouchAction, TouchEvent};

#[derive(Debug, Arbitrary)]
enum Op {
    Touch { action: u8, x: i16, y: i16 },
    Frame { ms: u8 },
    ChangeState(u8),
    Layout { height: u16, drawer_height: u16 },
    Following(bool),
    EnableDrag(bool),
    CloseOnEdge(bool),
    Scroll(i16),
    ProxyHover(u16),
    ContentOffset(i8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    fill: u16,
    hover: u16,
    default_state: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let fill = i32::from(input.fill % 2048);
    let hover = i32::from(input.hover % 2048).min(fill);
    let config = DrawerConfig::default()
        .with_heights(fill, hover)
        .with_default_state(DrawerState::from_index(i32::from(input.default_state % 3)));
    let Ok(mut drawer) = TertiaryDrawer::new(config) else {
        return;
    };
    let proxy = Rc::new(LiveHeights::new(fill, hover, 0).with_thresholds(40, 40));
    let mut content = NodeSnapshot::scrollable(Rect::new(0, 0, 500, 4000), 0);
    let mut t = 0u64;

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Touch { action, x, y } => {
                let action = match action % 4 {
                    0 => TouchAction::Down,
                    1 => TouchAction::Move,
                    2 => TouchAction::Up,
                    _ => TouchAction::Cancel,
                };
                t += 8;
                let event = TouchEvent::new(action, f32::from(x), f32::from(y), t);
                drawer.handle_touch(&event, Some(&content));
            }
            Op::Frame { ms } => {
                drawer.compute_scroll(Duration::from_millis(u64::from(ms)));
            }
            Op::ChangeState(s) => drawer.change_drawer_state(DrawerState::from_index(i32::from(s % 3))),
            Op::Layout {
                height,
                drawer_height,
            } => {
                let container = Rect::new(0, 0, 500, i32::from(height % 4096));
                let rect = drawer.on_layout(container, i32::from(drawer_height % 4096));
                assert_eq!(rect.height, i32::from(drawer_height % 4096));
            }
            Op::Following(on) => drawer.set_is_following_scroll(on),
            Op::EnableDrag(on) => drawer.set_enable_drag(on),
            Op::CloseOnEdge(on) => drawer.set_close_on_edge(on),
            Op::Scroll(y) => {
                let applied = drawer.scroll(i32::from(y));
                assert!(applied >= 0, "negative follow scroll {applied}");
            }
            Op::ProxyHover(h) => {
                proxy.hover.set(i32::from(h % 2048));
                drawer.set_content_height_proxy(Some(proxy.clone()));
            }
            Op::ContentOffset(offset) => {
                content = NodeSnapshot::scrollable(Rect::new(0, 0, 500, 4000), i32::from(offset));
            }
        }
    }

    drawer.abort();
    assert!(drawer.gesture().is_none());
});
