#![forbid(unsafe_code)]

//! Status notification fan-out.
//!
//! Listeners are kept in registration order and deduplicated by identity:
//! registering the same `Rc` twice is a no-op, while two distinct listeners
//! with identical behavior are both kept. Every event reaches every
//! listener exactly once.

use std::fmt;
use std::rc::Rc;

use crate::state::DrawerState;

/// Observer of drawer movement and state changes. All methods default to
/// no-ops.
pub trait StatusListener {
    /// The drawer moved to `top` while settling.
    fn on_moving(&self, _top: i32) {}

    /// The drawer's top changed to `offset` through drag or settle.
    fn on_dragging(&self, _offset: i32) {}

    /// A new state was committed.
    fn on_state_change(&self, _state: DrawerState) {}

    /// A touch-down landed on the blank strip above the drawer.
    fn on_scroll_on_blank(&self) {}
}

/// Host-visible presence of the drawer container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

/// Observer of [`Visibility`] changes.
pub trait VisibilityListener {
    fn on_visibility_change(&self, visibility: Visibility);
}

/// Ordered, identity-deduplicated listener list.
#[derive(Default)]
pub struct StatusListeners {
    listeners: Vec<Rc<dyn StatusListener>>,
}

impl fmt::Debug for StatusListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

impl StatusListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. Returns false if it was already registered.
    pub fn add(&mut self, listener: Rc<dyn StatusListener>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.listeners.push(listener);
        true
    }

    /// Unregister `listener`. Returns false if it was not registered.
    pub fn remove(&mut self, listener: &Rc<dyn StatusListener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !same_listener(l, listener));
        self.listeners.len() != before
    }

    #[must_use]
    pub fn contains(&self, listener: &Rc<dyn StatusListener>) -> bool {
        self.listeners.iter().any(|l| same_listener(l, listener))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit_moving(&self, top: i32) {
        self.listeners.iter().for_each(|l| l.on_moving(top));
    }

    pub fn emit_dragging(&self, offset: i32) {
        self.listeners.iter().for_each(|l| l.on_dragging(offset));
    }

    pub fn emit_state_change(&self, state: DrawerState) {
        self.listeners.iter().for_each(|l| l.on_state_change(state));
    }

    pub fn emit_scroll_on_blank(&self) {
        self.listeners.iter().for_each(|l| l.on_scroll_on_blank());
    }
}

/// Identity comparison on the data pointer only; vtable pointers for the
/// same object can differ between codegen units.
fn same_listener(a: &Rc<dyn StatusListener>, b: &Rc<dyn StatusListener>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}
