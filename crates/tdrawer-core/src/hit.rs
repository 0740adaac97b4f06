#![forbid(unsafe_code)]

//! Hit testing over host content.
//!
//! The drawer never sees a concrete UI tree. Hosts expose their content
//! through [`HitNode`], and nodes that scroll on their own additionally
//! expose [`ScrollRegion`]. The search below answers one question: which
//! scrollable node would receive a touch at `(x, y)`?
//!
//! # Ordering
//!
//! Children are searched front-to-back: higher [`HitNode::z_index`] first,
//! and among equal z the child added last (drawn on top) first. Overlapping
//! scrollers therefore resolve to the one the user actually sees.

use crate::geometry::Rect;

/// A node that scrolls independently of its parent.
pub trait ScrollRegion {
    /// Vertical distance scrolled away from the content origin.
    ///
    /// Zero means the content is at its top and cannot scroll further back.
    fn origin_offset(&self) -> i32;

    /// Whether the content can still scroll backward (toward its origin).
    #[inline]
    fn can_scroll_backward(&self) -> bool {
        self.origin_offset() != 0
    }
}

/// A node of host content participating in hit tests.
pub trait HitNode {
    /// On-screen bounds.
    fn bounds(&self) -> Rect;

    fn child_count(&self) -> usize {
        0
    }

    fn child(&self, _index: usize) -> Option<&dyn HitNode> {
        None
    }

    /// Stacking order among siblings. Larger values are drawn in front.
    fn z_index(&self) -> i32 {
        0
    }

    /// Scroll capability, if this node scrolls independently.
    fn as_scrollable(&self) -> Option<&dyn ScrollRegion> {
        None
    }
}

/// Point-in-region test. An absent region is never hit.
#[inline]
#[must_use]
pub fn is_under(region: Option<Rect>, x: f32, y: f32) -> bool {
    region.is_some_and(|r| r.contains_point(x, y))
}

/// Find the front-most scrollable node under `(x, y)`.
///
/// Returns `root` itself when it is scrollable and contains the point.
/// Returns `None` when the point lies outside `root`.
#[must_use]
pub fn find_scrollable_target(root: &dyn HitNode, x: f32, y: f32) -> Option<&dyn ScrollRegion> {
    if !root.bounds().contains_point(x, y) {
        return None;
    }
    if let Some(scrollable) = root.as_scrollable() {
        return Some(scrollable);
    }
    front_to_back(root)
        .into_iter()
        .filter_map(|index| root.child(index))
        .find_map(|child| find_scrollable_target(child, x, y))
}

/// Child indices of `node` in front-to-back order.
fn front_to_back(node: &dyn HitNode) -> Vec<usize> {
    let mut order: Vec<(i32, usize)> = (0..node.child_count())
        .filter_map(|i| node.child(i).map(|c| (c.z_index(), i)))
        .collect();
    order.sort_unstable_by(|a, b| b.cmp(a));
    order.into_iter().map(|(_, i)| i).collect()
}

/// Owned snapshot of a content tree.
///
/// Hosts that cannot implement [`HitNode`] on their live widgets can build
/// one of these per touch-down instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeSnapshot {
    pub bounds: Rect,
    pub z_index: i32,
    /// `Some` for independently scrollable nodes.
    pub scroll_offset: Option<i32>,
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// A plain container.
    #[must_use]
    pub fn container(bounds: Rect) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    /// A scrollable node currently scrolled `offset` pixels from its origin.
    #[must_use]
    pub fn scrollable(bounds: Rect, offset: i32) -> Self {
        Self {
            bounds,
            scroll_offset: Some(offset),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

impl HitNode for NodeSnapshot {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&dyn HitNode> {
        self.children.get(index).map(|c| c as &dyn HitNode)
    }

    fn z_index(&self) -> i32 {
        self.z_index
    }

    fn as_scrollable(&self) -> Option<&dyn ScrollRegion> {
        self.scroll_offset.map(|_| self as &dyn ScrollRegion)
    }
}

impl ScrollRegion for NodeSnapshot {
    fn origin_offset(&self) -> i32 {
        self.scroll_offset.unwrap_or(0)
    }
}
