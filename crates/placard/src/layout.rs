//! Relative layout: sizing every node and positioning it inside its parent.
//!
//! The relative pass turns a [`Node`] tree into a parallel tree of
//! [`RelativeBox`]es. Each box records its node, its outer size and its
//! position relative to the parent's outer origin; a container's padding is
//! already folded into its children's positions.
//!
//! # Pipeline Position
//!
//! ```text
//! Node tree
//!     ↓ layout (this module)
//! RelativeBox tree
//!     ↓ absolute
//! AbsoluteBox tree
//!     ↓ diagram
//! DiagramLayout per composite node
//! ```
//!
//! # Submodules
//!
//! - `engine` - Per-kind sizing and the recursive driver
//! - `stack` - The single-axis stack algorithm shared by vstack and hstack

mod engine;
mod stack;

pub use engine::LayoutEngine;

use placard_core::{
    geometry::{Bounds, Point, Size},
    node::{Align, Node, NodeKind},
};

/// Drawable content computed for a box during layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BoxContent {
    #[default]
    Empty,
    /// Wrapped lines of a text block or labelled shape.
    Text { lines: Vec<String> },
    /// Endpoints of a line node, relative to the box origin.
    Line { start: Point, end: Point },
}

/// Per-node output of the relative layout pass.
///
/// Boxes are single-use input to [`absolutize`](crate::absolute::absolutize),
/// which consumes them. Only boxes produced by [`LayoutEngine`] are accepted
/// there; a tree containing [`RelativeBox::detached`] boxes is rejected.
#[derive(Debug, PartialEq)]
pub struct RelativeBox<'a> {
    pub(crate) node: &'a Node,
    pub(crate) position: Point,
    pub(crate) size: Size,
    pub(crate) content: BoxContent,
    /// Declared offset inside the parent layer's content box.
    pub(crate) layer_offset: Option<Point>,
    pub(crate) children: Vec<RelativeBox<'a>>,
    pub(crate) from_engine: bool,
}

impl<'a> RelativeBox<'a> {
    pub(crate) fn new(node: &'a Node, size: Size) -> Self {
        Self {
            node,
            position: Point::default(),
            size,
            content: BoxContent::Empty,
            layer_offset: None,
            children: Vec::new(),
            from_engine: true,
        }
    }

    /// Creates a box outside of the relative layout pass.
    ///
    /// Such boxes can be inspected like any other, but absolutizing a tree
    /// that contains one fails with
    /// [`PlacardError::ForeignBox`](crate::PlacardError::ForeignBox).
    pub fn detached(node: &'a Node, position: Point, size: Size) -> Self {
        Self {
            position,
            from_engine: false,
            ..Self::new(node, size)
        }
    }

    /// Appends a child box.
    pub fn with_child(mut self, child: RelativeBox<'a>) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn with_content(mut self, content: BoxContent) -> Self {
        self.content = content;
        self
    }

    pub(crate) fn with_children(mut self, children: Vec<RelativeBox<'a>>) -> Self {
        self.children = children;
        self
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(&self) -> &'a NodeKind {
        self.node.kind()
    }

    /// Position relative to the parent's outer origin.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The box in its parent's coordinate space.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(self.position, self.size)
    }

    pub fn content(&self) -> &BoxContent {
        &self.content
    }

    /// Declared offset when this box is a child of a layer.
    pub fn layer_offset(&self) -> Option<Point> {
        self.layer_offset
    }

    pub fn children(&self) -> &[RelativeBox<'a>] {
        &self.children
    }

    /// Number of boxes in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(RelativeBox::count).sum::<usize>()
    }
}

/// Offset of an item of `size` inside `reference` for `align`.
///
/// `Stretch` places like `Start`; the caller resizes the item beforehand.
fn align_offset(align: Align, reference: f32, size: f32) -> f32 {
    match align {
        Align::Start | Align::Stretch => 0.0,
        Align::Center => (reference - size) / 2.0,
        Align::End => reference - size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_offset() {
        assert_eq!(align_offset(Align::Start, 100.0, 40.0), 0.0);
        assert_eq!(align_offset(Align::Center, 100.0, 40.0), 30.0);
        assert_eq!(align_offset(Align::End, 100.0, 40.0), 60.0);
        assert_eq!(align_offset(Align::Stretch, 100.0, 100.0), 0.0);
    }

    #[test]
    fn test_detached_box_is_not_engine_output() {
        let node = Node::text("x");
        let detached = RelativeBox::detached(&node, Point::new(1.0, 2.0), Size::new(3.0, 4.0));
        assert!(!detached.from_engine);
        assert_eq!(detached.bounds().max_x(), 4.0);

        let stamped = RelativeBox::new(&node, Size::default()).with_child(detached);
        assert!(stamped.from_engine);
        assert_eq!(stamped.count(), 2);
    }
}
