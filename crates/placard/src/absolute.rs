//! Conversion of relative boxes to document-absolute coordinates.
//!
//! A single pre-order pass computes `absolute(node) = absolute(parent) +
//! relative(node)` and hands the node's fresh absolute position to its
//! children as their parent origin. The pass consumes its input, so a
//! relative tree can be absolutized only once.
//!
//! Layer children were laid out as independent roots. Each one is re-based
//! onto a synthetic parent origin, `layer content origin + declared offset −
//! own relative origin`, so the ordinary accumulation lands it at its declared
//! offset. Line children of layers are placed by translating their endpoints.

use log::debug;

use placard_core::{
    geometry::{Bounds, Point, Size},
    length::expand_spacing,
    node::{LineNode, Node, NodeKind},
};

use crate::{
    PlacardError,
    layout::{BoxContent, RelativeBox},
};

/// A laid-out node in document-absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteBox<'a> {
    node: &'a Node,
    bounds: Bounds,
    content: BoxContent,
    children: Vec<AbsoluteBox<'a>>,
}

impl<'a> AbsoluteBox<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(&self) -> &'a NodeKind {
        self.node.kind()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Absolute top-left corner.
    pub fn position(&self) -> Point {
        self.bounds.min_point()
    }

    pub fn size(&self) -> Size {
        self.bounds.to_size()
    }

    /// Text lines, or line endpoints in absolute coordinates.
    pub fn content(&self) -> &BoxContent {
        &self.content
    }

    pub fn children(&self) -> &[AbsoluteBox<'a>] {
        &self.children
    }

    /// Absolute endpoints when this box is a line.
    pub fn line_endpoints(&self) -> Option<(Point, Point)> {
        match self.content {
            BoxContent::Line { start, end } => Some((start, end)),
            BoxContent::Empty | BoxContent::Text { .. } => None,
        }
    }

    /// Iterates over this box and all its descendants in document order.
    pub fn iter(&self) -> impl Iterator<Item = &AbsoluteBox<'a>> {
        let mut pending = vec![self];
        std::iter::from_fn(move || {
            let next = pending.pop()?;
            pending.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

/// Converts a relative box tree to absolute coordinates, with the root's
/// parent origin at `origin`.
///
/// # Errors
///
/// Returns [`PlacardError::ForeignBox`] when the tree contains a box that was
/// not produced by [`LayoutEngine`](crate::layout::LayoutEngine).
pub fn absolutize<'a>(
    root: RelativeBox<'a>,
    origin: Point,
) -> Result<AbsoluteBox<'a>, PlacardError> {
    let placed = place(root, origin)?;
    debug!(
        boxes = placed.iter().count(),
        x = placed.bounds.min_x(),
        y = placed.bounds.min_y();
        "Absolute positions assigned"
    );
    Ok(placed)
}

/// How a layer places one of its children.
enum LayerPlacement<'n> {
    /// Translate the endpoints by the layer origin and declared offset.
    Endpoints(&'n LineNode),
    /// Re-base the child's own relative tree.
    Rebased,
}

fn layer_placement(kind: &NodeKind) -> LayerPlacement<'_> {
    match kind {
        NodeKind::Line(line) => LayerPlacement::Endpoints(line),
        NodeKind::Text(_)
        | NodeKind::Image(_)
        | NodeKind::Box(_)
        | NodeKind::VStack(_)
        | NodeKind::HStack(_)
        | NodeKind::Table(_)
        | NodeKind::Shape(_)
        | NodeKind::Chart(_)
        | NodeKind::Tree(_)
        | NodeKind::Flow(_)
        | NodeKind::Timeline(_)
        | NodeKind::Matrix(_)
        | NodeKind::ProcessArrow(_)
        | NodeKind::Layer(_) => LayerPlacement::Rebased,
    }
}

fn ensure_from_engine(relative: &RelativeBox<'_>) -> Result<(), PlacardError> {
    if relative.from_engine {
        Ok(())
    } else {
        Err(PlacardError::ForeignBox {
            kind: relative.node.kind().name(),
            x: relative.position.x(),
            y: relative.position.y(),
        })
    }
}

fn place<'a>(
    relative: RelativeBox<'a>,
    parent_origin: Point,
) -> Result<AbsoluteBox<'a>, PlacardError> {
    ensure_from_engine(&relative)?;
    let RelativeBox {
        node,
        position,
        size,
        content,
        children,
        ..
    } = relative;

    let origin = parent_origin.add_point(position);
    let content_origin =
        origin.add_point(expand_spacing(node.style().padding.as_ref()).origin_offset());

    let children = children
        .into_iter()
        .map(|child| match child.layer_offset {
            Some(offset) => place_layer_child(child, content_origin.add_point(offset)),
            None => place(child, origin),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let content = match content {
        BoxContent::Line { start, end } => BoxContent::Line {
            start: origin.add_point(start),
            end: origin.add_point(end),
        },
        other @ (BoxContent::Empty | BoxContent::Text { .. }) => other,
    };

    Ok(AbsoluteBox {
        node,
        bounds: Bounds::new_from_top_left(origin, size),
        content,
        children,
    })
}

/// Places a layer child whose declared offset resolves to `target`.
fn place_layer_child<'a>(
    child: RelativeBox<'a>,
    target: Point,
) -> Result<AbsoluteBox<'a>, PlacardError> {
    match layer_placement(child.node.kind()) {
        LayerPlacement::Endpoints(line) => {
            ensure_from_engine(&child)?;
            let start = target.add_point(line.start());
            let end = target.add_point(line.end());
            Ok(AbsoluteBox {
                node: child.node,
                bounds: Bounds::from_corners(start, end),
                content: BoxContent::Line { start, end },
                children: Vec::new(),
            })
        }
        LayerPlacement::Rebased => {
            let synthetic_origin = target.sub_point(child.position);
            place(child, synthetic_origin)
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use placard_core::{
        node::{BoxNode, LayerChild, LayerNode, StackNode},
        text::MeasureMode,
    };

    use super::*;
    use crate::{config::EngineConfig, context::LayoutContext, layout::LayoutEngine};

    fn context() -> LayoutContext {
        LayoutContext::new(EngineConfig::default().with_measure_mode(MeasureMode::Heuristic))
    }

    fn canvas() -> Size {
        Size::new(960.0, 540.0)
    }

    fn nested_tree() -> Node {
        Node::vstack(vec![
            Node::text("Heading"),
            Node::new(NodeKind::HStack(
                StackNode::new(vec![Node::image("a.png"), Node::image("b.png")]).with_gap(12.0),
            ))
            .with_padding(8.0),
            Node::new(NodeKind::Box(BoxNode {
                child: Some(Box::new(Node::text("Footer"))),
                ..Default::default()
            }))
            .with_padding(4.0),
        ])
        .with_padding(20.0)
    }

    fn positions(root: &AbsoluteBox<'_>) -> Vec<Point> {
        root.iter().map(AbsoluteBox::position).collect()
    }

    #[test]
    fn test_zero_origin_keeps_root_relative_position() {
        let ctx = context();
        let node = nested_tree();
        let relative = LayoutEngine::new(&ctx).layout(&node, canvas());
        let root_position = relative.position();
        let absolute = absolutize(relative, Point::default()).unwrap();
        assert_eq!(absolute.position(), root_position);
    }

    #[test]
    fn test_children_accumulate_parent_positions() {
        let ctx = context();
        let node = nested_tree();
        let absolute =
            absolutize(LayoutEngine::new(&ctx).layout(&node, canvas()), Point::default()).unwrap();

        // vstack padding 20, heading height 23.4, hstack padding 8.
        let hstack = &absolute.children()[1];
        assert_approx_eq!(f32, hstack.position().x(), 20.0);
        assert_approx_eq!(f32, hstack.position().y(), 20.0 + 23.4, epsilon = 0.001);

        let second_image = &hstack.children()[1];
        assert_approx_eq!(f32, second_image.position().x(), 20.0 + 8.0 + 100.0 + 12.0);
        assert_approx_eq!(f32, second_image.position().y(), 20.0 + 23.4 + 8.0, epsilon = 0.001);
    }

    #[test]
    fn test_foreign_box_is_rejected() {
        let ctx = context();
        let node = Node::vstack(vec![Node::text("a")]);
        let intruder = Node::text("b");

        let stray = RelativeBox::detached(&intruder, Point::new(3.0, 4.0), Size::new(10.0, 10.0));
        let relative = LayoutEngine::new(&ctx).layout(&node, canvas()).with_child(stray);
        let err = absolutize(relative, Point::default()).unwrap_err();
        assert!(matches!(
            err,
            PlacardError::ForeignBox { kind: "text", x, y } if x == 3.0 && y == 4.0
        ));

        let detached_root = RelativeBox::detached(&intruder, Point::default(), Size::default());
        assert!(absolutize(detached_root, Point::default()).is_err());
    }

    #[test]
    fn test_layer_children_land_at_declared_offsets() {
        let ctx = context();
        let node = Node::new(NodeKind::Layer(LayerNode {
            children: vec![
                LayerChild::new(
                    50.0,
                    60.0,
                    Node::vstack(vec![Node::image("a.png")]).with_padding(5.0),
                ),
                LayerChild::new(
                    10.0,
                    20.0,
                    Node::new(NodeKind::Line(LineNode {
                        x1: 100.0,
                        y1: 40.0,
                        x2: 30.0,
                        y2: 90.0,
                        ..Default::default()
                    })),
                ),
            ],
        }))
        .with_padding(15.0);

        let relative = LayoutEngine::new(&ctx).layout(&node, canvas());
        let absolute = absolutize(relative, Point::new(200.0, 100.0)).unwrap();

        let stack = &absolute.children()[0];
        assert_eq!(stack.position(), Point::new(265.0, 175.0));
        assert_eq!(stack.children()[0].position(), Point::new(270.0, 180.0));

        let line = &absolute.children()[1];
        let (start, end) = line.line_endpoints().unwrap();
        assert_eq!(start, Point::new(325.0, 175.0));
        assert_eq!(end, Point::new(255.0, 225.0));
        assert_eq!(line.position(), Point::new(255.0, 175.0));
        assert_eq!(line.size(), Size::new(70.0, 50.0));
    }

    #[test]
    fn test_line_outside_layer_keeps_endpoints_relative_to_box() {
        let ctx = context();
        let node = Node::vstack(vec![
            Node::image("a.png"),
            Node::new(NodeKind::Line(LineNode {
                x1: 0.0,
                y1: 10.0,
                x2: 50.0,
                y2: 0.0,
                ..Default::default()
            })),
        ]);
        let absolute =
            absolutize(LayoutEngine::new(&ctx).layout(&node, canvas()), Point::default()).unwrap();
        let (start, end) = absolute.children()[1].line_endpoints().unwrap();
        assert_eq!(start, Point::new(0.0, 110.0));
        assert_eq!(end, Point::new(50.0, 100.0));
    }

    #[test]
    fn test_iter_is_document_order() {
        let ctx = context();
        let node = nested_tree();
        let absolute =
            absolutize(LayoutEngine::new(&ctx).layout(&node, canvas()), Point::default()).unwrap();
        let kinds: Vec<_> = absolute.iter().map(|b| b.kind().name()).collect();
        assert_eq!(
            kinds,
            ["vstack", "text", "hstack", "image", "image", "box", "text"]
        );
    }

    proptest! {
        #[test]
        fn prop_origin_translates_every_box(ox in -500.0f32..500.0, oy in -500.0f32..500.0) {
            let ctx = context();
            let node = nested_tree();
            let engine = LayoutEngine::new(&ctx);

            let base = absolutize(engine.layout(&node, canvas()), Point::default()).unwrap();
            let shifted = absolutize(engine.layout(&node, canvas()), Point::new(ox, oy)).unwrap();

            for (a, b) in positions(&base).into_iter().zip(positions(&shifted)) {
                prop_assert!((b.x() - a.x() - ox).abs() < 1e-3);
                prop_assert!((b.y() - a.y() - oy).abs() < 1e-3);
            }
        }
    }
}
