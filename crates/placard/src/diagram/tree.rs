//! Tree routing: each item is centered across the block of its children, and
//! the whole tree is centered in the diagram bounds.

use placard_core::{
    geometry::{Axis, Bounds, Point},
    node::{TreeDiagram, TreeItem},
};

use crate::{
    config::DiagramDefaults,
    diagram::{
        Connector, ConnectorRole, DiagramElement, ElementRole, Routed, SegmentStyle,
        connector::{anchor_point, default_anchors, elbow, polyline},
    },
    sizing::TreeMetrics,
};

pub(super) fn route(tree: &TreeDiagram, bounds: Bounds, defaults: &DiagramDefaults) -> Routed {
    let Some(root) = &tree.root else {
        return Routed::default();
    };

    let metrics = TreeMetrics::resolve(tree, defaults);
    let total = metrics.subtree_size(root);
    let origin = bounds
        .center()
        .sub_point(Point::new(total.width() / 2.0, total.height() / 2.0));

    let mut placer = TreePlacer {
        metrics,
        routed: Routed::default(),
    };
    placer.place(root, origin);
    placer.routed
}

struct TreePlacer {
    metrics: TreeMetrics,
    routed: Routed,
}

impl TreePlacer {
    /// Bounds of `item`'s own box inside the block whose top-left corner is
    /// `block_origin`: at the block's leading edge, centered across it.
    fn node_bounds(&self, item: &TreeItem, block_origin: Point) -> Bounds {
        let axis = self.metrics.layout;
        let node = self.metrics.node;
        let block = self.metrics.subtree_size(item);
        let cross = block_origin.along(axis.cross()) + (block.cross(axis) - node.cross(axis)) / 2.0;
        Bounds::new_from_top_left(Point::from_axes(axis, block_origin.along(axis), cross), node)
    }

    /// Places the subtree of `item` in the block whose top-left corner is
    /// `block_origin`. Elements and connectors come out in pre-order.
    fn place(&mut self, item: &TreeItem, block_origin: Point) {
        let axis = self.metrics.layout;
        let node_bounds = self.node_bounds(item, block_origin);

        let index = self.routed.elements.len();
        self.routed.elements.push(
            DiagramElement::new(ElementRole::Node, node_bounds)
                .with_id(item.id.clone())
                .with_label(item.label.as_str())
                .with_source_index(index),
        );

        if item.children.is_empty() {
            return;
        }

        let block = self.metrics.subtree_size(item);
        let child_sizes: Vec<_> = item
            .children
            .iter()
            .map(|child| self.metrics.subtree_size(child))
            .collect();
        let children_cross: f32 = child_sizes.iter().map(|size| size.cross(axis)).sum::<f32>()
            + (item.children.len() - 1) as f32 * self.metrics.sibling_gap;

        let child_main =
            block_origin.along(axis) + self.metrics.node.main(axis) + self.metrics.level_gap;
        let mut cursor =
            block_origin.along(axis.cross()) + (block.cross(axis) - children_cross) / 2.0;
        for (child, size) in item.children.iter().zip(&child_sizes) {
            let child_origin = Point::from_axes(axis, child_main, cursor);
            let child_bounds = self.node_bounds(child, child_origin);
            self.routed.connectors.push(link(node_bounds, child_bounds, axis));
            self.place(child, child_origin);
            cursor += size.cross(axis) + self.metrics.sibling_gap;
        }
    }
}

/// Parent-to-child elbow leaving the parent's far edge along the level axis.
fn link(parent: Bounds, child: Bounds, axis: Axis) -> Connector {
    let (from_anchor, to_anchor) = default_anchors(axis);
    let points = elbow(
        anchor_point(parent, from_anchor),
        anchor_point(child, to_anchor),
        axis,
    );
    Connector::new(ConnectorRole::Edge, polyline(&points, SegmentStyle::default()))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use placard_core::geometry::Size;

    use super::*;

    fn org_chart() -> TreeDiagram {
        TreeDiagram::new(TreeItem::new("CEO").with_children(vec![
            TreeItem::new("CTO").with_children(vec![TreeItem::new("Dev"), TreeItem::new("Ops")]),
            TreeItem::new("CFO"),
        ]))
    }

    fn bounds_of(routed: &Routed, label: &str) -> Bounds {
        routed
            .elements
            .iter()
            .find(|element| element.label() == Some(label))
            .map(DiagramElement::bounds)
            .unwrap()
    }

    #[test]
    fn test_vertical_tree_placement() {
        let tree = org_chart();
        let defaults = DiagramDefaults::default();
        // Subtree widths: CTO = 260, CFO = 120, root block = 400 × 240.
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(400.0, 240.0));
        let routed = route(&tree, bounds, &defaults);

        assert_eq!(routed.elements.len(), 5);
        assert_eq!(bounds_of(&routed, "CEO").min_point(), Point::new(140.0, 0.0));
        assert_eq!(bounds_of(&routed, "CTO").min_point(), Point::new(70.0, 100.0));
        assert_eq!(bounds_of(&routed, "CFO").min_point(), Point::new(280.0, 100.0));
        assert_eq!(bounds_of(&routed, "Dev").min_point(), Point::new(0.0, 200.0));
        assert_eq!(bounds_of(&routed, "Ops").min_point(), Point::new(140.0, 200.0));

        let sources: Vec<_> = routed.elements.iter().map(|e| e.source_index()).collect();
        assert_eq!(sources, [Some(0), Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_connectors_turn_halfway_between_levels() {
        let tree = org_chart();
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(400.0, 240.0));
        let routed = route(&tree, bounds, &DiagramDefaults::default());

        assert_eq!(routed.connectors.len(), 4);
        let ceo_to_cto = routed.connectors[0].segments();
        assert_eq!(ceo_to_cto.len(), 3);
        assert_eq!(ceo_to_cto[0].start(), Point::new(200.0, 40.0));
        assert_eq!(ceo_to_cto[0].end(), Point::new(200.0, 70.0));
        assert_eq!(ceo_to_cto[1].end(), Point::new(130.0, 70.0));
        assert_eq!(ceo_to_cto[2].end(), Point::new(130.0, 100.0));
    }

    #[test]
    fn test_tree_is_centered_in_larger_bounds() {
        let tree = TreeDiagram::new(TreeItem::new("solo"));
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(300.0, 100.0));
        let routed = route(&tree, bounds, &DiagramDefaults::default());
        let placed = routed.elements[0].bounds();
        assert_eq!(placed.center(), bounds.center());
        assert!(routed.connectors.is_empty());
    }

    #[test]
    fn test_horizontal_tree_grows_rightwards() {
        let mut tree = TreeDiagram::new(
            TreeItem::new("root").with_children(vec![TreeItem::new("a"), TreeItem::new("b")]),
        );
        tree.layout = Axis::Horizontal;
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(300.0, 100.0));
        let routed = route(&tree, bounds, &DiagramDefaults::default());

        assert_eq!(bounds_of(&routed, "root").min_point(), Point::new(0.0, 30.0));
        assert_eq!(bounds_of(&routed, "a").min_point(), Point::new(180.0, 0.0));
        assert_eq!(bounds_of(&routed, "b").min_point(), Point::new(180.0, 60.0));

        let first = routed.connectors[0].segments();
        assert_eq!(first[0].start(), Point::new(120.0, 50.0));
        assert_approx_eq!(f32, first[0].end().x(), 150.0);
    }

    #[test]
    fn test_rootless_tree_is_empty() {
        let tree = TreeDiagram {
            root: None,
            ..TreeDiagram::new(TreeItem::new("unused"))
        };
        let routed = route(&tree, Bounds::default(), &DiagramDefaults::default());
        assert!(routed.elements.is_empty());
    }
}
