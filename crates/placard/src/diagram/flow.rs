//! Flow routing: items spread evenly along the flow direction, connectors
//! between named items and one-to-many split connectors.

use indexmap::IndexMap;
use log::warn;

use placard_core::{
    geometry::{Axis, Bounds, Point},
    node::{FlowConnector, FlowDiagram, SplitConnector},
};

use crate::{
    config::DiagramDefaults,
    diagram::{
        Connector, ConnectorRole, DiagramElement, ElementRole, Routed, Segment, SegmentStyle,
        connector::{anchor_point, connect, default_anchors, polyline},
    },
    sizing::FlowMetrics,
};

pub(super) fn route(flow: &FlowDiagram, bounds: Bounds, defaults: &DiagramDefaults) -> Routed {
    if flow.nodes.is_empty() {
        return Routed::default();
    }

    let metrics = FlowMetrics::resolve(flow, defaults);
    let placed = place_items(flow, &metrics, bounds);

    // First item wins when ids repeat.
    let mut by_id: IndexMap<&str, usize> = IndexMap::with_capacity(flow.nodes.len());
    for (index, item) in flow.nodes.iter().enumerate() {
        by_id.entry(item.id.as_str()).or_insert(index);
    }
    let lookup = |id: &str| by_id.get(id).map(|&index| placed[index]);

    let mut connectors = Vec::with_capacity(flow.connectors.len() + flow.splits.len());
    for connector in &flow.connectors {
        if let Some(routed) = route_connector(connector, &lookup, metrics.direction) {
            connectors.push(routed);
        }
    }
    for split in &flow.splits {
        if let Some(routed) = route_split(split, &lookup, metrics.direction, bounds) {
            connectors.push(routed);
        }
    }

    let elements = flow
        .nodes
        .iter()
        .zip(&placed)
        .enumerate()
        .map(|(index, (item, &item_bounds))| {
            DiagramElement::new(ElementRole::Node, item_bounds)
                .with_id(Some(item.id.clone()))
                .with_label(item.label.as_str())
                .with_source_index(index)
        })
        .collect();

    Routed {
        elements,
        connectors,
    }
}

/// Spreads the items from the leading edge to the trailing edge of `bounds`,
/// each centered across the flow. A single item is centered outright.
fn place_items(flow: &FlowDiagram, metrics: &FlowMetrics, bounds: Bounds) -> Vec<Bounds> {
    let axis = metrics.direction;
    let available = bounds.to_size();
    let sizes: Vec<_> = flow.nodes.iter().map(|item| metrics.item_size(item)).collect();

    if let [size] = sizes.as_slice() {
        return vec![Bounds::new_from_center(bounds.center(), *size)];
    }

    let main_sum: f32 = sizes.iter().map(|size| size.main(axis)).sum();
    let gap = (available.main(axis) - main_sum) / (sizes.len() - 1) as f32;
    let cross_start = bounds.min_point().along(axis.cross());

    let mut cursor = bounds.min_point().along(axis);
    sizes
        .into_iter()
        .map(|size| {
            let cross = cross_start + (available.cross(axis) - size.cross(axis)) / 2.0;
            let placed = Bounds::new_from_top_left(Point::from_axes(axis, cursor, cross), size);
            cursor += size.main(axis) + gap;
            placed
        })
        .collect()
}

fn route_connector(
    connector: &FlowConnector,
    lookup: &impl Fn(&str) -> Option<Bounds>,
    direction: Axis,
) -> Option<Connector> {
    let (Some(from), Some(to)) = (lookup(&connector.from), lookup(&connector.to)) else {
        warn!(
            from = connector.from.as_str(),
            to = connector.to.as_str();
            "Skipping flow connector with an unknown endpoint"
        );
        return None;
    };

    let (default_from, default_to) = default_anchors(direction);
    let anchors = (
        connector.from_anchor.unwrap_or(default_from),
        connector.to_anchor.unwrap_or(default_to),
    );
    let style = SegmentStyle {
        arrow_start: connector.arrow_start,
        arrow_end: connector.arrow_end,
    };
    Some(Connector::new(
        ConnectorRole::Edge,
        connect(from, to, anchors, direction, style),
    ))
}

/// One incoming segment into the branch point, then a cross-axis leg and a
/// main-axis leg to each destination.
///
/// Without an explicit branch point, the branch sits halfway between the
/// source anchor and the nearest destination along the flow, level with the
/// source.
fn route_split(
    split: &SplitConnector,
    lookup: &impl Fn(&str) -> Option<Bounds>,
    direction: Axis,
    bounds: Bounds,
) -> Option<Connector> {
    let Some(from) = lookup(&split.from) else {
        warn!(from = split.from.as_str(); "Skipping split connector with an unknown source");
        return None;
    };

    let (default_from, default_to) = default_anchors(direction);
    let to_anchor = split.to_anchor.unwrap_or(default_to);
    let mut destinations = Vec::with_capacity(split.to.len());
    for id in &split.to {
        match lookup(id) {
            Some(to) => destinations.push(anchor_point(to, to_anchor)),
            None => warn!(
                from = split.from.as_str(),
                to = id.as_str();
                "Skipping unknown split destination"
            ),
        }
    }
    if destinations.is_empty() {
        return None;
    }

    let start = anchor_point(from, split.from_anchor.unwrap_or(default_from));
    let branch = split.branch.map_or_else(
        || computed_branch(start, &destinations, direction),
        |offset| bounds.min_point().add_point(offset),
    );

    let fan_out = SegmentStyle {
        arrow_start: false,
        arrow_end: split.arrow_end,
    };
    let mut segments = vec![Segment::new(start, branch)];
    for destination in destinations {
        let corner = Point::from_axes(
            direction,
            branch.along(direction),
            destination.along(direction.cross()),
        );
        let legs = if corner == branch {
            polyline(&[branch, destination], fan_out)
        } else {
            polyline(&[branch, corner, destination], fan_out)
        };
        segments.extend(legs);
    }

    Some(Connector::new(ConnectorRole::Split, segments))
}

fn computed_branch(start: Point, destinations: &[Point], direction: Axis) -> Point {
    let source_main = start.along(direction);
    let nearest = destinations
        .iter()
        .map(|destination| destination.along(direction))
        .min_by(|a, b| (a - source_main).abs().total_cmp(&(b - source_main).abs()))
        .unwrap_or(source_main);
    Point::from_axes(
        direction,
        (source_main + nearest) / 2.0,
        start.along(direction.cross()),
    )
}

#[cfg(test)]
mod tests {
    use placard_core::{
        geometry::Size,
        node::{Anchor, FlowItem},
    };

    use super::*;
    use crate::sizing::flow_size;

    fn items(ids: &[&str]) -> Vec<FlowItem> {
        ids.iter().map(|id| FlowItem::new(*id, id.to_uppercase())).collect()
    }

    /// Routes `flow` into a box of exactly its intrinsic size.
    fn route_intrinsic(flow: &FlowDiagram) -> Routed {
        let defaults = DiagramDefaults::default();
        let bounds = Bounds::new_from_top_left(Point::default(), flow_size(flow, &defaults));
        route(flow, bounds, &defaults)
    }

    fn split(from: &str, to: &[&str]) -> SplitConnector {
        SplitConnector {
            from: from.to_string(),
            to: to.iter().map(|id| id.to_string()).collect(),
            branch: None,
            from_anchor: None,
            to_anchor: Some(Anchor::Top),
            arrow_end: true,
        }
    }

    #[test]
    fn test_items_spread_and_connect_straight() {
        let flow = FlowDiagram {
            nodes: items(&["a", "b"]),
            connectors: vec![FlowConnector::new("a", "b")],
            ..Default::default()
        };
        let routed = route_intrinsic(&flow);

        let origins: Vec<_> = routed.elements.iter().map(|e| e.bounds().min_point()).collect();
        assert_eq!(origins, [Point::new(0.0, 0.0), Point::new(190.0, 0.0)]);
        assert_eq!(routed.elements[1].id(), Some("b"));
        assert_eq!(routed.elements[1].label(), Some("B"));

        let segments = routed.connectors[0].segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start(), Point::new(150.0, 30.0));
        assert_eq!(segments[0].end(), Point::new(190.0, 30.0));
        assert!(segments[0].style().arrow_end);
    }

    #[test]
    fn test_wider_bounds_spread_items_to_the_edges() {
        let flow = FlowDiagram {
            nodes: items(&["a", "b", "c"]),
            ..Default::default()
        };
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(650.0, 100.0));
        let routed = route(&flow, bounds, &DiagramDefaults::default());

        let origins: Vec<_> = routed.elements.iter().map(|e| e.bounds().min_point()).collect();
        assert_eq!(
            origins,
            [Point::new(0.0, 20.0), Point::new(250.0, 20.0), Point::new(500.0, 20.0)]
        );
    }

    #[test]
    fn test_single_item_is_centered() {
        let flow = FlowDiagram {
            nodes: items(&["only"]),
            ..Default::default()
        };
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(400.0, 200.0));
        let routed = route(&flow, bounds, &DiagramDefaults::default());
        assert_eq!(routed.elements[0].bounds().center(), bounds.center());
    }

    #[test]
    fn test_dangling_connector_is_skipped() {
        let flow = FlowDiagram {
            nodes: items(&["a", "b"]),
            connectors: vec![FlowConnector::new("a", "missing"), FlowConnector::new("a", "b")],
            ..Default::default()
        };
        let routed = route_intrinsic(&flow);
        assert_eq!(routed.elements.len(), 2);
        assert_eq!(routed.connectors.len(), 1);
    }

    #[test]
    fn test_explicit_anchor_routes_elbow() {
        let mut tall = FlowItem::new("b", "B");
        tall.height = Some(100.0);
        let connector = FlowConnector {
            to_anchor: Some(Anchor::Top),
            ..FlowConnector::new("a", "b")
        };
        let flow = FlowDiagram {
            nodes: vec![FlowItem::new("a", "A"), tall],
            connectors: vec![connector],
            ..Default::default()
        };
        let routed = route_intrinsic(&flow);

        let segments = routed.connectors[0].segments();
        let points: Vec<_> = segments.iter().map(Segment::end).collect();
        assert_eq!(segments[0].start(), Point::new(150.0, 50.0));
        assert_eq!(
            points,
            [Point::new(207.5, 50.0), Point::new(207.5, 0.0), Point::new(265.0, 0.0)]
        );
        assert!(!segments[0].style().arrow_end);
        assert!(segments[2].style().arrow_end);
    }

    #[test]
    fn test_split_fans_out_from_computed_branch() {
        let flow = FlowDiagram {
            nodes: items(&["a", "b", "c"]),
            splits: vec![split("a", &["b", "c"])],
            ..Default::default()
        };
        let routed = route_intrinsic(&flow);

        let connector = &routed.connectors[0];
        assert_eq!(connector.role(), ConnectorRole::Split);
        let segments = connector.segments();
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0].start(), Point::new(150.0, 30.0));
        assert_eq!(segments[0].end(), Point::new(207.5, 30.0));
        assert_eq!(segments[1].end(), Point::new(207.5, 0.0));
        assert_eq!(segments[2].end(), Point::new(265.0, 0.0));
        assert_eq!(segments[4].end(), Point::new(455.0, 0.0));
        assert!(segments[2].style().arrow_end && segments[4].style().arrow_end);
        assert!(!segments[0].style().arrow_end);
    }

    #[test]
    fn test_split_with_explicit_branch_and_missing_destination() {
        let mut with_branch = split("a", &["missing", "b"]);
        with_branch.branch = Some(Point::new(170.0, 10.0));
        let flow = FlowDiagram {
            nodes: items(&["a", "b"]),
            splits: vec![with_branch, split("a", &["missing"]), split("ghost", &["b"])],
            ..Default::default()
        };
        let defaults = DiagramDefaults::default();
        let origin = Point::new(100.0, 100.0);
        let bounds = Bounds::new_from_top_left(origin, flow_size(&flow, &defaults));
        let routed = route(&flow, bounds, &defaults);

        assert_eq!(routed.connectors.len(), 1);
        let segments = routed.connectors[0].segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].end(), Point::new(270.0, 110.0));
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first_item() {
        let flow = FlowDiagram {
            nodes: items(&["a", "b", "a"]),
            connectors: vec![FlowConnector::new("b", "a")],
            ..Default::default()
        };
        let routed = route_intrinsic(&flow);
        let segments = routed.connectors[0].segments();
        // From b's right edge back to the first a's left edge.
        assert_eq!(segments[0].start(), Point::new(340.0, 30.0));
        assert_eq!(segments.last().map(Segment::end), Some(Point::new(0.0, 30.0)));
    }

    #[test]
    fn test_empty_flow_routes_nothing() {
        let flow = FlowDiagram {
            connectors: vec![FlowConnector::new("a", "b")],
            ..Default::default()
        };
        let routed = route(&flow, Bounds::default(), &DiagramDefaults::default());
        assert!(routed.elements.is_empty());
        assert!(routed.connectors.is_empty());
    }
}
