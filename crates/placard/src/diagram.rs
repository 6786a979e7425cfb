//! Diagram geometry routing.
//!
//! Composite nodes (tree, flow, process-arrow, timeline and matrix) are
//! sized as opaque leaves during layout. Once their absolute box is known,
//! the router expands each one into a [`DiagramLayout`]: positioned elements
//! plus connector paths made of straight segments, ready to be drawn.
//!
//! Routing never fails. Connectors that reference unknown item ids are
//! skipped with a warning and empty item lists produce empty layouts.
//!
//! # Submodules
//!
//! - `connector` - Anchor points and straight/elbow path construction
//! - `tree`, `flow`, `process`, `timeline`, `matrix` - One router per kind

mod connector;
mod flow;
mod matrix;
mod process;
mod timeline;
mod tree;

use log::{debug, trace};

use placard_core::{
    geometry::{Bounds, Point},
    length::expand_spacing,
    node::{Node, NodeKind},
};

use crate::{absolute::AbsoluteBox, config::DiagramDefaults};

/// The composite kinds handled by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Tree,
    Flow,
    ProcessArrow,
    Timeline,
    Matrix,
}

/// What a [`DiagramElement`] depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// A tree or flow item box.
    Node,
    /// One chevron of a process arrow.
    Step,
    /// A timeline marker circle; the bounds enclose the circle.
    Marker,
    Date,
    Title,
    Description,
    /// A plotted matrix item; the bounds enclose the dot.
    Point,
    AxisLabel,
    QuadrantLabel,
}

/// A positioned element of a routed diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramElement {
    role: ElementRole,
    bounds: Bounds,
    id: Option<String>,
    label: Option<String>,
    source_index: Option<usize>,
}

impl DiagramElement {
    pub fn new(role: ElementRole, bounds: Bounds) -> Self {
        Self {
            role,
            bounds,
            id: None,
            label: None,
            source_index: None,
        }
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Index of the item this element was built from, in the diagram's own
    /// item order (pre-order for trees).
    pub fn with_source_index(mut self, index: usize) -> Self {
        self.source_index = Some(index);
        self
    }

    pub fn role(&self) -> ElementRole {
        self.role
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn source_index(&self) -> Option<usize> {
        self.source_index
    }
}

/// Arrowheads drawn on a segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStyle {
    pub arrow_start: bool,
    pub arrow_end: bool,
}

/// A straight piece of a connector path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    from: Point,
    to: Point,
    style: SegmentStyle,
}

impl Segment {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            from,
            to,
            style: SegmentStyle::default(),
        }
    }

    pub fn with_style(mut self, style: SegmentStyle) -> Self {
        self.style = style;
        self
    }

    pub fn start(&self) -> Point {
        self.from
    }

    pub fn end(&self) -> Point {
        self.to
    }

    pub fn style(&self) -> SegmentStyle {
        self.style
    }
}

/// What a [`Connector`] depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorRole {
    /// A link between two items.
    Edge,
    /// A one-to-many link fanning out from a branch point.
    Split,
    /// The timeline's main line.
    Spine,
    /// A matrix axis line.
    Axis,
}

/// A connector path as an ordered list of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    role: ConnectorRole,
    segments: Vec<Segment>,
}

impl Connector {
    pub fn new(role: ConnectorRole, segments: Vec<Segment>) -> Self {
        Self { role, segments }
    }

    pub fn role(&self) -> ConnectorRole {
        self.role
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// The drawable geometry of one composite node.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramLayout<'a> {
    node: &'a Node,
    kind: DiagramKind,
    bounds: Bounds,
    elements: Vec<DiagramElement>,
    connectors: Vec<Connector>,
}

impl<'a> DiagramLayout<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    /// The content box the diagram was routed into.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn elements(&self) -> &[DiagramElement] {
        &self.elements
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Total number of segments across every connector.
    pub fn segment_count(&self) -> usize {
        self.connectors
            .iter()
            .map(|connector| connector.segments.len())
            .sum()
    }
}

/// Elements and connectors produced by one kind router.
#[derive(Debug, Default)]
struct Routed {
    elements: Vec<DiagramElement>,
    connectors: Vec<Connector>,
}

/// Routes `absolute` if it is a composite diagram node.
///
/// The diagram is placed inside the box's content area.
pub fn route<'a>(
    absolute: &AbsoluteBox<'a>,
    defaults: &DiagramDefaults,
) -> Option<DiagramLayout<'a>> {
    let node = absolute.node();
    let bounds = absolute
        .bounds()
        .inset(expand_spacing(node.style().padding.as_ref()));

    let (kind, routed) = match node.kind() {
        NodeKind::Tree(diagram) => (DiagramKind::Tree, tree::route(diagram, bounds, defaults)),
        NodeKind::Flow(diagram) => (DiagramKind::Flow, flow::route(diagram, bounds, defaults)),
        NodeKind::ProcessArrow(diagram) => (
            DiagramKind::ProcessArrow,
            process::route(diagram, bounds, defaults),
        ),
        NodeKind::Timeline(diagram) => (
            DiagramKind::Timeline,
            timeline::route(diagram, bounds, defaults),
        ),
        NodeKind::Matrix(diagram) => {
            (DiagramKind::Matrix, matrix::route(diagram, bounds, defaults))
        }
        NodeKind::Text(_)
        | NodeKind::Image(_)
        | NodeKind::Box(_)
        | NodeKind::VStack(_)
        | NodeKind::HStack(_)
        | NodeKind::Table(_)
        | NodeKind::Shape(_)
        | NodeKind::Chart(_)
        | NodeKind::Line(_)
        | NodeKind::Layer(_) => return None,
    };

    trace!(
        kind:? = kind,
        elements = routed.elements.len(),
        connectors = routed.connectors.len();
        "Routed diagram"
    );

    Some(DiagramLayout {
        node,
        kind,
        bounds,
        elements: routed.elements,
        connectors: routed.connectors,
    })
}

/// Routes every composite node of the tree, in document order.
pub fn route_diagrams<'a>(
    root: &AbsoluteBox<'a>,
    defaults: &DiagramDefaults,
) -> Vec<DiagramLayout<'a>> {
    let layouts: Vec<_> = root
        .iter()
        .filter_map(|absolute| route(absolute, defaults))
        .collect();
    debug!(diagrams = layouts.len(); "Diagram routing finished");
    layouts
}

#[cfg(test)]
mod tests {
    use placard_core::{
        geometry::Size,
        node::{FlowConnector, FlowDiagram, FlowItem, TreeDiagram, TreeItem},
        text::MeasureMode,
    };

    use super::*;
    use crate::{
        absolute::absolutize, config::EngineConfig, context::LayoutContext, layout::LayoutEngine,
    };

    #[test]
    fn test_route_diagrams_in_document_order() {
        let ctx = LayoutContext::new(
            EngineConfig::default().with_measure_mode(MeasureMode::Heuristic),
        );
        let flow = FlowDiagram {
            nodes: vec![FlowItem::new("a", "A"), FlowItem::new("b", "B")],
            connectors: vec![FlowConnector::new("a", "b")],
            ..Default::default()
        };
        let root = Node::vstack(vec![
            Node::text("Org chart"),
            Node::new(NodeKind::Tree(TreeDiagram::new(TreeItem::new("CEO")))).with_padding(10.0),
            Node::new(NodeKind::Flow(flow)),
        ]);

        let relative = LayoutEngine::new(&ctx).layout(&root, Size::new(960.0, 540.0));
        let absolute = absolutize(relative, Point::default()).unwrap();
        let layouts = route_diagrams(&absolute, ctx.config().diagram());

        assert_eq!(layouts.len(), 2);
        assert_eq!(layouts[0].kind(), DiagramKind::Tree);
        assert_eq!(layouts[1].kind(), DiagramKind::Flow);
        assert_eq!(layouts[1].segment_count(), 1);

        // Routed inside the padded content box.
        let tree_box = &absolute.children()[1];
        assert_eq!(layouts[0].bounds().min_x(), tree_box.bounds().min_x() + 10.0);
        assert_eq!(layouts[0].elements()[0].bounds().to_size(), Size::new(120.0, 40.0));
    }

    #[test]
    fn test_non_diagram_nodes_are_not_routed() {
        let ctx = LayoutContext::new(
            EngineConfig::default().with_measure_mode(MeasureMode::Heuristic),
        );
        let root = Node::text("plain");
        let relative = LayoutEngine::new(&ctx).layout(&root, Size::new(100.0, 100.0));
        let absolute = absolutize(relative, Point::default()).unwrap();
        assert!(route(&absolute, ctx.config().diagram()).is_none());
    }
}
