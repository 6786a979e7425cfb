//! The declarative node tree consumed by the layout engine.
//!
//! A slide is described by a tree of [`Node`]s. Every node pairs a
//! kind-specific payload ([`NodeKind`]) with common sizing and styling
//! attributes ([`Style`]). Node trees are read-only to the engine: they are
//! built once, either directly in code or by an external producer, and laid
//! out any number of times.
//!
//! Nodes can also be authored as data. Kinds are tagged with a `type` field:
//!
//! ```
//! # use placard_core::node::{Node, NodeKind};
//! let node: Node = toml::from_str(r#"
//!     type = "vstack"
//!     gap = 8
//!     style = { width = "50%", padding = 12 }
//!
//!     [[children]]
//!     type = "text"
//!     content = "Quarterly results"
//!     font_size = 32
//! "#).unwrap();
//!
//! assert_eq!(node.kind().name(), "vstack");
//! assert_eq!(node.children().count(), 1);
//! ```

use serde::Deserialize;

use crate::{
    color::Color,
    geometry::{Axis, Point},
    length::{Length, Spacing},
    text::{FontWeight, TextStyle},
};

const DEFAULT_FONT_SIZE: f32 = 18.0;

/// Sizing and styling attributes shared by every node kind.
///
/// Background and border values are opaque to layout; they are carried for
/// the renderer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub min_width: Option<Length>,
    pub max_width: Option<Length>,
    pub min_height: Option<Length>,
    pub max_height: Option<Length>,
    pub padding: Option<Spacing>,
    pub background: Option<Color>,
    pub border: Option<Border>,
}

/// Border styling carried for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Border {
    pub color: Option<Color>,
    pub width: f32,
    pub radius: f32,
}

/// A node of the slide tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(default)]
    style: Style,
}

impl Node {
    /// Creates a node with default styling.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            style: Style::default(),
        }
    }

    /// Creates a text node with the default font.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(TextNode::new(content)))
    }

    /// Creates an image node for `src`.
    pub fn image(src: impl Into<String>) -> Self {
        Self::new(NodeKind::Image(ImageNode { src: src.into() }))
    }

    /// Creates a vertical stack.
    pub fn vstack(children: Vec<Node>) -> Self {
        Self::new(NodeKind::VStack(StackNode::new(children)))
    }

    /// Creates a horizontal stack.
    pub fn hstack(children: Vec<Node>) -> Self {
        Self::new(NodeKind::HStack(StackNode::new(children)))
    }

    /// Replaces the node's style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets an explicit width.
    pub fn with_width(mut self, width: impl Into<Length>) -> Self {
        self.style.width = Some(width.into());
        self
    }

    /// Sets an explicit height.
    pub fn with_height(mut self, height: impl Into<Length>) -> Self {
        self.style.height = Some(height.into());
        self
    }

    /// Sets uniform padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.style.padding = Some(Spacing::Uniform(padding));
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Iterates over the direct child nodes of container kinds.
    pub fn children(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        match &self.kind {
            NodeKind::Box(b) => Box::new(b.child.iter().map(|child| &**child)),
            NodeKind::VStack(stack) | NodeKind::HStack(stack) => Box::new(stack.children.iter()),
            NodeKind::Layer(layer) => Box::new(layer.children.iter().map(|child| &child.node)),
            NodeKind::Text(_)
            | NodeKind::Image(_)
            | NodeKind::Table(_)
            | NodeKind::Shape(_)
            | NodeKind::Chart(_)
            | NodeKind::Tree(_)
            | NodeKind::Flow(_)
            | NodeKind::Timeline(_)
            | NodeKind::Matrix(_)
            | NodeKind::ProcessArrow(_)
            | NodeKind::Line(_) => Box::new(std::iter::empty()),
        }
    }
}

/// The kind-specific payload of a [`Node`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Text(TextNode),
    Image(ImageNode),
    Box(BoxNode),
    #[serde(rename = "vstack")]
    VStack(StackNode),
    #[serde(rename = "hstack")]
    HStack(StackNode),
    Table(TableNode),
    Shape(ShapeNode),
    Chart(ChartNode),
    Tree(TreeDiagram),
    Flow(FlowDiagram),
    Timeline(TimelineDiagram),
    Matrix(MatrixDiagram),
    ProcessArrow(ProcessArrowDiagram),
    Line(LineNode),
    Layer(LayerNode),
}

impl NodeKind {
    /// The tag used for this kind when authored as data.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Box(_) => "box",
            Self::VStack(_) => "vstack",
            Self::HStack(_) => "hstack",
            Self::Table(_) => "table",
            Self::Shape(_) => "shape",
            Self::Chart(_) => "chart",
            Self::Tree(_) => "tree",
            Self::Flow(_) => "flow",
            Self::Timeline(_) => "timeline",
            Self::Matrix(_) => "matrix",
            Self::ProcessArrow(_) => "process-arrow",
            Self::Line(_) => "line",
            Self::Layer(_) => "layer",
        }
    }
}

/// Horizontal text alignment inside a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextNode {
    pub content: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub weight: FontWeight,
    /// Line height multiplier; the engine default applies when absent.
    #[serde(default)]
    pub line_height: Option<f32>,
    /// `Center` without an explicit width requests full-width centering.
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub color: Option<Color>,
}

impl TextNode {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            font_size: DEFAULT_FONT_SIZE,
            weight: FontWeight::Normal,
            line_height: None,
            align: TextAlign::Left,
            color: None,
        }
    }

    /// The measurement style for this block, falling back to `default_line_height`.
    pub fn text_style(&self, default_line_height: f32) -> TextStyle {
        TextStyle::new(self.font_size)
            .with_weight(self.weight)
            .with_line_height(self.line_height.unwrap_or(default_line_height))
    }
}

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageNode {
    pub src: String,
}

/// Cross-axis (or horizontal, for boxes) placement of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    Stretch,
}

/// Main-axis distribution of stack children.
///
/// Unrecognized values deserialize to [`Justify::Other`], which lays out
/// exactly like [`Justify::Start`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    #[serde(alias = "spaceBetween")]
    SpaceBetween,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BoxNode {
    #[serde(default)]
    pub child: Option<Box<Node>>,
    #[serde(default)]
    pub align: Align,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StackNode {
    pub children: Vec<Node>,
    pub gap: f32,
    pub justify: Justify,
    pub align: Align,
}

impl StackNode {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    pub fn with_gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableNode {
    pub rows: Vec<Vec<String>>,
    pub column_widths: Option<Vec<f32>>,
    pub row_height: Option<f32>,
    pub font_size: Option<f32>,
}

impl TableNode {
    /// Number of columns: explicit widths win, otherwise the widest row.
    pub fn column_count(&self) -> usize {
        match &self.column_widths {
            Some(widths) => widths.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRectangle,
    Ellipse,
    Triangle,
    Diamond,
    Chevron,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShapeNode {
    #[serde(default)]
    pub shape: ShapeKind,
    /// Optional label; a labelled shape sizes itself like a text block.
    #[serde(default)]
    pub label: Option<TextNode>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    #[serde(default)]
    pub values: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartNode {
    pub chart_type: ChartType,
    pub categories: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeItem {
    #[serde(default)]
    pub id: Option<String>,
    pub label: String,
    #[serde(default)]
    pub children: Vec<TreeItem>,
}

impl TreeItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<TreeItem>) -> Self {
        self.children = children;
        self
    }
}

/// A hierarchy drawn top-down (`vertical`) or left-to-right (`horizontal`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeDiagram {
    #[serde(default)]
    pub root: Option<TreeItem>,
    #[serde(default = "vertical")]
    pub layout: Axis,
    #[serde(default)]
    pub node_width: Option<f32>,
    #[serde(default)]
    pub node_height: Option<f32>,
    #[serde(default)]
    pub level_gap: Option<f32>,
    #[serde(default)]
    pub sibling_gap: Option<f32>,
}

impl TreeDiagram {
    pub fn new(root: TreeItem) -> Self {
        Self {
            root: Some(root),
            layout: Axis::Vertical,
            node_width: None,
            node_height: None,
            level_gap: None,
            sibling_gap: None,
        }
    }
}

fn vertical() -> Axis {
    Axis::Vertical
}

/// A named attachment point on an item's box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
}

impl FlowItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            width: None,
            height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowConnector {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub from_anchor: Option<Anchor>,
    #[serde(default)]
    pub to_anchor: Option<Anchor>,
    #[serde(default)]
    pub arrow_start: bool,
    #[serde(default = "enabled")]
    pub arrow_end: bool,
}

impl FlowConnector {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            from_anchor: None,
            to_anchor: None,
            arrow_start: false,
            arrow_end: true,
        }
    }
}

/// A one-to-many connector that branches at a single point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SplitConnector {
    pub from: String,
    pub to: Vec<String>,
    /// Explicit branch point, relative to the diagram's top-left corner.
    #[serde(default)]
    pub branch: Option<Point>,
    #[serde(default)]
    pub from_anchor: Option<Anchor>,
    #[serde(default)]
    pub to_anchor: Option<Anchor>,
    #[serde(default = "enabled")]
    pub arrow_end: bool,
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlowDiagram {
    pub nodes: Vec<FlowItem>,
    pub connectors: Vec<FlowConnector>,
    pub splits: Vec<SplitConnector>,
    pub direction: Axis,
    pub node_width: Option<f32>,
    pub node_height: Option<f32>,
    pub gap: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimelineItem {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TimelineDiagram {
    pub items: Vec<TimelineItem>,
    pub direction: Axis,
    pub node_radius: Option<f32>,
}

/// An item plotted at normalized coordinates; `y = 0` is the bottom.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MatrixItem {
    pub label: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatrixDiagram {
    pub items: Vec<MatrixItem>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Quadrant labels in top-left, top-right, bottom-left, bottom-right order.
    pub quadrants: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProcessStep {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProcessArrowDiagram {
    pub steps: Vec<ProcessStep>,
    pub direction: Axis,
    pub item_width: Option<f32>,
    pub item_height: Option<f32>,
    pub gap: Option<f32>,
}

/// A line defined by its endpoints rather than by a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LineNode {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub arrow_start: bool,
    pub arrow_end: bool,
}

impl LineNode {
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// A child of a layer, positioned by an explicit offset inside the layer's
/// content box.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayerChild {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub node: Node,
}

impl LayerChild {
    pub fn new(x: f32, y: f32, node: Node) -> Self {
        Self { x, y, node }
    }

    pub fn offset(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerNode {
    pub children: Vec<LayerChild>,
}
