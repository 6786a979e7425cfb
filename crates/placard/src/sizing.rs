//! Intrinsic sizes of composite node kinds.
//!
//! Every sizer is a pure function of the node's data and the configured
//! [`DiagramDefaults`]. The relative layout pass uses them for nodes without
//! an explicit width or height, and the diagram router reuses the same
//! metrics to place items inside the final box. Empty item lists always size
//! to zero.

use placard_core::{
    geometry::{Axis, Size},
    node::{
        ChartNode, FlowDiagram, FlowItem, MatrixDiagram, NodeKind, ProcessArrowDiagram,
        TableNode, TimelineDiagram, TreeDiagram, TreeItem,
    },
};

use crate::config::DiagramDefaults;

/// Height of the date band above a horizontal timeline's spine.
pub(crate) const TIMELINE_DATE_BAND: f32 = 40.0;
/// Gap between a timeline marker and its title.
pub(crate) const TIMELINE_TITLE_GAP: f32 = 8.0;
pub(crate) const TIMELINE_TITLE_HEIGHT: f32 = 24.0;
pub(crate) const TIMELINE_DESCRIPTION_HEIGHT: f32 = 32.0;
/// Distance between consecutive items of a horizontal timeline.
pub(crate) const TIMELINE_ITEM_SPACING_H: f32 = 120.0;
/// Distance between consecutive items of a vertical timeline.
pub(crate) const TIMELINE_ITEM_SPACING_V: f32 = 60.0;
/// Width of the date gutter left of a vertical timeline's spine.
pub(crate) const TIMELINE_DATE_GUTTER: f32 = 40.0;
pub(crate) const TIMELINE_TEXT_GAP: f32 = 16.0;
pub(crate) const TIMELINE_TEXT_WIDTH: f32 = 100.0;

/// Padding reserved around a matrix plot for axis labels.
pub(crate) const MATRIX_AXIS_PADDING: f32 = 60.0;
pub(crate) const MATRIX_MIN_PLOT: f32 = 100.0;

/// Returns the intrinsic size of `kind`, or `None` for kinds that are sized
/// by their content or children instead.
pub fn intrinsic_size(kind: &NodeKind, defaults: &DiagramDefaults) -> Option<Size> {
    match kind {
        NodeKind::Table(table) => Some(table_size(table, defaults)),
        NodeKind::Chart(chart) => Some(chart_size(chart, defaults)),
        NodeKind::Tree(tree) => Some(tree_size(tree, defaults)),
        NodeKind::Flow(flow) => Some(flow_size(flow, defaults)),
        NodeKind::Timeline(timeline) => Some(timeline_size(timeline, defaults)),
        NodeKind::Matrix(matrix) => Some(matrix_size(matrix)),
        NodeKind::ProcessArrow(process) => Some(process_arrow_size(process, defaults)),
        NodeKind::Text(_)
        | NodeKind::Image(_)
        | NodeKind::Box(_)
        | NodeKind::VStack(_)
        | NodeKind::HStack(_)
        | NodeKind::Shape(_)
        | NodeKind::Line(_)
        | NodeKind::Layer(_) => None,
    }
}

/// Resolved geometry parameters of a process-arrow diagram.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ProcessMetrics {
    pub item: Size,
    pub gap: f32,
    pub direction: Axis,
}

impl ProcessMetrics {
    pub fn resolve(process: &ProcessArrowDiagram, defaults: &DiagramDefaults) -> Self {
        Self {
            item: Size::new(
                process.item_width.unwrap_or(defaults.process_item_width),
                process.item_height.unwrap_or(defaults.process_item_height),
            ),
            gap: process.gap.unwrap_or(defaults.process_gap),
            direction: process.direction,
        }
    }

    /// Cross-axis extent of every step: the item height when horizontal, the
    /// item width when vertical.
    pub fn cross(&self) -> f32 {
        self.item.cross(self.direction)
    }
}

/// `n × item + (n − 1) × gap` along the direction; the item's cross extent
/// across it.
pub fn process_arrow_size(process: &ProcessArrowDiagram, defaults: &DiagramDefaults) -> Size {
    let count = process.steps.len();
    if count == 0 {
        return Size::default();
    }
    let metrics = ProcessMetrics::resolve(process, defaults);
    let main =
        count as f32 * metrics.item.main(metrics.direction) + (count - 1) as f32 * metrics.gap;
    Size::from_axes(metrics.direction, main.max(0.0), metrics.cross())
}

/// Resolved geometry parameters of a flow diagram.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlowMetrics {
    pub node: Size,
    pub gap: f32,
    pub direction: Axis,
}

impl FlowMetrics {
    pub fn resolve(flow: &FlowDiagram, defaults: &DiagramDefaults) -> Self {
        Self {
            node: Size::new(
                flow.node_width.unwrap_or(defaults.flow_node_width),
                flow.node_height.unwrap_or(defaults.flow_node_height),
            ),
            gap: flow.gap.unwrap_or(defaults.flow_gap).max(0.0),
            direction: flow.direction,
        }
    }

    /// Size of one item, honoring its own overrides.
    pub fn item_size(&self, item: &FlowItem) -> Size {
        Size::new(
            item.width.unwrap_or(self.node.width()),
            item.height.unwrap_or(self.node.height()),
        )
    }
}

/// Like [`process_arrow_size`], with per-item overrides and a non-negative
/// gap. The cross extent is the largest item's.
pub fn flow_size(flow: &FlowDiagram, defaults: &DiagramDefaults) -> Size {
    if flow.nodes.is_empty() {
        return Size::default();
    }
    let metrics = FlowMetrics::resolve(flow, defaults);
    let axis = metrics.direction;
    let (main_sum, cross_max) = flow
        .nodes
        .iter()
        .map(|item| metrics.item_size(item))
        .fold((0.0_f32, 0.0_f32), |(main, cross), size| {
            (main + size.main(axis), cross.max(size.cross(axis)))
        });
    let gaps = (flow.nodes.len() - 1) as f32 * metrics.gap;
    Size::from_axes(axis, main_sum + gaps, cross_max)
}

/// Resolved geometry parameters of a tree diagram.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeMetrics {
    pub node: Size,
    pub level_gap: f32,
    pub sibling_gap: f32,
    /// Direction in which levels grow: `Vertical` is top-down.
    pub layout: Axis,
}

impl TreeMetrics {
    pub fn resolve(tree: &TreeDiagram, defaults: &DiagramDefaults) -> Self {
        Self {
            node: Size::new(
                tree.node_width.unwrap_or(defaults.tree_node_width),
                tree.node_height.unwrap_or(defaults.tree_node_height),
            ),
            level_gap: tree.level_gap.unwrap_or(defaults.tree_level_gap),
            sibling_gap: tree.sibling_gap.unwrap_or(defaults.tree_sibling_gap),
            layout: tree.layout,
        }
    }

    /// Size of the subtree rooted at `item`.
    ///
    /// Recomputed from scratch on every call; diagram trees are small.
    pub fn subtree_size(&self, item: &TreeItem) -> Size {
        let axis = self.layout;
        if item.children.is_empty() {
            return self.node;
        }

        let (children_cross, children_main) = item
            .children
            .iter()
            .map(|child| self.subtree_size(child))
            .fold((0.0_f32, 0.0_f32), |(cross, main), size| {
                (cross + size.cross(axis), main.max(size.main(axis)))
            });
        let gaps = (item.children.len() - 1) as f32 * self.sibling_gap;

        Size::from_axes(
            axis,
            self.node.main(axis) + self.level_gap + children_main,
            self.node.cross(axis).max(children_cross + gaps),
        )
    }
}

/// Size of the whole tree, or zero for a tree without a root.
pub fn tree_size(tree: &TreeDiagram, defaults: &DiagramDefaults) -> Size {
    tree.root.as_ref().map_or(Size::default(), |root| {
        TreeMetrics::resolve(tree, defaults).subtree_size(root)
    })
}

/// The fixed band layout of timelines; the item count only stretches the
/// spine.
pub fn timeline_size(timeline: &TimelineDiagram, defaults: &DiagramDefaults) -> Size {
    let count = timeline.items.len();
    if count == 0 {
        return Size::default();
    }
    let radius = timeline
        .node_radius
        .unwrap_or(defaults.timeline_node_radius);
    let spans = (count - 1) as f32;

    match timeline.direction {
        Axis::Horizontal => Size::new(
            2.0 * radius + spans * TIMELINE_ITEM_SPACING_H,
            TIMELINE_DATE_BAND
                + 2.0 * radius
                + TIMELINE_TITLE_GAP
                + TIMELINE_TITLE_HEIGHT
                + TIMELINE_DESCRIPTION_HEIGHT,
        ),
        Axis::Vertical => Size::new(
            TIMELINE_DATE_GUTTER + 2.0 * radius + TIMELINE_TEXT_GAP + TIMELINE_TEXT_WIDTH,
            2.0 * radius + spans * TIMELINE_ITEM_SPACING_V,
        ),
    }
}

/// Matrices have a fixed plot area; items are placed by normalized
/// coordinates at routing time.
pub fn matrix_size(matrix: &MatrixDiagram) -> Size {
    if matrix.items.is_empty() {
        return Size::default();
    }
    let side = 2.0 * MATRIX_AXIS_PADDING + MATRIX_MIN_PLOT;
    Size::new(side, side)
}

/// Sum of the column widths by the total row height.
pub fn table_size(table: &TableNode, defaults: &DiagramDefaults) -> Size {
    if table.rows.is_empty() {
        return Size::default();
    }
    let width = match &table.column_widths {
        Some(widths) => widths.iter().sum(),
        None => table.column_count() as f32 * defaults.table_column_width,
    };
    let row_height = table.row_height.unwrap_or(defaults.table_row_height);
    Size::new(width, table.rows.len() as f32 * row_height)
}

/// Charts use the configured default size, or zero without any series.
pub fn chart_size(chart: &ChartNode, defaults: &DiagramDefaults) -> Size {
    if chart.series.is_empty() {
        return Size::default();
    }
    Size::new(defaults.chart_width, defaults.chart_height)
}
