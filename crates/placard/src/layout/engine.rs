use log::{debug, trace, warn};

use placard_core::{
    geometry::{Axis, Bounds, Point, Size},
    length::{Constraints, clamp_dimension, content_box, expand_spacing},
    node::{
        Align, BoxNode, ImageNode, LayerNode, LineNode, Node, NodeKind, Style, TextAlign,
        TextNode,
    },
    text::TextMeasurer,
};

use crate::{
    context::LayoutContext,
    layout::{BoxContent, RelativeBox, align_offset, stack},
    sizing,
};

/// Recursive driver of the relative layout pass.
///
/// The engine borrows a [`LayoutContext`] for configuration and measurement
/// caches. It performs no I/O: image dimensions must already be cached.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine<'c> {
    context: &'c LayoutContext,
    measurer: TextMeasurer<'c>,
}

impl<'c> LayoutEngine<'c> {
    pub fn new(context: &'c LayoutContext) -> Self {
        Self {
            context,
            measurer: context.measurer(),
        }
    }

    /// Lays out `root` on a canvas of `canvas` size. The root box sits at the
    /// origin.
    pub fn layout<'a>(&self, root: &'a Node, canvas: Size) -> RelativeBox<'a> {
        debug!(
            kind = root.kind().name(),
            canvas_width = canvas.width(),
            canvas_height = canvas.height();
            "Starting relative layout"
        );
        let root_box = self.layout_node(root, Constraints::from(canvas));
        debug!(boxes = root_box.count(); "Relative layout finished");
        root_box
    }

    /// Sizes `node` against `constraints` and positions its children.
    ///
    /// The returned box is at the origin; the caller positions it.
    pub(super) fn layout_node<'a>(
        &self,
        node: &'a Node,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let laid_out = match node.kind() {
            NodeKind::Text(text) => self.layout_text(node, text, constraints),
            NodeKind::Shape(shape) => match &shape.label {
                Some(label) => self.layout_text(node, label, constraints),
                None => self.layout_leaf(node, Size::default(), constraints),
            },
            NodeKind::Image(image) => self.layout_image(node, image, constraints),
            NodeKind::Box(boxed) => self.layout_box(node, boxed, constraints),
            NodeKind::VStack(stack) => {
                stack::layout_stack(self, node, stack, Axis::Vertical, constraints)
            }
            NodeKind::HStack(stack) => {
                stack::layout_stack(self, node, stack, Axis::Horizontal, constraints)
            }
            NodeKind::Table(_)
            | NodeKind::Chart(_)
            | NodeKind::Tree(_)
            | NodeKind::Flow(_)
            | NodeKind::Timeline(_)
            | NodeKind::Matrix(_)
            | NodeKind::ProcessArrow(_) => {
                let intrinsic = sizing::intrinsic_size(node.kind(), self.context.config().diagram())
                    .unwrap_or_default();
                self.layout_leaf(node, intrinsic, constraints)
            }
            NodeKind::Line(line) => self.layout_line(node, line, constraints),
            NodeKind::Layer(layer) => self.layout_layer(node, layer, constraints),
        };

        trace!(
            kind = node.kind().name(),
            width = laid_out.size.width(),
            height = laid_out.size.height(),
            children = laid_out.children.len();
            "Sized node"
        );
        laid_out
    }

    fn layout_text<'a>(
        &self,
        node: &'a Node,
        text: &TextNode,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let style = node.style();
        let padding = expand_spacing(style.padding.as_ref());
        let explicit_width = style.width.map(|width| width.resolve(constraints.width()));
        let explicit_height = style.height.map(|height| height.resolve(constraints.height()));

        let max_width =
            (explicit_width.unwrap_or(constraints.width()) - padding.horizontal_sum()).max(0.0);
        let text_style = text.text_style(self.context.config().text().line_height());
        let measured = self
            .measurer
            .measure(&text.content, &text_style, Some(max_width));

        // Full-width centering: the box spans the parent's content width so
        // the renderer centers against it instead of the measured width.
        let width = if text.align == TextAlign::Center && style.width.is_none() {
            constraints.width()
        } else {
            explicit_width.unwrap_or(measured.width() + padding.horizontal_sum())
        };
        let height = explicit_height.unwrap_or(measured.height() + padding.vertical_sum());

        RelativeBox::new(node, clamp_size(style, Size::new(width, height), constraints))
            .with_content(BoxContent::Text {
                lines: measured.lines().to_vec(),
            })
    }

    fn layout_image<'a>(
        &self,
        node: &'a Node,
        image: &ImageNode,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let natural = self.context.images().dimensions(&image.src).unwrap_or_else(|| {
            warn!(
                source = image.src.as_str();
                "Image dimensions not prefetched, using placeholder"
            );
            self.context.config().images().placeholder()
        });

        let style = node.style();
        let explicit_width = style.width.map(|width| width.resolve(constraints.width()));
        let explicit_height = style.height.map(|height| height.resolve(constraints.height()));
        let size = match (explicit_width, explicit_height) {
            (Some(width), Some(height)) => Size::new(width, height),
            (Some(width), None) => {
                Size::new(width, width * aspect(natural.height(), natural.width()))
            }
            (None, Some(height)) => {
                Size::new(height * aspect(natural.width(), natural.height()), height)
            }
            (None, None) => natural.add_padding(expand_spacing(style.padding.as_ref())),
        };

        RelativeBox::new(node, clamp_size(style, size, constraints))
    }

    fn layout_box<'a>(
        &self,
        node: &'a Node,
        boxed: &'a BoxNode,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let style = node.style();
        let content = content_box(style, constraints);
        let padding = content.padding;

        let Some(child_node) = &boxed.child else {
            return self.layout_leaf(node, Size::default(), constraints);
        };

        let mut child = self.layout_node(child_node, content.child_constraints());
        if boxed.align == Align::Stretch && style.width.is_some() {
            child.size = Size::new(content.content_width, child.size.height());
        }

        let width = if style.width.is_some() {
            content.outer_width
        } else {
            child.size.width() + padding.horizontal_sum()
        };
        let height = if style.height.is_some() {
            content.outer_height
        } else {
            child.size.height() + padding.vertical_sum()
        };
        let size = clamp_size(style, Size::new(width, height), constraints);

        // Children are always top-anchored; only the horizontal placement
        // follows `align`.
        let content_width = (size.width() - padding.horizontal_sum()).max(0.0);
        child.position = Point::new(
            padding.left() + align_offset(boxed.align, content_width, child.size.width()),
            padding.top(),
        );

        RelativeBox::new(node, size).with_children(vec![child])
    }

    /// Sizes a childless node from its explicit dimensions, falling back to
    /// `intrinsic` plus padding.
    fn layout_leaf<'a>(
        &self,
        node: &'a Node,
        intrinsic: Size,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let style = node.style();
        let natural = intrinsic.add_padding(expand_spacing(style.padding.as_ref()));
        let size = Size::new(
            style
                .width
                .map_or(natural.width(), |width| width.resolve(constraints.width())),
            style
                .height
                .map_or(natural.height(), |height| height.resolve(constraints.height())),
        );
        RelativeBox::new(node, clamp_size(style, size, constraints))
    }

    fn layout_line<'a>(
        &self,
        node: &'a Node,
        line: &LineNode,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let bounds = Bounds::from_corners(line.start(), line.end());
        let origin = bounds.min_point();
        let size = clamp_size(node.style(), bounds.to_size(), constraints);
        RelativeBox::new(node, size).with_content(BoxContent::Line {
            start: line.start().sub_point(origin),
            end: line.end().sub_point(origin),
        })
    }

    /// Lays out each layer child as its own root against the layer's content
    /// box and records its declared offset. The absolute pass re-bases it.
    fn layout_layer<'a>(
        &self,
        node: &'a Node,
        layer: &'a LayerNode,
        constraints: Constraints,
    ) -> RelativeBox<'a> {
        let style = node.style();
        let content = content_box(style, constraints);
        let padding = content.padding;

        let mut extent = Size::default();
        let children: Vec<_> = layer
            .children
            .iter()
            .map(|layer_child| {
                let mut child = self.layout_node(&layer_child.node, content.child_constraints());
                child.layer_offset = Some(layer_child.offset());

                let footprint = if let NodeKind::Line(line) = layer_child.node.kind() {
                    Bounds::from_corners(line.start(), line.end())
                } else {
                    child.bounds()
                }
                .translate(layer_child.offset());
                extent = extent.max(Size::new(
                    footprint.max_x().max(0.0),
                    footprint.max_y().max(0.0),
                ));

                child
            })
            .collect();

        let width = if style.width.is_some() {
            content.outer_width
        } else {
            extent.width() + padding.horizontal_sum()
        };
        let height = if style.height.is_some() {
            content.outer_height
        } else {
            extent.height() + padding.vertical_sum()
        };

        RelativeBox::new(node, clamp_size(style, Size::new(width, height), constraints))
            .with_children(children)
    }
}

/// Clamps a size to the node's min/max dimensions and to zero.
pub(super) fn clamp_size(style: &Style, size: Size, constraints: Constraints) -> Size {
    Size::new(
        clamp_dimension(
            size.width(),
            style.min_width,
            style.max_width,
            constraints.width(),
        ),
        clamp_dimension(
            size.height(),
            style.min_height,
            style.max_height,
            constraints.height(),
        ),
    )
}

/// `numerator / denominator`, or zero for a degenerate image.
fn aspect(numerator: f32, denominator: f32) -> f32 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}
