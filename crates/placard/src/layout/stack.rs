//! Single-axis stack layout shared by `vstack` (vertical main axis) and
//! `hstack` (horizontal main axis).
//!
//! Children are laid out against the stack's full content box without
//! seeing their siblings, then distributed along the main axis per
//! [`Justify`] and placed on the cross axis per [`Align`]. Overflow is
//! allowed: free space may be negative.

use log::trace;

use placard_core::{
    geometry::{Axis, Point, Size},
    length::{Constraints, Length, content_box},
    node::{Align, Justify, Node, StackNode, Style},
};

use crate::layout::{
    RelativeBox, align_offset,
    engine::{LayoutEngine, clamp_size},
};

pub(super) fn layout_stack<'a>(
    engine: &LayoutEngine<'_>,
    node: &'a Node,
    stack: &'a StackNode,
    axis: Axis,
    constraints: Constraints,
) -> RelativeBox<'a> {
    let style = node.style();
    let content = content_box(style, constraints);
    let padding = content.padding;
    let content_size = Size::new(content.content_width, content.content_height);
    let outer_size = Size::new(content.outer_width, content.outer_height);

    let mut children: Vec<_> = stack
        .children
        .iter()
        .map(|child| engine.layout_node(child, content.child_constraints()))
        .collect();

    let count = children.len();
    let main_sum: f32 = children.iter().map(|child| child.size.main(axis)).sum();
    let main_size = main_sum + count.saturating_sub(1) as f32 * stack.gap;

    // Free space is measured against the resolved content box even when the
    // stack has no main size of its own; only the stack's outer size hugs.
    let content_main = content_size.main(axis);
    let (offset, gap) = distribute(stack.justify, content_main, main_sum, stack.gap, count);

    // Without an explicit cross size, the widest child is the alignment
    // reference rather than the content box.
    let cross_max = children
        .iter()
        .map(|child| child.size.cross(axis))
        .fold(0.0, f32::max);
    let explicit_cross = dimension(style, axis.cross()).is_some();
    let cross_reference = if explicit_cross {
        content_size.cross(axis)
    } else {
        cross_max
    };

    trace!(
        axis:?,
        count = count,
        main_sum = main_sum,
        offset = offset,
        gap = gap,
        cross_reference = cross_reference;
        "Distributing stack children"
    );

    let mut cursor = offset;
    for child in &mut children {
        if stack.align == Align::Stretch {
            child.size = Size::from_axes(axis, child.size.main(axis), cross_reference);
        }
        let cross = align_offset(stack.align, cross_reference, child.size.cross(axis));
        child.position =
            Point::from_axes(axis, cursor, cross).add_point(padding.origin_offset());
        cursor += child.size.main(axis) + gap;
    }

    let main = if dimension(style, axis).is_some() {
        outer_size.main(axis)
    } else {
        main_size + padding.sum_along(axis)
    };
    let cross = if explicit_cross {
        outer_size.cross(axis)
    } else {
        cross_max + padding.sum_along(axis.cross())
    };

    RelativeBox::new(
        node,
        clamp_size(style, Size::from_axes(axis, main, cross), constraints),
    )
    .with_children(children)
}

/// Returns the main-axis start offset and the effective gap between children.
///
/// `space-between` with a single child, and any unrecognized value, lay out
/// like `start`.
fn distribute(
    justify: Justify,
    content_main: f32,
    main_sum: f32,
    gap: f32,
    count: usize,
) -> (f32, f32) {
    let free_space = content_main - (main_sum + count.saturating_sub(1) as f32 * gap);
    match justify {
        Justify::Center => ((free_space / 2.0).max(0.0), gap),
        Justify::End => (free_space.max(0.0), gap),
        Justify::SpaceBetween if count > 1 => {
            (0.0, (content_main - main_sum) / (count - 1) as f32)
        }
        Justify::Start | Justify::SpaceBetween | Justify::Other => (0.0, gap),
    }
}

fn dimension(style: &Style, axis: Axis) -> Option<Length> {
    match axis {
        Axis::Horizontal => style.width,
        Axis::Vertical => style.height,
    }
}
