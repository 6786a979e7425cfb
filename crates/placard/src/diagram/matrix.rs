use placard_core::{
    geometry::{Bounds, Insets, Point, Size},
    node::MatrixDiagram,
};

use crate::{
    config::DiagramDefaults,
    diagram::{Connector, ConnectorRole, DiagramElement, ElementRole, Routed, Segment},
    sizing::MATRIX_AXIS_PADDING,
};

const LABEL_HEIGHT: f32 = 20.0;
const LABEL_GAP: f32 = 4.0;
const Y_LABEL_WIDTH: f32 = 120.0;
const QUADRANT_INSET: f32 = 8.0;

/// Draws a centered cross inside the padded plot area and plots items by
/// normalized coordinates, with `y = 0` at the bottom of the plot.
pub(super) fn route(matrix: &MatrixDiagram, bounds: Bounds, defaults: &DiagramDefaults) -> Routed {
    if matrix.items.is_empty() {
        return Routed::default();
    }

    let plot = bounds.inset(Insets::uniform(MATRIX_AXIS_PADDING));
    let center = plot.center();
    let connectors = vec![
        Connector::new(
            ConnectorRole::Axis,
            vec![Segment::new(
                center.with_x(plot.min_x()),
                center.with_x(plot.max_x()),
            )],
        ),
        Connector::new(
            ConnectorRole::Axis,
            vec![Segment::new(
                center.with_y(plot.min_y()),
                center.with_y(plot.max_y()),
            )],
        ),
    ];

    let mut elements = Vec::with_capacity(matrix.items.len() + 6);

    if let Some(label) = &matrix.x_label {
        let width = (MATRIX_AXIS_PADDING - 2.0 * LABEL_GAP).max(0.0);
        elements.push(
            DiagramElement::new(
                ElementRole::AxisLabel,
                Bounds::new_from_top_left(
                    Point::new(plot.max_x() + LABEL_GAP, center.y() - LABEL_HEIGHT / 2.0),
                    Size::new(width, LABEL_HEIGHT),
                ),
            )
            .with_label(label.as_str()),
        );
    }
    if let Some(label) = &matrix.y_label {
        elements.push(
            DiagramElement::new(
                ElementRole::AxisLabel,
                Bounds::new_from_center(
                    center.with_y(plot.min_y() - LABEL_GAP - LABEL_HEIGHT / 2.0),
                    Size::new(Y_LABEL_WIDTH, LABEL_HEIGHT),
                ),
            )
            .with_label(label.as_str()),
        );
    }

    let quadrant = Size::new(
        (plot.width() / 2.0 - 2.0 * QUADRANT_INSET).max(0.0),
        LABEL_HEIGHT,
    );
    let left = plot.min_x() + QUADRANT_INSET;
    let right = plot.max_x() - QUADRANT_INSET - quadrant.width();
    let top = plot.min_y() + QUADRANT_INSET;
    let bottom = plot.max_y() - QUADRANT_INSET - quadrant.height();
    let corners = [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(left, bottom),
        Point::new(right, bottom),
    ];
    for (label, corner) in matrix.quadrants.iter().zip(corners) {
        elements.push(
            DiagramElement::new(
                ElementRole::QuadrantLabel,
                Bounds::new_from_top_left(corner, quadrant),
            )
            .with_label(label.as_str()),
        );
    }

    let dot = Size::new(
        2.0 * defaults.matrix_point_radius,
        2.0 * defaults.matrix_point_radius,
    );
    for (index, item) in matrix.items.iter().enumerate() {
        let position = Point::new(
            plot.min_x() + item.x.clamp(0.0, 1.0) * plot.width(),
            plot.min_y() + (1.0 - item.y.clamp(0.0, 1.0)) * plot.height(),
        );
        elements.push(
            DiagramElement::new(ElementRole::Point, Bounds::new_from_center(position, dot))
                .with_label(item.label.as_str())
                .with_source_index(index),
        );
    }

    Routed {
        elements,
        connectors,
    }
}

#[cfg(test)]
mod tests {
    use placard_core::node::MatrixItem;

    use super::*;
    use crate::sizing::matrix_size;

    fn item(label: &str, x: f32, y: f32) -> MatrixItem {
        MatrixItem {
            label: label.to_string(),
            x,
            y,
        }
    }

    fn route_intrinsic(matrix: &MatrixDiagram) -> Routed {
        let bounds = Bounds::new_from_top_left(Point::default(), matrix_size(matrix));
        route(matrix, bounds, &DiagramDefaults::default())
    }

    fn centers(routed: &Routed, role: ElementRole) -> Vec<Point> {
        routed
            .elements
            .iter()
            .filter(|element| element.role() == role)
            .map(|element| element.bounds().center())
            .collect()
    }

    #[test]
    fn test_items_plot_with_inverted_y() {
        let matrix = MatrixDiagram {
            items: vec![
                item("low", 0.0, 0.0),
                item("high", 1.0, 1.0),
                item("mid", 0.25, 0.75),
                item("clamped", 1.5, -1.0),
            ],
            ..Default::default()
        };
        let routed = route_intrinsic(&matrix);

        assert_eq!(
            centers(&routed, ElementRole::Point),
            [
                Point::new(60.0, 160.0),
                Point::new(160.0, 60.0),
                Point::new(85.0, 85.0),
                Point::new(160.0, 160.0),
            ]
        );
        let dot = routed.elements[0].bounds();
        assert_eq!(dot.to_size(), Size::new(12.0, 12.0));
        assert_eq!(routed.elements[3].source_index(), Some(3));
    }

    #[test]
    fn test_cross_through_plot_center() {
        let matrix = MatrixDiagram {
            items: vec![item("a", 0.5, 0.5)],
            ..Default::default()
        };
        let routed = route_intrinsic(&matrix);

        assert_eq!(routed.connectors.len(), 2);
        let horizontal = routed.connectors[0].segments()[0];
        assert_eq!(horizontal.start(), Point::new(60.0, 110.0));
        assert_eq!(horizontal.end(), Point::new(160.0, 110.0));
        let vertical = routed.connectors[1].segments()[0];
        assert_eq!(vertical.start(), Point::new(110.0, 60.0));
        assert_eq!(vertical.end(), Point::new(110.0, 160.0));
    }

    #[test]
    fn test_axis_and_quadrant_labels() {
        let matrix = MatrixDiagram {
            items: vec![item("a", 0.5, 0.5)],
            x_label: Some("Effort".to_string()),
            y_label: Some("Impact".to_string()),
            quadrants: ["Quick wins", "Big bets", "Fill-ins", "Money pits"]
                .map(str::to_string)
                .to_vec(),
        };
        let routed = route_intrinsic(&matrix);

        let axis_labels: Vec<_> = routed
            .elements
            .iter()
            .filter(|element| element.role() == ElementRole::AxisLabel)
            .collect();
        assert_eq!(axis_labels[0].bounds().min_point(), Point::new(164.0, 100.0));
        assert_eq!(axis_labels[1].bounds().center(), Point::new(110.0, 46.0));

        let quadrants: Vec<_> = routed
            .elements
            .iter()
            .filter(|element| element.role() == ElementRole::QuadrantLabel)
            .map(|element| (element.label(), element.bounds().min_point()))
            .collect();
        assert_eq!(
            quadrants,
            [
                (Some("Quick wins"), Point::new(68.0, 68.0)),
                (Some("Big bets"), Point::new(118.0, 68.0)),
                (Some("Fill-ins"), Point::new(68.0, 132.0)),
                (Some("Money pits"), Point::new(118.0, 132.0)),
            ]
        );
    }

    #[test]
    fn test_missing_quadrants_are_skipped() {
        let matrix = MatrixDiagram {
            items: vec![item("a", 0.5, 0.5)],
            quadrants: vec!["Only one".to_string()],
            ..Default::default()
        };
        let routed = route_intrinsic(&matrix);
        let count = routed
            .elements
            .iter()
            .filter(|element| element.role() == ElementRole::QuadrantLabel)
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_empty_matrix_draws_nothing() {
        let routed = route_intrinsic(&MatrixDiagram::default());
        assert!(routed.elements.is_empty());
        assert!(routed.connectors.is_empty());
    }
}
