use placard_core::{
    geometry::{Bounds, Point, Size},
    node::ProcessArrowDiagram,
};

use crate::{
    config::DiagramDefaults,
    diagram::{DiagramElement, ElementRole, Routed},
    sizing::ProcessMetrics,
};

/// Splits the main axis evenly between the steps, keeping the configured
/// gap (negative gaps overlap neighbouring chevrons). Steps keep their
/// configured cross extent and are centered across the bounds.
pub(super) fn route(
    process: &ProcessArrowDiagram,
    bounds: Bounds,
    defaults: &DiagramDefaults,
) -> Routed {
    let count = process.steps.len();
    if count == 0 {
        return Routed::default();
    }

    let metrics = ProcessMetrics::resolve(process, defaults);
    let axis = metrics.direction;
    let available = bounds.to_size();
    let gaps = (count - 1) as f32 * metrics.gap;
    let item_main = ((available.main(axis) - gaps) / count as f32).max(0.0);
    let item = Size::from_axes(axis, item_main, metrics.cross());

    let start = bounds.min_point().along(axis);
    let cross = bounds.min_point().along(axis.cross())
        + (available.cross(axis) - metrics.cross()) / 2.0;

    let elements = process
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let main = start + index as f32 * (item_main + metrics.gap);
            DiagramElement::new(
                ElementRole::Step,
                Bounds::new_from_top_left(Point::from_axes(axis, main, cross), item),
            )
            .with_label(step.label.as_str())
            .with_source_index(index)
        })
        .collect();

    Routed {
        elements,
        connectors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use placard_core::{geometry::Axis, node::ProcessStep};

    use super::*;
    use crate::sizing::process_arrow_size;

    fn steps(labels: &[&str]) -> Vec<ProcessStep> {
        labels
            .iter()
            .map(|label| ProcessStep {
                label: label.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_intrinsic_bounds_keep_item_width() {
        let process = ProcessArrowDiagram {
            steps: steps(&["Plan", "Build", "Ship"]),
            ..Default::default()
        };
        let defaults = DiagramDefaults::default();
        let bounds =
            Bounds::new_from_top_left(Point::default(), process_arrow_size(&process, &defaults));
        let routed = route(&process, bounds, &defaults);

        let starts: Vec<_> = routed.elements.iter().map(|e| e.bounds().min_x()).collect();
        assert_eq!(starts, [0.0, 135.0, 270.0]);
        for element in &routed.elements {
            assert_eq!(element.role(), ElementRole::Step);
            assert_eq!(element.bounds().to_size(), Size::new(150.0, 60.0));
        }
        assert_eq!(routed.elements[2].label(), Some("Ship"));
        assert!(routed.connectors.is_empty());
    }

    #[test]
    fn test_vertical_steps_centered_across() {
        let process = ProcessArrowDiagram {
            steps: steps(&["a", "b"]),
            direction: Axis::Vertical,
            gap: Some(10.0),
            ..Default::default()
        };
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(250.0, 210.0));
        let routed = route(&process, bounds, &DiagramDefaults::default());

        let first = routed.elements[0].bounds();
        let second = routed.elements[1].bounds();
        assert_approx_eq!(f32, first.height(), 100.0);
        assert_approx_eq!(f32, first.width(), 150.0);
        assert_approx_eq!(f32, first.min_x(), 50.0);
        assert_approx_eq!(f32, second.min_y(), 110.0);
    }

    #[test]
    fn test_overlap_wider_than_bounds_collapses_items() {
        let process = ProcessArrowDiagram {
            steps: steps(&["a", "b", "c"]),
            gap: Some(-200.0),
            ..Default::default()
        };
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(0.0, 60.0));
        let routed = route(&process, bounds, &DiagramDefaults::default());
        assert!(routed.elements.iter().all(|e| e.bounds().width() >= 0.0));
    }
}
