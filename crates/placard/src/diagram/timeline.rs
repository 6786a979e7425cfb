//! Timeline routing. Items sit at evenly spaced fractions of a spine that
//! spans the bounds minus one marker radius at each end.

use placard_core::{
    geometry::{Axis, Bounds, Point, Size},
    node::{TimelineDiagram, TimelineItem},
};

use crate::{
    config::DiagramDefaults,
    diagram::{Connector, ConnectorRole, DiagramElement, ElementRole, Routed, Segment},
    sizing::{
        TIMELINE_DATE_BAND, TIMELINE_DATE_GUTTER, TIMELINE_DESCRIPTION_HEIGHT,
        TIMELINE_ITEM_SPACING_H, TIMELINE_TEXT_GAP, TIMELINE_TEXT_WIDTH, TIMELINE_TITLE_GAP,
        TIMELINE_TITLE_HEIGHT,
    },
};

/// Height of a date label beside a vertical spine.
const VERTICAL_DATE_HEIGHT: f32 = 24.0;

pub(super) fn route(
    timeline: &TimelineDiagram,
    bounds: Bounds,
    defaults: &DiagramDefaults,
) -> Routed {
    if timeline.items.is_empty() {
        return Routed::default();
    }

    let radius = timeline
        .node_radius
        .unwrap_or(defaults.timeline_node_radius);
    let axis = timeline.direction;

    // The spine runs along `axis` at a fixed offset across it.
    let spine_cross = bounds.min_point().along(axis.cross())
        + match axis {
            Axis::Horizontal => TIMELINE_DATE_BAND,
            Axis::Vertical => TIMELINE_DATE_GUTTER,
        }
        + radius;
    let spine_start = bounds.min_point().along(axis) + radius;
    let spine_end = bounds.to_size().main(axis) + bounds.min_point().along(axis) - radius;

    let spine = Connector::new(
        ConnectorRole::Spine,
        vec![Segment::new(
            Point::from_axes(axis, spine_start, spine_cross),
            Point::from_axes(axis, spine_end, spine_cross),
        )],
    );

    let count = timeline.items.len();
    let mut elements = Vec::with_capacity(count * 4);
    for (index, item) in timeline.items.iter().enumerate() {
        let main = if count == 1 {
            (spine_start + spine_end) / 2.0
        } else {
            spine_start + (spine_end - spine_start) * index as f32 / (count - 1) as f32
        };
        let center = Point::from_axes(axis, main, spine_cross);

        let labels = match axis {
            Axis::Horizontal => horizontal_labels(bounds, center, radius),
            Axis::Vertical => vertical_labels(bounds, center, radius),
        };
        elements.push(
            DiagramElement::new(
                ElementRole::Marker,
                Bounds::new_from_center(center, Size::new(2.0 * radius, 2.0 * radius)),
            )
            .with_source_index(index),
        );
        elements.extend(item_elements(item, index, labels));
    }

    Routed {
        elements,
        connectors: vec![spine],
    }
}

/// Boxes for the date, title and description of one item.
struct LabelBoxes {
    date: Bounds,
    title: Bounds,
    description: Bounds,
}

/// Date above the spine; title and description stacked below it.
fn horizontal_labels(bounds: Bounds, center: Point, radius: f32) -> LabelBoxes {
    let left = center.x() - TIMELINE_ITEM_SPACING_H / 2.0;
    let title_top = center.y() + radius + TIMELINE_TITLE_GAP;
    LabelBoxes {
        date: Bounds::new_from_top_left(
            Point::new(left, bounds.min_y()),
            Size::new(TIMELINE_ITEM_SPACING_H, TIMELINE_DATE_BAND),
        ),
        title: Bounds::new_from_top_left(
            Point::new(left, title_top),
            Size::new(TIMELINE_ITEM_SPACING_H, TIMELINE_TITLE_HEIGHT),
        ),
        description: Bounds::new_from_top_left(
            Point::new(left, title_top + TIMELINE_TITLE_HEIGHT),
            Size::new(TIMELINE_ITEM_SPACING_H, TIMELINE_DESCRIPTION_HEIGHT),
        ),
    }
}

/// Date in the gutter left of the spine; title and description to its right.
fn vertical_labels(bounds: Bounds, center: Point, radius: f32) -> LabelBoxes {
    let top = center.y() - VERTICAL_DATE_HEIGHT / 2.0;
    let text_left = center.x() + radius + TIMELINE_TEXT_GAP;
    LabelBoxes {
        date: Bounds::new_from_top_left(
            Point::new(bounds.min_x(), top),
            Size::new(TIMELINE_DATE_GUTTER, VERTICAL_DATE_HEIGHT),
        ),
        title: Bounds::new_from_top_left(
            Point::new(text_left, top),
            Size::new(TIMELINE_TEXT_WIDTH, TIMELINE_TITLE_HEIGHT),
        ),
        description: Bounds::new_from_top_left(
            Point::new(text_left, top + TIMELINE_TITLE_HEIGHT),
            Size::new(TIMELINE_TEXT_WIDTH, TIMELINE_DESCRIPTION_HEIGHT),
        ),
    }
}

fn item_elements(item: &TimelineItem, index: usize, labels: LabelBoxes) -> Vec<DiagramElement> {
    let mut elements = vec![
        DiagramElement::new(ElementRole::Date, labels.date).with_label(item.date.as_str()),
        DiagramElement::new(ElementRole::Title, labels.title).with_label(item.title.as_str()),
    ];
    if let Some(description) = &item.description {
        elements.push(
            DiagramElement::new(ElementRole::Description, labels.description)
                .with_label(description.as_str()),
        );
    }
    elements
        .into_iter()
        .map(|element| element.with_source_index(index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::timeline_size;

    fn item(date: &str, title: &str, description: Option<&str>) -> TimelineItem {
        TimelineItem {
            date: date.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
        }
    }

    fn route_intrinsic(timeline: &TimelineDiagram) -> Routed {
        let defaults = DiagramDefaults::default();
        let bounds =
            Bounds::new_from_top_left(Point::default(), timeline_size(timeline, &defaults));
        route(timeline, bounds, &defaults)
    }

    fn with_role(routed: &Routed, role: ElementRole) -> Vec<Bounds> {
        routed
            .elements
            .iter()
            .filter(|element| element.role() == role)
            .map(DiagramElement::bounds)
            .collect()
    }

    #[test]
    fn test_horizontal_markers_and_bands() {
        let timeline = TimelineDiagram {
            items: vec![
                item("2020", "Founded", Some("Two people")),
                item("2022", "Seed", None),
                item("2024", "Launch", Some("GA")),
            ],
            ..Default::default()
        };
        let routed = route_intrinsic(&timeline);

        let centers: Vec<_> = with_role(&routed, ElementRole::Marker)
            .iter()
            .map(|marker| marker.center())
            .collect();
        assert_eq!(
            centers,
            [Point::new(8.0, 48.0), Point::new(128.0, 48.0), Point::new(248.0, 48.0)]
        );

        let dates = with_role(&routed, ElementRole::Date);
        assert_eq!(dates[1].min_point(), Point::new(68.0, 0.0));
        let titles = with_role(&routed, ElementRole::Title);
        assert_eq!(titles[0].min_y(), 64.0);
        let descriptions = with_role(&routed, ElementRole::Description);
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions[0].max_y(), 120.0);

        let spine = routed.connectors[0].segments()[0];
        assert_eq!(routed.connectors[0].role(), ConnectorRole::Spine);
        assert_eq!(spine.start(), Point::new(8.0, 48.0));
        assert_eq!(spine.end(), Point::new(248.0, 48.0));
    }

    #[test]
    fn test_single_item_sits_at_midpoint() {
        let timeline = TimelineDiagram {
            items: vec![item("today", "Now", None)],
            ..Default::default()
        };
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(300.0, 120.0));
        let routed = route(&timeline, bounds, &DiagramDefaults::default());
        let markers = with_role(&routed, ElementRole::Marker);
        assert_eq!(markers[0].center().x(), 150.0);
    }

    #[test]
    fn test_vertical_mirrors_by_axis_swap() {
        let timeline = TimelineDiagram {
            items: vec![item("Q1", "Alpha", Some("internal")), item("Q2", "Beta", None)],
            direction: Axis::Vertical,
            ..Default::default()
        };
        let routed = route_intrinsic(&timeline);

        let centers: Vec<_> = with_role(&routed, ElementRole::Marker)
            .iter()
            .map(|marker| marker.center())
            .collect();
        assert_eq!(centers, [Point::new(48.0, 8.0), Point::new(48.0, 68.0)]);

        let titles = with_role(&routed, ElementRole::Title);
        assert_eq!(titles[1].min_point(), Point::new(72.0, 56.0));
        assert_eq!(titles[1].max_x(), 172.0);
        let dates = with_role(&routed, ElementRole::Date);
        assert_eq!(dates[0].min_x(), 0.0);
    }

    #[test]
    fn test_elements_carry_item_index() {
        let timeline = TimelineDiagram {
            items: vec![item("a", "A", Some("x")), item("b", "B", None)],
            ..Default::default()
        };
        let routed = route_intrinsic(&timeline);
        let indices: Vec<_> = routed.elements.iter().map(|e| e.source_index()).collect();
        assert_eq!(
            indices,
            [Some(0), Some(0), Some(0), Some(0), Some(1), Some(1), Some(1)]
        );
    }

    #[test]
    fn test_empty_timeline_has_no_spine() {
        let routed = route_intrinsic(&TimelineDiagram::default());
        assert!(routed.elements.is_empty());
        assert!(routed.connectors.is_empty());
    }
}
