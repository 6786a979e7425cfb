use placard_core::{
    geometry::{Axis, Bounds, Point},
    node::Anchor,
};

use crate::diagram::{Segment, SegmentStyle};

/// Anchors closer than this on either axis are joined by a single segment.
const STRAIGHT_TOLERANCE: f32 = 1.0;

/// Returns the named attachment point of `bounds`.
pub(super) fn anchor_point(bounds: Bounds, anchor: Anchor) -> Point {
    let center = bounds.center();
    match anchor {
        Anchor::Top => center.with_y(bounds.min_y()),
        Anchor::Bottom => center.with_y(bounds.max_y()),
        Anchor::Left => center.with_x(bounds.min_x()),
        Anchor::Right => center.with_x(bounds.max_x()),
        Anchor::Center => center,
    }
}

/// Default `(from, to)` anchors for links flowing along `direction`.
pub(super) fn default_anchors(direction: Axis) -> (Anchor, Anchor) {
    match direction {
        Axis::Horizontal => (Anchor::Right, Anchor::Left),
        Axis::Vertical => (Anchor::Bottom, Anchor::Top),
    }
}

/// Orthogonal three-leg path whose first and last legs run along `axis`,
/// turning at the midpoint of the two endpoints' coordinates on that axis.
pub(super) fn elbow(from: Point, to: Point, axis: Axis) -> [Point; 4] {
    let cross = axis.cross();
    let mid = (from.along(axis) + to.along(axis)) / 2.0;
    [
        from,
        Point::from_axes(axis, mid, from.along(cross)),
        Point::from_axes(axis, mid, to.along(cross)),
        to,
    ]
}

/// Turns a polyline into segments. `style.arrow_start` lands on the first
/// segment and `style.arrow_end` on the last.
pub(super) fn polyline(points: &[Point], style: SegmentStyle) -> Vec<Segment> {
    let last = points.len().saturating_sub(2);
    points
        .windows(2)
        .enumerate()
        .map(|(idx, pair)| {
            Segment::new(pair[0], pair[1]).with_style(SegmentStyle {
                arrow_start: style.arrow_start && idx == 0,
                arrow_end: style.arrow_end && idx == last,
            })
        })
        .collect()
}

/// Connects two item boxes through the given anchors.
///
/// Axis-aligned anchors get one straight segment. Otherwise the path is an
/// elbow whose first leg leaves the source anchor perpendicular to its edge;
/// a center anchor leaves along `direction`.
pub(super) fn connect(
    from: Bounds,
    to: Bounds,
    anchors: (Anchor, Anchor),
    direction: Axis,
    style: SegmentStyle,
) -> Vec<Segment> {
    let (from_anchor, to_anchor) = anchors;
    let start = anchor_point(from, from_anchor);
    let end = anchor_point(to, to_anchor);

    if start.is_axis_aligned_with(end, STRAIGHT_TOLERANCE) {
        return polyline(&[start, end], style);
    }

    let leg_axis = match from_anchor {
        Anchor::Left | Anchor::Right => Axis::Horizontal,
        Anchor::Top | Anchor::Bottom => Axis::Vertical,
        Anchor::Center => direction,
    };
    polyline(&elbow(start, end, leg_axis), style)
}

#[cfg(test)]
mod tests {
    use placard_core::geometry::Size;

    use super::*;

    fn square(x: f32, y: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(20.0, 20.0))
    }

    const ARROW_END: SegmentStyle = SegmentStyle {
        arrow_start: false,
        arrow_end: true,
    };

    #[test]
    fn test_anchor_points() {
        let bounds = square(0.0, 0.0);
        assert_eq!(anchor_point(bounds, Anchor::Top), Point::new(10.0, 0.0));
        assert_eq!(anchor_point(bounds, Anchor::Bottom), Point::new(10.0, 20.0));
        assert_eq!(anchor_point(bounds, Anchor::Left), Point::new(0.0, 10.0));
        assert_eq!(anchor_point(bounds, Anchor::Right), Point::new(20.0, 10.0));
        assert_eq!(anchor_point(bounds, Anchor::Center), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_aligned_anchors_draw_one_segment() {
        let segments = connect(
            square(0.0, 0.0),
            square(100.0, 0.5),
            default_anchors(Axis::Horizontal),
            Axis::Horizontal,
            ARROW_END,
        );
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start(), Point::new(20.0, 10.0));
        assert!(segments[0].style().arrow_end);
    }

    #[test]
    fn test_offset_anchors_draw_elbow() {
        let segments = connect(
            square(0.0, 0.0),
            square(100.0, 50.0),
            default_anchors(Axis::Horizontal),
            Axis::Horizontal,
            ARROW_END,
        );
        let points: Vec<_> = segments.iter().map(Segment::end).collect();
        assert_eq!(
            points,
            [Point::new(60.0, 10.0), Point::new(60.0, 60.0), Point::new(100.0, 60.0)]
        );
        assert!(!segments[0].style().arrow_end);
        assert!(segments[2].style().arrow_end);
    }

    #[test]
    fn test_vertical_source_anchor_turns_on_y() {
        let segments = connect(
            square(0.0, 0.0),
            square(100.0, 100.0),
            (Anchor::Bottom, Anchor::Left),
            Axis::Horizontal,
            SegmentStyle::default(),
        );
        assert_eq!(segments[0].end(), Point::new(10.0, 65.0));
        assert_eq!(segments[1].end(), Point::new(100.0, 65.0));
    }

    #[test]
    fn test_polyline_arrows_on_ends_only() {
        let style = SegmentStyle {
            arrow_start: true,
            arrow_end: true,
        };
        let points = [Point::default(), Point::new(1.0, 0.0), Point::new(1.0, 1.0)];
        let segments = polyline(&points, style);
        assert!(segments[0].style().arrow_start && !segments[0].style().arrow_end);
        assert!(!segments[1].style().arrow_start && segments[1].style().arrow_end);
    }
}
