//! Geometric primitives for slide layout and positioning.
//!
//! This module provides the geometric types used throughout Placard for
//! calculating positions, sizes and bounding boxes of laid-out nodes.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in slide space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//! - [`Axis`] - The main/cross axis selector shared by stacks and diagrams
//!
//! # Coordinate System
//!
//! Placard uses device-independent pixels with the origin at the top-left
//! corner of the canvas:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

use serde::{Deserialize, Serialize};

/// A position on the canvas, or an offset from a parent box's origin.
///
/// ```
/// # use placard_core::geometry::Point;
/// let padding = Point::new(24.0, 16.0);
/// let child = Point::new(0.0, 40.0);
///
/// let placed = child.add_point(padding);
/// assert_eq!((placed.x(), placed.y()), (24.0, 56.0));
/// assert_eq!(placed.midpoint(padding).y(), 36.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a point from coordinates along `axis` and across it.
    pub fn from_axes(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Multiplies both coordinates by `factor`.
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Same point, moved horizontally to `x`.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Same point, moved vertically to `y`.
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Component-wise sum; used to turn a relative offset into a canvas position.
    pub fn add_point(self, other: Point) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference.
    pub fn sub_point(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Halfway between `self` and `other`.
    pub fn midpoint(self, other: Point) -> Self {
        self.add_point(other).scale(0.5)
    }

    /// Returns the coordinate along `axis`.
    pub fn along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Returns `true` when the segment to `other` runs parallel to an axis,
    /// within `tolerance` pixels.
    ///
    /// ```
    /// # use placard_core::geometry::Point;
    /// let a = Point::new(0.0, 10.0);
    /// assert!(a.is_axis_aligned_with(Point::new(50.0, 10.5), 1.0));
    /// assert!(!a.is_axis_aligned_with(Point::new(50.0, 30.0), 1.0));
    /// ```
    pub fn is_axis_aligned_with(self, other: Point, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance || (self.y - other.y).abs() <= tolerance
    }
}

/// Width and height of a box, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Builds a size from main/cross extents along `axis`.
    pub fn from_axes(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the extent along `axis`.
    pub fn main(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Returns the extent perpendicular to `axis`.
    pub fn cross(self, axis: Axis) -> f32 {
        self.main(axis.cross())
    }

    /// Per-dimension maximum, e.g. the envelope of two children.
    pub fn max(self, other: Size) -> Self {
        Self::new(self.width.max(other.width), self.height.max(other.height))
    }

    /// Grows a content size into its outer size.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self::new(
            self.width + insets.sum_along(Axis::Horizontal),
            self.height + insets.sum_along(Axis::Vertical),
        )
    }

    /// Shrinks an outer size to the content area. Each dimension stops at zero.
    pub fn sub_padding(self, insets: Insets) -> Self {
        Self::new(
            (self.width - insets.sum_along(Axis::Horizontal)).max(0.0),
            (self.height - insets.sum_along(Axis::Vertical)).max(0.0),
        )
    }
}

/// An axis-aligned rectangle stored as its two extreme corners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// A `size` rectangle whose center sits on `center`.
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let origin = center.sub_point(Point::new(size.width / 2.0, size.height / 2.0));
        Self::new_from_top_left(origin, size)
    }

    pub fn new_from_top_left(origin: Point, size: Size) -> Self {
        let far = origin.add_point(Point::new(size.width, size.height));
        Self {
            min_x: origin.x,
            min_y: origin.y,
            max_x: far.x,
            max_y: far.y,
        }
    }

    /// Creates the smallest bounds containing both points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Left edge.
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Top edge.
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Right edge.
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Bottom edge.
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn center(self) -> Point {
        self.min_point().midpoint(Point::new(self.max_x, self.max_y))
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// The top-left corner, i.e. the box origin.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Shifts the rectangle by `offset`, keeping its size.
    ///
    /// ```
    /// # use placard_core::geometry::{Bounds, Point, Size};
    /// let title = Bounds::new_from_top_left(Point::default(), Size::new(400.0, 60.0));
    /// let placed = title.translate(Point::new(40.0, 32.0));
    /// assert_eq!(placed.min_point(), Point::new(40.0, 32.0));
    /// assert_eq!(placed.to_size(), Size::new(400.0, 60.0));
    /// ```
    pub fn translate(self, offset: Point) -> Self {
        Self::new_from_top_left(self.min_point().add_point(offset), self.to_size())
    }

    /// Shrinks the bounds by the given insets. Collapses to a zero-sized
    /// rectangle instead of inverting when the insets exceed the size.
    pub fn inset(self, insets: Insets) -> Self {
        let min_x = self.min_x + insets.left();
        let min_y = self.min_y + insets.top();
        Self {
            min_x,
            min_y,
            max_x: (self.max_x - insets.right()).max(min_x),
            max_y: (self.max_y - insets.bottom()).max(min_y),
        }
    }
}

/// Per-side padding, in CSS order (top, right, bottom, left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self { top, right, bottom, left }
    }

    /// The same padding on every side.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Total horizontal padding (left + right).
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }

    /// Returns the sum of the two insets lying on `axis`.
    pub fn sum_along(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal_sum(),
            Axis::Vertical => self.vertical_sum(),
        }
    }

    /// Returns the leading inset on `axis` (left or top).
    pub fn leading(self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Returns the offset of the content box origin from the outer box origin.
    pub fn origin_offset(self) -> Point {
        Point::new(self.left, self.top)
    }
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// Returns the perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_sub_point() {
        let p = Point::new(10.0, 4.0).sub_point(Point::new(3.0, 6.0));
        assert_approx_eq!(f32, p.x(), 7.0);
        assert_approx_eq!(f32, p.y(), -2.0);
    }

    #[test]
    fn test_point_along_axis() {
        let p = Point::new(3.0, 9.0);
        assert_approx_eq!(f32, p.along(Axis::Horizontal), 3.0);
        assert_approx_eq!(f32, p.along(Axis::Vertical), 9.0);
        assert_eq!(Point::from_axes(Axis::Vertical, 9.0, 3.0), p);
    }

    #[test]
    fn test_size_main_and_cross() {
        let size = Size::new(40.0, 10.0);
        assert_approx_eq!(f32, size.main(Axis::Horizontal), 40.0);
        assert_approx_eq!(f32, size.cross(Axis::Horizontal), 10.0);
        assert_approx_eq!(f32, size.main(Axis::Vertical), 10.0);
        assert_approx_eq!(f32, size.cross(Axis::Vertical), 40.0);
        assert_eq!(Size::from_axes(Axis::Vertical, 10.0, 40.0), size);
    }

    #[test]
    fn test_size_sub_padding_clamps_at_zero() {
        let size = Size::new(10.0, 50.0).sub_padding(Insets::uniform(8.0));
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 34.0);
    }

    #[test]
    fn test_bounds_from_corners_normalizes() {
        let bounds = Bounds::from_corners(Point::new(50.0, 5.0), Point::new(10.0, 25.0));
        assert_approx_eq!(f32, bounds.min_x(), 10.0);
        assert_approx_eq!(f32, bounds.min_y(), 5.0);
        assert_approx_eq!(f32, bounds.width(), 40.0);
        assert_approx_eq!(f32, bounds.height(), 20.0);
    }

    #[test]
    fn test_bounds_inset_never_inverts() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(20.0, 100.0));
        let inner = bounds.inset(Insets::uniform(15.0));
        assert_approx_eq!(f32, inner.width(), 0.0);
        assert_approx_eq!(f32, inner.height(), 70.0);
        assert_approx_eq!(f32, inner.min_x(), 15.0);
    }

    #[test]
    fn test_bounds_center() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(100.0, 40.0));
        assert_eq!(bounds.center(), Point::new(60.0, 30.0));
        assert_eq!(Bounds::new_from_center(bounds.center(), bounds.to_size()), bounds);
    }

    #[test]
    fn test_insets_axis_helpers() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_approx_eq!(f32, insets.sum_along(Axis::Horizontal), 6.0);
        assert_approx_eq!(f32, insets.sum_along(Axis::Vertical), 4.0);
        assert_approx_eq!(f32, insets.leading(Axis::Horizontal), 4.0);
        assert_approx_eq!(f32, insets.leading(Axis::Vertical), 1.0);
        assert_eq!(insets.origin_offset(), Point::new(4.0, 1.0));
    }

    #[test]
    fn test_axis_cross() {
        assert_eq!(Axis::Horizontal.cross(), Axis::Vertical);
        assert_eq!(Axis::Vertical.cross(), Axis::Horizontal);
    }
}
