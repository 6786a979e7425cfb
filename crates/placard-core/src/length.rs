//! Declarative lengths, spacing and the box-model resolver.
//!
//! Nodes describe their sizes with [`Length`] values that only become pixels
//! once the parent's available space is known. This module resolves those
//! values and expands [`Spacing`] declarations into concrete [`Insets`].
//!
//! # Overview
//!
//! - [`resolve_length`] turns an optional [`Length`] into pixels.
//! - [`expand_spacing`] turns an optional [`Spacing`] into four edge values.
//! - [`content_box`] combines both for a node: the single place that decides
//!   how much room a node's children get.
//!
//! ```
//! # use placard_core::length::{Length, resolve_length};
//! assert_eq!(resolve_length(Some(Length::Px(120.0)), 800.0), 120.0);
//! assert_eq!(resolve_length(Some(Length::Percent(50.0)), 800.0), 400.0);
//! assert_eq!(resolve_length(Some(Length::Fill), 800.0), 800.0);
//! assert_eq!(resolve_length(None, 800.0), 800.0);
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    geometry::{Insets, Size},
    node::Style,
};

/// Error returned when a length string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LengthParseError {
    #[error("empty length value")]
    Empty,

    #[error("invalid length `{0}`: expected a number, `NN%`, `NNpx`, `fill` or `max`")]
    Invalid(String),
}

/// A declarative length, resolved against the parent's available space.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "RawLength")]
pub enum Length {
    /// A fixed number of pixels.
    Px(f32),
    /// A percentage (0-100) of the available space.
    Percent(f32),
    /// All of the available space.
    Fill,
}

impl Length {
    /// Resolves this length against `available` pixels.
    pub fn resolve(self, available: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => available * pct / 100.0,
            Self::Fill => available,
        }
    }
}

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(LengthParseError::Empty);
        }
        if trimmed.eq_ignore_ascii_case("fill") || trimmed.eq_ignore_ascii_case("max") {
            return Ok(Self::Fill);
        }

        let invalid = || LengthParseError::Invalid(trimmed.to_string());
        if let Some(pct) = trimmed.strip_suffix('%') {
            return pct.trim().parse().map(Self::Percent).map_err(|_| invalid());
        }
        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        number.trim().parse().map(Self::Px).map_err(|_| invalid())
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
            Self::Fill => f.write_str("fill"),
        }
    }
}

impl From<f32> for Length {
    fn from(px: f32) -> Self {
        Self::Px(px)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLength {
    Number(f32),
    Text(String),
}

impl TryFrom<RawLength> for Length {
    type Error = LengthParseError;

    fn try_from(raw: RawLength) -> Result<Self, Self::Error> {
        match raw {
            RawLength::Number(px) => Ok(Self::Px(px)),
            RawLength::Text(text) => text.parse(),
        }
    }
}

/// Resolves an optional length against the available space.
///
/// An absent length behaves like [`Length::Fill`]. No clamping is applied;
/// callers clamp against min/max separately with [`clamp_dimension`].
pub fn resolve_length(value: Option<Length>, available: f32) -> f32 {
    value.map_or(available, |length| length.resolve(available))
}

/// Clamps `value` to the resolved `[min, max]` range and to zero.
///
/// The minimum wins when the two bounds conflict.
pub fn clamp_dimension(
    value: f32,
    min: Option<Length>,
    max: Option<Length>,
    available: f32,
) -> f32 {
    let mut clamped = value;
    if let Some(max) = max {
        clamped = clamped.min(max.resolve(available));
    }
    if let Some(min) = min {
        clamped = clamped.max(min.resolve(available));
    }
    clamped.max(0.0)
}

/// Padding declaration: one value for every edge, or individual edges.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    Uniform(f32),
    Edges(EdgeSpacing),
}

/// Per-edge padding; unspecified edges are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpacing {
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub right: Option<f32>,
    #[serde(default)]
    pub bottom: Option<f32>,
    #[serde(default)]
    pub left: Option<f32>,
}

/// Expands a spacing declaration into four edge values.
///
/// ```
/// # use placard_core::length::{EdgeSpacing, Spacing, expand_spacing};
/// # use placard_core::geometry::Insets;
/// assert_eq!(expand_spacing(Some(&Spacing::Uniform(10.0))), Insets::uniform(10.0));
///
/// let partial = Spacing::Edges(EdgeSpacing {
///     top: Some(5.0),
///     left: Some(10.0),
///     ..Default::default()
/// });
/// assert_eq!(expand_spacing(Some(&partial)), Insets::new(5.0, 0.0, 0.0, 10.0));
/// assert_eq!(expand_spacing(None), Insets::default());
/// ```
pub fn expand_spacing(value: Option<&Spacing>) -> Insets {
    match value {
        None => Insets::default(),
        Some(Spacing::Uniform(all)) => Insets::uniform(*all),
        Some(Spacing::Edges(edges)) => Insets::new(
            edges.top.unwrap_or(0.0),
            edges.right.unwrap_or(0.0),
            edges.bottom.unwrap_or(0.0),
            edges.left.unwrap_or(0.0),
        ),
    }
}

/// Available space passed from a parent to a child during relative layout.
///
/// Constraints are never mutated; [`Constraints::shrink`] produces the
/// narrower constraints a container hands to its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    width: f32,
    height: f32,
}

impl Constraints {
    /// Creates constraints, clamping negative space to zero.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns constraints reduced by `insets`, never below zero.
    pub fn shrink(self, insets: Insets) -> Self {
        Self::new(
            self.width - insets.horizontal_sum(),
            self.height - insets.vertical_sum(),
        )
    }
}

impl From<Size> for Constraints {
    fn from(size: Size) -> Self {
        Self::new(size.width(), size.height())
    }
}

/// A node's resolved outer box and the content box inside its padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBox {
    pub padding: Insets,
    pub content_width: f32,
    pub content_height: f32,
    pub outer_width: f32,
    pub outer_height: f32,
}

impl ContentBox {
    /// The constraints this node's children are laid out against.
    pub fn child_constraints(&self) -> Constraints {
        Constraints::new(self.content_width, self.content_height)
    }
}

/// Resolves a node's own width/height against `constraints` and subtracts
/// its padding to obtain the content box.
pub fn content_box(style: &Style, constraints: Constraints) -> ContentBox {
    let padding = expand_spacing(style.padding.as_ref());
    let outer_width = resolve_length(style.width, constraints.width());
    let outer_height = resolve_length(style.height, constraints.height());
    ContentBox {
        padding,
        content_width: (outer_width - padding.horizontal_sum()).max(0.0),
        content_height: (outer_height - padding.vertical_sum()).max(0.0),
        outer_width,
        outer_height,
    }
}
