//! Placard - A layout and geometry engine for presentation slides.
//!
//! Turns a declarative tree of visual nodes (text, images, stacks, tables and
//! structured diagrams) into absolutely positioned geometry ready to be drawn
//! on a fixed-size canvas.
//!
//! The pipeline runs in four stages:
//!
//! 1. **Prefetch** ([`images`]) - image dimensions are fetched concurrently
//!    into the context's cache. This is the only asynchronous stage.
//! 2. **Relative layout** ([`layout`]) - every node is sized under the
//!    constraints of its parent and positioned relative to it.
//! 3. **Absolutize** ([`absolute`]) - relative positions are accumulated into
//!    canvas coordinates.
//! 4. **Route** ([`diagram`]) - composite diagram nodes are expanded into
//!    positioned elements and connector segments.

pub mod absolute;
pub mod config;
pub mod context;
pub mod diagram;
pub mod images;
pub mod layout;
pub mod sizing;

mod error;

pub use placard_core::{color, geometry, length, node, text};

pub use error::PlacardError;

use std::sync::Arc;

use log::info;

use absolute::{AbsoluteBox, absolutize};
use config::EngineConfig;
use context::LayoutContext;
use diagram::{DiagramLayout, route_diagrams};
use geometry::{Point, Size};
use images::{ImageFetcher, PrefetchReport, prefetch_images};
use layout::{LayoutEngine, RelativeBox};
use node::Node;

/// Entry point for laying out slides.
///
/// The renderer holds a shared [`LayoutContext`]; cloning it is cheap and
/// every clone sees the same glyph-metrics and image caches.
///
/// # Examples
///
/// ```rust
/// use placard::{SlideRenderer, geometry::Size, node::Node};
///
/// let slide = Node::vstack(vec![Node::text("Quarterly review"), Node::text("Agenda")]);
///
/// let renderer = SlideRenderer::default();
/// let rendered = renderer
///     .render(&slide, Size::new(960.0, 540.0))
///     .expect("engine-produced boxes always absolutize");
///
/// assert_eq!(rendered.root().children().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SlideRenderer {
    context: Arc<LayoutContext>,
}

impl SlideRenderer {
    /// Creates a renderer with a fresh context built from `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self::with_context(Arc::new(LayoutContext::new(config)))
    }

    /// Creates a renderer over an existing, possibly shared, context.
    pub fn with_context(context: Arc<LayoutContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &Arc<LayoutContext> {
        &self.context
    }

    /// Fetches the dimensions of every image in `root` that is not cached yet.
    ///
    /// Must complete before [`render`](Self::render) for the images to be
    /// measured; uncached images fall back to the configured placeholder.
    pub async fn prefetch<F: ImageFetcher>(&self, root: &Node, fetcher: &F) -> PrefetchReport {
        prefetch_images(root, fetcher, self.context.images()).await
    }

    /// Runs the relative layout pass only.
    pub fn layout<'a>(&self, root: &'a Node, canvas: Size) -> RelativeBox<'a> {
        LayoutEngine::new(&self.context).layout(root, canvas)
    }

    /// Lays out `root` on a canvas of the given size, anchored at the
    /// canvas origin, and routes every diagram in it.
    ///
    /// # Errors
    ///
    /// Returns [`PlacardError::ForeignBox`] if absolutization meets a box the
    /// engine did not produce. With a tree coming straight from the layout
    /// pass this does not happen.
    pub fn render<'a>(
        &self,
        root: &'a Node,
        canvas: Size,
    ) -> Result<RenderedSlide<'a>, PlacardError> {
        info!(
            kind = root.kind().name(),
            width = canvas.width(),
            height = canvas.height();
            "Rendering slide"
        );

        let relative = self.layout(root, canvas);
        let absolute = absolutize(relative, Point::default())?;
        let diagrams = route_diagrams(&absolute, self.context.config().diagram());

        info!(diagrams = diagrams.len(); "Slide rendered");
        Ok(RenderedSlide {
            root: absolute,
            diagrams,
        })
    }

    /// Prefetches the images of `root`, then renders it.
    ///
    /// # Errors
    ///
    /// See [`render`](Self::render). Failed image fetches are not errors;
    /// they are listed in the returned report.
    pub async fn render_with_images<'a, F: ImageFetcher>(
        &self,
        root: &'a Node,
        canvas: Size,
        fetcher: &F,
    ) -> Result<(RenderedSlide<'a>, PrefetchReport), PlacardError> {
        let report = self.prefetch(root, fetcher).await;
        let rendered = self.render(root, canvas)?;
        Ok((rendered, report))
    }
}

/// A fully positioned slide: the absolute box tree plus the routed geometry
/// of every diagram node, in document order.
#[derive(Debug, Clone)]
pub struct RenderedSlide<'a> {
    root: AbsoluteBox<'a>,
    diagrams: Vec<DiagramLayout<'a>>,
}

impl<'a> RenderedSlide<'a> {
    pub fn root(&self) -> &AbsoluteBox<'a> {
        &self.root
    }

    pub fn diagrams(&self) -> &[DiagramLayout<'a>] {
        &self.diagrams
    }

    /// Every positioned box in pre-order.
    pub fn boxes(&self) -> impl Iterator<Item = &AbsoluteBox<'a>> {
        self.root.iter()
    }
}
