//! Long-lived state shared by layout passes.

use std::fmt;

use placard_core::text::{CosmicFontProvider, FontCache, FontProvider, TextMeasurer};

use crate::{config::EngineConfig, images::ImageCache};

/// Configuration plus the measurement caches that outlive a single render.
///
/// Glyph metrics are loaded once per weight and image dimensions are stored
/// once per source, so one context is typically created per process or per
/// session and shared between renders behind an `Arc`. Renders never mutate
/// anything else in the context, which makes it safe to lay out unrelated
/// node trees in parallel.
pub struct LayoutContext {
    config: EngineConfig,
    fonts: FontCache,
    images: ImageCache,
}

impl LayoutContext {
    /// Creates a context whose precise metrics come from the system fonts of
    /// the configured family.
    pub fn new(config: EngineConfig) -> Self {
        let provider = CosmicFontProvider::new(config.text().font_family());
        Self::with_font_provider(config, provider)
    }

    /// Creates a context with a custom glyph-metrics source.
    pub fn with_font_provider(config: EngineConfig, provider: impl FontProvider + 'static) -> Self {
        Self {
            config,
            fonts: FontCache::new(provider),
            images: ImageCache::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// A text measurer using the configured mode and slack.
    pub fn measurer(&self) -> TextMeasurer<'_> {
        let text = self.config.text();
        TextMeasurer::new(&self.fonts, text.measure_mode()).with_slack(text.slack())
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl fmt::Debug for LayoutContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("config", &self.config)
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}
