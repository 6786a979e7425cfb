//! Text wrapping and measurement.
//!
//! Text blocks are wrapped greedily against a maximum width and measured
//! with one of two width strategies:
//!
//! - **precise**: advance widths come from a [`GlyphMetrics`] handle loaded
//!   through a [`FontProvider`]. The default provider is backed by
//!   cosmic-text and the system font database.
//! - **heuristic**: every CJK character is `1.0 × font size` wide and every
//!   other character `0.5 × font size`.
//!
//! Glyph-metrics handles are loaded once per [`FontWeight`] and memoized in a
//! [`FontCache`]. When no handle can be loaded, measurement silently degrades
//! to the heuristic strategy; a render never fails because of fonts.
//!
//! # Quick Start
//!
//! ```
//! # use placard_core::text::{FontCache, MeasureMode, TextMeasurer, TextStyle};
//! let fonts = FontCache::default();
//! let measurer = TextMeasurer::new(&fonts, MeasureMode::Heuristic);
//!
//! let size = measurer.measure("Hello", &TextStyle::new(24.0), None);
//! assert_eq!(size.width(), 5.0 * 24.0 * 0.5 + 10.0);
//! assert_eq!(size.line_count(), 1);
//! ```

use std::{
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Weight};
use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::geometry::Size;

/// Line-height multiplier applied when a text block does not set one.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.3;

/// Width added to every measurement to absorb rounding differences between
/// the measuring and the drawing font stack.
pub const DEFAULT_SLACK: f32 = 10.0;

const CJK_CHAR_EM: f32 = 1.0;
const LATIN_CHAR_EM: f32 = 0.5;

/// Font weights for which glyph metrics are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Selects the width-measurement strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureMode {
    Precise,
    Heuristic,
    #[default]
    Auto,
}

impl MeasureMode {
    /// Resolves [`MeasureMode::Auto`] to a concrete strategy.
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto => Self::Precise,
            mode => mode,
        }
    }
}

/// Font attributes used to measure a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    font_size: f32,
    weight: FontWeight,
    line_height: f32,
}

impl TextStyle {
    /// Creates a normal-weight style with the default line height.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            weight: FontWeight::Normal,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the line-height multiplier.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Height of a single line in pixels.
    pub fn line_height_px(&self) -> f32 {
        self.font_size * self.line_height
    }
}

/// Error raised when glyph metrics for a weight cannot be loaded.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("no font faces available for family `{family}`")]
    NoFaces { family: String },

    #[error("font source unavailable: {0}")]
    Unavailable(String),
}

/// Advance-width lookup for one font weight.
pub trait GlyphMetrics: Send + Sync {
    /// Returns the advance width of `text` at `font_size` pixels.
    fn advance_width(&self, text: &str, font_size: f32) -> f32;
}

/// Loads [`GlyphMetrics`] handles. Callers memoize the result per weight.
pub trait FontProvider: Send + Sync {
    fn load_font(&self, weight: FontWeight) -> Result<Arc<dyn GlyphMetrics>, FontError>;
}

/// Estimates widths from character classes alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMetrics;

impl GlyphMetrics for HeuristicMetrics {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars()
            .map(|ch| {
                if is_cjk(ch) {
                    CJK_CHAR_EM * font_size
                } else {
                    LATIN_CHAR_EM * font_size
                }
            })
            .sum()
    }
}

/// Loads glyph metrics from the system font database through cosmic-text.
///
/// The font database is scanned once, on the first load, and shared by the
/// handles of every weight.
pub struct CosmicFontProvider {
    family: String,
    font_system: OnceLock<Arc<Mutex<FontSystem>>>,
}

impl CosmicFontProvider {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            font_system: OnceLock::new(),
        }
    }

    fn font_system(&self) -> Arc<Mutex<FontSystem>> {
        Arc::clone(self.font_system.get_or_init(|| {
            info!("Initializing FontSystem");
            Arc::new(Mutex::new(FontSystem::new()))
        }))
    }
}

impl Default for CosmicFontProvider {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl fmt::Debug for CosmicFontProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmicFontProvider")
            .field("family", &self.family)
            .field("loaded", &self.font_system.get().is_some())
            .finish()
    }
}

impl FontProvider for CosmicFontProvider {
    fn load_font(&self, weight: FontWeight) -> Result<Arc<dyn GlyphMetrics>, FontError> {
        let font_system = self.font_system();
        let face_count = font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .db()
            .faces()
            .count();
        if face_count == 0 {
            return Err(FontError::NoFaces {
                family: self.family.clone(),
            });
        }

        debug!(
            family = self.family.as_str(),
            weight:?,
            face_count = face_count;
            "Loaded glyph metrics"
        );
        Ok(Arc::new(CosmicGlyphMetrics {
            font_system,
            family: self.family.clone(),
            weight,
        }))
    }
}

/// Glyph metrics for one weight, shaped with cosmic-text.
struct CosmicGlyphMetrics {
    font_system: Arc<Mutex<FontSystem>>,
    family: String,
    weight: FontWeight,
}

impl GlyphMetrics for CosmicGlyphMetrics {
    fn advance_width(&self, text: &str, font_size: f32) -> f32 {
        if text.is_empty() {
            return 0.0;
        }

        let mut font_system = self
            .font_system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let metrics = Metrics::new(font_size, font_size * DEFAULT_LINE_HEIGHT);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let weight = match self.weight {
            FontWeight::Normal => Weight::NORMAL,
            FontWeight::Bold => Weight::BOLD,
        };
        let attrs = Attrs::new().family(Family::Name(&self.family)).weight(weight);

        // Unbounded width: the caller decides where lines break.
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        buffer
            .layout_runs()
            .filter_map(|run| run.glyphs.last().map(|last| last.x + last.w))
            .fold(0.0, f32::max)
    }
}

/// Per-weight memoized glyph metrics.
///
/// Each weight is loaded at most once; concurrent first uses block on the same
/// initialization and observe the same handle. A failed load is remembered so
/// the provider is not retried on every measurement.
pub struct FontCache {
    provider: Box<dyn FontProvider>,
    normal: OnceLock<Option<Arc<dyn GlyphMetrics>>>,
    bold: OnceLock<Option<Arc<dyn GlyphMetrics>>>,
}

impl FontCache {
    pub fn new(provider: impl FontProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
            normal: OnceLock::new(),
            bold: OnceLock::new(),
        }
    }

    /// Returns the glyph metrics for `weight`, or `None` when they could not
    /// be loaded.
    pub fn metrics(&self, weight: FontWeight) -> Option<Arc<dyn GlyphMetrics>> {
        let slot = match weight {
            FontWeight::Normal => &self.normal,
            FontWeight::Bold => &self.bold,
        };
        slot.get_or_init(|| match self.provider.load_font(weight) {
            Ok(metrics) => Some(metrics),
            Err(err) => {
                warn!(
                    weight:?,
                    error = err.to_string();
                    "Glyph metrics unavailable, falling back to heuristic widths"
                );
                None
            }
        })
        .clone()
    }
}

impl Default for FontCache {
    fn default() -> Self {
        Self::new(CosmicFontProvider::default())
    }
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("normal_loaded", &self.normal.get().is_some())
            .field("bold_loaded", &self.bold.get().is_some())
            .finish()
    }
}

/// The wrapped lines and bounding size of a measured text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMeasurement {
    lines: Vec<String>,
    width: f32,
    height: f32,
}

impl TextMeasurement {
    /// Width of the widest line plus slack.
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Measures text blocks with a chosen strategy.
#[derive(Debug, Clone, Copy)]
pub struct TextMeasurer<'a> {
    fonts: &'a FontCache,
    mode: MeasureMode,
    slack: f32,
}

impl<'a> TextMeasurer<'a> {
    pub fn new(fonts: &'a FontCache, mode: MeasureMode) -> Self {
        Self {
            fonts,
            mode,
            slack: DEFAULT_SLACK,
        }
    }

    pub fn with_slack(mut self, slack: f32) -> Self {
        self.slack = slack;
        self
    }

    /// Wraps `text` to `max_width` (unbounded when `None`) and measures it.
    ///
    /// The height is `line count × font size × line height`; the width is the
    /// widest wrapped line plus the slack margin.
    pub fn measure(
        &self,
        text: &str,
        style: &TextStyle,
        max_width: Option<f32>,
    ) -> TextMeasurement {
        let metrics = self.metrics_for(style.weight());
        let measure = |candidate: &str| metrics.advance_width(candidate, style.font_size());

        let lines = wrap_text(text, max_width, &measure);
        let widest = lines.iter().map(|line| line.width).fold(0.0, f32::max);

        TextMeasurement {
            width: widest + self.slack,
            height: lines.len() as f32 * style.line_height_px(),
            lines: lines.into_iter().map(|line| line.text).collect(),
        }
    }

    fn metrics_for(&self, weight: FontWeight) -> Arc<dyn GlyphMetrics> {
        match self.mode.resolve() {
            MeasureMode::Heuristic => Arc::new(HeuristicMetrics),
            _ => self
                .fonts
                .metrics(weight)
                .unwrap_or_else(|| Arc::new(HeuristicMetrics)),
        }
    }
}

/// A wrapped line and its measured width (without slack).
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    pub width: f32,
}

/// Splits `text` into paragraphs on `\n` and greedily wraps each one.
///
/// Every paragraph yields at least one line; an empty paragraph yields a
/// zero-width line. A token wider than `max_width` on its own is accepted on
/// an empty line.
pub fn wrap_text(
    text: &str,
    max_width: Option<f32>,
    measure: &dyn Fn(&str) -> f32,
) -> Vec<WrappedLine> {
    text.split('\n')
        .flat_map(|paragraph| wrap_paragraph(paragraph, max_width, measure))
        .collect()
}

fn wrap_paragraph(
    paragraph: &str,
    max_width: Option<f32>,
    measure: &dyn Fn(&str) -> f32,
) -> Vec<WrappedLine> {
    let finish = |line: &str| {
        let text = line.trim_end().to_string();
        let width = measure(&text);
        WrappedLine { text, width }
    };

    let Some(max_width) = max_width else {
        return vec![finish(paragraph)];
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    for token in tokenize(paragraph) {
        let candidate = format!("{current}{token}");
        if current.is_empty() || measure(candidate.trim_end()) <= max_width {
            current = candidate;
        } else {
            lines.push(finish(&current));
            current = token.trim_start().to_string();
        }
    }
    lines.push(finish(&current));
    lines
}

/// Splits a paragraph into wrap units: single characters for CJK text,
/// "word plus trailing whitespace" otherwise.
fn tokenize(paragraph: &str) -> Vec<&str> {
    if paragraph.chars().any(is_cjk) {
        return paragraph
            .char_indices()
            .map(|(idx, ch)| &paragraph[idx..idx + ch.len_utf8()])
            .collect();
    }

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = false;
    for (idx, ch) in paragraph.char_indices() {
        if ch.is_whitespace() {
            in_whitespace = true;
        } else if in_whitespace {
            tokens.push(&paragraph[start..idx]);
            start = idx;
            in_whitespace = false;
        }
    }
    if start < paragraph.len() {
        tokens.push(&paragraph[start..]);
    }
    tokens
}

/// Returns `true` for Han, Hiragana, Katakana, CJK symbol and fullwidth-form
/// codepoints.
pub fn is_cjk(ch: char) -> bool {
    matches!(
        ch as u32,
        0x3000..=0x303F     // CJK symbols and punctuation
        | 0x3040..=0x309F   // Hiragana
        | 0x30A0..=0x30FF   // Katakana
        | 0x31F0..=0x31FF   // Katakana phonetic extensions
        | 0x3400..=0x4DBF   // Han extension A
        | 0x4E00..=0x9FFF   // Han
        | 0xF900..=0xFAFF   // Han compatibility
        | 0xFF00..=0xFFEF   // Halfwidth and fullwidth forms
        | 0x20000..=0x2A6DF // Han extension B
    )
}
