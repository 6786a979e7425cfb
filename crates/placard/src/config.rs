//! Configuration types for Placard layout.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only needs to name the values it changes.
//!
//! # Overview
//!
//! - [`EngineConfig`] - Top-level configuration combining the sections below.
//! - [`TextConfig`] - Measurement strategy, line height and width slack.
//! - [`ImageConfig`] - Placeholder size for images without known dimensions.
//! - [`DiagramDefaults`] - Default geometry for every composite diagram kind.
//!
//! # Example
//!
//! ```
//! # use placard::config::EngineConfig;
//! # use placard_core::text::MeasureMode;
//! let config = EngineConfig::from_toml_str(r#"
//!     [text]
//!     measure_mode = "heuristic"
//!
//!     [diagram]
//!     tree_level_gap = 80
//! "#).unwrap();
//!
//! assert_eq!(config.text().measure_mode(), MeasureMode::Heuristic);
//! assert_eq!(config.diagram().tree_level_gap, 80.0);
//! assert_eq!(config.diagram().tree_sibling_gap, 20.0);
//! ```

use std::{fs, path::Path};

use log::info;
use serde::Deserialize;

use placard_core::{
    geometry::Size,
    text::{DEFAULT_LINE_HEIGHT, DEFAULT_SLACK, MeasureMode},
};

use crate::PlacardError;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    text: TextConfig,

    #[serde(default)]
    images: ImageConfig,

    #[serde(default)]
    diagram: DiagramDefaults,
}

impl EngineConfig {
    pub fn new(text: TextConfig, images: ImageConfig, diagram: DiagramDefaults) -> Self {
        Self {
            text,
            images,
            diagram,
        }
    }

    /// Parses a configuration from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`PlacardError::Config`] when the TOML is malformed or a value
    /// has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self, PlacardError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlacardError::Io`] when the file cannot be read and
    /// [`PlacardError::Config`] when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlacardError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading engine configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn text(&self) -> &TextConfig {
        &self.text
    }

    pub fn images(&self) -> &ImageConfig {
        &self.images
    }

    pub fn diagram(&self) -> &DiagramDefaults {
        &self.diagram
    }

    /// Returns a copy using `mode` for text measurement.
    pub fn with_measure_mode(mut self, mode: MeasureMode) -> Self {
        self.text.measure_mode = mode;
        self
    }
}

/// Text measurement settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    measure_mode: MeasureMode,
    line_height: f32,
    slack: f32,
    font_family: String,
}

impl TextConfig {
    pub fn measure_mode(&self) -> MeasureMode {
        self.measure_mode
    }

    /// Line-height multiplier for text blocks that do not set their own.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Pixels added to every measured width.
    pub fn slack(&self) -> f32 {
        self.slack
    }

    /// Family used to load precise glyph metrics.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            measure_mode: MeasureMode::default(),
            line_height: DEFAULT_LINE_HEIGHT,
            slack: DEFAULT_SLACK,
            font_family: "sans-serif".to_string(),
        }
    }
}

/// Image measurement settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    placeholder_width: f32,
    placeholder_height: f32,
}

impl ImageConfig {
    /// Size used for images whose dimensions were never prefetched.
    pub fn placeholder(&self) -> Size {
        Size::new(self.placeholder_width, self.placeholder_height)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            placeholder_width: 100.0,
            placeholder_height: 100.0,
        }
    }
}

/// Default geometry for composite diagram kinds, used when the diagram node
/// does not set a value itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiagramDefaults {
    pub tree_node_width: f32,
    pub tree_node_height: f32,
    pub tree_level_gap: f32,
    pub tree_sibling_gap: f32,
    pub flow_node_width: f32,
    pub flow_node_height: f32,
    pub flow_gap: f32,
    pub process_item_width: f32,
    pub process_item_height: f32,
    pub process_gap: f32,
    pub timeline_node_radius: f32,
    pub matrix_point_radius: f32,
    pub chart_width: f32,
    pub chart_height: f32,
    pub table_column_width: f32,
    pub table_row_height: f32,
}

impl Default for DiagramDefaults {
    fn default() -> Self {
        Self {
            tree_node_width: 120.0,
            tree_node_height: 40.0,
            tree_level_gap: 60.0,
            tree_sibling_gap: 20.0,
            flow_node_width: 150.0,
            flow_node_height: 60.0,
            flow_gap: 40.0,
            process_item_width: 150.0,
            process_item_height: 60.0,
            process_gap: -15.0,
            timeline_node_radius: 8.0,
            matrix_point_radius: 6.0,
            chart_width: 400.0,
            chart_height: 300.0,
            table_column_width: 100.0,
            table_row_height: 32.0,
        }
    }
}
