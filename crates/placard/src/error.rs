//! Error types for Placard operations.
//!
//! This module provides the main error type [`PlacardError`]. Measurement
//! problems (fonts, images) and malformed diagram data never surface here:
//! they degrade locally to documented fallbacks. What remains are failures
//! loading configuration and violations of the layout pass contract.

use std::io;

use thiserror::Error;

/// The main error type for Placard operations.
#[derive(Debug, Error)]
pub enum PlacardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// A box tree handed to the absolutizer was not produced by the engine's
    /// relative layout pass.
    #[error("Layout contract violated: {kind} box at ({x}, {y}) did not come from relative layout")]
    ForeignBox {
        kind: &'static str,
        x: f32,
        y: f32,
    },
}
