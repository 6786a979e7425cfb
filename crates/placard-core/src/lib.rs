//! Placard Core Types and Definitions
//!
//! This crate provides the foundational types used by the Placard slide
//! layout engine. It includes:
//!
//! - **Geometry**: Points, sizes, bounds and insets ([`geometry`] module)
//! - **Colors**: CSS color handling for opaque node styling ([`color::Color`])
//! - **Lengths**: Declarative lengths, spacing and the box-model resolver ([`length`] module)
//! - **Nodes**: The declarative node tree consumed by the layout engine ([`node`] module)
//! - **Text**: Text wrapping and measurement with pluggable glyph metrics ([`text`] module)

pub mod color;
pub mod geometry;
pub mod length;
pub mod node;
pub mod text;
