//! Library error type
//!
//! One enum for every failure the crate can produce, so hosts can match
//! on the kind without inspecting message strings.

use thiserror::Error;

/// Failure kinds surfaced by the factory and rendering entry points
#[derive(Debug, Error)]
pub enum FontError {
    /// Font byte stream failed to parse (corrupt or truncated font)
    #[error("invalid font data: {0}")]
    InvalidFontData(String),

    /// Recognized container but unsupported glyph/table format,
    /// or an unrecognized file type in the generic dispatch path
    #[error("unsupported font format: {0}")]
    UnsupportedFormat(String),

    /// Caller-supplied inputs are inconsistent with each other
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested glyph absent from the source's repertoire
    #[error("no glyph for codepoint U+{0:04X}")]
    GlyphNotFound(u32),

    /// Default-font path requested but no font configured and none
    /// found on the system
    #[error("no default font available: {0}")]
    NoDefaultFont(String),
}

pub type Result<T> = std::result::Result<T, FontError>;
