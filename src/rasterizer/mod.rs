//! Rasterizer core
//!
//! A `Rasterizer` wraps one `GlyphSource` and renders glyphs on demand.
//! No caching happens at this layer: callers that render the same glyph
//! repeatedly keep their own cache.

pub mod bmfont;
pub mod image;
pub mod truetype;

use crate::error::{FontError, Result};
use crate::glyph::GlyphData;

/// Capability over one font representation
///
/// Implementations own their backing data (font bytes or image pixels)
/// and are immutable after construction.
pub trait GlyphSource: Send {
    /// Total distinct glyphs available
    fn glyph_count(&self) -> u32;

    /// Vertical advance between baselines (pixels)
    fn line_height(&self) -> f32;

    /// Distance from the baseline up to the top of the tallest glyph
    fn ascent(&self) -> f32;

    /// Distance from the baseline down to the lowest glyph (<= 0)
    fn descent(&self) -> f32;

    /// Whether the source carries a glyph for `ch`
    fn has_glyph(&self, ch: char) -> bool;

    /// Rasterize one glyph
    ///
    /// Fails with `GlyphNotFound` for characters outside the source's
    /// repertoire; a failed render leaves the source fully usable.
    fn render_glyph(&self, ch: char) -> Result<GlyphData>;

    /// Kerning adjustment between two adjacent glyphs (pixels)
    fn kerning(&self, _left: char, _right: char) -> f32 {
        0.0
    }
}

/// On-demand glyph renderer over exactly one source
pub struct Rasterizer {
    source: Box<dyn GlyphSource>,
}

impl Rasterizer {
    pub(crate) fn new(source: Box<dyn GlyphSource>) -> Self {
        Self { source }
    }

    /// Total distinct glyphs available in the source
    pub fn glyph_count(&self) -> u32 {
        self.source.glyph_count()
    }

    /// Vertical advance between baselines (pixels)
    pub fn line_height(&self) -> f32 {
        self.source.line_height()
    }

    /// Distance from the baseline up to the top of the tallest glyph
    pub fn ascent(&self) -> f32 {
        self.source.ascent()
    }

    /// Distance from the baseline down to the lowest glyph (<= 0)
    pub fn descent(&self) -> f32 {
        self.source.descent()
    }

    /// Whether the source carries a glyph for `ch`
    pub fn has_glyph(&self, ch: char) -> bool {
        self.source.has_glyph(ch)
    }

    /// Whether the source carries glyphs for every character in `text`
    pub fn has_glyphs(&self, text: &str) -> bool {
        text.chars().all(|ch| self.source.has_glyph(ch))
    }

    /// Kerning adjustment between two adjacent glyphs (pixels, 0 when none)
    pub fn kerning(&self, left: char, right: char) -> f32 {
        self.source.kerning(left, right)
    }

    /// Render the glyph for one character
    pub fn glyph_data(&self, ch: char) -> Result<GlyphData> {
        self.source.render_glyph(ch)
    }

    /// Render by raw codepoint
    ///
    /// Resolves to the same glyph as the `char` form for the same
    /// character. A value that is not a Unicode scalar fails with
    /// `GlyphNotFound`.
    pub fn glyph_data_for_codepoint(&self, codepoint: u32) -> Result<GlyphData> {
        let ch = char::from_u32(codepoint).ok_or(FontError::GlyphNotFound(codepoint))?;
        self.source.render_glyph(ch)
    }
}
