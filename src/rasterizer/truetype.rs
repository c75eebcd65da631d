//! TrueType glyph source
//!
//! Outline fonts (TTF/OTF/TTC) rasterized with fontdue at a point size
//! fixed at construction. Output is 8-bit alpha coverage.

use fontdue::{Font, FontSettings};
use log::debug;

use crate::error::{FontError, Result};
use crate::glyph::{GlyphData, GlyphMetrics, PixelFormat};
use crate::rasterizer::GlyphSource;

/// Minimum accepted point size
pub const MIN_POINT_SIZE: f32 = 1.0;

/// Maximum accepted point size
pub const MAX_POINT_SIZE: f32 = 4096.0;

/// Outline font source backed by fontdue
pub struct TrueTypeSource {
    font: Font,
    size: f32,
    ascent: f32,
    descent: f32,
    line_height: f32,
}

impl TrueTypeSource {
    /// Parse font bytes and fix the rasterization size
    ///
    /// Takes ownership of `data`; on failure it is dropped before the
    /// error returns.
    pub fn new(data: Vec<u8>, size: f32) -> Result<Self> {
        if !size.is_finite() || !(MIN_POINT_SIZE..=MAX_POINT_SIZE).contains(&size) {
            return Err(FontError::InvalidArgument(format!(
                "point size {} outside {}..={}",
                size, MIN_POINT_SIZE, MAX_POINT_SIZE
            )));
        }

        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| FontError::InvalidFontData(e.to_string()))?;

        let metrics = font
            .horizontal_line_metrics(size)
            .ok_or_else(|| FontError::UnsupportedFormat("font has no horizontal metrics".into()))?;

        debug!(
            "TrueType font loaded: {} mapped chars, size {:.1}",
            font.chars().len(),
            size
        );

        Ok(Self {
            ascent: metrics.ascent,
            descent: metrics.descent,
            line_height: metrics.new_line_size,
            font,
            size,
        })
    }

    /// Probe whether bytes start with a known TrueType/OpenType magic
    pub fn accepts(data: &[u8]) -> bool {
        matches!(
            data.get(..4),
            Some(b"\x00\x01\x00\x00" | b"OTTO" | b"true" | b"ttcf")
        )
    }

    /// The point size glyphs are rasterized at
    pub fn size(&self) -> f32 {
        self.size
    }
}

impl GlyphSource for TrueTypeSource {
    fn glyph_count(&self) -> u32 {
        // Encoded character-map size, not the raw glyf table count
        self.font.chars().len() as u32
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.font.lookup_glyph_index(ch) != 0
    }

    fn render_glyph(&self, ch: char) -> Result<GlyphData> {
        let index = self.font.lookup_glyph_index(ch);
        if index == 0 {
            // No placeholder substitution: absent codepoints fail
            return Err(FontError::GlyphNotFound(ch as u32));
        }

        let (m, bitmap) = self.font.rasterize_indexed(index, self.size);

        let metrics = GlyphMetrics {
            advance: m.advance_width,
            bearing_x: m.xmin,
            bearing_y: m.ymin + m.height as i32,
            width: m.width as u32,
            height: m.height as u32,
        };
        Ok(GlyphData::new(metrics, PixelFormat::Alpha, bitmap))
    }

    fn kerning(&self, left: char, right: char) -> f32 {
        self.font
            .horizontal_kern(left, right, self.size)
            .unwrap_or(0.0)
    }
}
