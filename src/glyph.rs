//! Rendered glyph values
//!
//! A `GlyphData` is a standalone value: one glyph's pixel buffer plus its
//! layout metrics. It stays valid after the producing `Rasterizer` is
//! dropped.

/// Channel layout of a glyph's pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit coverage, one byte per pixel (TrueType outlines)
    Alpha,
    /// 8-bit RGBA, four bytes per pixel (BMFont pages, image strips)
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha => 1,
            Self::Rgba8 => 4,
        }
    }
}

/// Layout metrics for one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Horizontal advance to the next glyph's pen position
    pub advance: f32,
    /// Offset from the pen position to the bitmap's left edge
    pub bearing_x: i32,
    /// Offset from the baseline up to the bitmap's top edge
    pub bearing_y: i32,
    /// Bitmap width (pixels)
    pub width: u32,
    /// Bitmap height (pixels)
    pub height: u32,
}

/// One rendered glyph: pixel buffer + metrics
///
/// Immutable once constructed; equality is whole-value (same metrics,
/// same format, same bytes).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphData {
    metrics: GlyphMetrics,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl GlyphData {
    pub(crate) fn new(metrics: GlyphMetrics, format: PixelFormat, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            metrics.width as usize * metrics.height as usize * format.bytes_per_pixel()
        );
        Self {
            metrics,
            format,
            pixels,
        }
    }

    /// Layout metrics
    pub fn metrics(&self) -> GlyphMetrics {
        self.metrics
    }

    /// Channel layout of `pixels()`
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Pixel bytes, row-major; length is `width * height * bytes_per_pixel`
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bitmap width (pixels)
    pub fn width(&self) -> u32 {
        self.metrics.width
    }

    /// Bitmap height (pixels)
    pub fn height(&self) -> u32 {
        self.metrics.height
    }

    /// Horizontal advance to the next glyph
    pub fn advance(&self) -> f32 {
        self.metrics.advance
    }

    /// Offset from the pen position to the bitmap's left edge
    pub fn bearing_x(&self) -> i32 {
        self.metrics.bearing_x
    }

    /// Offset from the baseline up to the bitmap's top edge
    pub fn bearing_y(&self) -> i32 {
        self.metrics.bearing_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(PixelFormat::Alpha.bytes_per_pixel(), 1);
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
    }

    #[test]
    fn test_glyph_data_accessors() {
        let metrics = GlyphMetrics {
            advance: 8.0,
            bearing_x: 1,
            bearing_y: 6,
            width: 2,
            height: 3,
        };
        let data = GlyphData::new(metrics, PixelFormat::Alpha, vec![0u8; 6]);
        assert_eq!(data.width(), 2);
        assert_eq!(data.height(), 3);
        assert_eq!(data.advance(), 8.0);
        assert_eq!(data.bearing_x(), 1);
        assert_eq!(data.bearing_y(), 6);
        assert_eq!(data.pixels().len(), 6);
    }
}
