//! Image-strip glyph source
//!
//! A single image sliced into equal-width cells, mapped in order to a
//! caller-supplied character sequence. Cell width is image width divided
//! by the character count; a non-divisible width is a construction error.

use std::collections::HashMap;

use log::debug;

use crate::error::{FontError, Result};
use crate::glyph::{GlyphData, GlyphMetrics, PixelFormat};
use crate::image_data::ImageData;
use crate::rasterizer::GlyphSource;

/// Fixed-cell image font source
pub struct ImageSource {
    image: ImageData,
    cell_width: u32,
    /// Character sequence length, kept separately because duplicate
    /// characters collapse in the cell map (last occurrence wins)
    glyph_count: u32,
    cells: HashMap<char, u32>,
}

impl ImageSource {
    /// Slice `image` into one cell per character of `glyphs`
    pub fn new(image: ImageData, glyphs: &str) -> Result<Self> {
        let count = glyphs.chars().count() as u32;
        if count == 0 {
            return Err(FontError::InvalidArgument(
                "empty glyph character sequence".into(),
            ));
        }
        if image.width() % count != 0 {
            return Err(FontError::InvalidArgument(format!(
                "image width {} is not divisible by glyph count {}",
                image.width(),
                count
            )));
        }

        let cell_width = image.width() / count;
        let mut cells = HashMap::new();
        for (i, ch) in glyphs.chars().enumerate() {
            cells.insert(ch, i as u32);
        }

        debug!(
            "Image font: {} cells of {}x{}",
            count,
            cell_width,
            image.height()
        );

        Ok(Self {
            image,
            cell_width,
            glyph_count: count,
            cells,
        })
    }
}

impl GlyphSource for ImageSource {
    fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    fn line_height(&self) -> f32 {
        self.image.height() as f32
    }

    // The baseline sits at the bottom edge of the strip
    fn ascent(&self) -> f32 {
        self.image.height() as f32
    }

    fn descent(&self) -> f32 {
        0.0
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.cells.contains_key(&ch)
    }

    fn render_glyph(&self, ch: char) -> Result<GlyphData> {
        let cell = *self
            .cells
            .get(&ch)
            .ok_or(FontError::GlyphNotFound(ch as u32))?;

        let pixels = self.image.copy_rect(
            cell * self.cell_width,
            0,
            self.cell_width,
            self.image.height(),
        );

        let metrics = GlyphMetrics {
            advance: self.cell_width as f32,
            bearing_x: 0,
            bearing_y: self.image.height() as i32,
            width: self.cell_width,
            height: self.image.height(),
        };
        Ok(GlyphData::new(metrics, PixelFormat::Rgba8, pixels))
    }
}
