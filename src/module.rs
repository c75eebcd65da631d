//! Font module façade
//!
//! An explicit context object: it holds the optional default font and is
//! the single construction point for rasterizers. The generic path
//! dispatches on a tagged input descriptor instead of inspecting
//! argument shapes at runtime.

use log::{debug, info};

use crate::error::{FontError, Result};
use crate::glyph::GlyphData;
use crate::image_data::ImageData;
use crate::rasterizer::bmfont::BMFontSource;
use crate::rasterizer::image::ImageSource;
use crate::rasterizer::truetype::TrueTypeSource;
use crate::rasterizer::Rasterizer;

/// Point size used by the generic path when none is given
pub const DEFAULT_POINT_SIZE: f32 = 12.0;

/// Input descriptor for the generic construction path
///
/// Each variant names the construction it resolves to; `File` alone is
/// re-dispatched by sniffing the byte stream.
pub enum RasterizerInput {
    /// Default font at the given point size
    Size(f32),
    /// Font file of a format decided by sniffing; TrueType gets the
    /// default point size
    File(Vec<u8>),
    /// TrueType font file at an explicit point size
    FileWithSize(Vec<u8>, f32),
    /// BMFont descriptor plus its atlas pages in declaration order
    FileWithImages(Vec<u8>, Vec<ImageData>),
    /// Image strip sliced by a character sequence
    ImageWithChars(ImageData, String),
}

/// A glyph request: either a character or a raw codepoint
#[derive(Debug, Clone, Copy)]
pub enum GlyphQuery {
    Char(char),
    Codepoint(u32),
}

impl From<char> for GlyphQuery {
    fn from(ch: char) -> Self {
        Self::Char(ch)
    }
}

impl From<u32> for GlyphQuery {
    fn from(codepoint: u32) -> Self {
        Self::Codepoint(codepoint)
    }
}

/// Factory for rasterizers over every supported source kind
#[derive(Default)]
pub struct FontModule {
    /// Font bytes used by the default-font path; when absent the system
    /// font search runs on demand
    default_font: Option<Vec<u8>>,
}

impl FontModule {
    pub fn new() -> Self {
        Self { default_font: None }
    }

    /// Use `data` as the default font instead of searching the system
    pub fn with_default_font(data: Vec<u8>) -> Self {
        Self {
            default_font: Some(data),
        }
    }

    /// Generic construction path
    pub fn new_rasterizer(&self, input: RasterizerInput) -> Result<Rasterizer> {
        match input {
            RasterizerInput::Size(size) => self.new_default_rasterizer(size),
            RasterizerInput::FileWithSize(data, size) => self.new_true_type_rasterizer(data, size),
            RasterizerInput::FileWithImages(data, images) => {
                self.new_bmfont_rasterizer(data, images)
            }
            RasterizerInput::ImageWithChars(image, glyphs) => {
                self.new_image_rasterizer(image, &glyphs)
            }
            RasterizerInput::File(data) => {
                if TrueTypeSource::accepts(&data) {
                    debug!("Generic path: bytes sniffed as TrueType");
                    return self.new_true_type_rasterizer(data, DEFAULT_POINT_SIZE);
                }
                if data.starts_with(b"BMF") {
                    return Err(FontError::UnsupportedFormat(
                        "binary BMFont descriptors are not supported".into(),
                    ));
                }
                if BMFontSource::accepts(&data) {
                    debug!("Generic path: bytes sniffed as BMFont text descriptor");
                    return self.new_bmfont_rasterizer(data, Vec::new());
                }
                Err(FontError::UnsupportedFormat(
                    "unrecognized font file format".into(),
                ))
            }
        }
    }

    /// TrueType source from font bytes at an explicit point size
    pub fn new_true_type_rasterizer(&self, data: Vec<u8>, size: f32) -> Result<Rasterizer> {
        Ok(Rasterizer::new(Box::new(TrueTypeSource::new(data, size)?)))
    }

    /// TrueType source over the module's default font
    pub fn new_default_rasterizer(&self, size: f32) -> Result<Rasterizer> {
        let data = match &self.default_font {
            Some(d) => d.clone(),
            None => load_system_font()?,
        };
        self.new_true_type_rasterizer(data, size)
    }

    /// BMFont source from a text descriptor and its atlas pages
    pub fn new_bmfont_rasterizer(
        &self,
        descriptor: Vec<u8>,
        images: Vec<ImageData>,
    ) -> Result<Rasterizer> {
        Ok(Rasterizer::new(Box::new(BMFontSource::new(
            descriptor, images,
        )?)))
    }

    /// Image-strip source sliced by a character sequence
    pub fn new_image_rasterizer(&self, image: ImageData, glyphs: &str) -> Result<Rasterizer> {
        Ok(Rasterizer::new(Box::new(ImageSource::new(image, glyphs)?)))
    }

    /// Render one glyph through a rasterizer
    ///
    /// Accepts a character or a raw codepoint; both forms resolve to the
    /// same glyph for the same character.
    pub fn new_glyph_data(
        &self,
        rasterizer: &Rasterizer,
        glyph: impl Into<GlyphQuery>,
    ) -> Result<GlyphData> {
        match glyph.into() {
            GlyphQuery::Char(ch) => rasterizer.glyph_data(ch),
            GlyphQuery::Codepoint(cp) => rasterizer.glyph_data_for_codepoint(cp),
        }
    }
}

/// Search and load a default system font
///
/// Search order:
/// 1. RASTERFONT_DEFAULT environment variable
/// 2. Known paths (hardcoded)
pub fn load_system_font() -> Result<Vec<u8>> {
    if let Ok(path) = std::env::var("RASTERFONT_DEFAULT") {
        let data = std::fs::read(&path).map_err(|e| {
            FontError::NoDefaultFont(format!("RASTERFONT_DEFAULT: {} ({})", path, e))
        })?;
        info!("Default font loaded: {} (RASTERFONT_DEFAULT)", path);
        return Ok(data);
    }

    let candidates = [
        // Linux
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        // macOS (development/testing)
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
    ];

    for path in &candidates {
        if let Ok(data) = std::fs::read(path) {
            info!("Default font loaded: {}", path);
            return Ok(data);
        }
    }

    Err(FontError::NoDefaultFont(
        "no usable font in known system paths".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_path_rejects_unknown_bytes() {
        let module = FontModule::new();
        let result = module.new_rasterizer(RasterizerInput::File(vec![0x7F, b'E', b'L', b'F']));
        assert!(matches!(result, Err(FontError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_generic_path_rejects_binary_bmfont() {
        let module = FontModule::new();
        let result = module.new_rasterizer(RasterizerInput::File(b"BMF\x03".to_vec()));
        assert!(matches!(result, Err(FontError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_generic_path_bmfont_without_images_fails() {
        // A text descriptor sniffs as BMFont, but its glyphs cannot map
        // to any page when no images are supplied
        let descriptor = b"info face=\"x\" size=8\n\
                           common lineHeight=8 base=7 pages=1\n\
                           page id=0 file=\"x_0.png\"\n\
                           char id=65 x=0 y=0 width=4 height=4 xadvance=4 page=0\n"
            .to_vec();
        let module = FontModule::new();
        let result = module.new_rasterizer(RasterizerInput::File(descriptor));
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_generic_path_truetype_garbage_is_invalid_font_data() {
        // Valid sfnt magic, truncated body: recognized as TrueType but
        // fails to parse
        let mut data = b"\x00\x01\x00\x00".to_vec();
        data.extend_from_slice(&[0u8; 8]);
        let module = FontModule::new();
        let result = module.new_rasterizer(RasterizerInput::File(data));
        assert!(matches!(result, Err(FontError::InvalidFontData(_))));
    }

    #[test]
    fn test_glyph_query_conversions() {
        assert!(matches!(GlyphQuery::from('A'), GlyphQuery::Char('A')));
        assert!(matches!(
            GlyphQuery::from(0x41u32),
            GlyphQuery::Codepoint(0x41)
        ));
    }
}
