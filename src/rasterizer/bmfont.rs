//! BMFont glyph source
//!
//! Parses the AngelCode BMFont *text* descriptor and cuts glyphs out of
//! the supplied atlas pages. Each line is a tag followed by key=value
//! pairs; values may be quoted. The binary descriptor variant (`BMF`
//! magic) is not supported.

use std::collections::HashMap;

use log::{debug, warn};

use crate::error::{FontError, Result};
use crate::glyph::{GlyphData, GlyphMetrics, PixelFormat};
use crate::image_data::ImageData;
use crate::rasterizer::GlyphSource;

/// One `char` entry from the descriptor
#[derive(Debug, Clone, Copy)]
struct BMFontChar {
    /// Top-left corner of the glyph rect on its page
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    /// Pen-relative placement offsets
    xoffset: i32,
    yoffset: i32,
    xadvance: i32,
    /// Index into the supplied page images
    page: u32,
}

/// Bitmap font source: descriptor + atlas pages
pub struct BMFontSource {
    chars: HashMap<char, BMFontChar>,
    kerning: HashMap<(char, char), i32>,
    pages: Vec<ImageData>,
    line_height: f32,
    /// Distance from the top of a line down to the baseline
    base: f32,
}

impl BMFontSource {
    /// Parse a text descriptor and bind it to the page images
    ///
    /// Takes ownership of both inputs; on any failure everything moved
    /// in is dropped before the error returns, including failures found
    /// after some pages were already validated.
    pub fn new(descriptor: Vec<u8>, pages: Vec<ImageData>) -> Result<Self> {
        if descriptor.starts_with(b"BMF") {
            return Err(FontError::UnsupportedFormat(
                "binary BMFont descriptors are not supported".into(),
            ));
        }

        let text = std::str::from_utf8(&descriptor)
            .map_err(|_| FontError::InvalidFontData("BMFont descriptor is not valid UTF-8".into()))?;

        let mut line_height: Option<f32> = None;
        let mut base: Option<f32> = None;
        let mut declared_pages: usize = 0;
        let mut page_tags: usize = 0;
        let mut chars: HashMap<char, BMFontChar> = HashMap::new();
        let mut kerning: HashMap<(char, char), i32> = HashMap::new();

        for raw_line in text.lines() {
            let line = raw_line.trim_start_matches('\u{FEFF}').trim();
            if line.is_empty() {
                continue;
            }

            let (tag, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let fields = Fields::parse(tag, rest);

            match tag {
                "common" => {
                    line_height = Some(fields.require_i64("lineHeight")? as f32);
                    base = Some(fields.require_i64("base")? as f32);
                    declared_pages = fields.get_i64("pages").unwrap_or(0).max(0) as usize;
                }
                "page" => {
                    // Page file names are ignored: pages arrive as
                    // already-decoded images in declaration order
                    page_tags += 1;
                }
                "char" => {
                    let id = fields.require_i64("id")?;
                    let Some(ch) = u32::try_from(id).ok().and_then(char::from_u32) else {
                        warn!("BMFont: skipping char entry with invalid id {}", id);
                        continue;
                    };
                    chars.insert(
                        ch,
                        BMFontChar {
                            x: fields.require_u32("x")?,
                            y: fields.require_u32("y")?,
                            width: fields.require_u32("width")?,
                            height: fields.require_u32("height")?,
                            xoffset: fields.get_i64("xoffset").unwrap_or(0) as i32,
                            yoffset: fields.get_i64("yoffset").unwrap_or(0) as i32,
                            xadvance: fields.get_i64("xadvance").unwrap_or(0) as i32,
                            page: fields.get_i64("page").unwrap_or(0).max(0) as u32,
                        },
                    );
                }
                "kerning" => {
                    let first = fields.require_i64("first")?;
                    let second = fields.require_i64("second")?;
                    let amount = fields.get_i64("amount").unwrap_or(0) as i32;
                    let left = u32::try_from(first).ok().and_then(char::from_u32);
                    let right = u32::try_from(second).ok().and_then(char::from_u32);
                    if let (Some(l), Some(r)) = (left, right) {
                        kerning.insert((l, r), amount);
                    }
                }
                // info, chars, kernings and anything newer carry nothing
                // this source needs
                _ => {}
            }
        }

        let line_height = line_height.ok_or_else(|| {
            FontError::InvalidFontData("BMFont descriptor has no 'common' tag".into())
        })?;
        let base = base.unwrap_or(line_height);

        if chars.is_empty() {
            return Err(FontError::InvalidFontData(
                "BMFont descriptor contains no char entries".into(),
            ));
        }

        // The descriptor's own page count must agree with what the
        // caller supplied
        let declared = page_tags.max(declared_pages);
        if !pages.is_empty() && declared != 0 && declared != pages.len() {
            return Err(FontError::InvalidArgument(format!(
                "descriptor declares {} pages, {} images supplied",
                declared,
                pages.len()
            )));
        }

        // Every glyph rect must land inside a supplied page
        for (ch, c) in &chars {
            let page = pages.get(c.page as usize).ok_or_else(|| {
                FontError::InvalidArgument(format!(
                    "glyph U+{:04X} references page {} but only {} images supplied",
                    *ch as u32,
                    c.page,
                    pages.len()
                ))
            })?;
            let x_end = c.x.checked_add(c.width);
            let y_end = c.y.checked_add(c.height);
            if x_end.map_or(true, |v| v > page.width()) || y_end.map_or(true, |v| v > page.height())
            {
                return Err(FontError::InvalidArgument(format!(
                    "glyph U+{:04X} rect {}x{}+{}+{} exceeds page {} ({}x{})",
                    *ch as u32,
                    c.width,
                    c.height,
                    c.x,
                    c.y,
                    c.page,
                    page.width(),
                    page.height()
                )));
            }
        }

        debug!(
            "BMFont loaded: {} glyphs, {} pages, lineHeight {:.0}",
            chars.len(),
            pages.len(),
            line_height
        );

        Ok(Self {
            chars,
            kerning,
            pages,
            line_height,
            base,
        })
    }

    /// Probe whether bytes look like a text descriptor
    pub fn accepts(data: &[u8]) -> bool {
        let head = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
        let head = match head.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => &head[i..],
            None => return false,
        };
        head.starts_with(b"info ") || head.starts_with(b"common ")
    }
}

impl GlyphSource for BMFontSource {
    fn glyph_count(&self) -> u32 {
        self.chars.len() as u32
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn ascent(&self) -> f32 {
        self.base
    }

    fn descent(&self) -> f32 {
        self.base - self.line_height
    }

    fn has_glyph(&self, ch: char) -> bool {
        self.chars.contains_key(&ch)
    }

    fn render_glyph(&self, ch: char) -> Result<GlyphData> {
        let c = self
            .chars
            .get(&ch)
            .ok_or(FontError::GlyphNotFound(ch as u32))?;

        // Rect validity was checked at construction
        let page = &self.pages[c.page as usize];
        let pixels = page.copy_rect(c.x, c.y, c.width, c.height);

        let metrics = GlyphMetrics {
            advance: c.xadvance as f32,
            bearing_x: c.xoffset,
            // yoffset counts down from the line top; base is the
            // baseline's distance from the line top
            bearing_y: self.base as i32 - c.yoffset,
            width: c.width,
            height: c.height,
        };
        Ok(GlyphData::new(metrics, PixelFormat::Rgba8, pixels))
    }

    fn kerning(&self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0) as f32
    }
}

/// Key=value fields of one descriptor line
struct Fields<'a> {
    tag: &'a str,
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> Fields<'a> {
    /// Split `key=value` pairs, honoring quoted values
    fn parse(tag: &'a str, rest: &'a str) -> Self {
        let mut pairs = Vec::new();
        let bytes = rest.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }

            let key_start = i;
            while i < bytes.len() && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let key = &rest[key_start..i];

            if i >= bytes.len() || bytes[i] != b'=' {
                // Bare token without a value
                continue;
            }
            i += 1;

            let value = if i < bytes.len() && bytes[i] == b'"' {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b'"' {
                    i += 1;
                }
                let v = &rest[start..i];
                if i < bytes.len() {
                    i += 1;
                }
                v
            } else {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                &rest[start..i]
            };

            pairs.push((key, value));
        }

        Self { tag, pairs }
    }

    fn get(&self, key: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.parse().ok())
    }

    fn require_u32(&self, key: &str) -> Result<u32> {
        let v = self.require_i64(key)?;
        u32::try_from(v).map_err(|_| {
            FontError::InvalidFontData(format!(
                "BMFont '{}' tag: '{}' out of range: {}",
                self.tag, key, v
            ))
        })
    }

    fn require_i64(&self, key: &str) -> Result<i64> {
        let v = self.get(key).ok_or_else(|| {
            FontError::InvalidFontData(format!("BMFont '{}' tag missing '{}'", self.tag, key))
        })?;
        v.parse().map_err(|_| {
            FontError::InvalidFontData(format!(
                "BMFont '{}' tag: '{}' is not a number: {}",
                self.tag, key, v
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32, value: u8) -> ImageData {
        ImageData::from_rgba8(width, height, vec![value; (width * height * 4) as usize]).unwrap()
    }

    fn descriptor(body: &str) -> Vec<u8> {
        format!(
            "info face=\"Test Font\" size=24\n\
             common lineHeight=28 base=22 scaleW=64 scaleH=32 pages=1\n\
             page id=0 file=\"test_0.png\"\n\
             chars count=2\n\
             {}",
            body
        )
        .into_bytes()
    }

    #[test]
    fn test_field_parsing_handles_quotes() {
        let fields = Fields::parse("info", "face=\"Liberation Mono\" size=24 padding=1,1,1,1");
        assert_eq!(fields.get("face"), Some("Liberation Mono"));
        assert_eq!(fields.get_i64("size"), Some(24));
        assert_eq!(fields.get("padding"), Some("1,1,1,1"));
        assert_eq!(fields.get("missing"), None);
    }

    #[test]
    fn test_two_glyph_font() {
        let body = "char id=65 x=0 y=0 width=20 height=24 xoffset=1 yoffset=2 xadvance=21 page=0\n\
                    char id=66 x=24 y=0 width=18 height=24 xoffset=1 yoffset=2 xadvance=19 page=0\n";
        let source = BMFontSource::new(descriptor(body), vec![solid_image(64, 32, 255)]).unwrap();

        assert_eq!(source.glyph_count(), 2);
        assert_eq!(source.line_height(), 28.0);
        assert!(source.has_glyph('A'));
        assert!(source.has_glyph('B'));
        assert!(!source.has_glyph('C'));

        for ch in ['A', 'B'] {
            let glyph = source.render_glyph(ch).unwrap();
            assert!(glyph.width() <= 64);
            assert!(glyph.height() <= 32);
            assert_eq!(
                glyph.pixels().len(),
                (glyph.width() * glyph.height() * 4) as usize
            );
        }

        let a = source.render_glyph('A').unwrap();
        assert_eq!(a.advance(), 21.0);
        assert_eq!(a.bearing_x(), 1);
        assert_eq!(a.bearing_y(), 20); // base 22 - yoffset 2
    }

    #[test]
    fn test_page_index_out_of_range() {
        let body = "char id=65 x=0 y=0 width=8 height=8 xadvance=8 page=1\n";
        let result = BMFontSource::new(descriptor(body), vec![solid_image(64, 32, 0)]);
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_rect_outside_page() {
        let body = "char id=65 x=60 y=0 width=8 height=8 xadvance=8 page=0\n";
        let result = BMFontSource::new(descriptor(body), vec![solid_image(64, 32, 0)]);
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_page_count_mismatch() {
        let body = "char id=65 x=0 y=0 width=8 height=8 xadvance=8 page=0\n";
        let images = vec![solid_image(64, 32, 0), solid_image(64, 32, 0)];
        let result = BMFontSource::new(descriptor(body), images);
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_no_images_supplied() {
        let body = "char id=65 x=0 y=0 width=8 height=8 xadvance=8 page=0\n";
        let result = BMFontSource::new(descriptor(body), Vec::new());
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_binary_descriptor_rejected() {
        let result = BMFontSource::new(b"BMF\x03rest".to_vec(), vec![solid_image(4, 4, 0)]);
        assert!(matches!(result, Err(FontError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_missing_common_tag() {
        let data = b"info face=\"x\" size=12\nchar id=65 x=0 y=0 width=1 height=1\n".to_vec();
        let result = BMFontSource::new(data, vec![solid_image(4, 4, 0)]);
        assert!(matches!(result, Err(FontError::InvalidFontData(_))));
    }

    #[test]
    fn test_kerning_pairs() {
        let body = "char id=65 x=0 y=0 width=8 height=8 xadvance=8 page=0\n\
                    char id=86 x=8 y=0 width=8 height=8 xadvance=8 page=0\n\
                    kerning first=65 second=86 amount=-2\n";
        let source = BMFontSource::new(descriptor(body), vec![solid_image(64, 32, 0)]).unwrap();
        assert_eq!(source.kerning('A', 'V'), -2.0);
        assert_eq!(source.kerning('V', 'A'), 0.0);
    }

    #[test]
    fn test_glyph_not_found() {
        let body = "char id=65 x=0 y=0 width=8 height=8 xadvance=8 page=0\n";
        let source = BMFontSource::new(descriptor(body), vec![solid_image(64, 32, 0)]).unwrap();
        let result = source.render_glyph('Z');
        assert!(matches!(result, Err(FontError::GlyphNotFound(0x5A))));
        // A failed lookup must not poison the source
        assert!(source.render_glyph('A').is_ok());
    }
}
