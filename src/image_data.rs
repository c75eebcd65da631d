//! Decoded image buffer
//!
//! RGBA8 pixels in row-major order. This is the only image representation
//! the crate consumes; sources take it by value and own it afterwards.

use log::debug;

use crate::error::{FontError, Result};

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap an already-decoded RGBA8 buffer
    ///
    /// `pixels.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(FontError::InvalidArgument(format!(
                "pixel buffer is {} bytes, expected {} for {}x{} RGBA8",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an encoded image (PNG/JPEG) into RGBA8
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| FontError::InvalidArgument(format!("image decode failed: {}", e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        debug!("Image decoded: {}x{}", width, height);

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Image width (pixels)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height (pixels)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy a rect into a new RGBA8 buffer
    ///
    /// Callers guarantee the rect lies inside the image.
    pub(crate) fn copy_rect(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        debug_assert!(x + w <= self.width && y + h <= self.height);

        let mut out = Vec::with_capacity(w as usize * h as usize * 4);
        for row in y..y + h {
            let start = (row as usize * self.width as usize + x as usize) * 4;
            out.extend_from_slice(&self.pixels[start..start + w as usize * 4]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_rejects_short_buffer() {
        let result = ImageData::from_rgba8(4, 4, vec![0u8; 15]);
        assert!(matches!(result, Err(FontError::InvalidArgument(_))));
    }

    #[test]
    fn test_copy_rect() {
        // 4x2 image, each pixel's R channel encodes its index
        let mut pixels = vec![0u8; 4 * 2 * 4];
        for i in 0..8 {
            pixels[i * 4] = i as u8;
        }
        let img = ImageData::from_rgba8(4, 2, pixels).unwrap();

        let rect = img.copy_rect(1, 0, 2, 2);
        assert_eq!(rect.len(), 2 * 2 * 4);
        assert_eq!(rect[0], 1); // (1, 0)
        assert_eq!(rect[4], 2); // (2, 0)
        assert_eq!(rect[8], 5); // (1, 1)
        assert_eq!(rect[12], 6); // (2, 1)
    }
}
