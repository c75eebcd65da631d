//! rasterfont - glyph extraction from TrueType, BMFont and image-strip fonts
//!
//! # Architecture
//!
//! ```text
//! FontModule ──selects──▶ GlyphSource (TrueType | BMFont | Image)
//!      │                       │
//!      └────wraps into──▶ Rasterizer ──renders──▶ GlyphData
//! ```
//!
//! Construction decides the source kind once; rendering is on-demand
//! and cache-free (callers own any caching policy). A `GlyphData` is an
//! independent value and outlives its rasterizer.

pub mod error;
pub mod glyph;
pub mod image_data;
pub mod module;
pub mod rasterizer;

pub use error::{FontError, Result};
pub use glyph::{GlyphData, GlyphMetrics, PixelFormat};
pub use image_data::ImageData;
pub use module::{load_system_font, FontModule, GlyphQuery, RasterizerInput, DEFAULT_POINT_SIZE};
pub use rasterizer::{GlyphSource, Rasterizer};
