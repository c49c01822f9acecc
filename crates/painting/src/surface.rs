//! Pixel storage shared by raster targets
//!
//! Targets keep 8-bit premultiplied RGBA in a [`tiny_skia::Pixmap`]. The
//! history store copies those bytes as a [`Snapshot`]; reads through
//! [`RasterTarget::pixel`](crate::raster::RasterTarget::pixel) come back as
//! straight-alpha floats in 0..1.

use tiny_skia::{Color, Pixmap, PremultipliedColorU8};
use tracing::warn;

/// Owned copy of a pixmap's pixels, the unit of history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA, row-major
    data: Vec<u8>,
}

impl Snapshot {
    pub fn from_pixmap(pixmap: &Pixmap) -> Self {
        Self {
            width: pixmap.width(),
            height: pixmap.height(),
            data: pixmap.data().to_vec(),
        }
    }

    /// Pixels as premultiplied RGBA quads
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    /// Raw pixel bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Straight-alpha colour at `(x, y)`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        let [r, g, b, a] = *self.pixels().get(index)?;
        PremultipliedColorU8::from_rgba(r, g, b, a).map(straight_rgba)
    }

    /// Copy the pixels back into a pixmap of the same dimensions
    pub fn restore_into(&self, pixmap: &mut Pixmap) -> bool {
        if self.width != pixmap.width() || self.height != pixmap.height() {
            warn!(
                "Snapshot::restore_into: snapshot is {}x{}, pixmap is {}x{}",
                self.width,
                self.height,
                pixmap.width(),
                pixmap.height()
            );
            return false;
        }
        pixmap.data_mut().copy_from_slice(&self.data);
        true
    }
}

/// Demultiplied pixel as floats
pub fn straight_rgba(pixel: PremultipliedColorU8) -> [f32; 4] {
    let c = pixel.demultiply();
    [
        c.red() as f32 / 255.0,
        c.green() as f32 / 255.0,
        c.blue() as f32 / 255.0,
        c.alpha() as f32 / 255.0,
    ]
}

/// Straight-alpha floats to a skia colour; out-of-range channels clamp and
/// NaN reads as 0
pub fn to_skia_color(rgba: [f32; 4]) -> Color {
    let [r, g, b, a] = rgba.map(|c| if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) });
    Color::from_rgba(r, g, b, a).unwrap_or(Color::TRANSPARENT)
}
