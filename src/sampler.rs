//! Pixel sampling from a reference image.
//!
//! Boundary adapter between an uploaded photo and the matching engine: maps a
//! point picked on a displayed (possibly scaled) image back to the natural
//! pixel grid, reads that single pixel, and hands it on as a hex color.

use image::RgbaImage;

use crate::color::Rgb;

/// Errors from decoding or wrapping a reference image.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// Image bytes could not be decoded
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Image has no pixels to sample
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

/// Map one displayed coordinate onto the natural pixel grid.
///
/// Uses `round((displayed / displayed_size) * natural_size)` clamped to
/// `[0, natural_size - 1]`, so points outside the image read the nearest edge
/// pixel. A zero, negative or non-finite `displayed_size` maps to 0.
pub fn display_to_natural(displayed: f64, displayed_size: f64, natural_size: u32) -> u32 {
    if natural_size == 0 || !displayed_size.is_finite() || displayed_size <= 0.0 {
        return 0;
    }
    let scaled = (displayed / displayed_size * f64::from(natural_size)).round();
    if scaled.is_nan() {
        return 0;
    }
    let last = f64::from(natural_size - 1);
    // Clamped into u32 range first, so the cast cannot truncate.
    scaled.clamp(0.0, last) as u32
}

/// Nearest-pixel reader over a decoded RGBA image.
#[derive(Debug, Clone)]
pub struct PixelSampler {
    image: RgbaImage,
}

impl PixelSampler {
    /// Decode an image in any supported format (PNG, JPEG, BMP, WebP).
    pub fn from_bytes(data: &[u8]) -> Result<Self, SampleError> {
        let image = image::load_from_memory(data)?.to_rgba8();
        log::trace!(
            "PixelSampler: decoded {}x{} image ({} bytes)",
            image.width(),
            image.height(),
            data.len()
        );
        Self::from_rgba(image)
    }

    /// Wrap already-decoded RGBA pixels.
    pub fn from_rgba(image: RgbaImage) -> Result<Self, SampleError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SampleError::EmptyImage { width, height });
        }
        Ok(Self { image })
    }

    /// Natural `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Color of the pixel at natural coordinates, clamped to the image bounds.
    /// Alpha is ignored.
    pub fn rgb_at(&self, x: u32, y: u32) -> Rgb {
        let (width, height) = self.image.dimensions();
        let pixel = self
            .image
            .get_pixel(x.min(width - 1), y.min(height - 1));
        Rgb::new(pixel[0], pixel[1], pixel[2])
    }

    /// Sample the pixel under a point on the displayed image.
    ///
    /// # Arguments
    /// * `point` - `(x, y)` in display space
    /// * `displayed_size` - `(width, height)` the image is shown at
    pub fn sample(&self, point: (f64, f64), displayed_size: (f64, f64)) -> Rgb {
        let (width, height) = self.image.dimensions();
        let x = display_to_natural(point.0, displayed_size.0, width);
        let y = display_to_natural(point.1, displayed_size.1, height);
        let rgb = self.rgb_at(x, y);
        log::debug!(
            "Sampled ({:.1}, {:.1}) on {:.0}x{:.0} display -> pixel ({}, {}) = {}",
            point.0,
            point.1,
            displayed_size.0,
            displayed_size.1,
            x,
            y,
            rgb
        );
        rgb
    }

    /// Like [`sample`](Self::sample), returning lowercase `#rrggbb`.
    pub fn sample_hex(&self, point: (f64, f64), displayed_size: (f64, f64)) -> String {
        self.sample(point, displayed_size).to_hex()
    }
}
