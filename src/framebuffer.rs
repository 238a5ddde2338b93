//! RGBA raster target for chart rendering.
//!
//! Rows are padded to a 64-byte stride so row fills copy whole SIMD-width
//! chunks. Luminance reductions go through trueno's vector kernels.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// Row alignment in bytes.
const SIMD_ALIGNMENT: usize = 64;

/// Upper bound on either dimension; guards against accidental inch/pixel mix-ups.
pub const MAX_DIMENSION: u32 = 16_384;

/// Row-major RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// RGBA bytes, `stride` bytes per row.
    pixels: Vec<u8>,
    stride: usize,
}

impl Framebuffer {
    /// Create a new framebuffer filled with transparent black.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero or exceeds [`MAX_DIMENSION`].
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_recipes::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + SIMD_ALIGNMENT - 1) & !(SIMD_ALIGNMENT - 1);
        let pixels = vec![0; stride * (height as usize)];

        Ok(Self {
            width,
            height,
            pixels,
            stride,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes (including padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    fn row(&self, y: u32) -> &[u8] {
        let start = (y as usize) * self.stride;
        &self.pixels[start..start + (self.width as usize) * 4]
    }

    /// Clear the whole buffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        let mut pattern = [0u8; SIMD_ALIGNMENT];
        for px in pattern.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }

        for y in 0..self.height {
            let start = (y as usize) * self.stride;
            let row = &mut self.pixels[start..start + (self.width as usize) * 4];

            let mut chunks = row.chunks_exact_mut(SIMD_ALIGNMENT);
            for chunk in &mut chunks {
                chunk.copy_from_slice(&pattern);
            }
            for px in chunks.into_remainder().chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Fill a rectangle, alpha-blending when the color is translucent.
    ///
    /// Coordinates are clamped to the buffer.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        if color.a < 255 {
            for py in y1..y2 {
                for px in x1..x2 {
                    self.blend_pixel(px, py, color);
                }
            }
            return;
        }

        let rgba = color.to_array();
        for py in y1..y2 {
            let start = (py as usize) * self.stride + (x1 as usize) * 4;
            let end = start + ((x2 - x1) as usize) * 4;
            for px in self.pixels[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Color at a pixel, or `None` when out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Composite a color over a pixel ("over" operator).
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round() as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    /// Returns (min, max, mean) BT.709 luminance over all pixels.
    #[must_use]
    pub fn luminance_stats(&self) -> (f32, f32, f32) {
        let mut luminances = Vec::with_capacity((self.width as usize) * (self.height as usize));
        for y in 0..self.height {
            for px in self.row(y).chunks_exact(4) {
                luminances.push(
                    0.2126 * f32::from(px[0])
                        + 0.7152 * f32::from(px[1])
                        + 0.0722 * f32::from(px[2]),
                );
            }
        }

        let vec = Vector::from_vec(luminances);
        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(255.0);
        let mean = vec.mean().unwrap_or(127.5);
        (min, max, mean)
    }

    /// Number of pixels exactly equal to `color`.
    #[must_use]
    pub fn count_color(&self, color: Rgba) -> usize {
        let target = color.to_array();
        (0..self.height)
            .map(|y| {
                self.row(y)
                    .chunks_exact(4)
                    .filter(|px| **px == target)
                    .count()
            })
            .sum()
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Tightly packed RGBA bytes (stride padding removed), as PNG expects.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;
        if self.stride == row_bytes {
            return self.pixels.clone();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height {
            compact.extend_from_slice(self.row(y));
        }
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert!(fb.stride() >= 400);
        assert_eq!(fb.stride() % SIMD_ALIGNMENT, 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(MAX_DIMENSION + 1, 10).is_err());
    }

    #[test]
    fn test_clear_odd_width() {
        let mut fb = Framebuffer::new(21, 3).unwrap();
        fb.clear(Rgba::BLUE);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(20, 2), Some(Rgba::BLUE));
        assert_eq!(fb.count_color(Rgba::BLUE), 63);
    }

    #[test]
    fn test_fill_rect_clamps() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(8, 8, 50, 50, Rgba::RED);
        assert_eq!(fb.count_color(Rgba::RED), 4);
    }

    #[test]
    fn test_fill_rect_translucent_blends() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(0, 0, 4, 4, Rgba::BLACK.with_alpha(128));
        let px = fb.get_pixel(1, 1).unwrap();
        assert!(px.r > 100 && px.r < 150);
        assert_eq!(px.a, 255);
    }

    #[test]
    fn test_out_of_bounds_ignored() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.set_pixel(10, 10, Rgba::RED);
        fb.blend_pixel(10, 10, Rgba::RED);
        assert_eq!(fb.get_pixel(10, 10), None);
    }

    #[test]
    fn test_luminance_stats() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::BLACK);
        fb.fill_rect(0, 0, 8, 4, Rgba::WHITE);
        let (min, max, mean) = fb.luminance_stats();
        assert!(min < 1.0);
        assert!(max > 254.0);
        assert!((mean - 127.5).abs() < 1.0);
    }

    #[test]
    fn test_compact_pixels_len() {
        let fb = Framebuffer::new(3, 2).unwrap();
        assert_eq!(fb.to_compact_pixels().len(), 3 * 2 * 4);
    }
}
