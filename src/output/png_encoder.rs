//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. When a resolution is given
//! it is recorded in the `pHYs` chunk so image viewers and print pipelines
//! size the chart the way it was saved.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Inches per metre, for the `pHYs` pixels-per-unit field.
const INCHES_PER_METRE: f32 = 39.370_08;

/// PNG encoder for framebuffer output.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a framebuffer to a PNG file, optionally tagged with a resolution
    /// in dots per inch.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(
        fb: &Framebuffer,
        path: P,
        dpi: Option<f32>,
    ) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        Self::encode(fb, &mut file, dpi)?;
        file.flush()?;
        Ok(())
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        Self::encode(fb, &mut buffer, None)?;
        Ok(buffer)
    }

    fn encode<W: Write>(fb: &Framebuffer, out: W, dpi: Option<f32>) -> Result<()> {
        let mut encoder = png::Encoder::new(out, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(dpi) = dpi.filter(|d| d.is_finite() && *d > 0.0) {
            let ppu = (dpi * INCHES_PER_METRE).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppu,
                yppu: ppu,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder.write_header()?;
        // Use compact pixels to handle stride padding
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    #[test]
    fn test_png_to_bytes() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::RED);

        let bytes = PngEncoder::to_bytes(&fb).unwrap();
        // PNG magic bytes
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    }

    #[test]
    fn test_write_records_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dpi.png");
        let fb = Framebuffer::new(4, 4).unwrap();
        PngEncoder::write_to_file(&fb, &path, Some(300.0)).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.windows(4).any(|w| w == b"pHYs"));
        let untagged = PngEncoder::to_bytes(&fb).unwrap();
        assert!(!untagged.windows(4).any(|w| w == b"pHYs"));
    }
}
