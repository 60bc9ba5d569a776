//! Bounded decoding of user-selected images.
//!
//! Limits are applied as given; callers pass [`AppConfig::effective_image_limits`]
//! so untrusted config values are already clamped.
//!
//! [`AppConfig::effective_image_limits`]: crate::config::AppConfig::effective_image_limits

use crate::config::ImageLimits;
use anyhow::Context as _;
use egui::ColorImage;
use image::{DynamicImage, ImageReader, Limits};
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

fn decoder_limits(limits: &ImageLimits) -> Limits {
    let mut decoder = Limits::default();
    decoder.max_image_width = Some(limits.image_dim);
    decoder.max_image_height = Some(limits.image_dim);
    decoder.max_alloc = Some(limits.alloc_bytes);
    decoder
}

fn check_pixel_budget(limits: &ImageLimits, width: u32, height: u32) -> anyhow::Result<()> {
    let total = u64::from(width) * u64::from(height);
    anyhow::ensure!(
        total <= limits.total_pixels,
        "Image too large: {width}x{height} (~{} MP) exceeds limit (~{} MP)",
        total / 1_000_000,
        limits.total_pixels / 1_000_000
    );
    Ok(())
}

fn into_color_image(image: &DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, rgba.as_raw())
}

fn decode<R: BufRead + Seek>(
    limits: &ImageLimits,
    reader: ImageReader<R>,
) -> anyhow::Result<ColorImage> {
    let mut reader = reader
        .with_guessed_format()
        .context("Failed to detect image format")?;
    reader.limits(decoder_limits(limits));
    let image = reader.decode().context("Failed to decode image data")?;
    check_pixel_budget(limits, image.width(), image.height())?;
    Ok(into_color_image(&image))
}

/// Decode the image file at `path` into unmultiplied RGBA.
pub fn decode_image_from_path(limits: &ImageLimits, path: &Path) -> anyhow::Result<ColorImage> {
    let reader =
        ImageReader::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode(limits, reader)
}

/// Decode dropped bytes into unmultiplied RGBA.
pub fn decode_image_from_bytes(limits: &ImageLimits, bytes: Vec<u8>) -> anyhow::Result<ColorImage> {
    decode(limits, ImageReader::new(Cursor::new(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("encode png");
        out.into_inner()
    }

    #[test]
    fn decodes_png_bytes_at_native_size() {
        let color = decode_image_from_bytes(&ImageLimits::default(), png_bytes(7, 3))
            .expect("decode");
        assert_eq!(color.size, [7, 3]);
        assert_eq!(color.pixels[0].to_srgba_unmultiplied(), [10, 20, 30, 255]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = decode_image_from_bytes(&ImageLimits::default(), b"not an image".to_vec())
            .expect_err("garbage must fail");
        assert!(!format!("{err:#}").is_empty());
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let limits = ImageLimits {
            image_dim: 64,
            ..ImageLimits::default()
        };
        assert!(decode_image_from_bytes(&limits, png_bytes(65, 1)).is_err());
    }

    #[test]
    fn pixel_budget_is_enforced_after_decode() {
        let limits = ImageLimits {
            total_pixels: 10,
            ..ImageLimits::default()
        };
        let err = decode_image_from_bytes(&limits, png_bytes(4, 3)).expect_err("over budget");
        assert!(format!("{err:#}").contains("Image too large"));
    }

    #[test]
    fn decodes_from_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("small.png");
        std::fs::write(&path, png_bytes(2, 2)).expect("write png");
        let color = decode_image_from_path(&ImageLimits::default(), &path).expect("decode");
        assert_eq!(color.size, [2, 2]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = decode_image_from_path(&ImageLimits::default(), Path::new("/no/such/file.png"))
            .expect_err("missing file");
        assert!(format!("{err:#}").contains("file.png"));
    }
}
