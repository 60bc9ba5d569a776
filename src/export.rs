use anyhow::Context as _;
use egui::ColorImage;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// A rendered frame waiting to be written, plus the suggested file name.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub file_name: String,
    pub frame: ColorImage,
}

fn frame_to_rgba(frame: &ColorImage) -> anyhow::Result<RgbaImage> {
    let [w, h] = frame.size;
    let width = u32::try_from(w).context("Frame too wide to export")?;
    let height = u32::try_from(h).context("Frame too tall to export")?;
    let raw: Vec<u8> = frame
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();
    RgbaImage::from_raw(width, height, raw).context("Frame buffer does not match its size")
}

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &ColorImage) -> anyhow::Result<Vec<u8>> {
    let rgba = frame_to_rgba(frame)?;
    let mut out = Cursor::new(Vec::new());
    rgba.write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(out.into_inner())
}

/// Encode and write a frame as PNG to `path`.
pub fn export_png(path: &Path, frame: &ColorImage) -> anyhow::Result<()> {
    let bytes = encode_png(frame)?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Append `.png` unless the path already carries it.
pub fn with_png_extension(path: PathBuf) -> PathBuf {
    let has_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if has_png {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}
