//! The drawing surface the compositor paints into.

use crate::image::{FilterChain, FilterParseError};
use egui::{Color32, ColorImage};
use std::sync::Arc;

/// A 2D RGBA surface with an active filter, in the manner of a canvas context.
///
/// Hidden until the first image is drawn. `generation` increments on every
/// draw so viewers know when to refresh their copy of the pixels.
#[derive(Debug, Default)]
pub struct OutputSurface {
    frame: Arc<ColorImage>,
    filter: FilterChain,
    visible: bool,
    generation: u64,
}

impl OutputSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> [usize; 2] {
        self.frame.size
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Resize to `size`. A new size starts out transparent; the same size keeps its pixels.
    pub fn resize(&mut self, size: [usize; 2]) {
        if self.frame.size != size {
            self.frame = Arc::new(ColorImage::new(
                size,
                vec![Color32::TRANSPARENT; size[0] * size[1]],
            ));
        }
    }

    pub fn clear(&mut self) {
        Arc::make_mut(&mut self.frame)
            .pixels
            .fill(Color32::TRANSPARENT);
    }

    /// Set the filter applied by subsequent draws.
    ///
    /// An invalid expression leaves the previous filter active.
    pub fn set_filter(&mut self, expression: &str) -> Result<(), FilterParseError> {
        self.filter = FilterChain::parse(expression)?;
        Ok(())
    }

    /// Draw `image` at the origin through the active filter, clipped to the surface.
    ///
    /// The surface is expected to be cleared first; filtered pixels replace
    /// whatever was underneath.
    pub fn draw_image(&mut self, image: &ColorImage) {
        let filtered = self.filter.apply(image);
        if filtered.size == self.frame.size {
            self.frame = Arc::new(filtered);
        } else {
            let [src_w, src_h] = filtered.size;
            let frame = Arc::make_mut(&mut self.frame);
            let [dst_w, dst_h] = frame.size;
            let copy_w = src_w.min(dst_w);
            for y in 0..src_h.min(dst_h) {
                let src = &filtered.pixels[y * src_w..y * src_w + copy_w];
                frame.pixels[y * dst_w..y * dst_w + copy_w].copy_from_slice(src);
            }
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Shared handle to the current contents, for texture upload.
    pub fn frame(&self) -> Arc<ColorImage> {
        Arc::clone(&self.frame)
    }

    /// Owned copy of the current contents, e.g. for export.
    pub fn snapshot(&self) -> ColorImage {
        (*self.frame).clone()
    }
}
