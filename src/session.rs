use crate::image::ImageMeta;
use crate::schema::FilterValues;
use egui::ColorImage;

/// A decoded image plus where it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: ColorImage,
    meta: ImageMeta,
}

impl SourceImage {
    pub const fn new(pixels: ColorImage, meta: ImageMeta) -> Self {
        Self { pixels, meta }
    }

    pub const fn pixels(&self) -> &ColorImage {
        &self.pixels
    }

    pub const fn size(&self) -> [usize; 2] {
        self.pixels.size
    }

    pub const fn meta(&self) -> &ImageMeta {
        &self.meta
    }
}

/// The loaded image and the current filter values of one editing session.
#[derive(Debug, Default)]
pub struct SessionState {
    loaded_image: Option<SourceImage>,
    values: FilterValues,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn loaded_image(&self) -> Option<&SourceImage> {
        self.loaded_image.as_ref()
    }

    pub const fn values(&self) -> &FilterValues {
        &self.values
    }

    pub const fn values_mut(&mut self) -> &mut FilterValues {
        &mut self.values
    }

    /// Install a new image, handing back the one it replaces.
    pub fn replace_image(&mut self, image: SourceImage) -> Option<SourceImage> {
        self.loaded_image.replace(image)
    }

    /// Overwrite every value at once (preset application).
    pub const fn apply_values(&mut self, values: FilterValues) {
        self.values = values;
    }

    pub fn reset_values(&mut self) {
        self.values = FilterValues::defaults();
    }
}
