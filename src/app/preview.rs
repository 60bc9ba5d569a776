use super::FilterlabApp;
use egui::{Context, TextureHandle, TextureId, TextureOptions};

/// GPU copy of the output surface, tagged with the surface generation it shows.
pub struct PreviewTexture {
    texture: TextureHandle,
    generation: u64,
}

impl PreviewTexture {
    pub fn id(&self) -> TextureId {
        self.texture.id()
    }
}

impl FilterlabApp {
    /// Re-upload the surface pixels when the compositor has drawn since the last frame.
    pub(crate) fn sync_preview_texture(&mut self, ctx: &Context) {
        let surface = self.router.surface();
        if !surface.is_visible() {
            return;
        }
        let generation = surface.generation();
        match self.preview.as_mut() {
            Some(preview) if preview.generation == generation => {}
            Some(preview) => {
                preview
                    .texture
                    .set(surface.frame(), TextureOptions::LINEAR);
                preview.generation = generation;
            }
            None => {
                let texture =
                    ctx.load_texture("filtered_preview", surface.frame(), TextureOptions::LINEAR);
                self.preview = Some(PreviewTexture {
                    texture,
                    generation,
                });
            }
        }
    }
}
