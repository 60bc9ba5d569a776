use super::super::FilterlabApp;
use super::icons;
use crate::util::safe_usize_to_f32;
use egui::{Color32, RichText};

impl FilterlabApp {
    pub(crate) fn ui_central_image(&mut self, ui: &mut egui::Ui) {
        self.handle_dropped_files(ui);
        self.sync_preview_texture(ui.ctx());

        let visible = self.router.surface().is_visible();
        match self.preview.as_ref() {
            Some(preview) if visible => {
                let [w, h] = self.router.surface().size();
                let size = egui::vec2(safe_usize_to_f32(w), safe_usize_to_f32(h));
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new((preview.id(), size)).shrink_to_fit());
                });
            }
            _ => self.ui_empty_state(ui),
        }
    }

    fn ui_empty_state(&self, ui: &mut egui::Ui) {
        let text = self.router.pending_description().map_or_else(
            || format!("{} Open an image or drop one here", icons::ICON_IMAGE),
            |name| format!("Loading {name}…"),
        );
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(text).heading().color(Color32::from_gray(150)));
        });
    }

    fn handle_dropped_files(&mut self, ui: &egui::Ui) {
        let (hovered_files, dropped_files) =
            ui.input(|i| (i.raw.hovered_files.clone(), i.raw.dropped_files.clone()));
        for (idx, h) in hovered_files.iter().enumerate() {
            log::trace!("[DnD] hover[{idx}] path={:?} mime={}", h.path, h.mime);
        }
        if dropped_files.is_empty() {
            return;
        }
        for (idx, f) in dropped_files.iter().enumerate() {
            let blen = f.bytes.as_ref().map_or(0, |b| b.len());
            log::debug!(
                "[DnD] drop[{idx}] name='{}' mime={} path={:?} bytes={blen}",
                f.name,
                f.mime,
                f.path
            );
        }
        // Only the first usable entry is opened.
        for f in &dropped_files {
            if let Some(path) = &f.path {
                log::debug!("[DnD] Loading from path: {}", path.display());
                self.start_loading_image_from_path(path.clone());
                return;
            }
            if let Some(bytes) = &f.bytes {
                log::debug!("[DnD] Loading from bytes: {} bytes", bytes.len());
                self.start_loading_image_from_bytes(
                    (!f.name.is_empty()).then(|| f.name.clone()),
                    bytes.to_vec(),
                );
                return;
            }
        }
        log::warn!("Drop failed: no readable bytes/path");
        self.set_status("Drop failed: no readable bytes/path");
    }
}
