use super::super::FilterlabApp;
use crate::image::human_readable_bytes;
use egui::{Color32, RichText};

impl FilterlabApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match self.router.session().loaded_image() {
                Some(image) => {
                    let meta = image.meta();
                    let [w, h] = image.size();
                    let mut summary = format!("{} · {w} × {h} px", meta.display_name());
                    if let Some(bytes) = meta.byte_len() {
                        summary.push_str(&format!(" · {}", human_readable_bytes(bytes)));
                    }
                    let response = ui.label(
                        RichText::new(summary)
                            .small()
                            .color(Color32::from_gray(180)),
                    );
                    if let Some(path) = meta.path() {
                        response.on_hover_text(path.display().to_string());
                    }
                }
                None => {
                    ui.label(
                        RichText::new("No image")
                            .small()
                            .color(Color32::from_gray(180)),
                    );
                }
            }
            if let Some(msg) = &self.ui.last_status {
                ui.separator();
                ui.label(
                    RichText::new(msg.as_str())
                        .small()
                        .color(Color32::from_gray(200)),
                );
            }
        });
    }
}
