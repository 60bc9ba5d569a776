use super::super::FilterlabApp;
use super::icons;
use crate::router::UiEvent;

impl FilterlabApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Use egui's built-in theme toggle so icon matches current mode.
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            self.ui_file_menu(ui);
            ui.separator();

            self.ui_side_toggle(ui);
            ui.separator();

            let has_image = self.has_image();
            if ui
                .add_enabled(
                    has_image,
                    egui::Button::new(format!("{} Reset", icons::ICON_RESET))
                        .shortcut_text("Ctrl+R"),
                )
                .on_hover_text("Restore every filter to its default (Ctrl+R)")
                .clicked()
            {
                self.dispatch(UiEvent::ResetActivated);
            }
            if ui
                .add_enabled(
                    has_image,
                    egui::Button::new(format!("{} Export PNG", icons::ICON_EXPORT))
                        .shortcut_text("Ctrl+S"),
                )
                .on_hover_text("Save the filtered image as PNG (Ctrl+S)")
                .clicked()
            {
                self.dispatch(UiEvent::ExportActivated);
            }
        });
    }

    fn ui_file_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button(format!("{} File", icons::ICON_MENU), |ui| {
            if ui
                .add(egui::Button::new("Open image…").shortcut_text("Ctrl+O"))
                .on_hover_text("Open an image (Ctrl+O). You can also drag & drop into the center.")
                .clicked()
            {
                self.open_image_dialog();
                ui.close();
            }

            ui.separator();

            if ui
                .add_enabled(
                    self.has_image(),
                    egui::Button::new("Export PNG…").shortcut_text("Ctrl+S"),
                )
                .clicked()
            {
                self.dispatch(UiEvent::ExportActivated);
                ui.close();
            }
        });
    }

    fn ui_side_toggle(&mut self, ui: &mut egui::Ui) {
        let side_label = if self.ui.side_open {
            "Hide controls"
        } else {
            "Show controls"
        };
        if ui
            .add(
                egui::Button::new(format!("{} {side_label}", icons::ICON_SIDE_TOGGLE))
                    .shortcut_text("Ctrl+B"),
            )
            .on_hover_text("Toggle the adjustments panel (Ctrl+B)")
            .clicked()
        {
            self.ui.side_open = !self.ui.side_open;
        }
    }
}
