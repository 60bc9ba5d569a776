use super::super::FilterlabApp;
use super::icons;
use crate::compositor::filter_expression;
use crate::panel::{PresetButton, SliderControl};
use crate::router::UiEvent;
use egui::RichText;

const PRESET_COLUMNS: usize = 3;

impl FilterlabApp {
    pub(crate) fn ui_side_controls(&mut self, ui: &mut egui::Ui) {
        let has_image = self.has_image();
        // Widgets read the panel model; events are dispatched once it is released.
        let mut events = Vec::new();
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Adjustments");
            if !has_image {
                ui.label(RichText::new("Load an image to adjust filters.").small());
            }
            ui.add_space(4.0);
            ui.add_enabled_ui(has_image, |ui| {
                Self::ui_sliders(ui, self.router.panel().sliders(), &mut events);
                ui.add_space(8.0);
                ui.separator();
                ui.label(RichText::new(format!("{} Presets", icons::ICON_PRESETS)).strong());
                Self::ui_presets(ui, self.router.panel().presets(), &mut events);
                ui.add_space(8.0);
                if ui
                    .button(format!("{} Reset filters", icons::ICON_RESET))
                    .on_hover_text("Restore every filter to its default (Ctrl+R)")
                    .clicked()
                {
                    events.push(UiEvent::ResetActivated);
                }
            });
            ui.add_space(8.0);
            egui::CollapsingHeader::new("Filter expression")
                .default_open(false)
                .show(ui, |ui| {
                    let expression = filter_expression(self.router.session().values());
                    ui.label(RichText::new(expression).monospace().small());
                });
        });
        for event in events {
            self.dispatch(event);
        }
    }

    fn ui_sliders(ui: &mut egui::Ui, sliders: &[SliderControl], events: &mut Vec<UiEvent>) {
        for slider in sliders {
            ui.horizontal(|ui| {
                ui.label(slider.label);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(&slider.readout).monospace());
                });
            });
            let mut value = slider.value;
            let response = ui.add(
                egui::Slider::new(&mut value, slider.min..=slider.max)
                    .show_value(false)
                    .step_by(1.0),
            );
            if response.changed() {
                events.push(UiEvent::SliderMoved {
                    key: slider.key,
                    value,
                });
            }
        }
    }

    fn ui_presets(ui: &mut egui::Ui, presets: &[PresetButton], events: &mut Vec<UiEvent>) {
        egui::Grid::new("preset_grid")
            .num_columns(PRESET_COLUMNS)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                for (idx, preset) in presets.iter().enumerate() {
                    if ui.button(preset.name).clicked() {
                        events.push(UiEvent::PresetActivated {
                            name: preset.name.to_string(),
                        });
                    }
                    if idx % PRESET_COLUMNS == PRESET_COLUMNS - 1 {
                        ui.end_row();
                    }
                }
            });
    }
}
