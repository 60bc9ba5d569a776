//! Main egui/eframe application state and UI orchestration.

use crate::config::AppConfig;
use crate::export::{self, ExportRequest};
use crate::router::{Effect, Mode, Router, UiEvent};
use egui::{Context, Key};
use egui_file_dialog::{DialogState, FileDialog};
use std::path::PathBuf;
use std::time::Duration;

mod image_loader;
mod preview;
mod ui;
mod ui_state;

use image_loader::PendingImageTask;
use preview::PreviewTexture;
use ui_state::{NativeDialog, UiState};

pub struct FilterlabApp {
    router: Router,
    config: AppConfig,
    pending_image_task: Option<PendingImageTask>,
    preview: Option<PreviewTexture>,
    ui: UiState,
    active_dialog: Option<NativeDialog>,
    last_image_dir: Option<PathBuf>,
    last_export_dir: Option<PathBuf>,
}

enum DialogOutcome {
    Pending,
    Picked(PathBuf),
    Cancelled,
    Closed,
}

impl FilterlabApp {
    pub fn new(config: AppConfig) -> Self {
        let router = Router::new(config.export.file_name());
        Self {
            router,
            config,
            pending_image_task: None,
            preview: None,
            ui: UiState::default(),
            active_dialog: None,
            last_image_dir: None,
            last_export_dir: None,
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.ui.last_status = Some(msg.into());
    }

    fn has_image(&self) -> bool {
        self.router.mode() == Mode::Editing
    }

    /// Route one UI event and carry out whatever the router asks for.
    pub(crate) fn dispatch(&mut self, event: UiEvent) {
        let effect = self.router.dispatch(event);
        self.apply_effect(effect);
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::StartDecode { ticket, source } => self.start_image_decode(ticket, source),
            Effect::Export(request) => self.open_export_dialog(request),
            Effect::Notice(msg) => self.set_status(msg),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        if ctx.input(|i| i.key_pressed(Key::B) && i.modifiers.command) {
            self.ui.side_open = !self.ui.side_open;
        }
        if self.active_dialog.is_none()
            && ctx.input(|i| i.key_pressed(Key::O) && i.modifiers.command)
        {
            self.open_image_dialog();
        }
        if self.active_dialog.is_none()
            && self.has_image()
            && ctx.input(|i| i.key_pressed(Key::S) && i.modifiers.command)
        {
            self.dispatch(UiEvent::ExportActivated);
        }
        if self.has_image() && ctx.input(|i| i.key_pressed(Key::R) && i.modifiers.command) {
            self.dispatch(UiEvent::ResetActivated);
        }
    }

    fn poll_dialog(dialog: &mut FileDialog, ctx: &Context) -> DialogOutcome {
        dialog.update(ctx);
        if let Some(path) = dialog.take_picked() {
            return DialogOutcome::Picked(path);
        }
        match dialog.state() {
            DialogState::Cancelled => DialogOutcome::Cancelled,
            DialogState::Closed => DialogOutcome::Closed,
            _ => DialogOutcome::Pending,
        }
    }

    fn update_active_dialog(&mut self, ctx: &Context) {
        let Some(active) = self.active_dialog.as_mut() else {
            return;
        };
        let dialog = match active {
            NativeDialog::Open(dialog) | NativeDialog::SaveExport { dialog, .. } => dialog,
        };
        match Self::poll_dialog(dialog, ctx) {
            DialogOutcome::Pending => {}
            DialogOutcome::Closed => self.active_dialog = None,
            DialogOutcome::Cancelled => {
                let msg = match self.active_dialog.take() {
                    Some(NativeDialog::SaveExport { .. }) => "Export canceled.",
                    _ => "Open canceled.",
                };
                self.set_status(msg);
            }
            DialogOutcome::Picked(path) => match self.active_dialog.take() {
                Some(NativeDialog::Open(_)) => self.start_loading_image_from_path(path),
                Some(NativeDialog::SaveExport { request, .. }) => {
                    self.finish_export(path, &request);
                }
                None => {}
            },
        }
    }

    fn finish_export(&mut self, path: PathBuf, request: &ExportRequest) {
        let path = export::with_png_extension(path);
        self.remember_export_dir_from_path(&path);
        match export::export_png(&path, &request.frame) {
            Ok(()) => {
                log::info!("Exported {}", path.display());
                self.set_status(format!("Exported {}", path.display()));
            }
            Err(err) => {
                log::warn!("Export to {} failed: {err:#}", path.display());
                self.set_status(format!("Export failed: {err:#}"));
            }
        }
    }
}

impl eframe::App for FilterlabApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader();

        if !ctx.wants_keyboard_input() {
            self.handle_shortcuts(ctx);
        }

        if self.pending_image_task.is_some() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::SidePanel::right("side")
            .resizable(true)
            .default_width(self.config.side_panel_width())
            .show_animated(ctx, self.ui.side_open, |ui| self.ui_side_controls(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_central_image(ui));

        self.update_active_dialog(ctx);
    }

    // Required by eframe 0.34; all drawing happens in `update`, which eframe still calls first.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}
}
