use crate::export::ExportRequest;
use egui_file_dialog::FileDialog;

pub struct UiState {
    pub(super) side_open: bool,
    pub(super) last_status: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            side_open: true,
            last_status: None,
        }
    }
}

#[derive(Debug)]
pub enum NativeDialog {
    Open(FileDialog),
    SaveExport {
        dialog: FileDialog,
        request: ExportRequest,
    },
}
