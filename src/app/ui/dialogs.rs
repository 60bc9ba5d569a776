use super::super::{FilterlabApp, NativeDialog};
use crate::export::ExportRequest;
use egui_file_dialog::FileDialog;
use std::path::Path;

/// Extensions offered by the open dialog; keep in sync with the `image` crate features.
const OPENABLE_EXTENSIONS: [&str; 16] = [
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "tga", "tiff", "tif", "pnm", "pbm", "pgm",
    "ppm", "hdr", "dds",
];
const PNG_FILTER: &str = "PNG image";

fn starting_in(dialog: FileDialog, dir: Option<&Path>) -> FileDialog {
    match dir {
        Some(dir) => dialog.initial_directory(dir.to_path_buf()),
        None => dialog,
    }
}

impl FilterlabApp {
    pub(crate) fn open_image_dialog(&mut self) {
        let dialog = FileDialog::new()
            .title("Open image")
            .add_file_filter_extensions("All images", OPENABLE_EXTENSIONS.to_vec())
            .add_file_filter_extensions("PNG", vec!["png"])
            .add_file_filter_extensions("JPEG", vec!["jpg", "jpeg"])
            .add_file_filter_extensions("WebP", vec!["webp"])
            .default_file_filter("All images");
        let mut dialog = starting_in(dialog, self.last_image_dir.as_deref());
        dialog.pick_file();
        self.active_dialog = Some(NativeDialog::Open(dialog));
    }

    pub(crate) fn open_export_dialog(&mut self, request: ExportRequest) {
        let dialog = FileDialog::new()
            .title("Export PNG")
            .default_file_name(&request.file_name)
            .add_save_extension(PNG_FILTER, "png")
            .default_save_extension(PNG_FILTER);
        let mut dialog = starting_in(dialog, self.last_export_dir.as_deref());
        dialog.save_file();
        self.active_dialog = Some(NativeDialog::SaveExport { dialog, request });
    }
}
