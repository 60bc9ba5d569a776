use super::FilterlabApp;
use crate::router::{DecodeTicket, ImageSource, UiEvent};
use crate::session::SourceImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// A decode running on a worker thread, tagged with the ticket it answers.
pub struct PendingImageTask {
    rx: Receiver<anyhow::Result<SourceImage>>,
    ticket: DecodeTicket,
}

impl FilterlabApp {
    pub(crate) fn start_loading_image_from_path(&mut self, path: PathBuf) {
        self.remember_image_dir_from_path(&path);
        self.dispatch(UiEvent::FileSelected(ImageSource::Path(path)));
    }

    pub(crate) fn start_loading_image_from_bytes(&mut self, name: Option<String>, bytes: Vec<u8>) {
        self.dispatch(UiEvent::FileSelected(ImageSource::Bytes { name, bytes }));
    }

    pub(super) fn start_image_decode(&mut self, ticket: DecodeTicket, source: ImageSource) {
        let description = source.description();
        let limits = self.config.effective_image_limits();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(source.decode(&limits));
        });
        // Replacing the task drops the older receiver, so a superseded worker's
        // result has nowhere to go.
        self.pending_image_task = Some(PendingImageTask { rx, ticket });
        log::info!("Loading {description}");
        self.set_status(format!("Loading {description}…"));
    }

    pub(super) fn poll_image_loader(&mut self) {
        let Some(task) = self.pending_image_task.take() else {
            return;
        };
        let result = match task.rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                self.pending_image_task = Some(task);
                return;
            }
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("worker disconnected")),
        };
        let effect = self.router.finish_decode(task.ticket, result);
        self.apply_effect(effect);
    }

    pub(crate) fn remember_image_dir_from_path(&mut self, path: &Path) {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.last_image_dir = Some(dir);
    }

    pub(crate) fn remember_export_dir_from_path(&mut self, path: &Path) {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.last_export_dir = Some(dir);
    }
}
