//! Dispatches UI events to session mutations and re-renders.
//!
//! The router owns the whole editing session: the session state, the output
//! surface and the control-panel models. Every event returns an [`Effect`]
//! describing the side effect the shell must carry out (spawn a decode, open a
//! save dialog, show a notice), so the router itself never touches threads,
//! dialogs or the filesystem.

use crate::compositor;
use crate::config::ImageLimits;
use crate::export::ExportRequest;
use crate::image::{ImageMeta, decode_image_from_bytes, decode_image_from_path};
use crate::panel::ControlPanel;
use crate::preset;
use crate::schema::ParamKey;
use crate::session::{SessionState, SourceImage};
use crate::surface::OutputSurface;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No image loaded; the surface is hidden behind a placeholder.
    Empty,
    Editing,
}

/// Where a selected image comes from.
pub enum ImageSource {
    Path(PathBuf),
    Bytes { name: Option<String>, bytes: Vec<u8> },
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Bytes { name, bytes } => f
                .debug_struct("Bytes")
                .field("name", name)
                .field("len", &bytes.len())
                .finish(),
        }
    }
}

impl ImageSource {
    pub fn description(&self) -> String {
        match self {
            Self::Path(path) => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), str::to_string),
            Self::Bytes { name, .. } => name
                .as_deref()
                .filter(|s| !s.is_empty())
                .map_or_else(|| "dropped bytes".to_string(), str::to_string),
        }
    }

    /// Decode on the calling thread. Meant to run on a worker.
    pub fn decode(self, limits: &ImageLimits) -> anyhow::Result<SourceImage> {
        match self {
            Self::Path(path) => {
                let pixels = decode_image_from_path(limits, &path)?;
                Ok(SourceImage::new(pixels, ImageMeta::from_path(&path)))
            }
            Self::Bytes { name, bytes } => {
                let byte_len = bytes.len();
                let pixels = decode_image_from_bytes(limits, bytes)?;
                Ok(SourceImage::new(
                    pixels,
                    ImageMeta::from_dropped_bytes(name.as_deref(), byte_len),
                ))
            }
        }
    }
}

#[derive(Debug)]
pub enum UiEvent {
    FileSelected(ImageSource),
    SliderMoved { key: ParamKey, value: i32 },
    PresetActivated { name: String },
    ResetActivated,
    ExportActivated,
}

/// Identifies one decode request; only the latest one is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket(u64);

#[derive(Debug)]
pub enum Effect {
    None,
    StartDecode {
        ticket: DecodeTicket,
        source: ImageSource,
    },
    Export(ExportRequest),
    Notice(String),
}

#[derive(Debug)]
struct PendingDecode {
    ticket: DecodeTicket,
    description: String,
}

#[derive(Debug)]
pub struct Router {
    session: SessionState,
    surface: OutputSurface,
    panel: ControlPanel,
    mode: Mode,
    next_ticket: u64,
    pending: Option<PendingDecode>,
    export_file_name: String,
}

impl Router {
    pub fn new(export_file_name: impl Into<String>) -> Self {
        let session = SessionState::new();
        let panel = ControlPanel::new(session.values());
        Self {
            session,
            surface: OutputSurface::new(),
            panel,
            mode: Mode::Empty,
            next_ticket: 0,
            pending: None,
            export_file_name: export_file_name.into(),
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    pub const fn surface(&self) -> &OutputSurface {
        &self.surface
    }

    pub const fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    /// Description of the image currently being decoded, if any.
    pub fn pending_description(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.description.as_str())
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Effect {
        log::debug!("Dispatching {event:?} in {:?} mode", self.mode);
        match event {
            UiEvent::FileSelected(source) => self.on_file_selected(source),
            UiEvent::SliderMoved { key, value } => self.on_slider_moved(key, value),
            UiEvent::PresetActivated { name } => self.on_preset_activated(&name),
            UiEvent::ResetActivated => self.on_reset(),
            UiEvent::ExportActivated => self.on_export(),
        }
    }

    /// Continuation of a decode started by [`UiEvent::FileSelected`].
    ///
    /// Results for anything but the most recent selection are dropped. A
    /// failure leaves the mode and loaded image untouched.
    pub fn finish_decode(
        &mut self,
        ticket: DecodeTicket,
        result: anyhow::Result<SourceImage>,
    ) -> Effect {
        let Some(pending) = self.pending.take_if(|p| p.ticket == ticket) else {
            log::debug!("Discarding stale decode result {ticket:?}");
            return Effect::None;
        };

        match result {
            Ok(image) => {
                let name = image.meta().display_name();
                let [w, h] = image.size();
                let _previous = self.session.replace_image(image);
                self.mode = Mode::Editing;
                self.surface.set_visible(true);
                self.render();
                log::info!("Loaded {name} ({w}x{h})");
                Effect::Notice(format!("Loaded {name} ({w} × {h} px)"))
            }
            Err(err) => {
                log::warn!("Failed to load {}: {err:#}", pending.description);
                Effect::Notice(format!("Failed to load {}: {err:#}", pending.description))
            }
        }
    }

    fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    fn render(&mut self) {
        compositor::render(&self.session, &mut self.surface);
    }

    fn on_file_selected(&mut self, source: ImageSource) -> Effect {
        let ticket = DecodeTicket(self.next_ticket);
        self.next_ticket = self.next_ticket.wrapping_add(1);
        self.pending = Some(PendingDecode {
            ticket,
            description: source.description(),
        });
        Effect::StartDecode { ticket, source }
    }

    fn on_slider_moved(&mut self, key: ParamKey, value: i32) -> Effect {
        if !self.is_editing() {
            return Effect::None;
        }
        let stored = self.session.values_mut().set(key, value);
        self.panel.update_readout(key, stored);
        self.render();
        Effect::None
    }

    fn on_preset_activated(&mut self, name: &str) -> Effect {
        if !self.is_editing() {
            return Effect::None;
        }
        let Some(preset) = preset::find(name) else {
            log::debug!("Ignoring unknown preset {name:?}");
            return Effect::None;
        };
        self.session.apply_values(preset.values);
        self.panel.rebuild_sliders(self.session.values());
        self.render();
        Effect::Notice(format!("Applied preset {name}."))
    }

    fn on_reset(&mut self) -> Effect {
        if !self.is_editing() {
            return Effect::None;
        }
        self.session.reset_values();
        self.panel.rebuild_sliders(self.session.values());
        self.render();
        Effect::Notice("Filters reset.".to_string())
    }

    fn on_export(&self) -> Effect {
        if !self.is_editing() {
            return Effect::None;
        }
        Effect::Export(ExportRequest {
            file_name: self.export_file_name.clone(),
            frame: self.surface.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::filter_expression;
    use crate::config::DEFAULT_EXPORT_FILE_NAME;
    use crate::preset::PRESETS;
    use crate::schema::{FilterValues, SCHEMA};
    use egui::{Color32, ColorImage};

    fn test_image(size: [usize; 2]) -> SourceImage {
        let pixels = ColorImage::new(size, vec![Color32::from_rgb(90, 140, 200); size[0] * size[1]]);
        SourceImage::new(pixels, ImageMeta::from_dropped_bytes(Some("photo.png"), 64))
    }

    fn select(router: &mut Router, name: &str) -> DecodeTicket {
        let effect = router.dispatch(UiEvent::FileSelected(ImageSource::Bytes {
            name: Some(name.to_string()),
            bytes: Vec::new(),
        }));
        let Effect::StartDecode { ticket, .. } = effect else {
            panic!("expected a decode request, got {effect:?}");
        };
        ticket
    }

    fn loaded_router() -> Router {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        let ticket = select(&mut router, "photo.png");
        router.finish_decode(ticket, Ok(test_image([5, 4])));
        router
    }

    #[test]
    fn starts_empty_with_hidden_surface() {
        let router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        assert_eq!(router.mode(), Mode::Empty);
        assert!(!router.surface().is_visible());
        assert_eq!(router.panel().sliders().len(), SCHEMA.len());
        assert_eq!(router.panel().presets().len(), PRESETS.len());
    }

    #[test]
    fn selecting_a_file_waits_for_decode() {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        select(&mut router, "photo.png");
        assert_eq!(router.mode(), Mode::Empty);
        assert_eq!(router.pending_description(), Some("photo.png"));
        assert!(router.session().loaded_image().is_none());
    }

    #[test]
    fn successful_decode_switches_to_editing_and_renders() {
        let router = loaded_router();
        assert_eq!(router.mode(), Mode::Editing);
        assert!(router.surface().is_visible());
        assert_eq!(router.surface().size(), [5, 4]);
        assert_eq!(router.surface().generation(), 1);
        assert!(router.pending_description().is_none());
        assert!(filter_expression(router.session().values()).contains("brightness(100%)"));
    }

    #[test]
    fn failed_decode_keeps_prior_mode_and_reports() {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        let ticket = select(&mut router, "broken.jpg");
        let effect = router.finish_decode(ticket, Err(anyhow::anyhow!("bad header")));
        assert_eq!(router.mode(), Mode::Empty);
        assert!(!router.surface().is_visible());
        let Effect::Notice(msg) = effect else {
            panic!("expected a notice, got {effect:?}");
        };
        assert!(msg.contains("broken.jpg") && msg.contains("bad header"));
    }

    #[test]
    fn failed_decode_while_editing_keeps_current_image() {
        let mut router = loaded_router();
        let ticket = select(&mut router, "broken.jpg");
        router.finish_decode(ticket, Err(anyhow::anyhow!("truncated")));
        assert_eq!(router.mode(), Mode::Editing);
        assert_eq!(router.surface().size(), [5, 4]);
    }

    #[test]
    fn stale_decode_results_are_discarded() {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        let first = select(&mut router, "first.png");
        let second = select(&mut router, "second.png");
        assert!(matches!(
            router.finish_decode(first, Ok(test_image([2, 2]))),
            Effect::None
        ));
        assert_eq!(router.mode(), Mode::Empty);
        router.finish_decode(second, Ok(test_image([3, 1])));
        assert_eq!(router.surface().size(), [3, 1]);
    }

    #[test]
    fn new_image_replaces_previous_and_keeps_values() {
        let mut router = loaded_router();
        router.dispatch(UiEvent::SliderMoved {
            key: ParamKey::Sepia,
            value: 30,
        });
        let ticket = select(&mut router, "next.png");
        router.finish_decode(ticket, Ok(test_image([8, 2])));
        assert_eq!(router.surface().size(), [8, 2]);
        assert_eq!(router.session().values().get(ParamKey::Sepia), 30);
    }

    #[test]
    fn slider_ignored_while_empty() {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        router.dispatch(UiEvent::SliderMoved {
            key: ParamKey::Contrast,
            value: 150,
        });
        assert_eq!(*router.session().values(), FilterValues::defaults());
        assert_eq!(router.panel().sliders()[ParamKey::Contrast.index()].readout, "100%");
    }

    #[test]
    fn slider_updates_value_readout_and_surface() {
        let mut router = loaded_router();
        let before = router.surface().generation();
        router.dispatch(UiEvent::SliderMoved {
            key: ParamKey::Contrast,
            value: 150,
        });
        assert_eq!(router.session().values().get(ParamKey::Contrast), 150);
        assert_eq!(router.panel().sliders()[ParamKey::Contrast.index()].readout, "150%");
        assert_eq!(router.surface().generation(), before + 1);
    }

    #[test]
    fn slider_extremes_are_reflected_verbatim() {
        let mut router = loaded_router();
        for desc in &SCHEMA {
            for value in [desc.min, desc.max] {
                router.dispatch(UiEvent::SliderMoved {
                    key: desc.key,
                    value,
                });
                let readout = &router.panel().sliders()[desc.key.index()].readout;
                assert_eq!(readout, &format!("{value}{}", desc.unit.suffix()));
                let term = format!("{}({value}{})", desc.function, desc.unit.suffix());
                assert!(filter_expression(router.session().values()).contains(&term));
            }
        }
    }

    #[test]
    fn negative_preset_replaces_every_value() {
        let mut router = loaded_router();
        for (key, value) in [(ParamKey::Brightness, 180), (ParamKey::Blur, 7), (ParamKey::Sepia, 55)] {
            router.dispatch(UiEvent::SliderMoved { key, value });
        }
        router.dispatch(UiEvent::PresetActivated {
            name: "negative".to_string(),
        });
        let negative = preset::find("negative").unwrap();
        assert_eq!(router.session().values().get(ParamKey::Invert), 100);
        assert_eq!(*router.session().values(), negative.values);
        assert_eq!(router.panel().sliders()[ParamKey::Blur.index()].value, 0);
    }

    #[test]
    fn every_preset_sets_every_key() {
        let mut router = loaded_router();
        for preset in &PRESETS {
            router.dispatch(UiEvent::PresetActivated {
                name: preset.name.to_string(),
            });
            for desc in &SCHEMA {
                assert_eq!(
                    router.session().values().get(desc.key),
                    preset.values.get(desc.key)
                );
                assert_eq!(
                    router.panel().sliders()[desc.key.index()].value,
                    preset.values.get(desc.key)
                );
            }
        }
    }

    #[test]
    fn unknown_preset_is_ignored() {
        let mut router = loaded_router();
        let before = *router.session().values();
        let effect = router.dispatch(UiEvent::PresetActivated {
            name: "sunset".to_string(),
        });
        assert!(matches!(effect, Effect::None));
        assert_eq!(*router.session().values(), before);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut router = loaded_router();
        router.dispatch(UiEvent::PresetActivated {
            name: "dramatic".to_string(),
        });
        router.dispatch(UiEvent::ResetActivated);
        assert_eq!(*router.session().values(), FilterValues::defaults());
        assert_eq!(router.panel().sliders()[ParamKey::Contrast.index()].readout, "100%");
    }

    #[test]
    fn bulk_actions_are_noops_while_empty() {
        let mut router = Router::new(DEFAULT_EXPORT_FILE_NAME);
        for event in [
            UiEvent::PresetActivated {
                name: "negative".to_string(),
            },
            UiEvent::ResetActivated,
            UiEvent::ExportActivated,
        ] {
            assert!(matches!(router.dispatch(event), Effect::None));
        }
        assert_eq!(*router.session().values(), FilterValues::defaults());
        assert!(router.session().loaded_image().is_none());
        assert!(!router.surface().is_visible());
        assert_eq!(router.surface().generation(), 0);
        assert_eq!(router.surface().size(), [0, 0]);
    }

    #[test]
    fn export_hands_out_current_frame() {
        let mut router = loaded_router();
        router.dispatch(UiEvent::PresetActivated {
            name: "negative".to_string(),
        });
        let generation = router.surface().generation();
        let Effect::Export(request) = router.dispatch(UiEvent::ExportActivated) else {
            panic!("expected an export request");
        };
        assert_eq!(request.file_name, "edited-image.png");
        assert_eq!(request.frame.size, [5, 4]);
        assert_eq!(request.frame, router.surface().snapshot());
        assert_eq!(router.surface().generation(), generation);
    }
}
