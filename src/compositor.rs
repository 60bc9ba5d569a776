//! Turns filter values into a filter expression and paints the loaded image.

use crate::schema::FilterValues;
use crate::session::SessionState;
use crate::surface::OutputSurface;

/// Render `values` as `function(value unit)` terms in schema order.
pub fn filter_expression(values: &FilterValues) -> String {
    values
        .iter()
        .map(|(key, value)| {
            let desc = key.descriptor();
            format!("{}({value}{})", desc.function, desc.unit.suffix())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Paint the loaded image through the current filters. No-op without an image.
pub fn render(session: &SessionState, surface: &mut OutputSurface) {
    let Some(image) = session.loaded_image() else {
        return;
    };
    let expression = filter_expression(session.values());

    surface.resize(image.size());
    surface.clear();
    if let Err(err) = surface.set_filter(&expression) {
        log::warn!("Ignoring filter expression `{expression}`: {err}");
    }
    surface.draw_image(image.pixels());
    log::debug!("Rendered {:?} with `{expression}`", image.size());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageMeta;
    use crate::preset;
    use crate::schema::ParamKey;
    use crate::session::SourceImage;
    use egui::{Color32, ColorImage};

    fn session_with_image() -> SessionState {
        let mut session = SessionState::new();
        let pixels = ColorImage::new([4, 3], vec![Color32::from_rgb(120, 80, 40); 12]);
        session.replace_image(SourceImage::new(
            pixels,
            ImageMeta::from_dropped_bytes(Some("test.png"), 12),
        ));
        session
    }

    #[test]
    fn default_expression_lists_every_function() {
        assert_eq!(
            filter_expression(&FilterValues::defaults()),
            "brightness(100%) contrast(100%) saturate(100%) hue-rotate(0deg) blur(0px) \
             grayscale(0%) sepia(0%) opacity(100%) invert(0%)"
        );
    }

    #[test]
    fn expression_depends_only_on_values() {
        let mut slid = FilterValues::defaults();
        for key in ParamKey::ALL {
            slid.set(key, preset::find("vintage").unwrap().values.get(key));
        }
        let applied = preset::find("vintage").unwrap().values;
        assert_eq!(filter_expression(&slid), filter_expression(&applied));

        let mut session = SessionState::new();
        session.apply_values(applied);
        session.reset_values();
        assert_eq!(
            filter_expression(session.values()),
            filter_expression(&FilterValues::defaults())
        );
    }

    #[test]
    fn boundary_values_appear_verbatim() {
        let mut values = FilterValues::defaults();
        values.set(ParamKey::HueRotation, 360);
        values.set(ParamKey::Blur, 20);
        values.set(ParamKey::Brightness, 0);
        let expr = filter_expression(&values);
        assert!(expr.contains("hue-rotate(360deg)"));
        assert!(expr.contains("blur(20px)"));
        assert!(expr.contains("brightness(0%)"));
    }

    #[test]
    fn render_without_image_is_a_noop() {
        let session = SessionState::new();
        let mut surface = OutputSurface::new();
        render(&session, &mut surface);
        assert_eq!(surface.size(), [0, 0]);
        assert_eq!(surface.generation(), 0);
    }

    #[test]
    fn render_sizes_surface_to_native_dimensions() {
        let session = session_with_image();
        let mut surface = OutputSurface::new();
        render(&session, &mut surface);
        assert_eq!(surface.size(), [4, 3]);
        assert_eq!(surface.snapshot(), *session.loaded_image().unwrap().pixels());
    }

    #[test]
    fn render_twice_is_idempotent() {
        let mut session = session_with_image();
        session.values_mut().set(ParamKey::Sepia, 70);
        session.values_mut().set(ParamKey::Blur, 1);
        let mut surface = OutputSurface::new();
        render(&session, &mut surface);
        let first = surface.snapshot();
        render(&session, &mut surface);
        assert_eq!(surface.snapshot(), first);
        assert_eq!(surface.size(), [4, 3]);
    }
}
