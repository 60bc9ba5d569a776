//! Slider and preset-button models generated from the schema and preset table.

use crate::preset::PRESETS;
use crate::schema::{FilterValues, ParamKey, SCHEMA};

/// One labeled range control tagged with its parameter key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliderControl {
    pub key: ParamKey,
    pub label: &'static str,
    pub min: i32,
    pub max: i32,
    pub value: i32,
    /// Value followed by its unit, e.g. `120%`.
    pub readout: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetButton {
    pub name: &'static str,
}

/// One slider per schema parameter, positioned at the current values.
pub fn build_sliders(values: &FilterValues) -> Vec<SliderControl> {
    SCHEMA
        .iter()
        .map(|desc| {
            let value = values.get(desc.key);
            let (min, max) = desc.range().into_inner();
            SliderControl {
                key: desc.key,
                label: desc.label,
                min,
                max,
                value,
                readout: desc.format_value(value),
            }
        })
        .collect()
}

pub fn build_presets() -> Vec<PresetButton> {
    PRESETS
        .iter()
        .map(|preset| PresetButton { name: preset.name })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ControlPanel {
    sliders: Vec<SliderControl>,
    presets: Vec<PresetButton>,
}

impl ControlPanel {
    pub fn new(values: &FilterValues) -> Self {
        Self {
            sliders: build_sliders(values),
            presets: build_presets(),
        }
    }

    /// Clear and regenerate every slider from `values`.
    pub fn rebuild_sliders(&mut self, values: &FilterValues) {
        self.sliders = build_sliders(values);
    }

    /// Refresh a single slider's position and readout.
    pub fn update_readout(&mut self, key: ParamKey, value: i32) {
        if let Some(slider) = self.sliders.iter_mut().find(|s| s.key == key) {
            slider.value = value;
            slider.readout = key.descriptor().format_value(value);
        }
    }

    pub fn sliders(&self) -> &[SliderControl] {
        &self.sliders
    }

    pub fn presets(&self) -> &[PresetButton] {
        &self.presets
    }
}
