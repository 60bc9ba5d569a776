//! Named bundles of parameter values.

use crate::schema::FilterValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub values: FilterValues,
}

// Value order: brightness, contrast, saturation, hueRotation, blur, grayscale, sepia, opacity, invert.
const fn preset(name: &'static str, values: [i32; 9]) -> Preset {
    Preset {
        name,
        values: FilterValues::from_array(values),
    }
}

/// Built-in presets in display order.
pub static PRESETS: [Preset; 9] = [
    preset("normal", [100, 100, 100, 0, 0, 0, 0, 100, 0]),
    preset("vintage", [105, 90, 80, 10, 1, 10, 40, 100, 0]),
    preset("oldSchool", [95, 120, 70, 0, 2, 30, 60, 100, 0]),
    preset("blackAndWhite", [100, 130, 0, 0, 0, 100, 0, 100, 0]),
    preset("warm", [110, 105, 120, 350, 0, 0, 20, 100, 0]),
    preset("cool", [100, 110, 90, 20, 0, 0, 0, 100, 0]),
    preset("faded", [110, 80, 85, 0, 1, 5, 15, 100, 0]),
    preset("dramatic", [90, 150, 120, 0, 0, 0, 0, 100, 0]),
    preset("negative", [100, 100, 100, 0, 0, 0, 0, 100, 100]),
];

pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ParamKey, SCHEMA};

    #[test]
    fn every_preset_value_is_within_bounds() {
        for preset in &PRESETS {
            for desc in &SCHEMA {
                let value = preset.values.get(desc.key);
                assert!(
                    desc.range().contains(&value),
                    "preset {} sets {} to {value}, outside {:?}",
                    preset.name,
                    desc.key,
                    desc.range()
                );
            }
        }
    }

    #[test]
    fn preset_names_are_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn normal_matches_schema_defaults() {
        let normal = find("normal").expect("normal preset");
        assert_eq!(normal.values, FilterValues::defaults());
    }

    #[test]
    fn negative_only_inverts() {
        let negative = find("negative").expect("negative preset");
        assert_eq!(negative.values.get(ParamKey::Invert), 100);
        for key in ParamKey::ALL.into_iter().filter(|k| *k != ParamKey::Invert) {
            assert_eq!(negative.values.get(key), key.descriptor().default);
        }
    }

    #[test]
    fn unknown_preset_is_not_found() {
        assert!(find("sunset").is_none());
    }
}
