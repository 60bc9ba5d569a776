//! Static description of the adjustable filter parameters.

use std::fmt;
use std::ops::RangeInclusive;

/// Identifies one adjustable parameter. Variant order is the schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    Brightness,
    Contrast,
    Saturation,
    HueRotation,
    Blur,
    Grayscale,
    Sepia,
    Opacity,
    Invert,
}

impl ParamKey {
    pub const ALL: [Self; 9] = [
        Self::Brightness,
        Self::Contrast,
        Self::Saturation,
        Self::HueRotation,
        Self::Blur,
        Self::Grayscale,
        Self::Sepia,
        Self::Opacity,
        Self::Invert,
    ];
    pub const COUNT: usize = Self::ALL.len();

    /// Stable textual key used for lookup and logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Contrast => "contrast",
            Self::Saturation => "saturation",
            Self::HueRotation => "hueRotation",
            Self::Blur => "blur",
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Opacity => "opacity",
            Self::Invert => "invert",
        }
    }

    /// Look a parameter up by its textual key (`"hueRotation"`).
    #[allow(dead_code)]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static ParameterDescriptor {
        &SCHEMA[self.index()]
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Degrees,
    Pixels,
}

impl Unit {
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Degrees => "deg",
            Self::Pixels => "px",
        }
    }
}

/// Range, unit, default and compositing function of a single parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub key: ParamKey,
    pub label: &'static str,
    pub min: i32,
    pub max: i32,
    pub unit: Unit,
    pub default: i32,
    /// Name of the filter function this parameter drives, e.g. `hue-rotate`.
    pub function: &'static str,
}

impl ParameterDescriptor {
    pub const fn range(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Readout text: the value immediately followed by the unit (`100%`, `20deg`).
    pub fn format_value(&self, value: i32) -> String {
        format!("{value}{}", self.unit.suffix())
    }
}

const fn descriptor(
    key: ParamKey,
    label: &'static str,
    range: (i32, i32),
    unit: Unit,
    default: i32,
    function: &'static str,
) -> ParameterDescriptor {
    ParameterDescriptor {
        key,
        label,
        min: range.0,
        max: range.1,
        unit,
        default,
        function,
    }
}

/// All parameters in declaration order. Indexed by [`ParamKey::index`].
pub static SCHEMA: [ParameterDescriptor; ParamKey::COUNT] = [
    descriptor(ParamKey::Brightness, "Brightness", (0, 200), Unit::Percent, 100, "brightness"),
    descriptor(ParamKey::Contrast, "Contrast", (0, 200), Unit::Percent, 100, "contrast"),
    descriptor(ParamKey::Saturation, "Saturation", (0, 200), Unit::Percent, 100, "saturate"),
    descriptor(ParamKey::HueRotation, "Hue", (0, 360), Unit::Degrees, 0, "hue-rotate"),
    descriptor(ParamKey::Blur, "Blur", (0, 20), Unit::Pixels, 0, "blur"),
    descriptor(ParamKey::Grayscale, "Grayscale", (0, 100), Unit::Percent, 0, "grayscale"),
    descriptor(ParamKey::Sepia, "Sepia", (0, 100), Unit::Percent, 0, "sepia"),
    descriptor(ParamKey::Opacity, "Opacity", (0, 100), Unit::Percent, 100, "opacity"),
    descriptor(ParamKey::Invert, "Invert", (0, 100), Unit::Percent, 0, "invert"),
];

/// Current value of every schema parameter.
///
/// Backed by a fixed array, so the key set always matches the schema exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterValues([i32; ParamKey::COUNT]);

impl Default for FilterValues {
    fn default() -> Self {
        Self::defaults()
    }
}

impl FilterValues {
    pub fn defaults() -> Self {
        let mut values = [0; ParamKey::COUNT];
        for desc in &SCHEMA {
            values[desc.key.index()] = desc.default;
        }
        Self(values)
    }

    /// Build from raw values in schema order. Bounds are not checked here.
    pub const fn from_array(values: [i32; ParamKey::COUNT]) -> Self {
        Self(values)
    }

    pub const fn get(&self, key: ParamKey) -> i32 {
        self.0[key.index()]
    }

    /// Store `value` clamped to the parameter range and return what was stored.
    pub fn set(&mut self, key: ParamKey, value: i32) -> i32 {
        let clamped = key.descriptor().clamp(value);
        self.0[key.index()] = clamped;
        clamped
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, i32)> + '_ {
        ParamKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_indexed_by_key() {
        for (idx, desc) in SCHEMA.iter().enumerate() {
            assert_eq!(desc.key.index(), idx);
            assert_eq!(ParamKey::ALL[idx], desc.key);
        }
    }

    #[test]
    fn defaults_lie_within_bounds() {
        for desc in &SCHEMA {
            assert!(desc.min <= desc.default, "{} default below min", desc.key);
            assert!(desc.default <= desc.max, "{} default above max", desc.key);
        }
    }

    #[test]
    fn brightness_default_is_hundred_percent() {
        let desc = ParamKey::Brightness.descriptor();
        assert_eq!(desc.default, 100);
        assert_eq!(desc.unit.suffix(), "%");
        assert_eq!(desc.format_value(desc.default), "100%");
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in ParamKey::ALL.iter().enumerate() {
            for b in &ParamKey::ALL[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }

    #[test]
    fn keys_resolve_from_text() {
        for key in ParamKey::ALL {
            assert_eq!(ParamKey::from_key(key.as_str()), Some(key));
        }
        assert_eq!(ParamKey::from_key("hueRotation"), Some(ParamKey::HueRotation));
        assert_eq!(ParamKey::from_key("hue-rotate"), None);
        assert_eq!(ParamKey::from_key("Brightness"), None);
    }

    #[test]
    fn set_clamps_to_declared_range() {
        let mut values = FilterValues::defaults();
        assert_eq!(values.set(ParamKey::Blur, 50), 20);
        assert_eq!(values.set(ParamKey::HueRotation, -5), 0);
        assert_eq!(values.set(ParamKey::Contrast, 200), 200);
        assert_eq!(values.get(ParamKey::Blur), 20);
    }

    #[test]
    fn iter_follows_schema_order() {
        let keys: Vec<ParamKey> = FilterValues::defaults().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ParamKey::ALL.to_vec());
    }
}
