//! Filter catalog: the fixed set of visual filters and their numeric bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterId {
    /// Brightness multiplier.
    Brightness,
    /// Contrast multiplier.
    Contrast,
    /// Saturation multiplier.
    Saturate,
    /// Color inversion amount.
    Invert,
    /// Grayscale amount.
    Grayscale,
    /// Sepia amount.
    Sepia,
    /// Hue rotation in degrees.
    HueRotate,
    /// Gaussian blur radius in pixels.
    Blur,
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(FilterCatalog::info(*self).name)
    }
}

/// Static metadata for one filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterInfo {
    /// Identifier.
    pub id: FilterId,
    /// Display name.
    pub name: &'static str,
    /// CSS filter function name.
    pub css: &'static str,
    /// CSS unit appended to the value.
    pub unit: &'static str,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Neutral value; a filter at its default has no visual effect.
    pub default: f64,
    /// Fine adjustment step.
    pub step: f64,
    /// Coarse adjustment step, the default delta for filter adjustments.
    pub large_step: f64,
}

impl FilterInfo {
    /// Clamp `value` into this filter's bounds.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// True when `value` equals the neutral default.
    pub fn is_default(&self, value: f64) -> bool {
        (value - self.default).abs() < f64::EPSILON
    }
}

/// Catalog entries in canonical order.
const CATALOG: &[FilterInfo] = &[
    FilterInfo {
        id: FilterId::Brightness,
        name: "brightness",
        css: "brightness",
        unit: "",
        min: 0.0,
        max: 3.0,
        default: 1.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::Contrast,
        name: "contrast",
        css: "contrast",
        unit: "",
        min: 0.0,
        max: 3.0,
        default: 1.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::Saturate,
        name: "saturate",
        css: "saturate",
        unit: "",
        min: 0.0,
        max: 3.0,
        default: 1.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::Invert,
        name: "invert",
        css: "invert",
        unit: "",
        min: 0.0,
        max: 1.0,
        default: 0.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::Grayscale,
        name: "grayscale",
        css: "grayscale",
        unit: "",
        min: 0.0,
        max: 1.0,
        default: 0.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::Sepia,
        name: "sepia",
        css: "sepia",
        unit: "",
        min: 0.0,
        max: 1.0,
        default: 0.0,
        step: 0.01,
        large_step: 0.1,
    },
    FilterInfo {
        id: FilterId::HueRotate,
        name: "hue rotate",
        css: "hue-rotate",
        unit: "deg",
        min: 0.0,
        max: 360.0,
        default: 0.0,
        step: 1.0,
        large_step: 10.0,
    },
    FilterInfo {
        id: FilterId::Blur,
        name: "blur",
        css: "blur",
        unit: "px",
        min: 0.0,
        max: 10.0,
        default: 0.0,
        step: 0.05,
        large_step: 0.5,
    },
];

/// One entry of a filter value set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterValue {
    /// Which filter.
    pub filter: FilterId,
    /// Current value, within the catalog bounds.
    pub value: f64,
}

/// Lookup table over the static catalog.
pub struct FilterCatalog;

impl FilterCatalog {
    /// All catalog entries in canonical order.
    pub fn all() -> &'static [FilterInfo] {
        CATALOG
    }

    /// Metadata for `id`.
    pub fn info(id: FilterId) -> &'static FilterInfo {
        // Every FilterId variant has exactly one catalog row.
        CATALOG
            .iter()
            .find(|i| i.id == id)
            .unwrap_or(&CATALOG[0])
    }

    /// A value set holding every catalog filter at its default.
    pub fn seed() -> Vec<FilterValue> {
        CATALOG
            .iter()
            .map(|i| FilterValue {
                filter: i.id,
                value: i.default,
            })
            .collect()
    }

    /// True when every entry of `values` sits at its default.
    pub fn all_default(values: &[FilterValue]) -> bool {
        values
            .iter()
            .all(|v| Self::info(v.filter).is_default(v.value))
    }

    /// Render a value set to a CSS filter string, skipping default entries.
    /// Returns `None` when nothing would change visually.
    pub fn css(values: &[FilterValue]) -> Option<String> {
        let parts: Vec<String> = values
            .iter()
            .filter(|v| !Self::info(v.filter).is_default(v.value))
            .map(|v| {
                let info = Self::info(v.filter);
                format!("{}({}{})", info.css, format_value(v.value), info.unit)
            })
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

/// Format a number with at most two decimals and no trailing zeros.
pub fn format_value(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_id() {
        let ids = [
            FilterId::Brightness,
            FilterId::Contrast,
            FilterId::Saturate,
            FilterId::Invert,
            FilterId::Grayscale,
            FilterId::Sepia,
            FilterId::HueRotate,
            FilterId::Blur,
        ];
        for id in ids {
            assert_eq!(FilterCatalog::info(id).id, id);
        }
        assert_eq!(FilterCatalog::seed().len(), ids.len());
    }

    #[test]
    fn css_skips_defaults() {
        let mut values = FilterCatalog::seed();
        assert_eq!(FilterCatalog::css(&values), None);
        assert!(FilterCatalog::all_default(&values));
        for v in values.iter_mut() {
            match v.filter {
                FilterId::HueRotate => v.value = 30.0,
                FilterId::Brightness => v.value = 1.25,
                _ => {}
            }
        }
        assert_eq!(
            FilterCatalog::css(&values).as_deref(),
            Some("brightness(1.25) hue-rotate(30deg)")
        );
    }

    #[test]
    fn clamp_and_format() {
        let info = FilterCatalog::info(FilterId::Invert);
        assert_eq!(info.clamp(1.7), 1.0);
        assert_eq!(info.clamp(-0.2), 0.0);
        assert_eq!(format_value(1.10), "1.1");
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(0.126), "0.13");
    }
}
