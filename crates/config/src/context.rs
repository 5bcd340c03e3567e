//! Context values and the override layers stacked on top of them.

use serde::{Deserialize, Serialize};

use crate::{FilterCatalog, FilterId, FilterValue, defaults};

/// One independently switchable set of filter values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FxState {
    /// Whether the filters are applied.
    #[serde(default)]
    pub enabled: bool,
    /// Ordered value set, seeded with every catalog filter.
    #[serde(default = "FilterCatalog::seed")]
    pub filters: Vec<FilterValue>,
}

impl Default for FxState {
    fn default() -> Self {
        Self {
            enabled: false,
            filters: FilterCatalog::seed(),
        }
    }
}

impl FxState {
    /// Mutable access to the entry for `id`, if the set carries one.
    pub fn entry_mut(&mut self, id: FilterId) -> Option<&mut FilterValue> {
        self.filters.iter_mut().find(|v| v.filter == id)
    }

    /// Value of the entry for `id`, if present.
    pub fn value(&self, id: FilterId) -> Option<f64> {
        self.filters.iter().find(|v| v.filter == id).map(|v| v.value)
    }

    /// Enabled with at least one non-default value.
    pub fn is_active(&self) -> bool {
        self.enabled && !FilterCatalog::all_default(&self.filters)
    }
}

/// A complete context: the global defaults, or an effective context
/// resolved for one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    /// Playback speed.
    #[serde(default = "defaults::default_speed")]
    pub speed: f64,
    /// Whether the system acts on the tab at all.
    #[serde(default = "defaults::default_true")]
    pub enabled: bool,
    /// Filters applied to elements matched by `element_query`.
    #[serde(default)]
    pub element_fx: FxState,
    /// Filters applied to the page backdrop.
    #[serde(default)]
    pub backdrop_fx: FxState,
    /// Selector picking the elements that receive element filters.
    #[serde(default = "defaults::default_element_query")]
    pub element_query: String,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            speed: defaults::SPEED,
            enabled: true,
            element_fx: FxState::default(),
            backdrop_fx: FxState::default(),
            element_query: defaults::ELEMENT_QUERY.to_string(),
        }
    }
}

/// A partial context. Each present field overrides the layers below it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextLayer {
    /// Speed override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Enabled-state override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Element filter override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_fx: Option<FxState>,
    /// Backdrop filter override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_fx: Option<FxState>,
    /// Element selector override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_query: Option<String>,
}

impl ContextLayer {
    /// True when the layer overrides nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Tab-scoped override created by the pin command. It sits above the tab's
/// own override layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pin {
    /// Fields forced by the pin.
    pub layer: ContextLayer,
}

impl Pin {
    /// A pin forcing `speed`.
    pub fn speed(speed: f64) -> Self {
        Self {
            layer: ContextLayer {
                speed: Some(speed),
                ..ContextLayer::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layer_serializes_to_empty_object() {
        let s = serde_json::to_string(&ContextLayer::default()).expect("serialize");
        assert_eq!(s, "{}");
        assert!(ContextLayer::default().is_empty());
    }

    #[test]
    fn pin_is_transparent() {
        let s = serde_json::to_string(&Pin::speed(1.5)).expect("serialize");
        assert_eq!(s, r#"{"speed":1.5}"#);
    }

    #[test]
    fn fx_activity_needs_non_default_value() {
        let mut fx = FxState {
            enabled: true,
            ..FxState::default()
        };
        assert!(!fx.is_active());
        if let Some(e) = fx.entry_mut(FilterId::Invert) {
            e.value = 1.0;
        }
        assert!(fx.is_active());
        fx.enabled = false;
        assert!(!fx.is_active());
    }
}
