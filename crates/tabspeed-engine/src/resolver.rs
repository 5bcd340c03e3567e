//! Context resolution over the layered configuration.
//!
//! Layers are consulted top-down: the tab's pin, then the tab's override,
//! then the global defaults. Resolution is pure; the only way back into the
//! configuration is [`commit`], which writes each changed field into the
//! layer that currently owns it.

use config::{Config, Context, ContextLayer, FilterCatalog, FxState, Pin, TabId};
use tracing::trace;

/// Override layers above the global defaults, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// The tab's pin.
    Pin,
    /// The tab's stored override.
    Tab,
}

/// Present override layers for `tab`, highest precedence first.
pub fn layers(config: &Config, tab: TabId) -> Vec<(Layer, &ContextLayer)> {
    let mut out = Vec::with_capacity(2);
    if let Some(pin) = config.pins.get(&tab) {
        out.push((Layer::Pin, &pin.layer));
    }
    if let Some(layer) = config.tabs.get(&tab) {
        out.push((Layer::Tab, layer));
    }
    out
}

/// The tab's pin, if any.
pub fn get_pin(config: &Config, tab: TabId) -> Option<&Pin> {
    config.pin(tab)
}

/// Resolve the effective context for `tab`.
///
/// Unknown tabs have no layers and resolve to the global defaults. Speed is
/// clamped to the configured range and filter values to their catalog range.
pub fn resolve(config: &Config, tab: TabId) -> Context {
    let stack = layers(config, tab);
    let base = &config.common;
    let (source, speed) = stack
        .iter()
        .find_map(|(layer, l)| l.speed.map(|s| (Some(*layer), s)))
        .unwrap_or((None, base.speed));
    trace!(tab, source = ?source, speed, "speed resolved");
    let enabled = stack
        .iter()
        .find_map(|(_, l)| l.enabled)
        .unwrap_or(base.enabled);
    let element_fx = stack
        .iter()
        .find_map(|(_, l)| l.element_fx.as_ref())
        .unwrap_or(&base.element_fx);
    let backdrop_fx = stack
        .iter()
        .find_map(|(_, l)| l.backdrop_fx.as_ref())
        .unwrap_or(&base.backdrop_fx);
    let element_query = stack
        .iter()
        .find_map(|(_, l)| l.element_query.as_ref())
        .unwrap_or(&base.element_query);

    Context {
        speed: config.settings.clamp_speed(speed),
        enabled,
        element_fx: clamped(element_fx),
        backdrop_fx: clamped(backdrop_fx),
        element_query: element_query.clone(),
    }
}

/// Copy of `fx` with every value inside its catalog bounds.
fn clamped(fx: &FxState) -> FxState {
    let mut out = fx.clone();
    for v in out.filters.iter_mut() {
        v.value = FilterCatalog::info(v.filter).clamp(v.value);
    }
    out
}

/// The layer that owns a field: the pin when it sets the field, else the
/// tab override, created on demand.
fn owner(config: &mut Config, tab: TabId, owns: impl Fn(&ContextLayer) -> bool) -> &mut ContextLayer {
    let pinned = config.pins.get(&tab).is_some_and(|p| owns(&p.layer));
    if pinned && let Some(pin) = config.pins.get_mut(&tab) {
        return &mut pin.layer;
    }
    config.tabs.entry(tab).or_default()
}

/// Write every field that differs between `before` and `after` back into
/// the layer that owns it. This is the single mutation entry point for
/// context changes made by command handlers.
pub fn commit(config: &mut Config, tab: TabId, before: &Context, after: &Context) {
    if after.speed != before.speed {
        owner(config, tab, |l| l.speed.is_some()).speed = Some(after.speed);
    }
    if after.enabled != before.enabled {
        owner(config, tab, |l| l.enabled.is_some()).enabled = Some(after.enabled);
    }
    if after.element_fx != before.element_fx {
        owner(config, tab, |l| l.element_fx.is_some()).element_fx =
            Some(after.element_fx.clone());
    }
    if after.backdrop_fx != before.backdrop_fx {
        owner(config, tab, |l| l.backdrop_fx.is_some()).backdrop_fx =
            Some(after.backdrop_fx.clone());
    }
    if after.element_query != before.element_query {
        owner(config, tab, |l| l.element_query.is_some()).element_query =
            Some(after.element_query.clone());
    }
}

#[cfg(test)]
mod tests {
    use config::{FilterId, Pin};

    use super::*;

    fn cfg() -> Config {
        let mut c = Config::with_keybinds(Vec::new());
        c.settings.speed_min = 0.25;
        c.settings.speed_max = 3.0;
        c
    }

    #[test]
    fn unknown_tab_falls_through_to_defaults() {
        let c = cfg();
        assert_eq!(resolve(&c, 42), c.common);
        assert!(layers(&c, 42).is_empty());
    }

    #[test]
    fn precedence_pin_over_tab_over_global() {
        let mut c = cfg();
        c.common.speed = 1.0;
        c.tabs.insert(
            1,
            ContextLayer {
                speed: Some(1.5),
                ..ContextLayer::default()
            },
        );
        assert_eq!(resolve(&c, 1).speed, 1.5);
        c.pins.insert(1, Pin::speed(2.0));
        assert_eq!(resolve(&c, 1).speed, 2.0);
        assert_eq!(resolve(&c, 2).speed, 1.0);

        c.pins.remove(&1);
        assert_eq!(resolve(&c, 1).speed, 1.5);
        c.tabs.remove(&1);
        assert_eq!(resolve(&c, 1).speed, 1.0);
    }

    #[test]
    fn layers_list_pin_before_tab() {
        let mut c = cfg();
        c.tabs.insert(1, ContextLayer::default());
        c.pins.insert(1, Pin::speed(2.0));
        let tags: Vec<Layer> = layers(&c, 1).into_iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![Layer::Pin, Layer::Tab]);
        c.pins.remove(&1);
        let tags: Vec<Layer> = layers(&c, 1).into_iter().map(|(t, _)| t).collect();
        assert_eq!(tags, vec![Layer::Tab]);
    }

    #[test]
    fn resolve_is_pure_and_idempotent() {
        let mut c = cfg();
        c.pins.insert(5, Pin::speed(2.5));
        let snapshot = c.clone();
        let a = resolve(&c, 5);
        let b = resolve(&c, 5);
        assert_eq!(a, b);
        assert_eq!(c, snapshot);
    }

    #[test]
    fn resolve_clamps_out_of_range_values() {
        let mut c = cfg();
        c.common.speed = 9.0;
        if let Some(v) = c.common.element_fx.entry_mut(FilterId::Invert) {
            v.value = 4.0;
        }
        let ctx = resolve(&c, 1);
        assert_eq!(ctx.speed, 3.0);
        assert_eq!(ctx.element_fx.value(FilterId::Invert), Some(1.0));
    }

    #[test]
    fn commit_creates_tab_layer_and_leaves_global_alone() {
        let mut c = cfg();
        let before = resolve(&c, 9);
        let mut after = before.clone();
        after.speed = 2.0;
        commit(&mut c, 9, &before, &after);
        assert_eq!(c.tabs[&9].speed, Some(2.0));
        assert_eq!(c.tabs[&9].enabled, None);
        assert_eq!(c.common.speed, 1.0);
    }

    #[test]
    fn commit_writes_to_pin_when_pin_owns_field() {
        let mut c = cfg();
        c.pins.insert(3, Pin::speed(2.0));
        let before = resolve(&c, 3);
        let mut after = before.clone();
        after.speed = 2.5;
        after.enabled = false;
        commit(&mut c, 3, &before, &after);
        assert_eq!(c.pins[&3].layer.speed, Some(2.5));
        assert_eq!(c.pins[&3].layer.enabled, None);
        assert_eq!(c.tabs[&3].enabled, Some(false));
        assert_eq!(c.tabs[&3].speed, None);
    }

    #[test]
    fn commit_without_changes_is_noop() {
        let mut c = cfg();
        let ctx = resolve(&c, 4);
        commit(&mut c, 4, &ctx, &ctx);
        assert!(c.tabs.is_empty());
    }
}
