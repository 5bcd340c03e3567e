//! Command dispatch: one handler per [`Command`] variant.
//!
//! Handlers work on a freshly resolved effective context. After a handler
//! succeeds, every field it changed is committed back into the owning
//! configuration layer via [`resolver::commit`]. Handlers never touch the
//! notification renderer or the browser directly; they return a
//! [`Response`] that the manager carries out.

use std::mem;

use config::{
    CYCLE, Command, Config, Context, FilterCatalog, FilterId, FilterTarget, FxState, Pin,
    SEEK_SECONDS, SET_SPEED, SPEED_STEP, TabId, Toggle, format_value,
};
use tracing::debug;

use crate::{Error, Result, media::MediaScope, resolver};

/// Text shown when a media command runs without tracked media.
pub const NO_MEDIA: &str = "no media";

/// Side effect requested by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Nothing further to do.
    Ok,
    /// Show an indicator message.
    Show(String),
    /// Show a small indicator message.
    ShowSmall(String),
    /// Open a new tab at the given URL.
    OpenTab(String),
}

/// Run the command bound at `index` for `tab`.
pub fn dispatch(
    config: &mut Config,
    index: usize,
    tab: TabId,
    media: &mut MediaScope<'_>,
) -> Result<Response> {
    let command = config
        .keybinds
        .get(index)
        .map(|kb| kb.command.clone())
        .ok_or_else(|| Error::Msg(format!("no keybind at index {}", index)))?;

    let before = resolver::resolve(config, tab);
    let mut ctx = before.clone();
    let response = match &command {
        Command::Nothing => Response::Ok,
        Command::AdjustSpeed { value } => {
            let next = ctx.speed + value.unwrap_or(SPEED_STEP);
            set_speed(config, &mut ctx, next)
        }
        Command::SetSpeed { value } => set_speed(config, &mut ctx, value.unwrap_or(SET_SPEED)),
        Command::SetPin { state } => set_pin(config, tab, &ctx, *state),
        Command::SetState { state } => {
            ctx.enabled = state.apply(ctx.enabled);
            Response::Show(on_off(ctx.enabled).to_string())
        }
        Command::Seek { value } => seek(media, value.unwrap_or(SEEK_SECONDS)),
        Command::SetPause { state } => set_paused(media, *state),
        Command::SetMute { state } => set_muted(media, *state),
        Command::SetMark { key } => set_mark(media, key),
        Command::SeekMark { key } => seek_mark(media, key),
        Command::OpenUrl { url } => Response::OpenTab(url.clone()),
        Command::SetFx { target, state } => set_fx(&mut ctx, *target, *state),
        Command::ResetFx { target } => {
            for (_, fx) in target_sets(&mut ctx, *target) {
                fx.filters = FilterCatalog::seed();
            }
            Response::Show("reset fx".to_string())
        }
        Command::FlipFx => {
            mem::swap(&mut ctx.element_fx, &mut ctx.backdrop_fx);
            Response::Show("flipped fx".to_string())
        }
        Command::AdjustFilter {
            target,
            filter,
            value,
        } => {
            let delta = value.unwrap_or(FilterCatalog::info(*filter).large_step);
            let v = apply_filter(&mut ctx, *target, *filter, |cur| cur + delta)?;
            filter_response(*filter, v)
        }
        Command::SetFilter {
            target,
            filter,
            value,
        } => {
            let next = value.unwrap_or(FilterCatalog::info(*filter).default);
            let v = apply_filter(&mut ctx, *target, *filter, |_| next)?;
            filter_response(*filter, v)
        }
        Command::CycleFilterValue {
            target,
            filter,
            cycle,
        } => cycle_filter(config, index, &mut ctx, *target, *filter, cycle.as_deref())?,
    };

    resolver::commit(config, tab, &before, &ctx);
    debug!(command = command.name(), tab, response = ?response, "dispatched");
    Ok(response)
}

/// Round away float noise from repeated additions.
fn round4(v: f64) -> f64 {
    (v * 1e4).round() / 1e4
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

/// Speed as shown to the user.
pub fn format_speed(speed: f64) -> String {
    format!("{:.2}", speed)
}

fn set_speed(config: &Config, ctx: &mut Context, speed: f64) -> Response {
    ctx.speed = config.settings.clamp_speed(round4(speed));
    Response::Show(format_speed(ctx.speed))
}

fn set_pin(config: &mut Config, tab: TabId, ctx: &Context, state: Toggle) -> Response {
    let pinned = config.pins.contains_key(&tab);
    let want = state.apply(pinned);
    if want && !pinned {
        config.pins.insert(tab, Pin::speed(ctx.speed));
    } else if !want && pinned {
        config.pins.remove(&tab);
    }
    let speed = resolver::resolve(config, tab).speed;
    let label = if want { "pinned" } else { "unpinned" };
    Response::Show(format!("{} {}", label, format_speed(speed)))
}

fn seek(media: &MediaScope<'_>, offset: f64) -> Response {
    if media.is_empty() {
        return Response::Ok;
    }
    for el in &media.elements {
        el.seek_to((el.current_time() + offset).max(0.0));
    }
    let sign = if offset < 0.0 { "-" } else { "+" };
    Response::ShowSmall(format!("{}{}s", sign, format_value(offset.abs())))
}

fn set_paused(media: &MediaScope<'_>, state: Toggle) -> Response {
    let mut last = None;
    for el in &media.elements {
        let paused = state.apply(el.paused());
        el.set_paused(paused);
        last = Some(paused);
    }
    match last {
        Some(true) => Response::Show("paused".to_string()),
        Some(false) => Response::Show("playing".to_string()),
        None => Response::Ok,
    }
}

fn set_muted(media: &MediaScope<'_>, state: Toggle) -> Response {
    let mut last = None;
    for el in &media.elements {
        let muted = state.apply(el.muted());
        el.set_muted(muted);
        last = Some(muted);
    }
    match last {
        Some(true) => Response::Show("muted".to_string()),
        Some(false) => Response::Show("unmuted".to_string()),
        None => Response::Ok,
    }
}

fn setting_text(key: &str) -> String {
    format!("setting \"{}\"", key)
}

fn set_mark(media: &mut MediaScope<'_>, key: &str) -> Response {
    if media.is_empty() {
        return Response::Show(NO_MEDIA.to_string());
    }
    for el in &media.elements {
        media.marks.set(el.id(), key, el.current_time());
    }
    Response::Show(setting_text(key))
}

/// Seek to a mark. Elements without the mark get it set at their current
/// position instead, with the same text `set_mark` shows.
fn seek_mark(media: &mut MediaScope<'_>, key: &str) -> Response {
    if media.is_empty() {
        return Response::Show(NO_MEDIA.to_string());
    }
    let mut seeked = false;
    for el in &media.elements {
        match media.marks.get(el.id(), key) {
            Some(at) => {
                el.seek_to(at);
                seeked = true;
            }
            None => media.marks.set(el.id(), key, el.current_time()),
        }
    }
    if seeked {
        Response::Show(format!("seeking \"{}\"", key))
    } else {
        Response::Show(setting_text(key))
    }
}

/// The value sets addressed by `target`, labelled for error reporting.
fn target_sets(ctx: &mut Context, target: FilterTarget) -> Vec<(FilterTarget, &mut FxState)> {
    let Context {
        element_fx,
        backdrop_fx,
        ..
    } = ctx;
    let mut out = Vec::with_capacity(2);
    if target.element() {
        out.push((FilterTarget::Element, element_fx));
    }
    if target.backdrop() {
        out.push((FilterTarget::Backdrop, backdrop_fx));
    }
    out
}

fn set_fx(ctx: &mut Context, target: FilterTarget, state: Toggle) -> Response {
    for (_, fx) in target_sets(ctx, target) {
        fx.enabled = state.apply(fx.enabled);
    }
    Response::Show(format!(
        "element {} / backdrop {}",
        on_off(ctx.element_fx.enabled),
        on_off(ctx.backdrop_fx.enabled)
    ))
}

/// Enable fx on every addressed set and move `filter` to `next(current)`,
/// clamped to the catalog range. Returns the last value written.
fn apply_filter(
    ctx: &mut Context,
    target: FilterTarget,
    filter: FilterId,
    next: impl Fn(f64) -> f64,
) -> Result<f64> {
    let info = FilterCatalog::info(filter);
    let mut last = info.default;
    for (label, fx) in target_sets(ctx, target) {
        fx.enabled = true;
        let entry = fx.entry_mut(filter).ok_or(Error::MissingFilter {
            target: label,
            filter,
        })?;
        entry.value = info.clamp(round4(next(entry.value)));
        last = entry.value;
    }
    Ok(last)
}

fn filter_response(filter: FilterId, value: f64) -> Response {
    Response::Show(format!(
        "{} {}",
        FilterCatalog::info(filter).name,
        format_value(value)
    ))
}

/// Advance the binding's counter and apply the selected cycle value. The
/// counter is only stored once the value has been applied.
fn cycle_filter(
    config: &mut Config,
    index: usize,
    ctx: &mut Context,
    target: FilterTarget,
    filter: FilterId,
    cycle: Option<&[f64]>,
) -> Result<Response> {
    let fallback: &[f64] = &CYCLE;
    let list = match cycle {
        Some(l) if !l.is_empty() => l,
        _ => fallback,
    };
    let kb = config
        .keybinds
        .get_mut(index)
        .ok_or_else(|| Error::Msg(format!("no keybind at index {}", index)))?;
    let next = (kb.cycle_increment.unwrap_or(0) as usize + 1) % list.len();
    let v = apply_filter(ctx, target, filter, |_| list[next])?;
    kb.cycle_increment = Some(next as u32);
    Ok(filter_response(filter, v))
}
