//! Element tracker lifecycle.
//!
//! Two trackers (media and fx targets) follow the effective context. While
//! the tab is disabled both are absent, filters and the backdrop are cleared
//! and the periodic tick is cancelled. While enabled the media tracker always
//! exists and the fx tracker exists only when element filters would change
//! something.

use std::{collections::HashSet, sync::Arc, time::Duration};

use config::{Context, FilterCatalog, Settings};
use tracing::debug;

use crate::{
    deps::{
        ElementTracker, FxElement, MediaElement, TickGuard, TickSource, TrackMode,
        TrackerFactory,
    },
    driver::EventSender,
    media::{MarkBook, MediaScope},
    notification::NotificationDispatcher,
};

/// Reconciliation tick cadence while enabled.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Media tracker plus the settings it was built from.
struct MediaSlot {
    tracker: Box<dyn ElementTracker<dyn MediaElement>>,
    mode: TrackMode,
    query: String,
}

/// Fx tracker plus the settings it was built from.
struct FxSlot {
    tracker: Box<dyn ElementTracker<dyn FxElement>>,
    mode: TrackMode,
    query: String,
}

/// Which tracker resources are currently held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackerPhase {
    /// Media tracker present.
    pub media: bool,
    /// Fx tracker present.
    pub fx: bool,
    /// Periodic tick running.
    pub ticking: bool,
}

/// Owns the media and fx trackers, the tick guard and the mark book.
pub struct TrackerLifecycle {
    factory: Arc<dyn TrackerFactory>,
    ticks: Arc<dyn TickSource>,
    media: Option<MediaSlot>,
    fx: Option<FxSlot>,
    tick: Option<Box<dyn TickGuard>>,
    marks: MarkBook,
    /// Backdrop filter currently shown, if any.
    backdrop: Option<String>,
}

impl TrackerLifecycle {
    /// Lifecycle with no trackers.
    pub fn new(factory: Arc<dyn TrackerFactory>, ticks: Arc<dyn TickSource>) -> Self {
        Self {
            factory,
            ticks,
            media: None,
            fx: None,
            tick: None,
            marks: MarkBook::default(),
            backdrop: None,
        }
    }

    /// Current resource state.
    pub fn phase(&self) -> TrackerPhase {
        TrackerPhase {
            media: self.media.is_some(),
            fx: self.fx.is_some(),
            ticking: self.tick.is_some(),
        }
    }

    /// At least one media element is tracked.
    pub fn has_media(&self) -> bool {
        self.media
            .as_ref()
            .is_some_and(|m| !m.tracker.elements().is_empty())
    }

    /// Tracked media plus marks, for command handlers.
    pub fn media_scope(&mut self) -> MediaScope<'_> {
        let elements = self
            .media
            .as_ref()
            .map(|m| m.tracker.elements())
            .unwrap_or_default();
        MediaScope {
            elements,
            marks: &mut self.marks,
        }
    }

    /// Bring trackers and the tick in line with `ctx`, then apply it.
    pub fn reconcile(
        &mut self,
        ctx: &Context,
        settings: &Settings,
        notifier: &NotificationDispatcher,
        events: &EventSender,
    ) {
        if !ctx.enabled {
            self.suspend(notifier);
            return;
        }
        let mode = TrackMode::from_settings(settings);

        if self.media.as_ref().is_some_and(|m| m.mode != mode) {
            debug!(mode = ?mode, "media tracker mode changed, recreating");
            self.release_media();
        }
        match &mut self.media {
            Some(slot) => {
                if slot.query != settings.media_query {
                    debug!(query = %settings.media_query, "media query changed");
                    slot.tracker.set_query(&settings.media_query);
                    slot.query = settings.media_query.clone();
                }
            }
            None => {
                debug!(query = %settings.media_query, mode = ?mode, "media tracker created");
                self.media = Some(MediaSlot {
                    tracker: self.factory.track_media(&settings.media_query, mode),
                    mode,
                    query: settings.media_query.clone(),
                });
            }
        }

        if ctx.element_fx.is_active() {
            if self.fx.as_ref().is_some_and(|f| f.mode != mode) {
                self.release_fx();
            }
            match &mut self.fx {
                Some(slot) => {
                    if slot.query != ctx.element_query {
                        debug!(query = %ctx.element_query, "fx query changed");
                        // Elements leaving the selection keep no filter.
                        clear_filters(&*slot.tracker);
                        slot.tracker.set_query(&ctx.element_query);
                        slot.query = ctx.element_query.clone();
                    }
                }
                None => {
                    debug!(query = %ctx.element_query, "fx tracker created");
                    self.fx = Some(FxSlot {
                        tracker: self.factory.track_fx(&ctx.element_query, mode),
                        mode,
                        query: ctx.element_query.clone(),
                    });
                }
            }
        } else {
            self.release_fx();
        }

        if self.tick.is_none() {
            debug!(period = ?TICK_PERIOD, "tick started");
            self.tick = Some(self.ticks.start(TICK_PERIOD, events.clone()));
        }
        self.apply(ctx, notifier);
    }

    /// Push speed, element filter and backdrop state out to the page.
    pub fn apply(&mut self, ctx: &Context, notifier: &NotificationDispatcher) {
        if !ctx.enabled {
            return;
        }
        if let Some(slot) = &self.media {
            let elements = slot.tracker.elements();
            for el in &elements {
                if el.playback_rate() != ctx.speed {
                    el.set_playback_rate(ctx.speed);
                }
            }
            let live: HashSet<_> = elements.iter().map(|el| el.id()).collect();
            self.marks.retain(&live);
        }

        if let Some(slot) = &self.fx {
            let css = FilterCatalog::css(&ctx.element_fx.filters);
            for el in slot.tracker.elements() {
                el.set_filter(css.as_deref());
            }
        }

        let backdrop = if ctx.backdrop_fx.enabled {
            FilterCatalog::css(&ctx.backdrop_fx.filters)
        } else {
            None
        };
        if backdrop != self.backdrop {
            match &backdrop {
                Some(filter) => notifier.show_backdrop(filter),
                None => notifier.hide_backdrop(),
            }
            self.backdrop = backdrop;
        }
    }

    /// Tear everything down: trackers, filters, backdrop and tick.
    pub fn suspend(&mut self, notifier: &NotificationDispatcher) {
        let was = self.phase();
        self.release_media();
        self.release_fx();
        if self.backdrop.take().is_some() {
            notifier.hide_backdrop();
        }
        self.tick = None;
        if was != TrackerPhase::default() {
            debug!("trackers suspended");
        }
    }

    fn release_media(&mut self) {
        if let Some(mut slot) = self.media.take() {
            slot.tracker.release();
            self.marks.clear();
            debug!("media tracker released");
        }
    }

    fn release_fx(&mut self) {
        if let Some(mut slot) = self.fx.take() {
            clear_filters(&*slot.tracker);
            slot.tracker.release();
            debug!("fx tracker released");
        }
    }
}

fn clear_filters(tracker: &dyn ElementTracker<dyn FxElement>) {
    for el in tracker.elements() {
        el.set_filter(None);
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, FilterId};

    use super::*;
    use crate::{
        driver,
        test_support::{ManualTicks, MockFx, MockMedia, MockSink, MockTrackerFactory, SinkCall},
    };

    struct Rig {
        factory: Arc<MockTrackerFactory>,
        ticks: Arc<ManualTicks>,
        sink: Arc<MockSink>,
        notifier: NotificationDispatcher,
        events: EventSender,
        life: TrackerLifecycle,
    }

    fn rig() -> Rig {
        let factory = Arc::new(MockTrackerFactory::default());
        let ticks = Arc::new(ManualTicks::default());
        let sink = Arc::new(MockSink::default());
        let (events, _rx) = driver::channel();
        Rig {
            life: TrackerLifecycle::new(factory.clone(), ticks.clone()),
            notifier: NotificationDispatcher::new(sink.clone()),
            factory,
            ticks,
            sink,
            events,
        }
    }

    impl Rig {
        fn reconcile(&mut self, ctx: &Context, settings: &Settings) {
            self.life
                .reconcile(ctx, settings, &self.notifier, &self.events);
        }
    }

    fn fx_ctx() -> Context {
        let mut ctx = Context::default();
        ctx.element_fx.enabled = true;
        if let Some(e) = ctx.element_fx.entry_mut(FilterId::Invert) {
            e.value = 1.0;
        }
        ctx
    }

    #[test]
    fn enabled_creates_media_tracker_and_tick() {
        let mut r = rig();
        let cfg = Config::default();
        r.reconcile(&Context::default(), &cfg.settings);
        assert_eq!(
            r.life.phase(),
            TrackerPhase {
                media: true,
                fx: false,
                ticking: true
            }
        );
        assert_eq!(r.factory.active_media(), 1);
        assert_eq!(r.ticks.active(), 1);

        // Reconciling again keeps the same resources.
        r.reconcile(&Context::default(), &cfg.settings);
        assert_eq!(r.factory.media_created(), 1);
        assert_eq!(r.ticks.started(), 1);
    }

    #[test]
    fn disabled_tears_everything_down() {
        let mut r = rig();
        let cfg = Config::default();
        let mut ctx = fx_ctx();
        ctx.backdrop_fx = ctx.element_fx.clone();
        let fx = MockFx::new();
        r.factory.add_fx(fx.clone());
        r.reconcile(&ctx, &cfg.settings);
        assert!(r.life.phase().fx);
        assert_eq!(fx.filter().as_deref(), Some("invert(1)"));

        ctx.enabled = false;
        r.reconcile(&ctx, &cfg.settings);
        assert_eq!(r.life.phase(), TrackerPhase::default());
        assert_eq!(r.factory.active_media(), 0);
        assert_eq!(r.factory.active_fx(), 0);
        assert_eq!(r.ticks.active(), 0);
        assert_eq!(fx.filter(), None);
        assert_eq!(
            r.sink.calls(),
            vec![
                SinkCall::ShowBackdrop("invert(1)".into()),
                SinkCall::HideBackdrop
            ]
        );
    }

    #[test]
    fn fx_tracker_follows_filter_activity_and_query() {
        let mut r = rig();
        let cfg = Config::default();
        let mut ctx = Context::default();
        ctx.element_fx.enabled = true;
        r.reconcile(&ctx, &cfg.settings);
        assert!(!r.life.phase().fx, "all-default filters need no tracker");

        let mut ctx = fx_ctx();
        r.reconcile(&ctx, &cfg.settings);
        assert!(r.life.phase().fx);

        ctx.element_query = "img".into();
        r.reconcile(&ctx, &cfg.settings);
        assert_eq!(r.factory.fx_queries(), vec!["video".to_string(), "img".into()]);
        assert_eq!(r.factory.fx_created(), 1);

        ctx.element_fx.enabled = false;
        r.reconcile(&ctx, &cfg.settings);
        assert!(!r.life.phase().fx);
    }

    #[test]
    fn mode_change_recreates_media_tracker() {
        let mut r = rig();
        let mut cfg = Config::default();
        r.reconcile(&Context::default(), &cfg.settings);
        cfg.settings.use_polling = true;
        cfg.settings.poll_rate = 250;
        r.reconcile(&Context::default(), &cfg.settings);
        assert_eq!(r.factory.media_created(), 2);
        assert_eq!(r.factory.active_media(), 1);
        assert_eq!(
            r.factory.last_media_mode(),
            Some(TrackMode::Polling {
                interval: Duration::from_millis(250)
            })
        );
    }

    #[test]
    fn apply_sets_speed_on_late_media() {
        let mut r = rig();
        let cfg = Config::default();
        let mut ctx = Context::default();
        ctx.speed = 1.75;
        r.reconcile(&ctx, &cfg.settings);
        assert!(!r.life.has_media());

        let late = MockMedia::new(9, 0.0);
        r.factory.add_media(late.clone());
        assert!(r.life.has_media());
        r.life.apply(&ctx, &r.notifier);
        assert_eq!(late.playback_rate(), 1.75);
    }

    #[test]
    fn marks_are_dropped_with_the_media_tracker() {
        let mut r = rig();
        let cfg = Config::default();
        r.factory.add_media(MockMedia::new(1, 3.0));
        r.reconcile(&Context::default(), &cfg.settings);
        r.life.media_scope().marks.set(1, "a", 3.0);
        assert_eq!(r.life.media_scope().marks.get(1, "a"), Some(3.0));

        r.life.suspend(&r.notifier);
        assert_eq!(r.life.media_scope().marks.get(1, "a"), None);
    }
}
