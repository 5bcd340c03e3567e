//! Tabspeed Engine
//!
//! The per-tab runtime core:
//! - resolves the effective context for a tab from the layered configuration
//! - matches key-down events against the hotkey table in two passes
//! - dispatches matched commands and writes their changes back
//! - keeps the media and fx element trackers in step with the context
//!
//! [`Manager`] is the orchestrator; [`driver::EventLoop`] feeds it events
//! one at a time. Everything the engine drives but does not own is behind
//! the traits in [`deps`], with mock implementations in [`test_support`].
use std::time::{Duration, Instant};

pub mod deps;
pub mod dispatch;
pub mod driver;
mod error;
mod key_event;
pub mod matcher;
pub mod media;
mod notification;
pub mod resolver;
mod services;
mod store;
pub mod test_support;
mod ticker;
pub mod trackers;

/// Key passes slower than this are logged as warnings.
const KEY_PROC_WARN_MS: u64 = 5;

use config::{Config, Context, TabId};
use tracing::{debug, error, info, trace, warn};

pub use error::{Error, Result};
pub use key_event::{EventTarget, KeyEvent, Propagation};
pub use notification::NotificationDispatcher;
pub use services::Services;
pub use store::FileStore;
pub use ticker::TokioTicks;

use deps::{Feed, ListenerToken};
use driver::EventSender;
use matcher::{MatchState, Pass};
use trackers::{TrackerLifecycle, TrackerPhase};

/// Orchestrates one tab: owns the configuration, the trackers and the
/// listener registrations.
///
/// Construct with [`Manager::start`] (or [`Manager::new`] when tab identity
/// and configuration are already known), then feed it key events,
/// configuration changes and ticks. All handling is synchronous.
pub struct Manager {
    /// Collaborators.
    services: Services,
    /// Tab this manager runs in.
    tab: TabId,
    /// In-memory configuration root.
    config: Config,
    /// Indicator front end.
    notifier: NotificationDispatcher,
    /// Media/fx trackers and the tick.
    trackers: TrackerLifecycle,
    /// Channel listeners and ticks deliver into.
    events: EventSender,
    /// Live listener registrations.
    listeners: Vec<Box<dyn ListenerToken>>,
    /// Set once [`Manager::release`] ran.
    released: bool,
}

impl Manager {
    /// Create a manager for `tab`. Nothing is subscribed or tracked until
    /// [`Manager::subscribe`] and [`Manager::refresh`] run.
    pub fn new(services: Services, tab: TabId, config: Config, events: EventSender) -> Self {
        let mut notifier = NotificationDispatcher::new(services.sink.clone());
        notifier.set_hide_indicator(config.settings.hide_indicator);
        let trackers = TrackerLifecycle::new(services.trackers.clone(), services.ticks.clone());
        Self {
            services,
            tab,
            config,
            notifier,
            trackers,
            events,
            listeners: Vec::new(),
            released: false,
        }
    }

    /// Ask the browser for our tab, load the stored configuration (or the
    /// default when nothing is stored), subscribe to the input feeds and
    /// reconcile trackers.
    pub async fn start(services: Services, events: EventSender) -> Result<Self> {
        let sender = services.browser.request_sender_info().await?;
        let config = match services.store.load()? {
            Some(c) => c,
            None => {
                debug!("no stored configuration, using defaults");
                Config::default()
            }
        };
        let mut manager = Self::new(services, sender.tab_id, config, events);
        manager.subscribe();
        manager.refresh();
        info!(tab = manager.tab, "manager started");
        Ok(manager)
    }

    /// Register keyboard and configuration-change listeners. Their tokens
    /// are held until [`Manager::release`].
    pub fn subscribe(&mut self) {
        for feed in [Feed::Keyboard, Feed::ConfigChanges] {
            let token = self.services.host.subscribe(feed, self.events.clone());
            self.listeners.push(token);
            debug!(feed = %feed, "subscribed");
        }
    }

    /// Tab this manager runs in.
    pub fn tab(&self) -> TabId {
        self.tab
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Effective context for our tab.
    pub fn context(&self) -> Context {
        resolver::resolve(&self.config, self.tab)
    }

    /// Tracker resources currently held.
    pub fn phase(&self) -> TrackerPhase {
        self.trackers.phase()
    }

    /// Whether [`Manager::release`] has run.
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn match_state(&self) -> MatchState {
        MatchState {
            enabled: self.context().enabled,
            has_media: self.trackers.has_media(),
        }
    }

    /// Run both passes for one key-down: the greedy capture pass and, unless
    /// it suppressed the event, the normal bubble pass.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Result<Propagation> {
        match self.on_key_capture(event)? {
            Propagation::Suppress => Ok(Propagation::Suppress),
            Propagation::Continue => {
                self.on_key_bubble(event)?;
                Ok(Propagation::Continue)
            }
        }
    }

    /// Capture pass. When a greedy binding matches, the normal pass runs
    /// right away and the event is suppressed.
    pub fn on_key_capture(&mut self, event: &KeyEvent) -> Result<Propagation> {
        if self.released {
            return Ok(Propagation::Continue);
        }
        let hits = matcher::matching(&self.config.keybinds, event, Pass::Greedy, self.match_state());
        if hits.is_empty() {
            return Ok(Propagation::Continue);
        }
        trace!(key = %event.key, greedy = hits.len(), "greedy match, suppressing");
        self.on_key_bubble(event)?;
        Ok(Propagation::Suppress)
    }

    /// Normal pass. Every matching binding is dispatched in order, then the
    /// configuration is persisted once. A failing binding restores the
    /// configuration from before the pass and nothing is persisted.
    pub fn on_key_bubble(&mut self, event: &KeyEvent) -> Result<()> {
        if self.released {
            return Ok(());
        }
        let start = Instant::now();
        let hits = matcher::matching(&self.config.keybinds, event, Pass::Normal, self.match_state());
        if hits.is_empty() {
            return Ok(());
        }

        let snapshot = self.config.clone();
        for index in &hits {
            let response = {
                let mut scope = self.trackers.media_scope();
                dispatch::dispatch(&mut self.config, *index, self.tab, &mut scope)
            };
            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    error!(
                        key = %event.key,
                        binding = %self.config.keybinds[*index].id,
                        error = %e,
                        "command failed, pass rolled back"
                    );
                    self.config = snapshot;
                    self.refresh();
                    return Err(e);
                }
            };
            self.notifier
                .handle_response(response, self.services.browser.as_ref());
        }

        self.refresh();
        self.services.store.persist(&self.config)?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(KEY_PROC_WARN_MS) {
            warn!("Key processing took {:?} for {}", elapsed, event.key);
        } else {
            trace!(
                "Key pass completed in {:?}: {} ({} bindings)",
                elapsed,
                event.key,
                hits.len()
            );
        }
        Ok(())
    }

    /// Replace the configuration wholesale. `None` is ignored. An invalid
    /// configuration is rejected and the current one kept.
    pub fn on_config_changed(&mut self, next: Option<Config>) -> Result<()> {
        let Some(next) = next else {
            trace!("config change without value, ignoring");
            return Ok(());
        };
        next.validate()?;
        debug!(keybinds = next.keybinds.len(), "configuration replaced");
        self.config = next;
        self.refresh();
        Ok(())
    }

    /// Periodic reconciliation.
    pub fn on_tick(&mut self) {
        trace!("tick");
        self.refresh();
    }

    /// Recompute the context and bring trackers, filters and the backdrop
    /// in line with it.
    pub fn refresh(&mut self) {
        if self.released {
            return;
        }
        self.notifier
            .set_hide_indicator(self.config.settings.hide_indicator);
        let ctx = self.context();
        self.trackers
            .reconcile(&ctx, &self.config.settings, &self.notifier, &self.events);
    }

    /// Drop listener registrations and tear down trackers and the tick.
    /// Idempotent.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.listeners.clear();
        self.trackers.suspend(&self.notifier);
        self.released = true;
        debug!(tab = self.tab, "manager released");
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.release();
    }
}
