//! Collaborator contracts: everything the engine drives but does not own.
//!
//! Implementations live with the host (browser glue, the replay tool) or in
//! [`crate::test_support`].

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use config::{Config, Settings, TabId};

use crate::{Result, driver::EventSender};

// ---- Notification renderer ----

/// Transient on-screen indicator and backdrop renderer. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    /// Show a regular indicator message.
    fn show(&self, text: &str);
    /// Show a small, less prominent indicator message.
    fn show_small(&self, text: &str);
    /// Apply a CSS filter string to the page backdrop.
    fn show_backdrop(&self, filter: &str);
    /// Remove any backdrop filter.
    fn hide_backdrop(&self);
}

// ---- Elements and trackers ----

/// Identity of a tracked element, stable for the element's lifetime.
pub type ElementId = u64;

/// A media element in the page's live collection.
pub trait MediaElement: Send + Sync {
    /// Stable identity.
    fn id(&self) -> ElementId;
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    /// Jump to an absolute position in seconds.
    fn seek_to(&self, seconds: f64);
    /// Current playback rate.
    fn playback_rate(&self) -> f64;
    /// Change the playback rate.
    fn set_playback_rate(&self, rate: f64);
    /// Whether playback is paused.
    fn paused(&self) -> bool;
    /// Pause or resume.
    fn set_paused(&self, paused: bool);
    /// Whether audio is muted.
    fn muted(&self) -> bool;
    /// Mute or unmute.
    fn set_muted(&self, muted: bool);
}

/// An element that can carry a CSS filter.
pub trait FxElement: Send + Sync {
    /// Apply `filter`, or clear any applied filter when `None`.
    fn set_filter(&self, filter: Option<&str>);
}

/// How a tracker discovers elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    /// React to DOM mutations.
    Reactive,
    /// Re-query on a fixed interval.
    Polling {
        /// Poll interval.
        interval: Duration,
    },
}

impl TrackMode {
    /// Mode selected by the configuration settings.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.use_polling {
            Self::Polling {
                interval: Duration::from_millis(settings.poll_rate),
            }
        } else {
            Self::Reactive
        }
    }
}

/// A live query over page elements.
pub trait ElementTracker<E: ?Sized>: Send {
    /// Replace the selector.
    fn set_query(&mut self, query: &str);
    /// Elements currently matched.
    fn elements(&self) -> Vec<Arc<E>>;
    /// Stop observing. The tracker is dropped right after.
    fn release(&mut self);
}

/// Constructs trackers.
pub trait TrackerFactory: Send + Sync {
    /// Track media elements matching `query`.
    fn track_media(&self, query: &str, mode: TrackMode)
    -> Box<dyn ElementTracker<dyn MediaElement>>;
    /// Track filterable elements matching `query`.
    fn track_fx(&self, query: &str, mode: TrackMode) -> Box<dyn ElementTracker<dyn FxElement>>;
}

// ---- Browser shims ----

/// Identity of the tab hosting this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderInfo {
    /// Tab identifier.
    pub tab_id: TabId,
}

/// Tab identity and tab creation.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Ask the browser which tab we are in. Awaited once at startup.
    async fn request_sender_info(&self) -> Result<SenderInfo>;
    /// Open a new tab at `url`. Fire-and-forget.
    fn request_create_tab(&self, url: &str);
}

// ---- Persistence ----

/// Storage for the configuration root.
pub trait ConfigStore: Send + Sync {
    /// Read the stored configuration, `None` when nothing is stored yet.
    fn load(&self) -> Result<Option<Config>>;
    /// Write the configuration through to storage.
    fn persist(&self, config: &Config) -> Result<()>;
}

// ---- Timers and listeners ----

/// Keeps a periodic tick alive; dropping it cancels the tick.
pub trait TickGuard: Send {}

/// Starts periodic ticks that arrive as [`crate::driver::Event::Tick`].
pub trait TickSource: Send + Sync {
    /// Start ticking every `period` into `events`.
    fn start(&self, period: Duration, events: EventSender) -> Box<dyn TickGuard>;
}

/// External event feeds the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Key-down events.
    Keyboard,
    /// Storage change notifications.
    ConfigChanges,
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyboard => f.write_str("keyboard"),
            Self::ConfigChanges => f.write_str("config-changes"),
        }
    }
}

/// Keeps a listener registration alive; dropping it unsubscribes.
pub trait ListenerToken: Send {}

/// Registers listeners that forward external events into the event loop.
pub trait ListenerHost: Send + Sync {
    /// Subscribe `events` to `feed`.
    fn subscribe(&self, feed: Feed, events: EventSender) -> Box<dyn ListenerToken>;
}
