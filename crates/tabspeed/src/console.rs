//! Console-backed collaborators: a simulated page whose element changes are
//! printed, plus stdout renderer, browser and storage shims.

use std::sync::Arc;

use async_trait::async_trait;
use config::{Config, TabId, format_value};
use parking_lot::Mutex;
use tabspeed_engine::{
    Result,
    deps::{
        Browser, ConfigStore, ElementId, ElementTracker, Feed, FxElement, ListenerHost,
        ListenerToken, MediaElement, NotificationSink, SenderInfo, TrackMode, TrackerFactory,
    },
    driver::EventSender,
};
use tracing::debug;

/// Prints indicator and backdrop calls.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn show(&self, text: &str) {
        println!("[show] {}", text);
    }

    fn show_small(&self, text: &str) {
        println!("[small] {}", text);
    }

    fn show_backdrop(&self, filter: &str) {
        println!("[backdrop] {}", filter);
    }

    fn hide_backdrop(&self) {
        println!("[backdrop] cleared");
    }
}

/// Playback state of a simulated media element.
#[derive(Debug, Clone, Copy)]
struct Playback {
    time: f64,
    rate: f64,
    paused: bool,
    muted: bool,
}

/// Simulated media element that prints every change.
pub struct ConsoleMedia {
    id: ElementId,
    state: Mutex<Playback>,
}

impl ConsoleMedia {
    /// Playing element at `time` seconds.
    pub fn new(id: ElementId, time: f64) -> Self {
        Self {
            id,
            state: Mutex::new(Playback {
                time,
                rate: 1.0,
                paused: false,
                muted: false,
            }),
        }
    }
}

impl MediaElement for ConsoleMedia {
    fn id(&self) -> ElementId {
        self.id
    }

    fn current_time(&self) -> f64 {
        self.state.lock().time
    }

    fn seek_to(&self, seconds: f64) {
        self.state.lock().time = seconds;
        println!("[media {}] time {}", self.id, format_value(seconds));
    }

    fn playback_rate(&self) -> f64 {
        self.state.lock().rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.lock().rate = rate;
        println!("[media {}] rate {}", self.id, format_value(rate));
    }

    fn paused(&self) -> bool {
        self.state.lock().paused
    }

    fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
        println!("[media {}] paused {}", self.id, paused);
    }

    fn muted(&self) -> bool {
        self.state.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().muted = muted;
        println!("[media {}] muted {}", self.id, muted);
    }
}

/// Simulated filterable element that prints filter changes.
pub struct ConsoleFx {
    id: ElementId,
    filter: Mutex<Option<String>>,
}

impl FxElement for ConsoleFx {
    fn set_filter(&self, filter: Option<&str>) {
        let mut cur = self.filter.lock();
        if cur.as_deref() != filter {
            *cur = filter.map(str::to_string);
            println!("[fx {}] filter {}", self.id, filter.unwrap_or("none"));
        }
    }
}

/// Elements currently on the simulated page.
#[derive(Default)]
pub struct Page {
    media: Mutex<Vec<Arc<ConsoleMedia>>>,
    fx: Mutex<Vec<Arc<ConsoleFx>>>,
}

impl Page {
    /// Add a media element.
    pub fn add_media(&self, id: ElementId, time: f64) {
        self.media.lock().push(Arc::new(ConsoleMedia::new(id, time)));
    }

    /// Remove a media element.
    pub fn remove_media(&self, id: ElementId) {
        self.media.lock().retain(|m| m.id != id);
    }

    /// Add a filterable element.
    pub fn add_fx(&self, id: ElementId) {
        self.fx.lock().push(Arc::new(ConsoleFx {
            id,
            filter: Mutex::new(None),
        }));
    }
}

/// Tracker over the simulated page. Selectors are recorded but every
/// element on the page matches.
struct PageTracker {
    page: Arc<Page>,
    query: String,
    released: bool,
}

impl ElementTracker<dyn MediaElement> for PageTracker {
    fn set_query(&mut self, query: &str) {
        debug!(from = %self.query, to = %query, "media query");
        self.query = query.to_string();
    }

    fn elements(&self) -> Vec<Arc<dyn MediaElement>> {
        if self.released {
            return Vec::new();
        }
        self.page
            .media
            .lock()
            .iter()
            .map(|m| m.clone() as Arc<dyn MediaElement>)
            .collect()
    }

    fn release(&mut self) {
        self.released = true;
    }
}

impl ElementTracker<dyn FxElement> for PageTracker {
    fn set_query(&mut self, query: &str) {
        debug!(from = %self.query, to = %query, "fx query");
        self.query = query.to_string();
    }

    fn elements(&self) -> Vec<Arc<dyn FxElement>> {
        if self.released {
            return Vec::new();
        }
        self.page
            .fx
            .lock()
            .iter()
            .map(|f| f.clone() as Arc<dyn FxElement>)
            .collect()
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Builds trackers over a shared [`Page`].
pub struct PageTrackers {
    page: Arc<Page>,
}

impl PageTrackers {
    /// Factory over `page`.
    pub fn new(page: Arc<Page>) -> Self {
        Self { page }
    }

    fn tracker(&self, query: &str) -> PageTracker {
        PageTracker {
            page: self.page.clone(),
            query: query.to_string(),
            released: false,
        }
    }
}

impl TrackerFactory for PageTrackers {
    fn track_media(
        &self,
        query: &str,
        mode: TrackMode,
    ) -> Box<dyn ElementTracker<dyn MediaElement>> {
        println!("[page] tracking media {:?} ({:?})", query, mode);
        Box::new(self.tracker(query))
    }

    fn track_fx(&self, query: &str, mode: TrackMode) -> Box<dyn ElementTracker<dyn FxElement>> {
        println!("[page] tracking fx {:?} ({:?})", query, mode);
        Box::new(self.tracker(query))
    }
}

/// Browser shim with a fixed tab that prints tab requests.
pub struct ConsoleBrowser {
    tab: TabId,
}

impl ConsoleBrowser {
    /// Browser reporting `tab`.
    pub fn new(tab: TabId) -> Self {
        Self { tab }
    }
}

#[async_trait]
impl Browser for ConsoleBrowser {
    async fn request_sender_info(&self) -> Result<SenderInfo> {
        Ok(SenderInfo { tab_id: self.tab })
    }

    fn request_create_tab(&self, url: &str) {
        println!("[open] {}", url);
    }
}

/// Configuration kept in memory for the length of a run.
#[derive(Default)]
pub struct MemoryStore {
    config: Mutex<Option<Config>>,
}

impl ConfigStore for MemoryStore {
    fn load(&self) -> Result<Option<Config>> {
        Ok(self.config.lock().clone())
    }

    fn persist(&self, config: &Config) -> Result<()> {
        *self.config.lock() = Some(config.clone());
        Ok(())
    }
}

/// Listener host for scripted runs: the script injects every event itself,
/// so registrations only log.
pub struct ScriptFeeds;

/// Registration token with nothing to undo.
struct Detached(Feed);

impl ListenerToken for Detached {}

impl Drop for Detached {
    fn drop(&mut self) {
        debug!(feed = %self.0, "unsubscribed");
    }
}

impl ListenerHost for ScriptFeeds {
    fn subscribe(&self, feed: Feed, _events: EventSender) -> Box<dyn ListenerToken> {
        debug!(feed = %feed, "feed driven by script");
        Box::new(Detached(feed))
    }
}
