//! Test support utilities for tabspeed-engine unit and integration tests.
//! These helpers are public so the integration suite can share them; they
//! record every call so tests can assert on what the engine did.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use config::{Config, TabId};
use parking_lot::Mutex;

use crate::{
    Error, Result,
    deps::{
        Browser, ConfigStore, ElementId, ElementTracker, Feed, FxElement, ListenerHost,
        ListenerToken, MediaElement, NotificationSink, SenderInfo, TickGuard, TickSource,
        TrackMode, TrackerFactory,
    },
    driver::{Event, EventSender},
    key_event::KeyEvent,
    services::Services,
};

// ---- Notification sink ----

/// One recorded renderer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `show(text)`.
    Show(String),
    /// `show_small(text)`.
    ShowSmall(String),
    /// `show_backdrop(filter)`.
    ShowBackdrop(String),
    /// `hide_backdrop()`.
    HideBackdrop,
}

/// Renderer that records calls.
#[derive(Debug, Default)]
pub struct MockSink {
    calls: Mutex<Vec<SinkCall>>,
}

impl MockSink {
    /// Everything recorded so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    /// Texts passed to `show` and `show_small`, in order.
    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                SinkCall::Show(t) | SinkCall::ShowSmall(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl NotificationSink for MockSink {
    fn show(&self, text: &str) {
        self.calls.lock().push(SinkCall::Show(text.to_string()));
    }

    fn show_small(&self, text: &str) {
        self.calls.lock().push(SinkCall::ShowSmall(text.to_string()));
    }

    fn show_backdrop(&self, filter: &str) {
        self.calls
            .lock()
            .push(SinkCall::ShowBackdrop(filter.to_string()));
    }

    fn hide_backdrop(&self) {
        self.calls.lock().push(SinkCall::HideBackdrop);
    }
}

// ---- Elements ----

#[derive(Debug, Clone)]
struct MediaState {
    time: f64,
    rate: f64,
    paused: bool,
    muted: bool,
}

/// In-memory media element.
#[derive(Debug)]
pub struct MockMedia {
    id: ElementId,
    state: Mutex<MediaState>,
}

impl MockMedia {
    /// Playing, unmuted element at `time` seconds and rate 1.
    pub fn new(id: ElementId, time: f64) -> Arc<Self> {
        Arc::new(Self {
            id,
            state: Mutex::new(MediaState {
                time,
                rate: 1.0,
                paused: false,
                muted: false,
            }),
        })
    }
}

impl MediaElement for MockMedia {
    fn id(&self) -> ElementId {
        self.id
    }

    fn current_time(&self) -> f64 {
        self.state.lock().time
    }

    fn seek_to(&self, seconds: f64) {
        self.state.lock().time = seconds;
    }

    fn playback_rate(&self) -> f64 {
        self.state.lock().rate
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.lock().rate = rate;
    }

    fn paused(&self) -> bool {
        self.state.lock().paused
    }

    fn set_paused(&self, paused: bool) {
        self.state.lock().paused = paused;
    }

    fn muted(&self) -> bool {
        self.state.lock().muted
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().muted = muted;
    }
}

/// In-memory filterable element.
#[derive(Debug, Default)]
pub struct MockFx {
    filter: Mutex<Option<String>>,
}

impl MockFx {
    /// Element with no filter applied.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Filter currently applied.
    pub fn filter(&self) -> Option<String> {
        self.filter.lock().clone()
    }
}

impl FxElement for MockFx {
    fn set_filter(&self, filter: Option<&str>) {
        *self.filter.lock() = filter.map(str::to_string);
    }
}

// ---- Trackers ----

/// Which tracker a [`TrackerCall`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    /// Media tracker.
    Media,
    /// Fx tracker.
    Fx,
}

/// One recorded tracker lifecycle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    /// Tracker constructed.
    Create {
        /// Tracker kind.
        kind: TrackerKind,
        /// Initial selector.
        query: String,
        /// Discovery mode.
        mode: TrackMode,
    },
    /// `set_query` called.
    SetQuery {
        /// Tracker kind.
        kind: TrackerKind,
        /// New selector.
        query: String,
    },
    /// `release` called.
    Release(TrackerKind),
}

/// Elements currently "on the page" plus the call log.
#[derive(Debug, Default)]
struct Page {
    media: Mutex<Vec<Arc<MockMedia>>>,
    fx: Mutex<Vec<Arc<MockFx>>>,
    log: Mutex<Vec<TrackerCall>>,
}

/// Tracker factory over a shared in-memory page. Every tracker sees every
/// element added to the page, regardless of its selector.
#[derive(Debug, Default)]
pub struct MockTrackerFactory {
    page: Arc<Page>,
}

impl MockTrackerFactory {
    /// Put a media element on the page.
    pub fn add_media(&self, media: Arc<MockMedia>) {
        self.page.media.lock().push(media);
    }

    /// Remove a media element from the page.
    pub fn remove_media(&self, id: ElementId) {
        self.page.media.lock().retain(|m| m.id() != id);
    }

    /// Put a filterable element on the page.
    pub fn add_fx(&self, fx: Arc<MockFx>) {
        self.page.fx.lock().push(fx);
    }

    /// Recorded lifecycle calls.
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.page.log.lock().clone()
    }

    fn count(&self, pred: impl Fn(&TrackerCall) -> bool) -> usize {
        self.page.log.lock().iter().filter(|c| pred(c)).count()
    }

    /// Media trackers created so far.
    pub fn media_created(&self) -> usize {
        self.count(|c| matches!(c, TrackerCall::Create { kind: TrackerKind::Media, .. }))
    }

    /// Fx trackers created so far.
    pub fn fx_created(&self) -> usize {
        self.count(|c| matches!(c, TrackerCall::Create { kind: TrackerKind::Fx, .. }))
    }

    /// Media trackers created and not yet released.
    pub fn active_media(&self) -> usize {
        self.media_created() - self.count(|c| *c == TrackerCall::Release(TrackerKind::Media))
    }

    /// Fx trackers created and not yet released.
    pub fn active_fx(&self) -> usize {
        self.fx_created() - self.count(|c| *c == TrackerCall::Release(TrackerKind::Fx))
    }

    /// Mode of the most recently created media tracker.
    pub fn last_media_mode(&self) -> Option<TrackMode> {
        self.page.log.lock().iter().rev().find_map(|c| match c {
            TrackerCall::Create {
                kind: TrackerKind::Media,
                mode,
                ..
            } => Some(*mode),
            _ => None,
        })
    }

    /// Selectors given to fx trackers, at creation and via `set_query`.
    pub fn fx_queries(&self) -> Vec<String> {
        self.page
            .log
            .lock()
            .iter()
            .filter_map(|c| match c {
                TrackerCall::Create {
                    kind: TrackerKind::Fx,
                    query,
                    ..
                }
                | TrackerCall::SetQuery {
                    kind: TrackerKind::Fx,
                    query,
                } => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: TrackerCall) {
        self.page.log.lock().push(call);
    }
}

/// Tracker handed out by [`MockTrackerFactory`].
struct MockTracker {
    kind: TrackerKind,
    page: Arc<Page>,
    released: bool,
}

impl MockTracker {
    fn note_query(&mut self, query: &str) {
        self.page.log.lock().push(TrackerCall::SetQuery {
            kind: self.kind,
            query: query.to_string(),
        });
    }

    fn mark_released(&mut self) {
        if !self.released {
            self.released = true;
            self.page.log.lock().push(TrackerCall::Release(self.kind));
        }
    }
}

impl ElementTracker<dyn MediaElement> for MockTracker {
    fn set_query(&mut self, query: &str) {
        self.note_query(query);
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
        self.mark_released();
    }
}

impl ElementTracker<dyn FxElement> for MockTracker {
    fn set_query(&mut self, query: &str) {
        self.note_query(query);
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
        self.mark_released();
    }
}

impl TrackerFactory for MockTrackerFactory {
    fn track_media(
        &self,
        query: &str,
        mode: TrackMode,
    ) -> Box<dyn ElementTracker<dyn MediaElement>> {
        self.record(TrackerCall::Create {
            kind: TrackerKind::Media,
            query: query.to_string(),
            mode,
        });
        Box::new(MockTracker {
            kind: TrackerKind::Media,
            page: self.page.clone(),
            released: false,
        })
    }

    fn track_fx(&self, query: &str, mode: TrackMode) -> Box<dyn ElementTracker<dyn FxElement>> {
        self.record(TrackerCall::Create {
            kind: TrackerKind::Fx,
            query: query.to_string(),
            mode,
        });
        Box::new(MockTracker {
            kind: TrackerKind::Fx,
            page: self.page.clone(),
            released: false,
        })
    }
}

// ---- Browser ----

/// Browser shim with a fixed tab id that records opened tabs.
#[derive(Debug, Default)]
pub struct MockBrowser {
    tab: Option<TabId>,
    opened: Mutex<Vec<String>>,
}

impl MockBrowser {
    /// Browser reporting `tab` as the sender.
    pub fn new(tab: TabId) -> Self {
        Self {
            tab: Some(tab),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Browser that cannot identify the sender tab.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// URLs passed to `request_create_tab`.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl Browser for MockBrowser {
    async fn request_sender_info(&self) -> Result<SenderInfo> {
        self.tab
            .map(|tab_id| SenderInfo { tab_id })
            .ok_or(Error::NoSenderTab)
    }

    fn request_create_tab(&self, url: &str) {
        self.opened.lock().push(url.to_string());
    }
}

// ---- Store ----

/// In-memory configuration store recording every persist.
#[derive(Debug, Default)]
pub struct MockStore {
    stored: Mutex<Option<Config>>,
    persisted: Mutex<Vec<Config>>,
}

impl MockStore {
    /// Store pre-loaded with `config`.
    pub fn with(config: Config) -> Self {
        Self {
            stored: Mutex::new(Some(config)),
            persisted: Mutex::new(Vec::new()),
        }
    }

    /// Number of persist calls.
    pub fn persist_count(&self) -> usize {
        self.persisted.lock().len()
    }

    /// The most recently persisted configuration.
    pub fn last_persisted(&self) -> Option<Config> {
        self.persisted.lock().last().cloned()
    }
}

impl ConfigStore for MockStore {
    fn load(&self) -> Result<Option<Config>> {
        Ok(self.stored.lock().clone())
    }

    fn persist(&self, config: &Config) -> Result<()> {
        *self.stored.lock() = Some(config.clone());
        self.persisted.lock().push(config.clone());
        Ok(())
    }
}

// ---- Ticks ----

/// Tick source that never fires on its own; tests call
/// [`crate::Manager::on_tick`] directly. Tracks live guards.
#[derive(Debug, Default)]
pub struct ManualTicks {
    started: AtomicUsize,
    active: Arc<AtomicUsize>,
}

impl ManualTicks {
    /// Ticks started so far.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Ticks currently running.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Guard decrementing the live count on drop.
struct CountedGuard(Arc<AtomicUsize>);

impl TickGuard for CountedGuard {}

impl Drop for CountedGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl TickSource for ManualTicks {
    fn start(&self, _period: Duration, _events: EventSender) -> Box<dyn TickGuard> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.active.fetch_add(1, Ordering::SeqCst);
        Box::new(CountedGuard(self.active.clone()))
    }
}

// ---- Listener host ----

/// Listener host that remembers subscribed senders so tests can inject
/// events the way the real feeds would.
#[derive(Debug, Default)]
pub struct MockHost {
    subs: Mutex<Vec<(Feed, EventSender)>>,
    active: Arc<AtomicUsize>,
}

impl MockHost {
    /// Registrations currently alive.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn sender(&self, feed: Feed) -> Option<EventSender> {
        self.subs
            .lock()
            .iter()
            .find(|(f, _)| *f == feed)
            .map(|(_, tx)| tx.clone())
    }

    /// Deliver a key-down on the keyboard feed. Returns false when nothing
    /// is subscribed or the loop is gone.
    pub fn send_key(&self, event: KeyEvent) -> bool {
        self.sender(Feed::Keyboard)
            .is_some_and(|tx| tx.send(Event::KeyDown { event, reply: None }).is_ok())
    }

    /// Deliver a storage change on the config feed.
    pub fn send_config(&self, config: Option<Config>) -> bool {
        self.sender(Feed::ConfigChanges)
            .is_some_and(|tx| tx.send(Event::ConfigChanged(config)).is_ok())
    }
}

/// Token decrementing the live count on drop.
struct HostToken(Arc<AtomicUsize>);

impl ListenerToken for HostToken {}

impl Drop for HostToken {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ListenerHost for MockHost {
    fn subscribe(&self, feed: Feed, events: EventSender) -> Box<dyn ListenerToken> {
        self.subs.lock().push((feed, events));
        self.active.fetch_add(1, Ordering::SeqCst);
        Box::new(HostToken(self.active.clone()))
    }
}

// ---- Bundle ----

/// Every mock, plus a [`Services`] view over them.
#[derive(Clone)]
pub struct Mocks {
    /// Renderer.
    pub sink: Arc<MockSink>,
    /// Trackers and the page.
    pub factory: Arc<MockTrackerFactory>,
    /// Browser shim.
    pub browser: Arc<MockBrowser>,
    /// Storage.
    pub store: Arc<MockStore>,
    /// Tick source.
    pub ticks: Arc<ManualTicks>,
    /// Listener host.
    pub host: Arc<MockHost>,
}

impl Mocks {
    /// Mocks for `tab` with `config` stored.
    pub fn new(tab: TabId, config: Config) -> Self {
        Self {
            sink: Arc::new(MockSink::default()),
            factory: Arc::new(MockTrackerFactory::default()),
            browser: Arc::new(MockBrowser::new(tab)),
            store: Arc::new(MockStore::with(config)),
            ticks: Arc::new(ManualTicks::default()),
            host: Arc::new(MockHost::default()),
        }
    }

    /// Collaborator bundle backed by these mocks.
    pub fn services(&self) -> Services {
        Services {
            sink: self.sink.clone(),
            trackers: self.factory.clone(),
            browser: self.browser.clone(),
            store: self.store.clone(),
            ticks: self.ticks.clone(),
            host: self.host.clone(),
        }
    }
}
