use std::sync::Arc;

use crate::deps::{Browser, ConfigStore, ListenerHost, NotificationSink, TickSource, TrackerFactory};

/// Groups the long‑lived collaborators so construction sites name every
/// dependency explicitly.
#[derive(Clone)]
pub struct Services {
    /// Indicator and backdrop renderer.
    pub sink: Arc<dyn NotificationSink>,
    /// Element tracker constructor.
    pub trackers: Arc<dyn TrackerFactory>,
    /// Tab identity and tab creation.
    pub browser: Arc<dyn Browser>,
    /// Configuration storage.
    pub store: Arc<dyn ConfigStore>,
    /// Periodic tick scheduler.
    pub ticks: Arc<dyn TickSource>,
    /// Listener registration for keyboard and storage feeds.
    pub host: Arc<dyn ListenerHost>,
}
