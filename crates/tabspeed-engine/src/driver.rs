//! Serial event loop in front of the [`Manager`].
//!
//! Keyboard events, configuration changes and ticks all arrive on one
//! unbounded channel and are handled strictly one at a time, so nothing
//! interleaves with a key pass between its dispatches and its persist.

use config::Config;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace};

use crate::{
    Error, Manager, Result,
    key_event::{KeyEvent, Propagation},
    services::Services,
};

/// Input to the event loop.
#[derive(Debug)]
pub enum Event {
    /// A key-down event. The reply, if any, receives the propagation verdict.
    KeyDown {
        /// The event.
        event: KeyEvent,
        /// Where to send the verdict.
        reply: Option<oneshot::Sender<Propagation>>,
    },
    /// Storage reported a change. `None` carries no new value.
    ConfigChanged(Option<Config>),
    /// Periodic reconciliation.
    Tick,
    /// Stop the loop and release the manager.
    Shutdown,
}

/// Sending half of the event channel.
pub type EventSender = mpsc::UnboundedSender<Event>;

/// Receiving half of the event channel.
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

/// Create a fresh event channel.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Queue `event` for the loop. Fails once the receiving side is gone.
pub fn post(tx: &EventSender, event: Event) -> Result<()> {
    tx.send(event).map_err(|_| Error::ChannelClosed)
}

/// Owns the manager and feeds it events in arrival order.
pub struct EventLoop {
    /// The orchestrator.
    manager: Manager,
    /// Incoming events.
    rx: EventReceiver,
}

impl EventLoop {
    /// Start a manager wired to a new channel. Returns the loop and a
    /// sender for injecting events.
    pub async fn start(services: Services) -> Result<(Self, EventSender)> {
        let (tx, rx) = channel();
        let manager = Manager::start(services, tx.clone()).await?;
        Ok((Self { manager, rx }, tx))
    }

    /// The managed orchestrator.
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Process events until shutdown or until every sender is gone. The
    /// manager is released before it is returned.
    pub async fn run(mut self) -> Manager {
        while let Some(event) = self.rx.recv().await {
            if !self.handle(event) {
                debug!("event loop shutdown requested");
                break;
            }
        }
        self.manager.release();
        self.manager
    }

    /// Handle one event. Returns false when the loop should stop.
    pub fn handle(&mut self, event: Event) -> bool {
        match event {
            Event::KeyDown { event, reply } => {
                let verdict = match self.manager.handle_key(&event) {
                    Ok(v) => v,
                    Err(e) => {
                        error!(key = %event.key, error = %e, "key handling failed");
                        Propagation::Continue
                    }
                };
                if let Some(reply) = reply
                    && reply.send(verdict).is_err()
                {
                    trace!("key reply dropped by sender");
                }
            }
            Event::ConfigChanged(next) => {
                if let Err(e) = self.manager.on_config_changed(next) {
                    error!(error = %e, "configuration change rejected");
                }
            }
            Event::Tick => self.manager.on_tick(),
            Event::Shutdown => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_reports_closed_channel() {
        let (tx, mut rx) = channel();
        post(&tx, Event::Tick).expect("open channel");
        assert!(matches!(rx.try_recv(), Ok(Event::Tick)));
        drop(rx);
        assert!(matches!(post(&tx, Event::Shutdown), Err(Error::ChannelClosed)));
    }
}
