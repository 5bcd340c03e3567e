use std::result::Result as StdResult;

use config::{FilterId, FilterTarget};
use thiserror::Error;

/// Convenient result type for the engine crate.
pub type Result<T> = StdResult<T, Error>;

/// Unified error type for the tabspeed engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration.
    #[error("Config error: {}", .0.pretty())]
    Config(#[from] config::Error),

    /// A filter value set lacks an entry for a catalog filter. Every set is
    /// seeded with the whole catalog, so this means corrupt configuration.
    #[error("Filter '{filter:?}' missing from {target:?} value set")]
    MissingFilter {
        /// Value set that was addressed.
        target: FilterTarget,
        /// Filter that was looked up.
        filter: FilterId,
    },

    /// Writing the configuration back to storage failed.
    #[error("Persist error: {0}")]
    Persist(String),

    /// The event loop channel has been closed by the receiver.
    #[error("event channel closed")]
    ChannelClosed,

    /// The browser could not identify the tab we are running in.
    #[error("sender tab unavailable")]
    NoSenderTab,

    /// Generic error with context.
    #[error("Engine error: {0}")]
    Msg(String),
}
