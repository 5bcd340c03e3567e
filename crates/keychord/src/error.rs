use thiserror::Error;

/// Errors produced while parsing chord specifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The chord had no key component.
    #[error("empty chord specification")]
    Empty,

    /// A modifier component was not recognized.
    #[error("unknown modifier '{modifier}' in chord '{chord}'")]
    UnknownModifier {
        /// The offending modifier text.
        modifier: String,
        /// The full chord specification.
        chord: String,
    },

    /// The chord contained an empty component (e.g. "ctrl++a").
    #[error("malformed chord '{0}'")]
    Malformed(String),
}
