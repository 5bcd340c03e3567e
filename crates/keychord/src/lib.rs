//! keychord: key chords as typed by users and as reported by keyboard events.
//!
//! - `Key`: a normalized key identity (lowercased, with aliases folded).
//! - `Modifier`: the four modifier keys a key event reports.
//! - `Chord`: a modifier set plus a key. Chords compare independently of
//!   case and modifier order, which is what hotkey matching relies on.

mod chord;
mod error;
mod key;
mod modifiers;

pub use chord::Chord;
pub use error::Error;
pub use key::Key;
pub use modifiers::Modifier;
