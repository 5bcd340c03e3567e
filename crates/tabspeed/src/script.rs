//! Replay scripts: a JSON array of steps executed in order.

use std::{
    fs,
    path::{Path, PathBuf},
};

use keychord::Chord;
use serde::Deserialize;
use tabspeed_engine::{EventTarget, deps::ElementId};

use crate::error::{Error, Result};

/// One script step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum Step {
    /// Press a chord.
    Key {
        /// Chord, e.g. `"shift+s"`.
        chord: Chord,
        /// Element the event is aimed at.
        #[serde(default)]
        target: EventTarget,
    },
    /// Add a media element to the page.
    AddMedia {
        /// Element id.
        id: ElementId,
        /// Initial playback position in seconds.
        #[serde(default)]
        time: f64,
    },
    /// Remove a media element from the page.
    RemoveMedia {
        /// Element id.
        id: ElementId,
    },
    /// Add a filterable element to the page.
    AddFx {
        /// Element id.
        id: ElementId,
    },
    /// Run one reconciliation tick.
    Tick,
    /// Deliver a configuration change read from a file.
    LoadConfig {
        /// Configuration file (JSON).
        path: PathBuf,
    },
    /// Deliver a configuration change without a value.
    EmptyChange,
    /// Print the effective context.
    State,
}

/// Parse a script from JSON text.
pub fn parse(source: &str, path: &Path) -> Result<Vec<Step>> {
    serde_json::from_str(source).map_err(|e| Error::Script {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Read and parse the script at `path`.
pub fn load(path: &Path) -> Result<Vec<Step>> {
    let source = fs::read_to_string(path)?;
    parse(&source, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_step_kind() {
        let src = r#"[
            {"step": "addMedia", "id": 1, "time": 4.5},
            {"step": "addFx", "id": 2},
            {"step": "key", "chord": "Shift+S"},
            {"step": "key", "chord": "d", "target": "textInput"},
            {"step": "tick"},
            {"step": "removeMedia", "id": 1},
            {"step": "loadConfig", "path": "other.json"},
            {"step": "emptyChange"},
            {"step": "state"}
        ]"#;
        let steps = parse(src, Path::new("t.json")).expect("valid script");
        assert_eq!(steps.len(), 9);
        assert_eq!(
            steps[2],
            Step::Key {
                chord: Chord::parse("shift+s").expect("chord"),
                target: EventTarget::Other
            }
        );
        assert!(matches!(
            steps[3],
            Step::Key {
                target: EventTarget::TextInput,
                ..
            }
        ));
        assert_eq!(steps[4], Step::Tick);
    }

    #[test]
    fn bad_chord_names_the_script() {
        let err = parse(r#"[{"step": "key", "chord": "hyper+x"}]"#, Path::new("bad.json"))
            .expect_err("unknown modifier");
        assert!(err.to_string().contains("bad.json"), "{err}");
    }
}
