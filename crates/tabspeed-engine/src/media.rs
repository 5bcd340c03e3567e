use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::deps::{ElementId, MediaElement};

/// Named time bookmarks, kept per media element.
#[derive(Debug, Default, Clone)]
pub struct MarkBook {
    marks: HashMap<ElementId, HashMap<String, f64>>,
}

impl MarkBook {
    /// Position stored under `key` for `element`.
    pub fn get(&self, element: ElementId, key: &str) -> Option<f64> {
        self.marks.get(&element)?.get(key).copied()
    }

    /// Store `seconds` under `key` for `element`, replacing any earlier mark.
    pub fn set(&mut self, element: ElementId, key: &str, seconds: f64) {
        self.marks
            .entry(element)
            .or_default()
            .insert(key.to_string(), seconds);
    }

    /// Forget marks of elements that are no longer tracked.
    pub fn retain(&mut self, live: &HashSet<ElementId>) {
        self.marks.retain(|id, _| live.contains(id));
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.marks.clear();
    }
}

/// The media a command may act on: the tracker's current elements plus the
/// mark book.
pub struct MediaScope<'a> {
    /// Currently tracked media elements.
    pub elements: Vec<Arc<dyn MediaElement>>,
    /// Bookmarks for those elements.
    pub marks: &'a mut MarkBook,
}

impl MediaScope<'_> {
    /// True when no media is tracked.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_are_per_element() {
        let mut book = MarkBook::default();
        book.set(1, "intro", 12.0);
        assert_eq!(book.get(1, "intro"), Some(12.0));
        assert_eq!(book.get(2, "intro"), None);
        book.set(1, "intro", 30.0);
        assert_eq!(book.get(1, "intro"), Some(30.0));

        book.set(2, "intro", 5.0);
        book.retain(&HashSet::from([2]));
        assert_eq!(book.get(1, "intro"), None);
        assert_eq!(book.get(2, "intro"), Some(5.0));
    }
}
