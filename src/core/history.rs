//! # History
//!
//! Types for the external, linear history that the card stack follows, plus
//! an in-memory implementation used by the replay driver and tests.
//!
//! ```text
//!   MemoryHistory                               CardStack
//!   ┌──────────────────────┐   take_pending()   ┌──────────────────┐
//!   │ entries: [/, /a, /b] │ ─────────────────▶ │ receive_props()  │
//!   │ index: 2             │   RouterProps      │                  │
//!   └──────────▲───────────┘                    └────────┬─────────┘
//!              │               go_back()                 │
//!              └─────────────────────────────────────────┘
//! ```
//!
//! Transitions are queued rather than delivered through callbacks, so a
//! `go_back()` issued from inside a back handler never re-enters the stack.

use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::VecDeque;

/// A position in history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hash: String,
    /// Identity of the history entry, if the history tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Location {
    /// Split a path like `/items/3?tab=info#top` into its parts.
    pub fn from_path(path: &str) -> Self {
        let (rest, hash) = match path.find('#') {
            Some(i) => (&path[..i], &path[i..]),
            None => (path, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(i) => (&rest[..i], &rest[i..]),
            None => (rest, ""),
        };
        Self {
            pathname: if pathname.is_empty() {
                "/".to_string()
            } else {
                pathname.to_string()
            },
            search: search.to_string(),
            hash: hash.to_string(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// How the history arrived at its current location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryAction {
    Push,
    #[default]
    Pop,
    Replace,
    /// Anything else a history might report. Never acted on.
    #[serde(other)]
    Unknown,
}

/// What the history looked like when it last changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistorySnapshot {
    pub action: HistoryAction,
    /// Linear position, if the history exposes one.
    pub index: Option<usize>,
    #[serde(default)]
    pub length: usize,
    /// All entries, if the history exposes them.
    pub entries: Option<Vec<Location>>,
}

/// Props delivered to the card stack on every history change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouterProps {
    pub location: Location,
    pub history: HistorySnapshot,
}

/// The slice of a history the card stack drives directly.
pub trait History {
    /// Navigate one entry back. Fire-and-forget.
    fn go_back(&self);
}

#[derive(Debug)]
struct MemoryHistoryInner {
    entries: Vec<Location>,
    index: usize,
    action: HistoryAction,
    pending: VecDeque<RouterProps>,
}

impl MemoryHistoryInner {
    fn snapshot(&self) -> RouterProps {
        RouterProps {
            location: self.entries[self.index].clone(),
            history: HistorySnapshot {
                action: self.action,
                index: Some(self.index),
                length: self.entries.len(),
                entries: Some(self.entries.clone()),
            },
        }
    }

    fn emit(&mut self, action: HistoryAction) {
        self.action = action;
        let props = self.snapshot();
        debug!(
            "History {:?} -> {} (index {})",
            action, props.location.pathname, self.index
        );
        self.pending.push_back(props);
    }
}

/// A linear history kept in memory.
#[derive(Debug)]
pub struct MemoryHistory {
    inner: RefCell<MemoryHistoryInner>,
}

impl MemoryHistory {
    /// Create a history from initial paths. An empty list starts at `/`.
    /// `initial_index` defaults to the last entry and is clamped into range.
    pub fn new(initial_entries: &[String], initial_index: Option<usize>) -> Self {
        let mut entries: Vec<Location> = initial_entries
            .iter()
            .map(|path| Location::from_path(path).with_key(new_entry_key()))
            .collect();
        if entries.is_empty() {
            entries.push(Location::from_path("/").with_key(new_entry_key()));
        }
        let last = entries.len() - 1;
        let index = initial_index.unwrap_or(last).min(last);
        Self {
            inner: RefCell::new(MemoryHistoryInner {
                entries,
                index,
                action: HistoryAction::Pop,
                pending: VecDeque::new(),
            }),
        }
    }

    pub fn props(&self) -> RouterProps {
        self.inner.borrow().snapshot()
    }

    pub fn location(&self) -> Location {
        let inner = self.inner.borrow();
        inner.entries[inner.index].clone()
    }

    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Add an entry after the current one, discarding any forward entries.
    pub fn push(&self, path: &str) {
        let mut inner = self.inner.borrow_mut();
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner
            .entries
            .push(Location::from_path(path).with_key(new_entry_key()));
        inner.index = next;
        inner.emit(HistoryAction::Push);
    }

    /// Overwrite the current entry.
    pub fn replace(&self, path: &str) {
        let mut inner = self.inner.borrow_mut();
        let index = inner.index;
        inner.entries[index] = Location::from_path(path).with_key(new_entry_key());
        inner.emit(HistoryAction::Replace);
    }

    /// Move `n` entries (negative is back), clamped to the ends of the history.
    pub fn go(&self, n: isize) {
        let mut inner = self.inner.borrow_mut();
        let last = inner.entries.len() - 1;
        let next = inner.index.saturating_add_signed(n).min(last);
        if next == inner.index {
            return;
        }
        inner.index = next;
        inner.emit(HistoryAction::Pop);
    }

    pub fn go_forward(&self) {
        self.go(1);
    }

    /// Drain the transitions recorded since the last call, oldest first.
    pub fn take_pending(&self) -> Vec<RouterProps> {
        self.inner.borrow_mut().pending.drain(..).collect()
    }
}

impl History for MemoryHistory {
    fn go_back(&self) {
        self.go(-1);
    }
}

fn new_entry_key() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(history: &MemoryHistory) -> Vec<String> {
        history
            .props()
            .history
            .entries
            .unwrap_or_default()
            .into_iter()
            .map(|l| l.pathname)
            .collect()
    }

    #[test]
    fn test_location_from_path() {
        let loc = Location::from_path("/items/3?tab=info#top");
        assert_eq!(loc.pathname, "/items/3");
        assert_eq!(loc.search, "?tab=info");
        assert_eq!(loc.hash, "#top");

        assert_eq!(Location::from_path("?q=1").pathname, "/");
    }

    #[test]
    fn test_unknown_action_deserializes() {
        let action: HistoryAction = serde_json::from_str("\"RELOAD\"").unwrap();
        assert_eq!(action, HistoryAction::Unknown);
        let push: HistoryAction = serde_json::from_str("\"PUSH\"").unwrap();
        assert_eq!(push, HistoryAction::Push);
    }

    #[test]
    fn test_new_defaults_to_last_entry() {
        let history = MemoryHistory::new(&["/".to_string(), "/a".to_string()], None);
        assert_eq!(history.index(), 1);
        assert_eq!(history.location().pathname, "/a");
    }

    #[test]
    fn test_new_empty_starts_at_root() {
        let history = MemoryHistory::new(&[], Some(4));
        assert!(!history.is_empty());
        assert_eq!(history.len(), 1);
        assert_eq!(history.index(), 0);
        assert_eq!(history.location().pathname, "/");
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let history = MemoryHistory::new(&["/".to_string(), "/a".to_string(), "/b".to_string()], Some(0));
        history.push("/c");
        assert_eq!(paths(&history), ["/", "/c"]);
        assert_eq!(history.index(), 1);

        let pending = history.take_pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].history.action, HistoryAction::Push);
        assert_eq!(pending[0].history.index, Some(1));
    }

    #[test]
    fn test_replace_keeps_index() {
        let history = MemoryHistory::new(&["/".to_string(), "/a".to_string()], None);
        history.replace("/b");
        assert_eq!(paths(&history), ["/", "/b"]);
        assert_eq!(history.index(), 1);
        assert_eq!(history.take_pending()[0].history.action, HistoryAction::Replace);
    }

    #[test]
    fn test_go_clamps_and_skips_noop() {
        let history = MemoryHistory::new(&["/".to_string(), "/a".to_string(), "/b".to_string()], None);
        history.go(-5);
        assert_eq!(history.index(), 0);
        history.go_back();
        assert_eq!(history.take_pending().len(), 1);

        history.go(10);
        assert_eq!(history.index(), 2);
    }

    #[test]
    fn test_entry_keys_are_distinct() {
        let history = MemoryHistory::new(&["/a".to_string()], None);
        history.push("/a");
        let entries = history.props().history.entries.unwrap();
        assert_ne!(entries[0].key, entries[1].key);
        assert_eq!(entries[1].key.as_deref().map(str::len), Some(32));
    }
}
