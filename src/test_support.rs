//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::Cell;
use std::collections::BTreeMap;

use crate::core::history::History;
use crate::core::route::Route;

/// A history that only counts how often it was asked to go back.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    back_calls: Cell<usize>,
}

impl RecordingHistory {
    pub fn back_calls(&self) -> usize {
        self.back_calls.get()
    }
}

impl History for RecordingHistory {
    fn go_back(&self) {
        self.back_calls.set(self.back_calls.get() + 1);
    }
}

/// Creates a route for card `name` with a throwaway key.
pub fn route(name: &str) -> Route {
    Route {
        route_name: name.to_string(),
        key: format!("{name}@@{}", uuid::Uuid::new_v4()),
        path: format!("/{name}"),
        params: BTreeMap::new(),
    }
}
