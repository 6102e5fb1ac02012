//! # Navigation State
//!
//! The card stack's view of history: an ordered list of routes and the
//! position of the one on screen.
//!
//! ```text
//! NavigationState
//! ├── index: Option<usize>   // None only while routes is empty
//! └── routes: Vec<Route>     // append / replace / truncate only
//! ```
//!
//! Transitions consume the state and return the next one. Readers get
//! clones and never see a state mid-change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::route::Route;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavigationState {
    /// Serialized as `-1` when there is no current route.
    #[serde(serialize_with = "serialize_index", deserialize_with = "deserialize_index")]
    pub index: Option<usize>,
    pub routes: Vec<Route>,
}

impl NavigationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&Route> {
        self.index.and_then(|i| self.routes.get(i))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// True if there is a route behind the current one.
    pub fn can_go_back(&self) -> bool {
        matches!(self.index, Some(i) if i > 0)
    }

    /// `index` is None exactly when there are no routes, and in range otherwise.
    pub fn is_consistent(&self) -> bool {
        match self.index {
            None => self.routes.is_empty(),
            Some(i) => i < self.routes.len(),
        }
    }

    /// Append `route` and make it current.
    pub fn push(mut self, route: Route) -> Self {
        self.routes.push(route);
        self.index = Some(self.routes.len() - 1);
        self
    }

    /// Drop the last route and step back one. No-op at the bottom of the stack.
    pub fn pop(mut self) -> Self {
        match self.index {
            Some(i) if i > 0 => {
                self.routes.pop();
                self.index = Some(i - 1);
                self
            }
            _ => self,
        }
    }

    /// Keep routes `0..=index` and make `index` current.
    pub fn reset_to(mut self, index: usize) -> Self {
        self.routes.truncate(index + 1);
        self.index = if self.routes.is_empty() {
            None
        } else {
            Some(index.min(self.routes.len() - 1))
        };
        self
    }

    /// Swap the current route for `route`. No-op on an empty state.
    pub fn replace_current(mut self, route: Route) -> Self {
        if let Some(slot) = self.index.and_then(|i| self.routes.get_mut(i)) {
            *slot = route;
        }
        self
    }
}

fn serialize_index<S: Serializer>(index: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match index {
        Some(i) => serializer.serialize_i64(*i as i64),
        None => serializer.serialize_i64(-1),
    }
}

fn deserialize_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Ok(usize::try_from(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::route;

    #[test]
    fn test_empty_state() {
        let state = NavigationState::new();
        assert_eq!(state.index, None);
        assert!(state.current().is_none());
        assert!(!state.can_go_back());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_push_sets_index_to_last() {
        let state = NavigationState::new().push(route("a")).push(route("b"));
        assert_eq!(state.index, Some(1));
        assert_eq!(state.current().unwrap().route_name, "b");
        assert!(state.can_go_back());
    }

    #[test]
    fn test_pop_at_bottom_is_noop() {
        let state = NavigationState::new().push(route("a"));
        let popped = state.clone().pop();
        assert_eq!(popped, state);
    }

    #[test]
    fn test_pop_drops_last() {
        let state = NavigationState::new().push(route("a")).push(route("b")).pop();
        assert_eq!(state.index, Some(0));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_reset_to_truncates_tail() {
        let state = NavigationState::new()
            .push(route("a"))
            .push(route("b"))
            .push(route("c"))
            .reset_to(0);
        assert_eq!(state.index, Some(0));
        assert_eq!(state.len(), 1);
        assert_eq!(state.routes[0].route_name, "a");
    }

    #[test]
    fn test_replace_current_keeps_length() {
        let state = NavigationState::new()
            .push(route("a"))
            .push(route("b"))
            .replace_current(route("c"));
        assert_eq!(state.index, Some(1));
        assert_eq!(state.len(), 2);
        assert_eq!(state.routes[1].route_name, "c");
    }

    #[test]
    fn test_index_serializes_as_minus_one_when_empty() {
        let json = serde_json::to_value(NavigationState::new()).unwrap();
        assert_eq!(json["index"], -1);

        let back: NavigationState = serde_json::from_value(json).unwrap();
        assert_eq!(back.index, None);
    }
}
