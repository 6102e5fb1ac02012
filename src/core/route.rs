//! # Routes
//!
//! A route is one entry in the navigation state: an instance of a card.
//! The same card can appear several times in a stack, so every route gets
//! its own `key` alongside the card's key (`route_name`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::card::{Card, find_card_by_path};
use super::history::{Location, RouterProps};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Route {
    /// Key of the card this route shows.
    pub route_name: String,
    /// Unique per route instance.
    pub key: String,
    /// The card's path pattern.
    pub path: String,
    pub params: BTreeMap<String, String>,
}

/// Build a route for `location` from the first card that matches it.
///
/// Returns `None` when no card matches or the matching card has no path;
/// callers treat that as "ignore this location".
pub fn get_route(cards: &[Card], location: &Location) -> Option<Route> {
    let card = find_card_by_path(cards, &location.pathname)?;
    let path = card.path.clone()?;
    let matched = card.match_pathname(&location.pathname)?;
    let mut route = Route {
        route_name: card.key.clone(),
        key: String::new(),
        path,
        params: matched.params,
    };
    route.key = create_key(&route);
    Some(route)
}

/// A fresh instance key for `route`.
pub fn create_key(route: &Route) -> String {
    format!("{}@@{}", route.route_name, uuid::Uuid::new_v4())
}

/// Whether a change from `prev_props` to `next_props` should touch the
/// navigation state at all.
pub fn should_update(
    current_card: &Card,
    next_card: &Card,
    prev_props: &RouterProps,
    next_props: &RouterProps,
) -> bool {
    current_card.key != next_card.key
        || prev_props.location != next_props.location
        || prev_props.history.index != next_props.history.index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::{CardSpec, build};
    use crate::core::history::{HistoryAction, HistorySnapshot};

    fn cards() -> Vec<Card> {
        build(Some(&[
            CardSpec::new("home", "/").exact(),
            CardSpec::new("detail", "/items/:id"),
            CardSpec {
                key: "fallback".into(),
                ..Default::default()
            },
        ][..]))
        .unwrap()
    }

    fn props(path: &str, action: HistoryAction, index: usize) -> RouterProps {
        RouterProps {
            location: Location::from_path(path),
            history: HistorySnapshot {
                action,
                index: Some(index),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_get_route_uses_first_matching_card() {
        let route = get_route(&cards(), &Location::from_path("/items/9")).unwrap();
        assert_eq!(route.route_name, "detail");
        assert_eq!(route.path, "/items/:id");
        assert_eq!(route.params.get("id").map(String::as_str), Some("9"));
        assert!(route.key.starts_with("detail@@"));
    }

    #[test]
    fn test_get_route_skips_pathless_card() {
        // The pathless fallback matches, but yields no route.
        assert!(get_route(&cards(), &Location::from_path("/nowhere")).is_none());
    }

    #[test]
    fn test_get_route_without_any_match() {
        let cards = build(Some(&[CardSpec::new("home", "/").exact()][..])).unwrap();
        assert!(get_route(&cards, &Location::from_path("/x")).is_none());
    }

    #[test]
    fn test_create_key_is_unique() {
        let route = get_route(&cards(), &Location::from_path("/")).unwrap();
        let keys: std::collections::HashSet<String> =
            (0..100).map(|_| create_key(&route)).collect();
        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_should_update_identical_props_is_false() {
        let cards = cards();
        let p = props("/", HistoryAction::Push, 0);
        assert!(!should_update(&cards[0], &cards[0], &p, &p.clone()));
    }

    #[test]
    fn test_should_update_on_card_change() {
        let cards = cards();
        let p = props("/", HistoryAction::Push, 0);
        assert!(should_update(&cards[0], &cards[1], &p, &p.clone()));
    }

    #[test]
    fn test_should_update_on_param_change() {
        let cards = cards();
        let prev = props("/items/1", HistoryAction::Push, 1);
        let next = props("/items/2", HistoryAction::Push, 1);
        assert!(should_update(&cards[1], &cards[1], &prev, &next));
    }

    #[test]
    fn test_should_update_on_history_index_change() {
        let cards = cards();
        let prev = props("/items/1", HistoryAction::Push, 1);
        let next = props("/items/1", HistoryAction::Push, 2);
        assert!(should_update(&cards[1], &cards[1], &prev, &next));
    }
}
