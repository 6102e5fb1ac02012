//! # Reconciler
//!
//! Pure functions that keep a [`NavigationState`] in line with history.
//!
//! ```text
//! history entries ──initialize()──▶ NavigationState
//!
//! NavigationState + (prev props, next props) ──reconcile()──▶ Transition
//!     PUSH     → append route, index = last
//!     POP  n=1 → drop last route, index - 1
//!     POP  n>1 → truncate to index - n, index - n
//!     REPLACE  → swap route at index
//! ```
//!
//! Nothing here fails once the stack exists. Every input that cannot be
//! applied cleanly produces `Transition::Unchanged` with the reason.
//!
//! Props must be fed in the order the history emitted them.

use log::{debug, warn};
use std::fmt;

use super::card::{Card, find_card_by_key, find_card_by_path};
use super::history::{History, HistoryAction, Location, RouterProps};
use super::route::{Route, create_key, get_route, should_update};
use super::state::NavigationState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitializationError {
    /// The history exposes no entries at all.
    MissingEntries,
}

impl fmt::Display for InitializationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitializationError::MissingEntries => write!(f, "no history entries found"),
        }
    }
}

impl std::error::Error for InitializationError {}

/// Why a history change left the state alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// No card routes the new location.
    NoMatchingRoute,
    /// The current or next route refers to a card that isn't registered.
    MissingCard,
    /// Nothing relevant changed between the two props.
    NotRelevant,
    /// A POP without both history indices.
    MissingHistoryIndex,
    /// A POP further back than the stack reaches.
    OverPop { steps: usize, index: usize },
    /// A single-step POP with only one route left.
    AtBottom,
    UnhandledAction,
}

/// The outcome of reconciling one history change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Updated(NavigationState),
    Unchanged(Skip),
}

impl Transition {
    pub fn is_updated(&self) -> bool {
        matches!(self, Transition::Updated(_))
    }
}

/// Build the starting state from the history's entries.
///
/// Entries no card routes are dropped. The route for the entry matching the
/// current location becomes current; the last such entry wins. If none
/// matches, the last route is current.
pub fn initialize(
    cards: &[Card],
    entries: Option<&[Location]>,
    location: &Location,
) -> Result<NavigationState, InitializationError> {
    let entries = entries.ok_or(InitializationError::MissingEntries)?;

    let mut state = entries
        .iter()
        .fold(NavigationState::new(), |mut state, entry| {
            let Some(card) = find_card_by_path(cards, &entry.pathname) else {
                debug!("Dropping unroutable history entry {}", entry.pathname);
                return state;
            };
            if card.path.is_none() {
                return state;
            }
            let Some(route) = get_route(cards, entry) else {
                return state;
            };
            if card.match_pathname(&location.pathname).is_some() {
                state.index = Some(state.routes.len());
            }
            state.routes.push(route);
            state
        });

    if state.index.is_none() && !state.routes.is_empty() {
        warn!(
            "Current location {} matched no history entry, using the last route",
            location.pathname
        );
        state.index = Some(state.routes.len() - 1);
    }

    debug!(
        "Initialized navigation state: {} routes, index {:?}",
        state.routes.len(),
        state.index
    );
    Ok(state)
}

/// Apply the change from `prev_props` to `next_props` to `state`.
pub fn reconcile(
    cards: &[Card],
    state: &NavigationState,
    prev_props: &RouterProps,
    next_props: &RouterProps,
) -> Transition {
    let current_card = state
        .current()
        .and_then(|route| find_card_by_key(cards, &route.route_name));

    let Some(next_route) = get_route(cards, &next_props.location) else {
        debug!("No route for {}, ignoring", next_props.location.pathname);
        return Transition::Unchanged(Skip::NoMatchingRoute);
    };
    let next_card = find_card_by_key(cards, &next_route.route_name);

    let (Some(current_card), Some(next_card)) = (current_card, next_card) else {
        return Transition::Unchanged(Skip::MissingCard);
    };
    if !should_update(current_card, next_card, prev_props, next_props) {
        return Transition::Unchanged(Skip::NotRelevant);
    }

    let transition = match next_props.history.action {
        HistoryAction::Push => Transition::Updated(state.clone().push(fresh(next_route))),
        HistoryAction::Pop => pop(state, prev_props, next_props),
        HistoryAction::Replace => {
            Transition::Updated(state.clone().replace_current(fresh(next_route)))
        }
        HistoryAction::Unknown => Transition::Unchanged(Skip::UnhandledAction),
    };

    if let Transition::Updated(next) = &transition {
        debug!(
            "{:?} to {}: {} routes, index {:?}",
            next_props.history.action,
            next_props.location.pathname,
            next.routes.len(),
            next.index
        );
    }
    transition
}

fn fresh(route: Route) -> Route {
    let key = create_key(&route);
    Route { key, ..route }
}

fn pop(state: &NavigationState, prev_props: &RouterProps, next_props: &RouterProps) -> Transition {
    let (Some(prev_index), Some(next_index)) = (prev_props.history.index, next_props.history.index)
    else {
        return Transition::Unchanged(Skip::MissingHistoryIndex);
    };
    let steps = prev_index as isize - next_index as isize;

    if steps > 1 {
        let steps = steps as usize;
        let index = state.index.unwrap_or(0);
        if steps > index {
            warn!("POP of {steps} steps from index {index} reaches past the first route, ignoring");
            return Transition::Unchanged(Skip::OverPop { steps, index });
        }
        Transition::Updated(state.clone().reset_to(index - steps))
    } else if state.can_go_back() {
        // Forward and same-index POPs land here too and drop one route.
        Transition::Updated(state.clone().pop())
    } else {
        debug!("POP with a single route left, ignoring");
        Transition::Unchanged(Skip::AtBottom)
    }
}

/// Ask the history to step back if the stack has somewhere to go.
///
/// Returns false without touching the history at the bottom of the stack,
/// leaving the back press to whoever handles it next.
pub fn request_back(state: &NavigationState, history: &dyn History) -> bool {
    if state.can_go_back() {
        history.go_back();
        true
    } else {
        false
    }
}
