//! # Card Stack
//!
//! Holds the navigation state between history changes and applies
//! [`reconcile`] to each one. Everything interesting happens in the
//! reconciler; this type only stores its results.
//!
//! ```text
//! CardStack
//! ├── cards: Rc<[Card]>                     // built once
//! ├── state: Rc<RefCell<NavigationState>>   // shared with the back handler
//! ├── props: RouterProps                    // last props received
//! ├── history: Rc<dyn History>              // target of go_back()
//! └── renderer: Option<Box<dyn CardsRenderer>>
//! ```

use log::{debug, info};
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::bridge::BackHandler;
use super::card::{Card, CardSpec, RegistryError, build};
use super::history::{History, RouterProps};
use super::reconciler::{InitializationError, Transition, initialize, reconcile, request_back};
use super::state::NavigationState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    Registry(RegistryError),
    Initialization(InitializationError),
}

impl fmt::Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackError::Registry(e) => write!(f, "card registry error: {e}"),
            StackError::Initialization(e) => write!(f, "initialization error: {e}"),
        }
    }
}

impl std::error::Error for StackError {}

impl From<RegistryError> for StackError {
    fn from(e: RegistryError) -> Self {
        StackError::Registry(e)
    }
}

impl From<InitializationError> for StackError {
    fn from(e: InitializationError) -> Self {
        StackError::Initialization(e)
    }
}

/// What a renderer receives on every state change.
#[derive(Serialize)]
pub struct CardsRendererProps<'a> {
    pub navigation_state: NavigationState,
    pub cards: &'a [Card],
    #[serde(skip)]
    pub on_navigate_back: BackHandler,
}

/// Draws the stack. The core never looks at what it produces.
pub trait CardsRenderer {
    fn render(&mut self, props: CardsRendererProps<'_>);
}

pub struct CardStack {
    cards: Rc<[Card]>,
    state: Rc<RefCell<NavigationState>>,
    props: RouterProps,
    history: Rc<dyn History>,
    renderer: Option<Box<dyn CardsRenderer>>,
}

impl CardStack {
    /// Build the registry and the initial state from the history's entries.
    pub fn new(
        specs: Option<&[CardSpec]>,
        props: RouterProps,
        history: Rc<dyn History>,
    ) -> Result<Self, StackError> {
        let cards: Rc<[Card]> = build(specs)?.into();
        let state = initialize(&cards, props.history.entries.as_deref(), &props.location)?;
        info!(
            "Card stack ready: {} cards, {} routes",
            cards.len(),
            state.routes.len()
        );
        Ok(Self {
            cards,
            state: Rc::new(RefCell::new(state)),
            props,
            history,
            renderer: None,
        })
    }

    /// Attach a renderer and render the current state once.
    pub fn with_renderer(mut self, renderer: Box<dyn CardsRenderer>) -> Self {
        self.renderer = Some(renderer);
        self.render();
        self
    }

    /// Apply a history change. Props must arrive in the order the history
    /// emitted them.
    pub fn receive_props(&mut self, next_props: RouterProps) -> Transition {
        let transition = {
            let state = self.state.borrow();
            reconcile(&self.cards, &state, &self.props, &next_props)
        };
        self.props = next_props;

        match &transition {
            Transition::Updated(next) => {
                *self.state.borrow_mut() = next.clone();
                self.render();
            }
            Transition::Unchanged(skip) => debug!("Navigation state unchanged: {skip:?}"),
        }
        transition
    }

    /// A snapshot of the current navigation state.
    pub fn navigation_state(&self) -> NavigationState {
        self.state.borrow().clone()
    }

    pub fn props(&self) -> &RouterProps {
        &self.props
    }

    /// Go back if there is a route behind the current one.
    pub fn on_navigate_back(&self) -> bool {
        (self.back_handler())()
    }

    /// A handler for back presses that stays valid independently of `self`.
    pub fn back_handler(&self) -> BackHandler {
        let state = Rc::clone(&self.state);
        let history = Rc::clone(&self.history);
        Rc::new(move || {
            let snapshot = state.borrow().clone();
            request_back(&snapshot, history.as_ref())
        })
    }

    pub fn renderer_props(&self) -> CardsRendererProps<'_> {
        CardsRendererProps {
            navigation_state: self.navigation_state(),
            cards: &self.cards,
            on_navigate_back: self.back_handler(),
        }
    }

    fn render(&mut self) {
        if let Some(mut renderer) = self.renderer.take() {
            renderer.render(self.renderer_props());
            self.renderer = Some(renderer);
        }
    }
}
