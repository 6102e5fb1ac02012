//! # Card Registry
//!
//! A card is a routable screen: a unique key, an optional path pattern and
//! some renderer metadata the core never looks at.
//!
//! ```text
//! [[cards]]               ┐
//! key = "home"            │  CardSpec tree (declarative input)
//! path = "/"              │
//! exact = true            │        build()
//!   [[cards.cards]]       │  ─────────────────▶  [home, detail, ...]
//!   key = "detail"        │    depth-first,       ordered Vec<Card>
//!   path = "/items/:id"   ┘    parent first       (first match wins)
//! ```
//!
//! Registry order matters: lookups by path return the first card that
//! matches, so more specific cards must come before catch-alls.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use super::pattern::{PathMatch, PathPattern};

/// Declarative description of a card, as written in config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CardSpec {
    pub key: String,
    pub path: Option<String>,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub strict: bool,
    pub title: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
    /// Nested cards, flattened after their parent.
    #[serde(default)]
    pub cards: Vec<CardSpec>,
}

impl CardSpec {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: Some(path.into()),
            ..Default::default()
        }
    }

    pub fn exact(mut self) -> Self {
        self.exact = true;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }
}

/// A built, immutable card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub key: String,
    pub path: Option<String>,
    pub exact: bool,
    pub strict: bool,
    pub title: Option<String>,
    pub meta: BTreeMap<String, serde_json::Value>,
    #[serde(skip)]
    pattern: PathPattern,
}

impl Card {
    fn from_spec(spec: &CardSpec) -> Self {
        Self {
            key: spec.key.clone(),
            path: spec.path.clone(),
            exact: spec.exact,
            strict: spec.strict,
            title: spec.title.clone(),
            meta: spec.meta.clone(),
            pattern: PathPattern::parse(spec.path.as_deref().unwrap_or("/")),
        }
    }

    /// Match `pathname` against this card's pattern and modifiers.
    /// A card without a path matches everything.
    pub fn match_pathname(&self, pathname: &str) -> Option<PathMatch> {
        self.pattern.matches(pathname, self.exact, self.strict)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No card input at all (distinct from an empty list).
    MissingCards,
    EmptyKey,
    DuplicateKey(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::MissingCards => write!(f, "no cards were provided"),
            RegistryError::EmptyKey => write!(f, "card key must not be empty"),
            RegistryError::DuplicateKey(key) => write!(f, "duplicate card key: {key}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Build the ordered card list from a declarative tree.
///
/// `None` is an error; an empty slice gives an empty registry.
pub fn build(specs: Option<&[CardSpec]>) -> Result<Vec<Card>, RegistryError> {
    let specs = specs.ok_or(RegistryError::MissingCards)?;
    let mut cards = Vec::new();
    let mut seen = HashSet::new();
    flatten(specs, &mut cards, &mut seen)?;
    debug!("Built card registry with {} cards", cards.len());
    Ok(cards)
}

fn flatten(
    specs: &[CardSpec],
    cards: &mut Vec<Card>,
    seen: &mut HashSet<String>,
) -> Result<(), RegistryError> {
    for spec in specs {
        if spec.key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if !seen.insert(spec.key.clone()) {
            return Err(RegistryError::DuplicateKey(spec.key.clone()));
        }
        cards.push(Card::from_spec(spec));
        flatten(&spec.cards, cards, seen)?;
    }
    Ok(())
}

/// True if `pathname` matches the card's pattern.
pub fn match_path(pathname: &str, card: &Card) -> bool {
    card.match_pathname(pathname).is_some()
}

pub fn find_card_by_key<'a>(cards: &'a [Card], key: &str) -> Option<&'a Card> {
    cards.iter().find(|card| card.key == key)
}

/// First card, in registry order, whose pattern accepts `pathname`.
pub fn find_card_by_path<'a>(cards: &'a [Card], pathname: &str) -> Option<&'a Card> {
    cards.iter().find(|card| match_path(pathname, card))
}
