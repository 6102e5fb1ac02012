//! # Core Navigation Logic
//!
//! Keeps a stack of cards in step with a linear, browser-style history.
//! It knows nothing about how cards are drawn or where back presses come from.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Card registry        │
//!                    │  • NavigationState      │
//!                    │  • reconcile() (pure)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │  History   │      │  Renderer  │      │ Back signal│
//!     │ (go_back)  │      │ (snapshots)│      │  (bridge)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`card`]: Card specs, the registry and lookups
//! - [`pattern`]: Path pattern matching
//! - [`route`]: Route instances, keys and the update policy
//! - [`history`]: History types and an in-memory history
//! - [`state`]: `NavigationState` and its transitions
//! - [`reconciler`]: `initialize`, `reconcile`, `request_back`
//! - [`stack`]: `CardStack`, the holder that applies the reconciler
//! - [`bridge`]: Back-press registration
//! - [`config`]: TOML configuration

pub mod bridge;
pub mod card;
pub mod config;
pub mod history;
pub mod pattern;
pub mod reconciler;
pub mod route;
pub mod stack;
pub mod state;

pub use card::{Card, CardSpec, RegistryError};
pub use history::{History, HistoryAction, Location, MemoryHistory, RouterProps};
pub use reconciler::{InitializationError, Skip, Transition};
pub use stack::{CardStack, CardsRenderer, CardsRendererProps, StackError};
pub use state::NavigationState;
