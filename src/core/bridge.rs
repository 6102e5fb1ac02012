//! # Back-Navigation Bridge
//!
//! Connects the card stack's back handler to a platform back signal
//! (hardware back button, Escape key, ...).
//!
//! The platform side is injected as a [`BackSignalSource`] so tests and the
//! replay driver can use [`BackHandlerStack`] instead of a real platform.
//!
//! ```text
//! press ──▶ BackHandlerStack ──▶ newest handler ──false──▶ older handler ──false──▶ default
//!                                     │ true
//!                                     ▼
//!                                  handled
//! ```

use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Returns true if it handled the back press.
pub type BackHandler = Rc<dyn Fn() -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Something that delivers back presses to registered handlers.
pub trait BackSignalSource {
    fn add_listener(&self, handler: BackHandler) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

/// Back-press registry: handlers run newest first until one handles it.
#[derive(Default)]
pub struct BackHandlerStack {
    handlers: RefCell<Vec<(ListenerId, BackHandler)>>,
    next_id: Cell<u64>,
}

impl BackHandlerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a back press. False means nobody handled it and the caller
    /// should fall back to its default (usually exiting).
    pub fn dispatch(&self) -> bool {
        // Snapshot so handlers may (de)register while we iterate.
        let handlers: Vec<BackHandler> = self
            .handlers
            .borrow()
            .iter()
            .rev()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        let handled = handlers.iter().any(|handler| handler());
        debug!("Back press handled: {handled}");
        handled
    }

    pub fn listener_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl BackSignalSource for BackHandlerStack {
    fn add_listener(&self, handler: BackHandler) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, handler));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        self.handlers.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

/// Keeps one back handler registered with a signal source while active.
///
/// `activate` and `deactivate` are idempotent, and dropping an active bridge
/// deregisters its handler.
pub struct BackButtonBridge {
    source: Rc<dyn BackSignalSource>,
    handler: BackHandler,
    listener: Option<ListenerId>,
}

impl BackButtonBridge {
    pub fn new(source: Rc<dyn BackSignalSource>, handler: BackHandler) -> Self {
        Self {
            source,
            handler,
            listener: None,
        }
    }

    pub fn activate(&mut self) {
        if self.listener.is_none() {
            self.listener = Some(self.source.add_listener(Rc::clone(&self.handler)));
            debug!("Back handler registered");
        }
    }

    pub fn deactivate(&mut self) {
        if let Some(id) = self.listener.take() {
            self.source.remove_listener(id);
            debug!("Back handler removed");
        }
    }

    pub fn is_active(&self) -> bool {
        self.listener.is_some()
    }
}

impl Drop for BackButtonBridge {
    fn drop(&mut self) {
        self.deactivate();
    }
}
