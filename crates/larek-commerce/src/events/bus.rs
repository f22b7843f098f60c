//! Synchronous, re-entrant event dispatcher.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use tracing::{trace, warn};

use crate::events::{Event, EventKind};

/// Default limit on nested `emit` calls.
pub const DEFAULT_MAX_DEPTH: usize = 16;

type Handler = Rc<dyn Fn(&Event)>;

/// Handle returned by [`EventBus::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Errors raised by the bus itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// A handler chain nested deeper than the configured limit.
    #[error("Dispatch of {kind} refused: nesting depth limit {limit} reached")]
    ReentryLimit { kind: EventKind, limit: usize },
}

/// Central publish/subscribe dispatcher.
///
/// Handlers run synchronously in registration order. A handler that emits
/// causes the nested event to be fully dispatched before the remaining
/// handlers of the outer event run (depth-first). Handler panics are not
/// caught.
///
/// # Example
///
/// ```rust
/// use larek_commerce::events::{Event, EventBus, EventKind};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let bus = EventBus::new();
/// let opened = Rc::new(Cell::new(0));
/// let seen = Rc::clone(&opened);
/// bus.on(EventKind::BasketOpened, move |_| seen.set(seen.get() + 1));
///
/// bus.emit(Event::BasketOpened).unwrap();
/// assert_eq!(opened.get(), 1);
/// ```
pub struct EventBus {
    handlers: RefCell<HashMap<EventKind, Vec<(SubscriptionId, Handler)>>>,
    next_id: Cell<u64>,
    depth: Cell<usize>,
    max_depth: usize,
}

impl EventBus {
    /// Create a bus with the default nesting limit.
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    /// Create a bus that refuses dispatch nested deeper than `max_depth`.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            handlers: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
            depth: Cell::new(0),
            max_depth: max_depth.max(1),
        }
    }

    /// Register a handler for one event kind.
    pub fn on(&self, kind: EventKind, handler: impl Fn(&Event) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        trace!(kind = %kind, "handler registered");
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        for list in handlers.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Dispatch an event to every handler registered for its kind.
    ///
    /// Handlers added while this dispatch runs are not called for it.
    pub fn emit(&self, event: Event) -> Result<(), BusError> {
        let kind = event.kind();
        let depth = self.depth.get();
        if depth >= self.max_depth {
            warn!(kind = %kind, depth, "event dispatch refused: reentry limit");
            return Err(BusError::ReentryLimit {
                kind,
                limit: self.max_depth,
            });
        }

        // Snapshot so handlers can register or emit without holding the borrow.
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&kind)
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        trace!(kind = %kind, depth, handlers = snapshot.len(), "dispatch");
        let _guard = DepthGuard::enter(&self.depth);
        for handler in snapshot {
            handler(&event);
        }
        Ok(())
    }

    /// Number of handlers registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// Current nesting depth (0 outside any dispatch).
    pub fn depth(&self) -> usize {
        self.depth.get()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("kinds", &self.handlers.borrow().len())
            .field("depth", &self.depth.get())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Restores the depth counter even if a handler panics.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
