//! Event bus module.
//!
//! Contains the typed event union and the synchronous dispatcher every
//! component talks through.
//!
//! Subscription ownership: the checkout coordinator registers the single
//! handler for every intent kind. State holders (catalog, basket, draft)
//! only publish. Render surfaces subscribe to notifications.

mod bus;
mod event;

pub use bus::{BusError, EventBus, SubscriptionId, DEFAULT_MAX_DEPTH};
pub use event::{Event, EventKind};
