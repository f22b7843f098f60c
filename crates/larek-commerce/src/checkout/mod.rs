//! Checkout module.
//!
//! Contains the order draft and its validators, the checkout state machine
//! and the coordinator that drives it from user intents.

mod coordinator;
mod draft;
mod flow;
mod order;
pub mod validation;

pub use coordinator::{CheckoutCoordinator, INTENT_KINDS};
pub use draft::{DraftFields, OrderDraft};
pub use flow::{CheckoutState, Trigger};
pub use order::{OrderConfirmation, OrderRecord, PaymentMethod};
pub use validation::{Field, FieldUpdate, FormValidation, ValidationErrors};
