//! The closed set of storefront events.
//!
//! Notifications flow out of the core to render surfaces; intents flow in
//! from render surfaces. Every event has exactly one payload type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::basket::BasketSnapshot;
use crate::catalog::Product;
use crate::checkout::{CheckoutState, FieldUpdate, FormValidation, OrderConfirmation, PaymentMethod};
use crate::ids::ProductId;

/// A storefront event with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Event {
    // Notifications
    /// The catalog was replaced.
    CatalogLoaded(Vec<Product>),
    /// One catalog entry was replaced.
    ProductUpdated(Product),
    /// A product was picked for the preview modal.
    ProductPreviewOpened(Product),
    /// Basket contents changed (also sent once on restore).
    BasketChanged(BasketSnapshot),
    PaymentUpdated(FieldUpdate),
    AddressUpdated(FieldUpdate),
    EmailUpdated(FieldUpdate),
    PhoneUpdated(FieldUpdate),
    /// Validation result for the fields of one checkout step.
    FormValidated {
        step: CheckoutState,
        validation: FormValidation,
    },
    CheckoutStateChanged {
        from: CheckoutState,
        to: CheckoutState,
    },
    /// The backend accepted the order.
    OrderCreated(OrderConfirmation),
    /// The backend rejected the order or could not be reached.
    SubmissionFailed { message: String },
    /// Something unexpected happened; the session continues.
    ErrorOccurred { message: String },

    // Intents
    ProductSelected(ProductId),
    ProductAdded(ProductId),
    ProductRemoved(ProductId),
    BasketOpened,
    CheckoutStarted,
    PaymentSelected(PaymentMethod),
    AddressChanged(String),
    EmailChanged(String),
    PhoneChanged(String),
    PaymentSubmitted,
    ContactsSubmitted,
    StepBack,
    ModalClosed,
}

/// Payload-free discriminant of [`Event`], used to register handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    CatalogLoaded,
    ProductUpdated,
    ProductPreviewOpened,
    BasketChanged,
    PaymentUpdated,
    AddressUpdated,
    EmailUpdated,
    PhoneUpdated,
    FormValidated,
    CheckoutStateChanged,
    OrderCreated,
    SubmissionFailed,
    ErrorOccurred,
    ProductSelected,
    ProductAdded,
    ProductRemoved,
    BasketOpened,
    CheckoutStarted,
    PaymentSelected,
    AddressChanged,
    EmailChanged,
    PhoneChanged,
    PaymentSubmitted,
    ContactsSubmitted,
    StepBack,
    ModalClosed,
}

impl Event {
    /// The kind handlers are registered under.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::CatalogLoaded(_) => EventKind::CatalogLoaded,
            Event::ProductUpdated(_) => EventKind::ProductUpdated,
            Event::ProductPreviewOpened(_) => EventKind::ProductPreviewOpened,
            Event::BasketChanged(_) => EventKind::BasketChanged,
            Event::PaymentUpdated(_) => EventKind::PaymentUpdated,
            Event::AddressUpdated(_) => EventKind::AddressUpdated,
            Event::EmailUpdated(_) => EventKind::EmailUpdated,
            Event::PhoneUpdated(_) => EventKind::PhoneUpdated,
            Event::FormValidated { .. } => EventKind::FormValidated,
            Event::CheckoutStateChanged { .. } => EventKind::CheckoutStateChanged,
            Event::OrderCreated(_) => EventKind::OrderCreated,
            Event::SubmissionFailed { .. } => EventKind::SubmissionFailed,
            Event::ErrorOccurred { .. } => EventKind::ErrorOccurred,
            Event::ProductSelected(_) => EventKind::ProductSelected,
            Event::ProductAdded(_) => EventKind::ProductAdded,
            Event::ProductRemoved(_) => EventKind::ProductRemoved,
            Event::BasketOpened => EventKind::BasketOpened,
            Event::CheckoutStarted => EventKind::CheckoutStarted,
            Event::PaymentSelected(_) => EventKind::PaymentSelected,
            Event::AddressChanged(_) => EventKind::AddressChanged,
            Event::EmailChanged(_) => EventKind::EmailChanged,
            Event::PhoneChanged(_) => EventKind::PhoneChanged,
            Event::PaymentSubmitted => EventKind::PaymentSubmitted,
            Event::ContactsSubmitted => EventKind::ContactsSubmitted,
            Event::StepBack => EventKind::StepBack,
            Event::ModalClosed => EventKind::ModalClosed,
        }
    }

    /// Shorthand for an [`Event::ErrorOccurred`].
    pub fn error(message: impl Into<String>) -> Self {
        Event::ErrorOccurred {
            message: message.into(),
        }
    }
}

impl EventKind {
    /// Wire name, e.g. `"basket-changed"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::CatalogLoaded => "catalog-loaded",
            EventKind::ProductUpdated => "product-updated",
            EventKind::ProductPreviewOpened => "product-preview-opened",
            EventKind::BasketChanged => "basket-changed",
            EventKind::PaymentUpdated => "payment-updated",
            EventKind::AddressUpdated => "address-updated",
            EventKind::EmailUpdated => "email-updated",
            EventKind::PhoneUpdated => "phone-updated",
            EventKind::FormValidated => "form-validated",
            EventKind::CheckoutStateChanged => "checkout-state-changed",
            EventKind::OrderCreated => "order-created",
            EventKind::SubmissionFailed => "submission-failed",
            EventKind::ErrorOccurred => "error-occurred",
            EventKind::ProductSelected => "product-selected",
            EventKind::ProductAdded => "product-added",
            EventKind::ProductRemoved => "product-removed",
            EventKind::BasketOpened => "basket-opened",
            EventKind::CheckoutStarted => "checkout-started",
            EventKind::PaymentSelected => "payment-selected",
            EventKind::AddressChanged => "address-changed",
            EventKind::EmailChanged => "email-changed",
            EventKind::PhoneChanged => "phone-changed",
            EventKind::PaymentSubmitted => "payment-submitted",
            EventKind::ContactsSubmitted => "contacts-submitted",
            EventKind::StepBack => "step-back",
            EventKind::ModalClosed => "modal-closed",
        }
    }

    /// Check if this kind is a user intent (render → core).
    pub fn is_intent(&self) -> bool {
        matches!(
            self,
            EventKind::ProductSelected
                | EventKind::ProductAdded
                | EventKind::ProductRemoved
                | EventKind::BasketOpened
                | EventKind::CheckoutStarted
                | EventKind::PaymentSelected
                | EventKind::AddressChanged
                | EventKind::EmailChanged
                | EventKind::PhoneChanged
                | EventKind::PaymentSubmitted
                | EventKind::ContactsSubmitted
                | EventKind::StepBack
                | EventKind::ModalClosed
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
