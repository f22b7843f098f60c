//! Checkout flow state machine.

use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the session is in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckoutState {
    /// No modal open, or only the product preview.
    #[default]
    Browsing,
    /// Basket modal open.
    BasketOpen,
    /// Payment method and address form.
    PaymentStep,
    /// Email and phone form.
    ContactStep,
    /// Order handed to the backend, awaiting the outcome.
    Submitting,
    /// Order accepted.
    Confirmed,
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Browsing => "browsing",
            CheckoutState::BasketOpen => "basket-open",
            CheckoutState::PaymentStep => "payment-step",
            CheckoutState::ContactStep => "contact-step",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Confirmed => "confirmed",
        }
    }

    /// Check if the basket may be edited in this state.
    pub fn allows_basket_edits(&self) -> bool {
        !matches!(self, CheckoutState::Submitting)
    }

    /// Apply a trigger to this state.
    ///
    /// The table is unconditional; guards (basket total, form validity) are
    /// checked by the caller before the trigger is applied.
    pub fn next(self, trigger: Trigger) -> Result<CheckoutState, CommerceError> {
        use CheckoutState::*;
        let next = match (self, trigger) {
            (Browsing, Trigger::OpenBasket) => BasketOpen,
            (BasketOpen, Trigger::StartCheckout) => PaymentStep,
            (PaymentStep, Trigger::SubmitPayment) => ContactStep,
            (ContactStep, Trigger::SubmitContacts) => Submitting,
            (Submitting, Trigger::Succeeded) => Confirmed,
            (Submitting, Trigger::Failed) => ContactStep,
            (PaymentStep, Trigger::Back) => BasketOpen,
            (ContactStep, Trigger::Back) => PaymentStep,
            (BasketOpen | PaymentStep | ContactStep | Confirmed, Trigger::Close) => Browsing,
            (from, trigger) => {
                return Err(CommerceError::InvalidCheckoutTransition {
                    from: from.as_str().to_string(),
                    trigger: trigger.as_str().to_string(),
                })
            }
        };
        Ok(next)
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    OpenBasket,
    StartCheckout,
    SubmitPayment,
    SubmitContacts,
    /// Backend accepted the order.
    Succeeded,
    /// Backend rejected the order or was unreachable.
    Failed,
    Back,
    Close,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::OpenBasket => "open-basket",
            Trigger::StartCheckout => "start-checkout",
            Trigger::SubmitPayment => "submit-payment",
            Trigger::SubmitContacts => "submit-contacts",
            Trigger::Succeeded => "succeeded",
            Trigger::Failed => "failed",
            Trigger::Back => "back",
            Trigger::Close => "close",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
