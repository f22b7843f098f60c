//! Order draft: the customer's in-progress checkout input.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::checkout::validation::{
    validate_address, validate_email, validate_payment, validate_phone, Field, FieldUpdate,
    FormValidation, ValidationErrors,
};
use crate::checkout::{OrderRecord, PaymentMethod};
use crate::error::CommerceError;
use crate::events::{Event, EventBus};
use crate::ids::ProductId;

/// Plain snapshot of the draft's fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DraftFields {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

/// The single mutable order draft of a session.
///
/// Each setter stores the raw value, re-runs that field's validator and
/// announces the result with the field's `*Updated` event. The stored error
/// for a field is always the result of its latest check.
#[derive(Debug)]
pub struct OrderDraft {
    bus: Rc<EventBus>,
    payment: Cell<Option<PaymentMethod>>,
    address: RefCell<String>,
    email: RefCell<String>,
    phone: RefCell<String>,
    errors: RefCell<ValidationErrors>,
}

impl OrderDraft {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            payment: Cell::new(None),
            address: RefCell::new(String::new()),
            email: RefCell::new(String::new()),
            phone: RefCell::new(String::new()),
            errors: RefCell::new(ValidationErrors::new()),
        }
    }

    pub fn set_payment(&self, method: PaymentMethod) -> Result<(), CommerceError> {
        self.payment.set(Some(method));
        let update = FieldUpdate::from_check(method.as_str(), self.check(Field::Payment));
        self.bus.emit(Event::PaymentUpdated(update))?;
        Ok(())
    }

    pub fn set_address(&self, address: impl Into<String>) -> Result<(), CommerceError> {
        let address = address.into();
        *self.address.borrow_mut() = address.clone();
        let update = FieldUpdate::from_check(address, self.check(Field::Address));
        self.bus.emit(Event::AddressUpdated(update))?;
        Ok(())
    }

    pub fn set_email(&self, email: impl Into<String>) -> Result<(), CommerceError> {
        let email = email.into();
        *self.email.borrow_mut() = email.clone();
        let update = FieldUpdate::from_check(email, self.check(Field::Email));
        self.bus.emit(Event::EmailUpdated(update))?;
        Ok(())
    }

    pub fn set_phone(&self, phone: impl Into<String>) -> Result<(), CommerceError> {
        let phone = phone.into();
        *self.phone.borrow_mut() = phone.clone();
        let update = FieldUpdate::from_check(phone, self.check(Field::Phone));
        self.bus.emit(Event::PhoneUpdated(update))?;
        Ok(())
    }

    /// Payment step: payment method and address.
    pub fn validate_payment_form(&self) -> FormValidation {
        self.validate(&[Field::Payment, Field::Address])
    }

    /// Contacts step: email and phone.
    pub fn validate_contacts_form(&self) -> FormValidation {
        self.validate(&[Field::Email, Field::Phone])
    }

    /// Contacts step as shown to the user: email and phone, plus any
    /// payment-step field that fails by now.
    ///
    /// Valid iff the whole order is valid.
    pub fn validate_contacts_step(&self) -> FormValidation {
        let mut validation = self.validate_contacts_form();
        let earlier = self.validate_payment_form();
        if !earlier.is_valid {
            validation.is_valid = false;
            validation
                .errors
                .extend(earlier.errors.into_iter().filter(|(_, m)| !m.is_empty()));
        }
        validation
    }

    /// All four fields.
    pub fn validate_order(&self) -> FormValidation {
        self.validate(&[Field::Payment, Field::Address, Field::Email, Field::Phone])
    }

    pub fn is_order_valid(&self) -> bool {
        self.validate_order().is_valid
    }

    /// Errors from the latest check of each field. Fields never checked are
    /// absent.
    pub fn errors(&self) -> ValidationErrors {
        self.errors.borrow().clone()
    }

    pub fn fields(&self) -> DraftFields {
        DraftFields {
            payment: self.payment.get(),
            address: self.address.borrow().clone(),
            email: self.email.borrow().clone(),
            phone: self.phone.borrow().clone(),
        }
    }

    /// Forget all input and errors. Emits nothing.
    pub fn reset(&self) {
        self.payment.set(None);
        self.address.borrow_mut().clear();
        self.email.borrow_mut().clear();
        self.phone.borrow_mut().clear();
        self.errors.borrow_mut().clear();
        debug!("order draft reset");
    }

    /// Assemble the order record for submission.
    ///
    /// Fails with `CheckoutIncomplete` naming the invalid fields unless all
    /// four fields are valid.
    pub fn to_record(&self, total: u64, items: Vec<ProductId>) -> Result<OrderRecord, CommerceError> {
        let validation = self.validate_order();
        let payment = match (validation.is_valid, self.payment.get()) {
            (true, Some(payment)) => payment,
            _ => {
                let missing: Vec<&str> = validation
                    .invalid_fields()
                    .iter()
                    .map(|f| f.as_str())
                    .collect();
                return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
            }
        };
        Ok(OrderRecord {
            payment,
            address: self.address.borrow().clone(),
            email: self.email.borrow().clone(),
            phone: self.phone.borrow().clone(),
            total,
            items,
        })
    }

    fn validate(&self, fields: &[Field]) -> FormValidation {
        FormValidation::from_checks(fields.iter().map(|&field| (field, self.check(field))))
    }

    /// Run one field's validator and overwrite its stored error.
    fn check(&self, field: Field) -> Result<(), &'static str> {
        let result = match field {
            Field::Payment => validate_payment(self.payment.get()),
            Field::Address => validate_address(&self.address.borrow()),
            Field::Email => validate_email(&self.email.borrow()),
            Field::Phone => validate_phone(&self.phone.borrow()),
        };
        let message = result.err().unwrap_or_default().to_string();
        self.errors.borrow_mut().insert(field, message);
        result
    }
}
