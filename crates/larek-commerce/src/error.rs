//! Commerce error types.

use thiserror::Error;

use crate::backend::ApiError;
use crate::events::BusError;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Product has no price and cannot be bought.
    #[error("Product cannot be purchased: {0}")]
    NotPurchasable(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} on {trigger}")]
    InvalidCheckoutTransition { from: String, trigger: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// Event dispatch was refused.
    #[error(transparent)]
    Dispatch(#[from] BusError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Backend(#[from] ApiError),

    /// Persistence error.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Async task could not be scheduled.
    #[error("Failed to schedule task: {0}")]
    SpawnError(String),
}

impl From<larek_cache::CacheError> for CommerceError {
    fn from(e: larek_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

impl From<futures::task::SpawnError> for CommerceError {
    fn from(e: futures::task::SpawnError) -> Self {
        CommerceError::SpawnError(e.to_string())
    }
}
