//! Backend collaborator interface.
//!
//! The storefront core only knows this trait; `larek-data` provides the
//! HTTP implementation.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::ProductList;
use crate::checkout::{OrderConfirmation, OrderRecord};

/// Backend call failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend refused the request; carries its message.
    #[error("{0}")]
    Rejected(String),

    /// The backend answered with something that is not the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Remote product and order service.
///
/// Futures are `!Send`; they run on the session's local executor.
#[async_trait(?Send)]
pub trait BackendClient {
    /// Fetch the full product list.
    async fn fetch_products(&self) -> Result<ProductList, ApiError>;

    /// Submit an order for creation.
    async fn submit_order(&self, order: &OrderRecord) -> Result<OrderConfirmation, ApiError>;
}
