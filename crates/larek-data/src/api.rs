//! Larek backend API over HTTP.

use async_trait::async_trait;
use larek_commerce::backend::{ApiError, BackendClient};
use larek_commerce::catalog::{Product, ProductList};
use larek_commerce::checkout::{OrderConfirmation, OrderRecord};
use larek_commerce::config::StorefrontConfig;
use larek_commerce::ProductId;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::{FetchClient, Response, Transport};

/// HTTP implementation of the storefront backend.
///
/// Endpoints, relative to the API base:
///
/// | Call | Request |
/// |---|---|
/// | product list | `GET /product` |
/// | one product | `GET /product/{id}` |
/// | create order | `POST /order` |
#[derive(Debug)]
pub struct LarekApi<T: Transport> {
    client: FetchClient<T>,
}

impl<T: Transport> LarekApi<T> {
    pub fn new(client: FetchClient<T>) -> Self {
        Self { client }
    }

    /// Client for `config.api_base_url`.
    pub fn from_config(transport: T, config: &StorefrontConfig) -> Self {
        Self::new(
            FetchClient::new(transport)
                .with_base_url(config.api_base_url.clone())
                .with_default_header("Accept", "application/json"),
        )
    }

    pub fn client(&self) -> &FetchClient<T> {
        &self.client
    }

    /// Fetch a single product.
    pub async fn fetch_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let response = self.client.get(format!("/product/{}", id)).send().await?;
        decode(response)
    }
}

#[async_trait(?Send)]
impl<T: Transport> BackendClient for LarekApi<T> {
    async fn fetch_products(&self) -> Result<ProductList, ApiError> {
        let response = self.client.get("/product").send().await?;
        let list: ProductList = decode(response)?;
        info!(total = list.total, received = list.items.len(), "product list fetched");
        Ok(list)
    }

    async fn submit_order(&self, order: &OrderRecord) -> Result<OrderConfirmation, ApiError> {
        let response = self.client.post("/order").json(order)?.send().await?;
        decode(response)
    }
}

fn decode<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let response = response.error_for_status().map_err(|e| {
        warn!(error = %e, "backend refused request");
        e
    })?;
    Ok(response.json()?)
}
