//! HTTP backend client for the Larek storefront.
//!
//! Provides a small request/response layer over a pluggable [`Transport`]
//! and [`LarekApi`], the HTTP implementation of the storefront's
//! [`BackendClient`](larek_commerce::backend::BackendClient).
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_data::{FetchClient, LarekApi};
//!
//! let client = FetchClient::new(BrowserFetch).with_base_url(config.api_base_url.clone());
//!
//! // Raw request
//! let list: ProductList = client.get("/product").send().await?.error_for_status()?.json()?;
//!
//! // Storefront backend
//! let api = LarekApi::new(client);
//! let product = api.fetch_product(&"854cef69".into()).await?;
//! ```

mod api;
mod error;
mod request;
mod response;

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

pub use api::LarekApi;
pub use error::FetchError;
pub use request::{Method, RequestBuilder};
pub use response::Response;

/// Sends a built request and returns the raw response.
///
/// Implemented by the embedding application over its HTTP stack. Non-2xx
/// statuses are responses, not errors; only failures to get a response at
/// all are `Err`.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError>;
}

/// HTTP client for making outbound requests.
pub struct FetchClient<T: Transport> {
    transport: T,
    base_url: Option<String>,
    default_headers: HashMap<String, String>,
}

impl<T: Transport> FetchClient<T> {
    /// Create a new HTTP client over `transport`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            default_headers: HashMap::new(),
        }
    }

    /// Create a client with a base URL that will be prepended to all requests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create a GET request.
    pub fn get(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Get, url)
    }

    /// Create a POST request.
    pub fn post(&self, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        self.request(Method::Post, url)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, url: impl Into<String>) -> ClientRequestBuilder<'_, T> {
        let url = url.into();
        let full_url = match &self.base_url {
            Some(base) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                format!("{}{}", base.trim_end_matches('/'), url)
            }
            _ => url,
        };

        let mut builder = RequestBuilder::new(method, full_url);
        for (key, value) in &self.default_headers {
            builder = builder.header(key.clone(), value.clone());
        }

        ClientRequestBuilder {
            client: self,
            builder,
        }
    }
}

impl<T: Transport> std::fmt::Debug for FetchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a, T: Transport> {
    client: &'a FetchClient<T>,
    builder: RequestBuilder,
}

impl<'a, T: Transport> ClientRequestBuilder<'a, T> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(key, value);
        self
    }

    /// Set the request body as JSON.
    pub fn json<B: serde::Serialize + ?Sized>(mut self, value: &B) -> Result<Self, FetchError> {
        self.builder = self.builder.json(value)?;
        Ok(self)
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<Response, FetchError> {
        debug!(method = self.builder.method().as_str(), url = self.builder.url(), "http request");
        let response = self.client.transport.send(self.builder).await?;
        debug!(status = response.status, "http response");
        Ok(response)
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FetchClient, FetchError, LarekApi, Method, Response, Transport};
}
