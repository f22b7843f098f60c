//! Event-driven storefront core for Larek.
//!
//! This crate holds the client-side orchestration of the storefront:
//!
//! - **Events**: a closed set of typed events and a synchronous, re-entrant bus
//! - **Catalog**: the product list loaded from the backend
//! - **Basket**: the persisted multiset of products to buy
//! - **Checkout**: the order draft, its validators and the checkout state machine
//!
//! Render surfaces subscribe to notifications on the bus and publish user
//! intents back into it. The [`CheckoutCoordinator`](checkout::CheckoutCoordinator)
//! is the only subscriber to intents.
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_commerce::prelude::*;
//!
//! let config = StorefrontConfig::default();
//! let bus = Storefront::event_bus(&config);
//! bus.on(EventKind::BasketChanged, |event| {
//!     if let Event::BasketChanged(snapshot) = event {
//!         println!("{} items, {} total", snapshot.count(), snapshot.total);
//!     }
//! });
//!
//! let storefront = Storefront::start(config, bus, backend, store, spawner)?;
//! storefront.emit(Event::ProductAdded("854cef69".into()))?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod ids;
pub mod price;

pub mod basket;
pub mod catalog;
pub mod checkout;
pub mod storefront;

pub use error::CommerceError;
pub use ids::*;
pub use price::{Price, PRICELESS_LABEL};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::backend::{ApiError, BackendClient};
    pub use crate::config::{ConfigError, StorefrontConfig};
    pub use crate::error::CommerceError;
    pub use crate::events::{BusError, Event, EventBus, EventKind, SubscriptionId};
    pub use crate::ids::*;
    pub use crate::price::Price;
    pub use crate::storefront::Storefront;

    // Catalog
    pub use crate::catalog::{Catalog, Category, Product, ProductList};

    // Basket
    pub use crate::basket::{Basket, BasketSnapshot};

    // Checkout
    pub use crate::checkout::{
        CheckoutCoordinator, CheckoutState, Field, FieldUpdate, FormValidation, OrderConfirmation,
        OrderDraft, OrderRecord, PaymentMethod,
    };
}
