//! Session wiring.
//!
//! Builds the components of one storefront session from explicit
//! collaborators and connects them through a shared bus.

use std::rc::Rc;

use futures::task::LocalSpawn;
use larek_cache::{Cache, KeyValueStore};
use tracing::info;

use crate::backend::BackendClient;
use crate::basket::Basket;
use crate::catalog::{Catalog, Product};
use crate::checkout::{CheckoutCoordinator, CheckoutState, OrderDraft};
use crate::config::StorefrontConfig;
use crate::error::CommerceError;
use crate::events::{Event, EventBus};

/// One running storefront session.
///
/// # Example
///
/// ```rust,ignore
/// let config = StorefrontConfig::load("storefront.toml")?;
/// let bus = Storefront::event_bus(&config);
/// header.subscribe(&bus);
/// let storefront = Storefront::start(config, bus, backend, store, spawner)?;
/// storefront.emit(Event::BasketOpened)?;
/// ```
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    bus: Rc<EventBus>,
    coordinator: Rc<CheckoutCoordinator>,
}

impl Storefront {
    /// Create the bus for a session.
    ///
    /// Render surfaces subscribe to it before [`start`](Self::start) so
    /// they receive the restored basket.
    pub fn event_bus(config: &StorefrontConfig) -> Rc<EventBus> {
        Rc::new(EventBus::with_max_depth(config.max_dispatch_depth))
    }

    /// Construct every component, restore the basket and schedule the
    /// catalog fetch on `spawner`.
    pub fn start(
        config: StorefrontConfig,
        bus: Rc<EventBus>,
        backend: Rc<dyn BackendClient>,
        store: Rc<dyn KeyValueStore>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Result<Self, CommerceError> {
        let catalog = Rc::new(Catalog::new(Rc::clone(&bus)));
        let basket = Rc::new(Basket::restore(
            Rc::clone(&bus),
            Cache::new(store),
            config.basket_key.clone(),
        )?);
        let draft = Rc::new(OrderDraft::new(Rc::clone(&bus)));
        let coordinator =
            CheckoutCoordinator::new(Rc::clone(&bus), catalog, basket, draft, backend, spawner);
        coordinator.spawn_catalog_load()?;
        info!(api = %config.api_base_url, basket_key = %config.basket_key, "storefront started");

        Ok(Self {
            config,
            bus,
            coordinator,
        })
    }

    /// Publish an intent (or any event) on the session bus.
    pub fn emit(&self, event: Event) -> Result<(), CommerceError> {
        self.bus.emit(event)?;
        Ok(())
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn coordinator(&self) -> &Rc<CheckoutCoordinator> {
        &self.coordinator
    }

    pub fn catalog(&self) -> &Rc<Catalog> {
        self.coordinator.catalog()
    }

    pub fn basket(&self) -> &Rc<Basket> {
        self.coordinator.basket()
    }

    pub fn draft(&self) -> &Rc<OrderDraft> {
        self.coordinator.draft()
    }

    pub fn state(&self) -> CheckoutState {
        self.coordinator.state()
    }

    /// Price as shown on cards, e.g. `"750 синапсов"` or `"Бесценно"`.
    pub fn price_label(&self, product: &Product) -> String {
        product.price.label(&self.config.currency_label)
    }

    /// Absolute image URL on the configured CDN.
    pub fn image_url(&self, product: &Product) -> String {
        product.image_url(&self.config.cdn_base_url)
    }
}
