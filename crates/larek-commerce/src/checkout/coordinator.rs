//! Checkout coordinator.
//!
//! The coordinator is the only subscriber to user intents. It forwards field
//! input to the order draft, basket edits to the basket, and drives the
//! checkout state machine, including the asynchronous order submission.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::task::{LocalSpawn, LocalSpawnExt};
use tracing::{debug, error, info, warn};

use crate::backend::{ApiError, BackendClient};
use crate::basket::Basket;
use crate::catalog::Catalog;
use crate::checkout::{CheckoutState, OrderConfirmation, OrderDraft, Trigger};
use crate::error::CommerceError;
use crate::events::{Event, EventBus, EventKind, SubscriptionId};
use crate::ids::ProductId;

/// Every intent kind; each is registered exactly once, by the coordinator.
pub const INTENT_KINDS: [EventKind; 13] = [
    EventKind::ProductSelected,
    EventKind::ProductAdded,
    EventKind::ProductRemoved,
    EventKind::BasketOpened,
    EventKind::CheckoutStarted,
    EventKind::PaymentSelected,
    EventKind::AddressChanged,
    EventKind::EmailChanged,
    EventKind::PhoneChanged,
    EventKind::PaymentSubmitted,
    EventKind::ContactsSubmitted,
    EventKind::StepBack,
    EventKind::ModalClosed,
];

/// Drives the checkout flow from user intents.
///
/// Handlers hold only a weak reference, so dropping the last `Rc` to the
/// coordinator unsubscribes it from the bus.
pub struct CheckoutCoordinator {
    bus: Rc<EventBus>,
    catalog: Rc<Catalog>,
    basket: Rc<Basket>,
    draft: Rc<OrderDraft>,
    backend: Rc<dyn BackendClient>,
    spawner: Rc<dyn LocalSpawn>,
    state: Cell<CheckoutState>,
    subscriptions: RefCell<Vec<SubscriptionId>>,
}

impl CheckoutCoordinator {
    /// Create a coordinator in `Browsing` and subscribe it to all intents.
    pub fn new(
        bus: Rc<EventBus>,
        catalog: Rc<Catalog>,
        basket: Rc<Basket>,
        draft: Rc<OrderDraft>,
        backend: Rc<dyn BackendClient>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Rc<Self> {
        let coordinator = Rc::new(Self {
            bus,
            catalog,
            basket,
            draft,
            backend,
            spawner,
            state: Cell::new(CheckoutState::Browsing),
            subscriptions: RefCell::new(Vec::new()),
        });
        coordinator.subscribe();
        coordinator
    }

    pub fn state(&self) -> CheckoutState {
        self.state.get()
    }

    pub fn catalog(&self) -> &Rc<Catalog> {
        &self.catalog
    }

    pub fn basket(&self) -> &Rc<Basket> {
        &self.basket
    }

    pub fn draft(&self) -> &Rc<OrderDraft> {
        &self.draft
    }

    /// Fetch the product list and replace the catalog with it.
    ///
    /// Failures are also published as `ErrorOccurred`. Returns the number of
    /// products loaded.
    pub async fn load_catalog(&self) -> Result<usize, CommerceError> {
        match self.fetch_catalog().await {
            Ok(count) => Ok(count),
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Schedule [`load_catalog`](Self::load_catalog) on the local spawner.
    pub fn spawn_catalog_load(self: &Rc<Self>) -> Result<(), CommerceError> {
        let coordinator = Rc::clone(self);
        self.spawner.spawn_local(async move {
            // Failures are already published.
            let _ = coordinator.load_catalog().await;
        })?;
        Ok(())
    }

    async fn fetch_catalog(&self) -> Result<usize, CommerceError> {
        let list = self.backend.fetch_products().await?;
        if list.total != list.items.len() {
            debug!(total = list.total, received = list.items.len(), "product list total mismatch");
        }
        let count = list.items.len();
        self.catalog.set_products(list.items)?;
        info!(count, "catalog loaded");

        let stale = self.basket.stale_items(&self.catalog);
        if !stale.is_empty() {
            warn!(count = stale.len(), ids = ?stale, "basket holds products missing from the catalog");
        }
        Ok(count)
    }

    fn subscribe(self: &Rc<Self>) {
        let ids: Vec<SubscriptionId> = INTENT_KINDS
            .iter()
            .map(|&kind| {
                let weak: Weak<Self> = Rc::downgrade(self);
                self.bus.on(kind, move |event| {
                    if let Some(coordinator) = weak.upgrade() {
                        coordinator.dispatch(event);
                    }
                })
            })
            .collect();
        *self.subscriptions.borrow_mut() = ids;
    }

    fn dispatch(self: &Rc<Self>, event: &Event) {
        if let Err(e) = self.handle(event) {
            self.report(&e);
        }
    }

    fn handle(self: &Rc<Self>, event: &Event) -> Result<(), CommerceError> {
        match event {
            Event::ProductSelected(id) => self.preview(id),
            Event::ProductAdded(id) => self.add_to_basket(id),
            Event::ProductRemoved(id) => self.remove_from_basket(id),
            Event::BasketOpened => self.apply(Trigger::OpenBasket).map(|_| ()),
            Event::CheckoutStarted => self.start_checkout(),
            Event::PaymentSelected(method) => {
                self.draft.set_payment(*method)?;
                self.revalidate_step()
            }
            Event::AddressChanged(value) => {
                self.draft.set_address(value.clone())?;
                self.revalidate_step()
            }
            Event::EmailChanged(value) => {
                self.draft.set_email(value.clone())?;
                self.revalidate_step()
            }
            Event::PhoneChanged(value) => {
                self.draft.set_phone(value.clone())?;
                self.revalidate_step()
            }
            Event::PaymentSubmitted => self.submit_payment(),
            Event::ContactsSubmitted => self.submit_contacts(),
            Event::StepBack => self.apply(Trigger::Back).map(|_| ()),
            Event::ModalClosed => self.apply(Trigger::Close).map(|_| ()),
            other => {
                debug!(kind = %other.kind(), "coordinator ignores notification");
                Ok(())
            }
        }
    }

    /// Move the state machine and announce the transition.
    fn apply(&self, trigger: Trigger) -> Result<CheckoutState, CommerceError> {
        let from = self.state.get();
        let to = from.next(trigger)?;
        self.state.set(to);
        info!(%from, %to, %trigger, "checkout transition");
        self.bus.emit(Event::CheckoutStateChanged { from, to })?;
        Ok(to)
    }

    fn preview(&self, id: &ProductId) -> Result<(), CommerceError> {
        if self.state.get() != CheckoutState::Browsing {
            debug!(product_id = %id, state = %self.state.get(), "preview ignored");
            return Ok(());
        }
        let product = self.catalog.require(id)?;
        self.bus.emit(Event::ProductPreviewOpened(product))?;
        Ok(())
    }

    fn add_to_basket(&self, id: &ProductId) -> Result<(), CommerceError> {
        if !self.state.get().allows_basket_edits() {
            warn!(product_id = %id, "basket is locked while an order is submitting");
            return Ok(());
        }
        let product = self.catalog.require(id)?;
        self.basket.add_item(product)
    }

    fn remove_from_basket(&self, id: &ProductId) -> Result<(), CommerceError> {
        if !self.state.get().allows_basket_edits() {
            warn!(product_id = %id, "basket is locked while an order is submitting");
            return Ok(());
        }
        if !self.basket.remove_item(id)? {
            debug!(product_id = %id, "remove ignored: not in basket");
        }
        Ok(())
    }

    fn start_checkout(&self) -> Result<(), CommerceError> {
        self.state.get().next(Trigger::StartCheckout)?;
        if self.basket.total_price() == 0 {
            debug!("checkout refused: basket total is zero");
            return Ok(());
        }
        self.apply(Trigger::StartCheckout)?;
        self.revalidate_step()
    }

    fn submit_payment(&self) -> Result<(), CommerceError> {
        self.state.get().next(Trigger::SubmitPayment)?;
        let validation = self.draft.validate_payment_form();
        if !validation.is_valid {
            debug!(fields = ?validation.invalid_fields(), "payment step refused");
            self.bus.emit(Event::FormValidated {
                step: CheckoutState::PaymentStep,
                validation,
            })?;
            return Ok(());
        }
        self.apply(Trigger::SubmitPayment)?;
        self.revalidate_step()
    }

    fn submit_contacts(self: &Rc<Self>) -> Result<(), CommerceError> {
        self.state.get().next(Trigger::SubmitContacts)?;
        let validation = self.draft.validate_contacts_step();
        if !validation.is_valid {
            debug!(fields = ?validation.invalid_fields(), "contacts step refused");
            self.bus.emit(Event::FormValidated {
                step: CheckoutState::ContactStep,
                validation,
            })?;
            return Ok(());
        }

        let total = self.basket.total_price();
        if total == 0 {
            debug!("submission refused: basket total is zero");
            return Ok(());
        }
        let record = self.draft.to_record(total, self.basket.item_ids())?;

        self.apply(Trigger::SubmitContacts)?;
        info!(total, items = record.items.len(), "submitting order");

        let weak = Rc::downgrade(self);
        let backend = Rc::clone(&self.backend);
        let spawned = self.spawner.spawn_local(async move {
            let outcome = backend.submit_order(&record).await;
            if let Some(coordinator) = weak.upgrade() {
                coordinator.finish_submission(outcome);
            }
        });
        if let Err(e) = spawned {
            error!(error = %e, "could not schedule order submission");
            self.finish_submission(Err(ApiError::Network(e.to_string())));
        }
        Ok(())
    }

    fn finish_submission(&self, outcome: Result<OrderConfirmation, ApiError>) {
        if let Err(e) = self.settle(outcome) {
            self.report(&e);
        }
    }

    fn settle(&self, outcome: Result<OrderConfirmation, ApiError>) -> Result<(), CommerceError> {
        match outcome {
            Ok(confirmation) => {
                info!(order_id = %confirmation.id, total = confirmation.total, "order created");
                let cleared = self.basket.clear();
                self.draft.reset();
                self.apply(Trigger::Succeeded)?;
                self.bus.emit(Event::OrderCreated(confirmation))?;
                cleared
            }
            Err(e) => {
                warn!(error = %e, "order submission failed");
                self.apply(Trigger::Failed)?;
                self.bus.emit(Event::SubmissionFailed {
                    message: e.to_string(),
                })?;
                Ok(())
            }
        }
    }

    /// Announce the current step's validation, if the state is a form step.
    fn revalidate_step(&self) -> Result<(), CommerceError> {
        let step = self.state.get();
        let validation = match step {
            CheckoutState::PaymentStep => self.draft.validate_payment_form(),
            CheckoutState::ContactStep => self.draft.validate_contacts_step(),
            _ => return Ok(()),
        };
        self.bus.emit(Event::FormValidated { step, validation })?;
        Ok(())
    }

    fn report(&self, error: &CommerceError) {
        if let CommerceError::InvalidCheckoutTransition { from, trigger } = error {
            debug!(%from, %trigger, "intent ignored in current state");
            return;
        }
        error!(error = %error, state = %self.state.get(), "storefront operation failed");
        if let Err(e) = self.bus.emit(Event::error(error.to_string())) {
            warn!(error = %e, "could not publish error event");
        }
    }
}

impl Drop for CheckoutCoordinator {
    fn drop(&mut self) {
        for id in self.subscriptions.get_mut().drain(..) {
            self.bus.off(id);
        }
    }
}

impl fmt::Debug for CheckoutCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutCoordinator")
            .field("state", &self.state.get())
            .field("basket_items", &self.basket.len())
            .field("catalog_items", &self.catalog.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Product, ProductList};
    use crate::checkout::OrderRecord;
    use crate::price::Price;
    use async_trait::async_trait;
    use futures::executor::LocalPool;
    use larek_cache::{Cache, KeyValueStore, MemoryStore};
    use std::io;
    use std::sync::{Arc, Mutex};

    struct Unreachable;

    #[async_trait(?Send)]
    impl BackendClient for Unreachable {
        async fn fetch_products(&self) -> Result<ProductList, ApiError> {
            Err(ApiError::Network("connection refused".into()))
        }

        async fn submit_order(&self, _order: &OrderRecord) -> Result<OrderConfirmation, ApiError> {
            Err(ApiError::Network("connection refused".into()))
        }
    }

    struct Stocked;

    #[async_trait(?Send)]
    impl BackendClient for Stocked {
        async fn fetch_products(&self) -> Result<ProductList, ApiError> {
            let items = vec![Product::new("b", "Product b", Category::Button, Price::Amount(50))];
            Ok(ProductList { total: 1, items })
        }

        async fn submit_order(&self, _order: &OrderRecord) -> Result<OrderConfirmation, ApiError> {
            Err(ApiError::Rejected("closed".into()))
        }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn setup(pool: &LocalPool) -> (Rc<EventBus>, Rc<CheckoutCoordinator>) {
        setup_with(pool, Rc::new(Unreachable))
    }

    fn setup_with(
        pool: &LocalPool,
        backend: Rc<dyn BackendClient>,
    ) -> (Rc<EventBus>, Rc<CheckoutCoordinator>) {
        let bus = Rc::new(EventBus::new());
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let catalog = Rc::new(Catalog::new(Rc::clone(&bus)));
        catalog
            .set_products(vec![Product::new(
                "a",
                "Product a",
                Category::Other,
                Price::Amount(100),
            )])
            .unwrap();
        let basket =
            Rc::new(Basket::restore(Rc::clone(&bus), Cache::new(store), "basket").unwrap());
        let draft = Rc::new(OrderDraft::new(Rc::clone(&bus)));
        let coordinator = CheckoutCoordinator::new(
            Rc::clone(&bus),
            catalog,
            basket,
            draft,
            backend,
            Rc::new(pool.spawner()),
        );
        (bus, coordinator)
    }

    #[test]
    fn test_registers_each_intent_once() {
        let pool = LocalPool::new();
        let (bus, _coordinator) = setup(&pool);
        for kind in INTENT_KINDS {
            assert!(kind.is_intent());
            assert_eq!(bus.handler_count(kind), 1, "{kind}");
        }
    }

    #[test]
    fn test_drop_unsubscribes() {
        let pool = LocalPool::new();
        let (bus, coordinator) = setup(&pool);
        drop(coordinator);
        assert_eq!(bus.handler_count(EventKind::BasketOpened), 0);
        bus.emit(Event::BasketOpened).unwrap();
    }

    #[test]
    fn test_illegal_intent_is_ignored_quietly() {
        let pool = LocalPool::new();
        let (bus, coordinator) = setup(&pool);
        let errors = Rc::new(Cell::new(0));
        let seen = Rc::clone(&errors);
        bus.on(EventKind::ErrorOccurred, move |_| seen.set(seen.get() + 1));

        bus.emit(Event::PaymentSubmitted).unwrap();
        bus.emit(Event::ModalClosed).unwrap();

        assert_eq!(coordinator.state(), CheckoutState::Browsing);
        assert_eq!(errors.get(), 0);
    }

    #[test]
    fn test_unknown_product_surfaces_error() {
        let pool = LocalPool::new();
        let (bus, coordinator) = setup(&pool);
        let messages = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&messages);
        bus.on(EventKind::ErrorOccurred, move |e| {
            if let Event::ErrorOccurred { message } = e {
                sink.borrow_mut().push(message.clone());
            }
        });

        bus.emit(Event::ProductAdded("missing".into())).unwrap();

        assert!(coordinator.basket().is_empty());
        assert_eq!(*messages.borrow(), vec!["Product not found: missing".to_string()]);
    }

    #[test]
    fn test_catalog_fetch_failure_is_published() {
        let mut pool = LocalPool::new();
        let (bus, coordinator) = setup(&pool);
        let errors = Rc::new(Cell::new(0));
        let seen = Rc::clone(&errors);
        bus.on(EventKind::ErrorOccurred, move |_| seen.set(seen.get() + 1));

        let result = pool.run_until(coordinator.load_catalog());

        assert!(matches!(result, Err(CommerceError::Backend(ApiError::Network(_)))));
        assert_eq!(errors.get(), 1);
        assert_eq!(coordinator.catalog().len(), 1);
    }

    #[test]
    fn test_catalog_load_logs_once() {
        let mut pool = LocalPool::new();
        let (_bus, coordinator) = setup_with(&pool, Rc::new(Stocked));
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .finish();

        let loaded = tracing::subscriber::with_default(subscriber, || {
            pool.run_until(coordinator.load_catalog())
        });

        assert_eq!(loaded.unwrap(), 1);
        assert!(coordinator.catalog().contains(&"b".into()));
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("catalog loaded").count(), 1, "{output}");
    }
}
