//! Basket state holder.

use std::cell::RefCell;
use std::rc::Rc;

use larek_cache::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Product};
use crate::error::CommerceError;
use crate::events::{Event, EventBus};
use crate::ids::ProductId;
use crate::price::Price;

/// Storage key used when none is configured.
pub const DEFAULT_BASKET_KEY: &str = "basket";

/// Payload of `BasketChanged`: the full item list and its total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BasketSnapshot {
    /// Items in insertion order.
    pub items: Vec<Product>,
    /// Sum of item prices, priceless items counting as zero.
    pub total: u64,
}

impl BasketSnapshot {
    /// Build a snapshot, computing the total from `items`.
    pub fn new(items: Vec<Product>) -> Self {
        let total = Price::total(items.iter().map(|p| &p.price));
        Self { items, total }
    }

    /// Number of items (the header counter).
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Check if checkout may start from this basket.
    pub fn can_checkout(&self) -> bool {
        self.total > 0
    }
}

/// The products the user intends to buy.
///
/// A multiset: the same product may appear more than once and each
/// occurrence is removed independently. Every mutation is announced with
/// `BasketChanged` and persisted under the basket key.
#[derive(Debug)]
pub struct Basket {
    bus: Rc<EventBus>,
    cache: Cache,
    key: String,
    items: RefCell<Vec<Product>>,
}

impl Basket {
    /// Create a basket, restoring any persisted items.
    ///
    /// Restored items are announced with `BasketChanged` so subscribers
    /// registered before construction initialise from it. A persisted value
    /// that cannot be read is discarded.
    pub fn restore(
        bus: Rc<EventBus>,
        cache: Cache,
        key: impl Into<String>,
    ) -> Result<Self, CommerceError> {
        let key = key.into();
        let restored = match cache.get::<Vec<Product>>(&key) {
            Ok(items) => items,
            Err(e) => {
                warn!(key = %key, error = %e, "discarding unreadable persisted basket");
                None
            }
        };

        let basket = Self {
            bus,
            cache,
            key,
            items: RefCell::new(Vec::new()),
        };

        if let Some(items) = restored {
            info!(count = items.len(), "basket restored");
            *basket.items.borrow_mut() = items;
            basket.bus.emit(Event::BasketChanged(basket.snapshot()))?;
        }
        Ok(basket)
    }

    /// Append a product.
    ///
    /// Priceless products are refused with `NotPurchasable`.
    pub fn add_item(&self, product: Product) -> Result<(), CommerceError> {
        if !product.is_purchasable() {
            return Err(CommerceError::NotPurchasable(product.id.to_string()));
        }
        debug!(product_id = %product.id, "basket add");
        self.items.borrow_mut().push(product);
        self.commit()
    }

    /// Remove the first occurrence of `id`.
    ///
    /// Returns `false` without emitting if the product is not in the basket.
    pub fn remove_item(&self, id: &ProductId) -> Result<bool, CommerceError> {
        {
            let mut items = self.items.borrow_mut();
            match items.iter().position(|p| &p.id == id) {
                Some(index) => {
                    items.remove(index);
                }
                None => return Ok(false),
            }
        }
        debug!(product_id = %id, "basket remove");
        self.commit()?;
        Ok(true)
    }

    /// Remove everything.
    pub fn clear(&self) -> Result<(), CommerceError> {
        self.items.borrow_mut().clear();
        debug!("basket cleared");
        self.commit()
    }

    /// Snapshot of the items in insertion order.
    pub fn items(&self) -> Vec<Product> {
        self.items.borrow().clone()
    }

    /// Ids of the items, one per occurrence.
    pub fn item_ids(&self) -> Vec<ProductId> {
        self.items.borrow().iter().map(|p| p.id.clone()).collect()
    }

    /// Items plus total, as carried by `BasketChanged`.
    pub fn snapshot(&self) -> BasketSnapshot {
        BasketSnapshot::new(self.items())
    }

    /// Sum of item prices; recomputed on every call.
    pub fn total_price(&self) -> u64 {
        Price::total(self.items.borrow().iter().map(|p| &p.price))
    }

    /// Check if the basket holds at least one occurrence of `id`.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.borrow().iter().any(|p| &p.id == id)
    }

    /// Number of items, counting duplicates.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Items whose id is not in `catalog`.
    ///
    /// Persisted entries may outlive the catalog they were added from; they
    /// stay in the basket, this only reports them.
    pub fn stale_items(&self, catalog: &Catalog) -> Vec<ProductId> {
        self.items
            .borrow()
            .iter()
            .filter(|p| !catalog.contains(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Announce and persist the current contents.
    fn commit(&self) -> Result<(), CommerceError> {
        let snapshot = self.snapshot();
        let emitted = self.bus.emit(Event::BasketChanged(snapshot.clone()));
        self.cache.set(&self.key, &snapshot.items)?;
        emitted?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::events::EventKind;
    use larek_cache::{KeyValueStore, MemoryStore};

    fn product(id: &str, price: Price) -> Product {
        Product::new(id, format!("Product {}", id), Category::Other, price)
    }

    struct Fixture {
        bus: Rc<EventBus>,
        store: Rc<MemoryStore>,
        changes: Rc<RefCell<Vec<BasketSnapshot>>>,
    }

    impl Fixture {
        fn new(store: MemoryStore) -> Self {
            let bus = Rc::new(EventBus::new());
            let changes = Rc::new(RefCell::new(Vec::new()));
            let sink = Rc::clone(&changes);
            bus.on(EventKind::BasketChanged, move |e| {
                if let Event::BasketChanged(snapshot) = e {
                    sink.borrow_mut().push(snapshot.clone());
                }
            });
            Self {
                bus,
                store: Rc::new(store),
                changes,
            }
        }

        fn basket(&self) -> Basket {
            let store: Rc<dyn KeyValueStore> = self.store.clone();
            Basket::restore(Rc::clone(&self.bus), Cache::new(store), DEFAULT_BASKET_KEY).unwrap()
        }
    }

    #[test]
    fn test_fresh_basket_emits_nothing() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();
        assert!(basket.is_empty());
        assert!(fx.changes.borrow().is_empty());
    }

    #[test]
    fn test_add_emits_and_persists() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();

        basket.add_item(product("a", Price::Amount(750))).unwrap();

        assert_eq!(basket.total_price(), 750);
        let last = fx.changes.borrow().last().cloned().unwrap();
        assert_eq!(last.total, 750);
        assert_eq!(last.count(), 1);

        let persisted: Vec<Product> =
            serde_json::from_str(&fx.store.raw(DEFAULT_BASKET_KEY).unwrap()).unwrap();
        assert_eq!(persisted, basket.items());
    }

    #[test]
    fn test_priceless_refused() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();

        let result = basket.add_item(product("p", Price::Priceless));
        assert!(matches!(result, Err(CommerceError::NotPurchasable(_))));
        assert!(basket.is_empty());
        assert!(fx.changes.borrow().is_empty());
    }

    #[test]
    fn test_duplicates_removed_one_at_a_time() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();
        basket.add_item(product("a", Price::Amount(100))).unwrap();
        basket.add_item(product("b", Price::Amount(10))).unwrap();
        basket.add_item(product("a", Price::Amount(100))).unwrap();
        assert_eq!(basket.total_price(), 210);

        assert!(basket.remove_item(&"a".into()).unwrap());
        assert_eq!(basket.item_ids(), vec![ProductId::new("b"), ProductId::new("a")]);
        assert_eq!(basket.total_price(), 110);
    }

    #[test]
    fn test_remove_absent_is_silent_noop() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();
        basket.add_item(product("a", Price::Amount(100))).unwrap();
        let before = fx.changes.borrow().len();

        assert!(!basket.remove_item(&"zzz".into()).unwrap());
        assert_eq!(fx.changes.borrow().len(), before);
        assert_eq!(basket.len(), 1);
    }

    #[test]
    fn test_clear() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();
        basket.add_item(product("a", Price::Amount(100))).unwrap();
        basket.clear().unwrap();

        assert!(basket.is_empty());
        assert_eq!(basket.total_price(), 0);
        assert_eq!(fx.store.raw(DEFAULT_BASKET_KEY).as_deref(), Some("[]"));
        assert!(!fx.changes.borrow().last().unwrap().can_checkout());
    }

    #[test]
    fn test_restore_announces_persisted_items() {
        let items = vec![product("a", Price::Amount(2500)), product("b", Price::Amount(750))];
        let raw = serde_json::to_string(&items).unwrap();
        let fx = Fixture::new(MemoryStore::with_entry(DEFAULT_BASKET_KEY, raw));

        let basket = fx.basket();

        assert_eq!(basket.items(), items);
        assert_eq!(*fx.changes.borrow(), vec![BasketSnapshot::new(items)]);
        assert_eq!(fx.changes.borrow()[0].total, 3250);
    }

    #[test]
    fn test_restore_discards_corrupt_value() {
        let fx = Fixture::new(MemoryStore::with_entry(DEFAULT_BASKET_KEY, "{oops"));
        let basket = fx.basket();
        assert!(basket.is_empty());
        assert!(fx.changes.borrow().is_empty());
    }

    #[test]
    fn test_stale_items_are_reported_not_removed() {
        let fx = Fixture::new(MemoryStore::new());
        let basket = fx.basket();
        basket.add_item(product("kept", Price::Amount(1))).unwrap();
        basket.add_item(product("gone", Price::Amount(1))).unwrap();

        let catalog = Catalog::new(Rc::clone(&fx.bus));
        catalog
            .set_products(vec![product("kept", Price::Amount(1))])
            .unwrap();

        assert_eq!(basket.stale_items(&catalog), vec![ProductId::new("gone")]);
        assert_eq!(basket.len(), 2);
    }
}
