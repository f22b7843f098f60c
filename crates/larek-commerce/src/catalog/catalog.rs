//! The product catalog state holder.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::events::{Event, EventBus};
use crate::ids::ProductId;

/// Products fetched from the backend.
///
/// Empty until [`Catalog::set_products`] is called; `CatalogLoaded` is the
/// only readiness signal.
#[derive(Debug)]
pub struct Catalog {
    bus: Rc<EventBus>,
    products: RefCell<Vec<Product>>,
}

impl Catalog {
    /// Create an empty catalog publishing on `bus`.
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            products: RefCell::new(Vec::new()),
        }
    }

    /// Replace the full product list and announce it.
    pub fn set_products(&self, products: Vec<Product>) -> Result<(), CommerceError> {
        *self.products.borrow_mut() = products;
        let snapshot = self.all();
        self.bus.emit(Event::CatalogLoaded(snapshot))?;
        Ok(())
    }

    /// Snapshot of every product, in backend order.
    pub fn all(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.products.borrow().iter().find(|p| &p.id == id).cloned()
    }

    /// Look up a product, failing with `ProductNotFound`.
    pub fn require(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// Replace one entry in place.
    ///
    /// Returns `false` (and emits nothing) if `id` is not in the catalog.
    pub fn update(&self, id: &ProductId, product: Product) -> Result<bool, CommerceError> {
        {
            let mut products = self.products.borrow_mut();
            match products.iter_mut().find(|p| &p.id == id) {
                Some(slot) => *slot = product.clone(),
                None => {
                    debug!(product_id = %id, "update ignored: not in catalog");
                    return Ok(false);
                }
            }
        }
        self.bus.emit(Event::ProductUpdated(product))?;
        Ok(true)
    }

    /// Check if a product id is in the catalog.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.borrow().iter().any(|p| &p.id == id)
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.borrow().len()
    }

    /// Check if nothing has been loaded.
    pub fn is_empty(&self) -> bool {
        self.products.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::events::EventKind;
    use crate::price::Price;

    fn products() -> Vec<Product> {
        vec![
            Product::new("1", "Фреймворк куки судьбы", Category::SoftSkill, Price::Amount(2500)),
            Product::new("2", "+1 час в сутках", Category::Other, Price::Amount(750)),
        ]
    }

    fn capture(bus: &EventBus, kind: EventKind) -> Rc<RefCell<Vec<Event>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.on(kind, move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    #[test]
    fn test_empty_until_loaded() {
        let catalog = Catalog::new(Rc::new(EventBus::new()));
        assert!(catalog.is_empty());
        assert!(catalog.get(&"1".into()).is_none());
    }

    #[test]
    fn test_set_products_emits_loaded() {
        let bus = Rc::new(EventBus::new());
        let seen = capture(&bus, EventKind::CatalogLoaded);
        let catalog = Catalog::new(Rc::clone(&bus));

        catalog.set_products(products()).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(*seen.borrow(), vec![Event::CatalogLoaded(products())]);
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::new(Rc::new(EventBus::new()));
        catalog.set_products(products()).unwrap();

        assert_eq!(catalog.get(&"2".into()).unwrap().title, "+1 час в сутках");
        assert!(matches!(
            catalog.require(&"9".into()),
            Err(CommerceError::ProductNotFound(id)) if id == "9"
        ));
    }

    #[test]
    fn test_update_present_and_absent() {
        let bus = Rc::new(EventBus::new());
        let seen = capture(&bus, EventKind::ProductUpdated);
        let catalog = Catalog::new(Rc::clone(&bus));
        catalog.set_products(products()).unwrap();

        let renamed = Product::new("2", "+2 часа в сутках", Category::Other, Price::Amount(900));
        assert!(catalog.update(&"2".into(), renamed.clone()).unwrap());
        assert_eq!(catalog.get(&"2".into()), Some(renamed.clone()));

        let ghost = Product::new("9", "ghost", Category::Other, Price::Priceless);
        assert!(!catalog.update(&"9".into(), ghost).unwrap());
        assert_eq!(catalog.len(), 2);
        assert_eq!(*seen.borrow(), vec![Event::ProductUpdated(renamed)]);
    }
}
