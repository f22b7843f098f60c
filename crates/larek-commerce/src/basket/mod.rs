//! Shopping basket module.

mod basket;

pub use basket::{Basket, BasketSnapshot, DEFAULT_BASKET_KEY};
