//! Product catalog module.
//!
//! Contains product types and the catalog state holder.

mod catalog;
mod product;

pub use catalog::Catalog;
pub use product::{Category, Product, ProductList};
