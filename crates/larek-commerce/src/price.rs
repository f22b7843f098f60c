//! Product prices.
//!
//! Prices are whole units of the store currency. A product may also be
//! "priceless": shown in the catalog but never purchasable. On the wire a
//! priceless product has `"price": null`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown instead of an amount for priceless products.
pub const PRICELESS_LABEL: &str = "Бесценно";

/// Price of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Price {
    /// A purchasable price in whole currency units.
    Amount(u64),
    /// No price; the product cannot be bought.
    #[default]
    Priceless,
}

impl Price {
    /// Amount contributed to a basket total. Priceless counts as zero.
    pub fn amount_or_zero(&self) -> u64 {
        match self {
            Price::Amount(amount) => *amount,
            Price::Priceless => 0,
        }
    }

    /// The amount, if any.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Price::Amount(amount) => Some(*amount),
            Price::Priceless => None,
        }
    }

    /// Check if a product with this price can be added to the basket.
    pub fn is_purchasable(&self) -> bool {
        matches!(self, Price::Amount(_))
    }

    /// Format for display, e.g. `"750 синапсов"` or `"Бесценно"`.
    pub fn label(&self, currency: &str) -> String {
        match self {
            Price::Amount(amount) => format!("{} {}", amount, currency),
            Price::Priceless => PRICELESS_LABEL.to_string(),
        }
    }

    /// Sum a sequence of prices, priceless entries counting as zero.
    ///
    /// Saturates instead of overflowing.
    pub fn total<'a>(prices: impl IntoIterator<Item = &'a Price>) -> u64 {
        prices
            .into_iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.amount_or_zero()))
    }
}

impl From<Option<u64>> for Price {
    fn from(value: Option<u64>) -> Self {
        match value {
            Some(amount) => Price::Amount(amount),
            None => Price::Priceless,
        }
    }
}

impl From<Price> for Option<u64> {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "{}", amount),
            Price::Priceless => f.write_str(PRICELESS_LABEL),
        }
    }
}
