//! Order types exchanged with the backend.

use crate::ids::{OrderId, ProductId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment online.
    Online,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The order as submitted to the backend.
///
/// Assembled only from a fully valid draft; `total` and `items` are the
/// basket at the moment of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Basket total at submission.
    pub total: u64,
    /// Basket contents at submission, one id per occurrence.
    pub items: Vec<ProductId>,
}

/// The backend's acceptance of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Backend-assigned order id.
    pub id: OrderId,
    /// Amount charged.
    pub total: u64,
}

impl OrderConfirmation {
    /// Confirmation line, e.g. `"Списано 3250 синапсов"`.
    pub fn summary(&self, currency: &str) -> String {
        format!("Списано {} {}", self.total, currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_wire_shape() {
        let record = OrderRecord {
            payment: PaymentMethod::Online,
            address: "Tverskaya 1".into(),
            email: "a@b.com".into(),
            phone: "+79001234567".into(),
            total: 3250,
            items: vec!["854cef69".into(), "c101ab44".into()],
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["payment"], "online");
        assert_eq!(json["total"], 3250);
        assert_eq!(json["items"][1], "c101ab44");
    }

    #[test]
    fn test_confirmation_from_backend() {
        let conf: OrderConfirmation =
            serde_json::from_str(r#"{"id":"28c57cb4-3002-4445-8aa1-2a06a5055ae5","total":2200}"#)
                .unwrap();
        assert_eq!(conf.total, 2200);
        assert_eq!(conf.summary("синапсов"), "Списано 2200 синапсов");
    }

    #[test]
    fn test_payment_method_wire_name() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
        assert_eq!(PaymentMethod::Online.to_string(), "online");
        assert!(serde_json::from_str::<PaymentMethod>("\"card\"").is_err());
    }
}
