//! Committed orders and the guest's order-id list token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use zed_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, SizeMeasurements};

use super::checkout::CheckoutProfile;

/// One line-item snapshot on a committed order.
///
/// Title, price, and size are copied at commit time; later catalog edits
/// never alter them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    pub size_name: Option<String>,
    pub size: SizeMeasurements,
}

/// A committed order as shown to the guest who placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub status: OrderStatus,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

/// Everything needed to commit a new order in one transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub profile: CheckoutProfile,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
    pub items: Vec<NewOrderItem>,
}

/// A line-item snapshot about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Price,
    pub quantity: u32,
    pub size_name: Option<String>,
    pub size: SizeMeasurements,
}

/// The append-only, deduplicated list of order ids a guest may view,
/// carried in the signed orders token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestOrders(Vec<OrderId>);

impl GuestOrders {
    /// The order ids, oldest first.
    #[must_use]
    pub fn ids(&self) -> &[OrderId] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, id: OrderId) -> bool {
        self.0.contains(&id)
    }

    /// Append ids the guest may now view, skipping any already present.
    ///
    /// Returns how many were actually added, so re-running the same lookup
    /// reports zero new orders.
    pub fn append(&mut self, ids: impl IntoIterator<Item = OrderId>) -> usize {
        let before = self.0.len();
        for id in ids {
            if !self.0.contains(&id) {
                self.0.push(id);
            }
        }
        self.0.len() - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_deduplicates() {
        let a = OrderId::generate();
        let b = OrderId::generate();

        let mut orders = GuestOrders::default();
        assert_eq!(orders.append([a]), 1);
        assert_eq!(orders.append([a, b]), 1);
        assert_eq!(orders.ids(), &[a, b]);
    }

    #[test]
    fn test_append_same_lookup_twice_adds_nothing() {
        let found = [OrderId::generate(), OrderId::generate()];

        let mut orders = GuestOrders::default();
        assert_eq!(orders.append(found), 2);
        assert_eq!(orders.append(found), 0);
        assert_eq!(orders.ids().len(), 2);
    }

    #[test]
    fn test_contains() {
        let a = OrderId::generate();
        let mut orders = GuestOrders::default();
        assert!(!orders.contains(a));
        orders.append([a]);
        assert!(orders.contains(a));
    }
}
