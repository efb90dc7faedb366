//! The guest cart as carried in the signed cart token.
//!
//! The cart is client-held state: the server decodes it, transforms it with
//! the pure operations below, and signs the result back into a cookie. One
//! line item exists per product id - re-adding a product replaces its size
//! and quantity rather than accumulating.

use serde::{Deserialize, Serialize};

use zed_core::{ProductId, SizeSelector};

/// One product+size+quantity selection in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub size: SizeSelector,
    pub quantity: u32,
}

/// The full cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<LineItem>,
}

impl CartState {
    /// The line items, oldest first. Replacing an item keeps its position.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Upsert a line item: last write wins per product id.
    ///
    /// An existing entry for the same product is replaced in place
    /// (including its size), never duplicated.
    #[must_use]
    pub fn set(mut self, item: LineItem) -> Self {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self
    }

    /// Remove a product's line item. Removing an absent id is a no-op.
    #[must_use]
    pub fn remove(mut self, product_id: ProductId) -> Self {
        self.items.retain(|item| item.product_id != product_id);
        self
    }

    /// Empty the cart. Used only after a successful checkout.
    #[must_use]
    pub fn clear(self) -> Self {
        Self { items: Vec::new() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use zed_core::SizeMeasurements;

    use super::*;

    fn item(product_id: ProductId, size: &str, quantity: u32) -> LineItem {
        LineItem {
            product_id,
            size: SizeSelector::Named(size.to_owned()),
            quantity,
        }
    }

    #[test]
    fn test_set_inserts_in_order() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        let cart = CartState::default()
            .set(item(a, "small", 1))
            .set(item(b, "medium", 2));

        let ids: Vec<ProductId> = cart.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_set_is_last_write_wins_per_product() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        let cart = CartState::default()
            .set(item(a, "small", 1))
            .set(item(b, "medium", 2))
            // Re-adding product a with a different size replaces, in place.
            .set(LineItem {
                product_id: a,
                size: SizeSelector::Custom(SizeMeasurements {
                    chest: 44,
                    length: 30,
                }),
                quantity: 3,
            });

        assert_eq!(cart.items().len(), 2);
        let first = cart.items().first().unwrap();
        assert_eq!(first.product_id, a);
        assert_eq!(first.quantity, 3);
        assert!(matches!(first.size, SizeSelector::Custom(_)));
    }

    #[test]
    fn test_last_write_wins_is_order_independent_for_distinct_ids() {
        let a = ProductId::generate();
        let b = ProductId::generate();

        let one = CartState::default()
            .set(item(a, "small", 1))
            .set(item(b, "large", 4))
            .set(item(a, "medium", 2));
        let two = CartState::default()
            .set(item(a, "small", 1))
            .set(item(a, "medium", 2))
            .set(item(b, "large", 4));

        // Same final line items regardless of interleaving.
        let find = |cart: &CartState, id: ProductId| {
            cart.items()
                .iter()
                .find(|i| i.product_id == id)
                .cloned()
                .unwrap()
        };
        assert_eq!(find(&one, a), find(&two, a));
        assert_eq!(find(&one, b), find(&two, b));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let a = ProductId::generate();
        let absent = ProductId::generate();
        let cart = CartState::default().set(item(a, "small", 1));

        let once = cart.clone().remove(absent);
        let twice = once.clone().remove(absent);
        assert_eq!(once, twice);
        assert_eq!(once, cart);

        let removed = cart.remove(a);
        assert!(removed.is_empty());
    }

    #[test]
    fn test_clear() {
        let cart = CartState::default()
            .set(item(ProductId::generate(), "small", 1))
            .clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let cart = CartState::default().set(item(ProductId::generate(), "medium", 2));
        let json = serde_json::to_string(&cart).unwrap();
        let back: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(cart, back);
    }
}
