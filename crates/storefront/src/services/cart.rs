//! Cart materialization: joining token line items with live catalog data.
//!
//! A cart token only stores product references. Every read resolves those
//! references against the current catalog in one batched query and prices
//! the result; nothing materialized is ever persisted.

use std::collections::HashMap;

use serde::Serialize;

use zed_core::{Price, ProductId, ProductImageId, SizeSelector};

use crate::db::products::{ProductRepository, ProductSummary};
use crate::db::RepositoryError;
use crate::models::cart::CartState;

/// A line item joined with its current product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedCartEntry {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Price,
    pub image_id: Option<ProductImageId>,
    pub size: SizeSelector,
    pub quantity: u32,
    pub line_total: Price,
}

/// The priced, displayable cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub entries: Vec<ResolvedCartEntry>,
    /// Sum of line totals over resolved entries only.
    pub subtotal: Price,
    /// Line items whose product no longer exists in the catalog. They are
    /// excluded from entries and subtotal; the count lets a client tell
    /// the guest their cart changed.
    pub dropped: usize,
}

impl CartView {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
            subtotal: Price::ZERO,
            dropped: 0,
        }
    }
}

/// Join cart line items with fetched product summaries.
///
/// Entries keep the token's insertion order. Items referencing a product
/// absent from `products` are dropped (they can no longer be purchased)
/// and counted, not errored.
#[must_use]
pub fn resolve(cart: &CartState, products: &HashMap<ProductId, ProductSummary>) -> CartView {
    let mut entries = Vec::with_capacity(cart.items().len());
    let mut dropped = 0;

    for item in cart.items() {
        let Some(product) = products.get(&item.product_id) else {
            dropped += 1;
            continue;
        };
        entries.push(ResolvedCartEntry {
            product_id: product.id,
            title: product.title.clone(),
            unit_price: product.price,
            image_id: product.image_id,
            size: item.size.clone(),
            quantity: item.quantity,
            line_total: product.price.times(item.quantity),
        });
    }

    let subtotal = entries.iter().map(|entry| entry.line_total).sum();
    CartView {
        entries,
        subtotal,
        dropped,
    }
}

/// Materialize a cart against the live catalog.
///
/// One batched query resolves every line item; see [`resolve`] for the
/// join semantics.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the catalog query fails.
pub async fn materialize(
    cart: &CartState,
    products: &ProductRepository<'_>,
) -> Result<CartView, RepositoryError> {
    let ids: Vec<ProductId> = cart.items().iter().map(|item| item.product_id).collect();
    let summaries = products.find_summaries(&ids).await?;
    Ok(resolve(cart, &summaries))
}
