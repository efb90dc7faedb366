//! Cart route handlers.
//!
//! The cart lives entirely in the signed `zed_cart` token; every mutation
//! decodes it, applies a pure transform, and sets a renewed cookie. Reads
//! never touch the token, they only materialize it against the catalog.

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::Deserialize;
use tracing::instrument;

use zed_core::{ProductId, SizeMeasurements, SizeSelector};

use crate::error::{AppError, Result};
use crate::models::cart::{CartState, LineItem};
use crate::services::cart::{CartView, materialize};
use crate::state::AppState;
use crate::token::{CART_TTL_SECONDS, cookies};

fn read_cart(state: &AppState, headers: &HeaderMap) -> CartState {
    state
        .tokens()
        .read(headers, cookies::CART)
        .unwrap_or_default()
}

async fn view_of(state: &AppState, cart: &CartState) -> Result<CartView> {
    let products = crate::db::products::ProductRepository::new(state.pool());
    Ok(materialize(cart, &products).await?)
}

/// Add to cart form data. Either a named size or both custom measurements
/// must be supplied.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    pub size: Option<String>,
    pub chest: Option<i32>,
    pub length: Option<i32>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

// The order_item.quantity column is INT4; anything larger belongs to a
// wholesale channel this storefront does not have.
fn validate_quantity(quantity: u32) -> Result<()> {
    if quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_string(),
        ));
    }
    if i32::try_from(quantity).is_err() {
        return Err(AppError::Validation("quantity is too large".to_string()));
    }
    Ok(())
}

fn parse_selector(form: &AddToCartForm) -> Result<SizeSelector> {
    if let Some(name) = form.size.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        return Ok(SizeSelector::Named(name.to_owned()));
    }
    match (form.chest, form.length) {
        (Some(chest), Some(length)) if chest >= 1 && length >= 1 => {
            Ok(SizeSelector::Custom(SizeMeasurements { chest, length }))
        }
        (Some(_), Some(_)) => Err(AppError::Validation(
            "custom measurements must be positive".to_string(),
        )),
        _ => Err(AppError::Validation(
            "a size name or custom chest and length measurements are required".to_string(),
        )),
    }
}

/// Display the materialized cart.
#[instrument(skip(state, headers))]
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<CartView>> {
    let cart = read_cart(&state, &headers);
    Ok(Json(view_of(&state, &cart).await?))
}

/// Upsert a line item and return the re-materialized cart.
///
/// Re-adding a product replaces its size and quantity; quantities never
/// accumulate across requests.
#[instrument(skip(state, headers))]
pub async fn add(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    validate_quantity(form.quantity)?;
    let size = parse_selector(&form)?;

    let cart = read_cart(&state, &headers).set(LineItem {
        product_id: form.product_id,
        size,
        quantity: form.quantity,
    });

    let cookie = state
        .tokens()
        .write(cookies::CART, &cart, CART_TTL_SECONDS)?;
    let view = view_of(&state, &cart).await?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(view)))
}

/// Remove a product's line item. Removing an absent product is a no-op.
#[instrument(skip(state, headers))]
pub async fn remove(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let cart = read_cart(&state, &headers).remove(form.product_id);

    let cookie = state
        .tokens()
        .write(cookies::CART, &cart, CART_TTL_SECONDS)?;
    let view = view_of(&state, &cart).await?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(view)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(size: Option<&str>, chest: Option<i32>, length: Option<i32>) -> AddToCartForm {
        AddToCartForm {
            product_id: ProductId::generate(),
            quantity: 1,
            size: size.map(str::to_owned),
            chest,
            length,
        }
    }

    #[test]
    fn test_named_size_wins_over_measurements() {
        let selector = parse_selector(&form(Some("medium"), Some(40), Some(28)));
        assert_eq!(selector.ok(), Some(SizeSelector::Named("medium".to_owned())));
    }

    #[test]
    fn test_custom_measurements() {
        let selector = parse_selector(&form(None, Some(44), Some(30)));
        assert_eq!(
            selector.ok(),
            Some(SizeSelector::Custom(SizeMeasurements {
                chest: 44,
                length: 30,
            }))
        );
    }

    #[test]
    fn test_blank_size_and_partial_measurements_rejected() {
        assert!(parse_selector(&form(Some("  "), None, None)).is_err());
        assert!(parse_selector(&form(None, Some(44), None)).is_err());
        assert!(parse_selector(&form(None, None, None)).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(1).is_ok());
        let max = u32::try_from(i32::MAX).unwrap();
        assert!(validate_quantity(max).is_ok());
        assert!(validate_quantity(max + 1).is_err());
        assert!(validate_quantity(u32::MAX).is_err());
    }

    #[test]
    fn test_nonpositive_measurements_rejected() {
        assert!(parse_selector(&form(None, Some(0), Some(30))).is_err());
        assert!(parse_selector(&form(None, Some(44), Some(-1))).is_err());
    }
}
