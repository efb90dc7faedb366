//! Checkout route handlers.
//!
//! A successful submit rewrites all three guest tokens in one response:
//! the cart is reset to empty, the saved profile is written or cleared
//! according to "remember me", and the new order id is appended to the
//! orders token.

use axum::{
    Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::Serialize;
use tracing::instrument;

use zed_core::{OrderId, Price};

use crate::error::Result;
use crate::models::cart::CartState;
use crate::models::checkout::{CheckoutProfile, CheckoutSubmission, ProfileView};
use crate::models::order::GuestOrders;
use crate::services::cart::CartView;
use crate::services::checkout;
use crate::state::AppState;
use crate::token::{CART_TTL_SECONDS, PROFILE_TTL_SECONDS, cookies};

/// The checkout page payload: the priced cart plus any saved details.
#[derive(Debug, Serialize)]
pub struct CheckoutPage {
    pub cart: CartView,
    /// The fee that will be added at commit, read live from settings.
    pub shipping_fee: Price,
    pub total: Price,
    /// Saved profile with billing address and payment selection withheld.
    pub profile: Option<ProfileView>,
}

/// The success payload for a committed order.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
}

/// Display the checkout summary.
#[instrument(skip(state, headers))]
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<CheckoutPage>> {
    let cart: CartState = state
        .tokens()
        .read(&headers, cookies::CART)
        .unwrap_or_default();
    let profile: Option<CheckoutProfile> =
        state.tokens().read(&headers, cookies::CHECKOUT_PROFILE);

    let products = crate::db::products::ProductRepository::new(state.pool());
    let cart = crate::services::cart::materialize(&cart, &products).await?;
    let shipping_fee = crate::db::settings::shipping_fee(state.pool()).await?;
    let total = cart.subtotal + shipping_fee;

    Ok(Json(CheckoutPage {
        cart,
        shipping_fee,
        total,
        profile: profile.as_ref().map(ProfileView::from),
    }))
}

/// Validate the submitted details against the live catalog and commit the
/// order.
#[instrument(skip(state, headers, submission))]
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(submission): Form<CheckoutSubmission>,
) -> Result<impl IntoResponse> {
    let cart: CartState = state
        .tokens()
        .read(&headers, cookies::CART)
        .unwrap_or_default();
    let saved: Option<CheckoutProfile> =
        state.tokens().read(&headers, cookies::CHECKOUT_PROFILE);

    let completed = checkout::submit(state.pool(), &cart, saved, submission).await?;

    let tokens = state.tokens();
    let cart_cookie = tokens.write(cookies::CART, &CartState::default(), CART_TTL_SECONDS)?;
    let profile_cookie = if completed.remember_me {
        tokens.write(
            cookies::CHECKOUT_PROFILE,
            &completed.profile,
            PROFILE_TTL_SECONDS,
        )?
    } else {
        tokens.clear(cookies::CHECKOUT_PROFILE)
    };

    let mut orders: GuestOrders = tokens.read(&headers, cookies::ORDERS).unwrap_or_default();
    orders.append([completed.order_id]);
    let orders_cookie = tokens.write(cookies::ORDERS, &orders, PROFILE_TTL_SECONDS)?;

    let receipt = CheckoutReceipt {
        order_id: completed.order_id,
        subtotal: completed.subtotal,
        shipping_fee: completed.shipping_fee,
        total: completed.total,
    };
    Ok((
        StatusCode::CREATED,
        AppendHeaders([
            (SET_COOKIE, cart_cookie),
            (SET_COOKIE, profile_cookie),
            (SET_COOKIE, orders_cookie),
        ]),
        Json(receipt),
    ))
}

/// Forget the saved "remember me" profile.
#[instrument(skip(state))]
pub async fn delete_profile(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = state.tokens().clear(cookies::CHECKOUT_PROFILE);
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, cookie)]),
    )
}
