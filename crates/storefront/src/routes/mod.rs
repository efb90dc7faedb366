//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Cart (guest token in `zed_cart`)
//! GET  /cart                   - Materialized cart with live prices
//! POST /cart/add               - Upsert a line item (replaces per product)
//! POST /cart/remove            - Remove a product's line item
//!
//! # Checkout
//! GET  /checkout               - Cart summary plus any saved profile
//! POST /checkout               - Validate, price, and commit an order
//! POST /checkout/profile/delete - Forget the saved "remember me" profile
//!
//! # Orders (guest token in `zed_orders`)
//! GET  /orders                 - Orders this guest may view
//! GET  /orders/{id}            - One order, if present in the guest's token
//! POST /orders/lookup          - Claim past orders by identity (rate limited)
//! ```

pub mod cart;
pub mod checkout;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/profile/delete", post(checkout::delete_profile))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/lookup", post(orders::lookup))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
}
