//! Order route handlers.
//!
//! A guest can only see orders whose ids appear in their signed orders
//! token; there is no other authorization. Lookup by identity is how a
//! guest on a new browser claims their history, and it is the only
//! rate-limited endpoint in the storefront.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use zed_core::OrderId;

use crate::db::orders::{OrderIdentity, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::ClientIp;
use crate::models::order::{GuestOrders, Order};
use crate::state::AppState;
use crate::token::{PROFILE_TTL_SECONDS, cookies};

fn read_orders(state: &AppState, headers: &HeaderMap) -> GuestOrders {
    state
        .tokens()
        .read(headers, cookies::ORDERS)
        .unwrap_or_default()
}

/// List every order the guest's token grants access to, newest first.
#[instrument(skip(state, headers))]
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<Vec<Order>>> {
    let guest_orders = read_orders(&state, &headers);
    let orders = OrderRepository::new(state.pool())
        .find_by_ids(guest_orders.ids())
        .await?;
    Ok(Json(orders))
}

/// Display one order.
///
/// An id outside the guest's token returns the same 404 as a nonexistent
/// one; the response never reveals whether an order exists.
#[instrument(skip(state, headers))]
pub async fn show(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    let guest_orders = read_orders(&state, &headers);
    if !guest_orders.contains(id) {
        return Err(AppError::NotFound("order not found".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;
    Ok(Json(order))
}

/// Order lookup form data. Every field must match the order exactly.
#[derive(Debug, Deserialize)]
pub struct LookupForm {
    pub first_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
}

/// The lookup outcome: how many orders matched, and how many were new to
/// this guest's token.
#[derive(Debug, Serialize)]
pub struct LookupOutcome {
    pub matched: usize,
    pub added: usize,
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| AppError::Validation(format!("missing required field: {name}")))
}

/// Claim past orders by exact identity match.
///
/// Matches are appended to the orders token (deduplicated); re-running the
/// same lookup reports zero added. Zero matches is a 404 and leaves the
/// token untouched. Each attempt spends the caller's hourly per-IP budget
/// whether or not anything matches.
#[instrument(skip(state, headers, form))]
pub async fn lookup(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Form(form): Form<LookupForm>,
) -> Result<impl IntoResponse> {
    state.lookup_limiter().check(ip)?;

    let identity = OrderIdentity {
        first_name: required(form.first_name, "first_name")?,
        phone: required(form.phone, "phone")?,
        email: required(form.email, "email")?,
        country: required(form.country, "country")?,
        province: required(form.province, "province")?,
    };

    let matches = OrderRepository::new(state.pool())
        .find_ids_by_identity(&identity)
        .await?;
    let matched = matches.len();
    if matches.is_empty() {
        return Err(AppError::NotFound(
            "no orders were found with this information".to_string(),
        ));
    }

    let mut guest_orders = read_orders(&state, &headers);
    let added = guest_orders.append(matches);
    let cookie = state
        .tokens()
        .write(cookies::ORDERS, &guest_orders, PROFILE_TTL_SECONDS)?;

    tracing::info!(matched, added, "order lookup");

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LookupOutcome { matched, added }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert!(required(None, "phone").is_err());
        assert!(required(Some("   ".to_owned()), "phone").is_err());
        assert_eq!(
            required(Some(" Ada ".to_owned()), "first_name").ok(),
            Some("Ada".to_owned())
        );
    }
}
