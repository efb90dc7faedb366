//! Checkout validation and order commit.
//!
//! A checkout attempt runs load -> resolve & validate -> price -> commit.
//! The first two steps are pure validation and recoverable; the commit is
//! a single transaction, so a failure there leaves no partial order and
//! the guest's cart token intact for retry.

use std::collections::HashMap;

use sqlx::PgPool;

use zed_core::{Email, OrderId, PaymentMethod, Price, ProductId, SizeVariant};

use crate::db::products::ProductRepository;
use crate::db::{OrderRepository, settings};
use crate::error::AppError;
use crate::models::cart::CartState;
use crate::models::checkout::{CheckoutProfile, CheckoutSubmission};
use crate::models::order::{NewOrder, NewOrderItem};
use crate::services::cart::{self, ResolvedCartEntry};

/// The result of a committed checkout.
#[derive(Debug)]
pub struct CompletedCheckout {
    pub order_id: OrderId,
    /// The validated details, for "remember me" persistence.
    pub profile: CheckoutProfile,
    pub remember_me: bool,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
}

/// Step 1 (load): merge a saved profile with submitted fields and validate.
///
/// Submitted non-empty fields take precedence; the saved profile fills the
/// gaps. Missing required fields after the merge are reported together.
///
/// # Errors
///
/// Returns `AppError::Validation` naming every missing or malformed field.
pub fn merge_and_validate(
    saved: Option<&CheckoutProfile>,
    submission: &CheckoutSubmission,
) -> Result<CheckoutProfile, AppError> {
    let mut missing = Vec::new();

    let pick = |submitted: &Option<String>, saved_value: Option<String>| -> Option<String> {
        submitted
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .or(saved_value)
    };
    let require = |value: Option<String>, name: &'static str, missing: &mut Vec<&'static str>| {
        value.unwrap_or_else(|| {
            missing.push(name);
            String::new()
        })
    };

    let email_raw = pick(
        &submission.email,
        saved.map(|p| p.email.as_str().to_owned()),
    );
    let phone = require(
        pick(&submission.phone, saved.map(|p| p.phone.clone())),
        "phone",
        &mut missing,
    );
    let first_name = require(
        pick(&submission.first_name, saved.map(|p| p.first_name.clone())),
        "first_name",
        &mut missing,
    );
    let last_name = require(
        pick(&submission.last_name, saved.map(|p| p.last_name.clone())),
        "last_name",
        &mut missing,
    );
    let address_line_1 = require(
        pick(
            &submission.address_line_1,
            saved.map(|p| p.address_line_1.clone()),
        ),
        "address_line_1",
        &mut missing,
    );
    let address_line_2 = pick(
        &submission.address_line_2,
        saved.and_then(|p| p.address_line_2.clone()),
    );
    let city = require(
        pick(&submission.city, saved.map(|p| p.city.clone())),
        "city",
        &mut missing,
    );
    let country = require(
        pick(&submission.country, saved.map(|p| p.country.clone())),
        "country",
        &mut missing,
    );
    let province = require(
        pick(&submission.province, saved.map(|p| p.province.clone())),
        "province",
        &mut missing,
    );
    let payment_raw = pick(
        &submission.payment_method,
        saved.map(|p| p.payment_method.to_string()),
    );
    let billing_address = pick(
        &submission.billing_address,
        saved.and_then(|p| p.billing_address.clone()),
    );

    if email_raw.is_none() {
        missing.push("email");
    }
    if payment_raw.is_none() {
        missing.push("payment_method");
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }

    let email_raw = email_raw.unwrap_or_default();
    let email = Email::parse(&email_raw)
        .map_err(|e| AppError::Validation(format!("invalid email: {e}")))?;

    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "phone must contain digits only".to_string(),
        ));
    }

    let payment_method = payment_raw
        .unwrap_or_default()
        .parse::<PaymentMethod>()
        .map_err(AppError::Validation)?;

    Ok(CheckoutProfile {
        email,
        phone,
        first_name,
        last_name,
        address_line_1,
        address_line_2,
        city,
        country,
        province,
        payment_method,
        billing_address,
    })
}

/// Step 2 (resolve & validate): confirm every entry's size selector still
/// matches a real size variant, and build the line-item snapshot.
///
/// # Errors
///
/// Returns `AppError::InvalidCartState` on the first entry whose selector
/// no longer matches; no snapshot is produced.
pub fn snapshot_line_items(
    entries: &[ResolvedCartEntry],
    variants: &HashMap<ProductId, Vec<SizeVariant>>,
) -> Result<Vec<NewOrderItem>, AppError> {
    entries
        .iter()
        .map(|entry| {
            let variant = variants
                .get(&entry.product_id)
                .and_then(|vs| vs.iter().find(|v| v.matches(&entry.size)))
                .ok_or_else(|| {
                    AppError::InvalidCartState(format!(
                        "size {} is no longer available for {}",
                        entry.size.label(),
                        entry.title
                    ))
                })?;

            let (size_name, size) = variant.snapshot();
            Ok(NewOrderItem {
                product_id: entry.product_id,
                title: entry.title.clone(),
                price: entry.unit_price,
                quantity: entry.quantity,
                size_name,
                size,
            })
        })
        .collect()
}

/// Run a full checkout attempt against the live catalog and commit it.
///
/// Prices and the shipping fee are re-read authoritatively here; nothing
/// the client submitted about money is trusted.
///
/// # Errors
///
/// - `AppError::Validation` for missing/malformed form fields (step 1)
/// - `AppError::InvalidCartState` if the cart is empty, references vanished
///   products, or holds a stale size selector (step 2)
/// - `AppError::Database` if pricing reads or the commit fail (steps 3-4);
///   the cart is left untouched for retry
pub async fn submit(
    pool: &PgPool,
    cart: &CartState,
    saved: Option<CheckoutProfile>,
    submission: CheckoutSubmission,
) -> Result<CompletedCheckout, AppError> {
    // Load
    let remember_me = submission.wants_remember_me();
    let profile = merge_and_validate(saved.as_ref(), &submission)?;

    // Resolve & validate
    let products = ProductRepository::new(pool);
    let view = cart::materialize(cart, &products).await?;
    if view.entries.is_empty() {
        return Err(AppError::InvalidCartState("cart is empty".to_string()));
    }
    if view.dropped > 0 {
        // Display-time materialization drops stale items silently; at
        // checkout a vanished product means the guest is no longer buying
        // what they reviewed, which must fail.
        return Err(AppError::InvalidCartState(
            "some cart items are no longer available".to_string(),
        ));
    }

    let ids: Vec<ProductId> = view.entries.iter().map(|entry| entry.product_id).collect();
    let variants = products.find_size_variants(&ids).await?;
    let items = snapshot_line_items(&view.entries, &variants)?;

    // Price
    let shipping_fee = settings::shipping_fee(pool).await?;
    let subtotal = view.subtotal;
    let total = subtotal + shipping_fee;

    // Commit
    let new_order = NewOrder {
        profile: profile.clone(),
        subtotal,
        shipping_fee,
        total,
        items,
    };
    let order_id = OrderRepository::new(pool).create(&new_order).await?;

    tracing::info!(%order_id, %total, "order committed");

    Ok(CompletedCheckout {
        order_id,
        profile,
        remember_me,
        subtotal,
        shipping_fee,
        total,
    })
}
