//! Store-wide settings.
//!
//! Currently a single setting exists: the shipping fee. It is mutable at
//! runtime (via the CLI) and is read fresh on every checkout - never cached
//! at display time - so a fee change between page load and submission is
//! always charged at the new value.

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use zed_core::Price;

use super::RepositoryError;

/// Setting key for the shipping fee.
pub const SHIPPING_FEE_KEY: &str = "shipping_fee";

/// Shipping fee applied when none has been configured.
pub const DEFAULT_SHIPPING_FEE_UNITS: i64 = 150;

/// Get the current shipping fee, falling back to the default if unset.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails, or
/// `RepositoryError::DataCorruption` if the stored value is not a price.
pub async fn shipping_fee(pool: &PgPool) -> Result<Price, RepositoryError> {
    let value: Option<JsonValue> =
        sqlx::query_scalar(r"SELECT value FROM setting WHERE key = $1")
            .bind(SHIPPING_FEE_KEY)
            .fetch_optional(pool)
            .await?;

    match value {
        Some(value) => {
            let amount: Decimal = serde_json::from_value(value).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid shipping fee in database: {e}"))
            })?;
            Ok(Price::new(amount))
        }
        None => Ok(Price::from_units(DEFAULT_SHIPPING_FEE_UNITS)),
    }
}

/// Set the shipping fee.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the upsert fails.
pub async fn set_shipping_fee(pool: &PgPool, fee: Price) -> Result<(), RepositoryError> {
    let value = serde_json::to_value(fee.amount()).map_err(|e| {
        RepositoryError::DataCorruption(format!("unserializable shipping fee: {e}"))
    })?;

    sqlx::query(
        r"
        INSERT INTO setting (key, value)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = NOW()
        ",
    )
    .bind(SHIPPING_FEE_KEY)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
