//! Shipping fee management.
//!
//! The fee is a single key in the `setting` table; every checkout reads it
//! at commit time, so a change applies to the next order placed.

use rust_decimal::Decimal;

use zed_core::Price;
use zed_storefront::db::settings;

use super::CliError;

/// Print the shipping fee currently charged on every order.
#[allow(clippy::print_stdout)]
pub async fn show() -> Result<(), CliError> {
    let pool = super::connect().await?;
    let fee = settings::shipping_fee(&pool).await?;
    println!("{fee}");
    Ok(())
}

/// Set the shipping fee.
#[allow(clippy::print_stdout)]
pub async fn set(amount: Decimal) -> Result<(), CliError> {
    if amount.is_sign_negative() {
        return Err(CliError::InvalidArgument(
            "shipping fee cannot be negative".to_string(),
        ));
    }

    let pool = super::connect().await?;
    let fee = Price::new(amount);
    settings::set_shipping_fee(&pool, fee).await?;
    println!("shipping fee set to {fee}");
    Ok(())
}
