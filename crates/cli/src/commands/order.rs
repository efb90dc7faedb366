//! Order management.

use zed_core::{OrderId, OrderStatus};
use zed_storefront::db::OrderRepository;

use super::CliError;

/// Move an order to `status`, enforcing the forward-only transition rules.
#[allow(clippy::print_stdout)]
pub async fn set_status(id: OrderId, status: OrderStatus) -> Result<(), CliError> {
    let pool = super::connect().await?;
    let updated = OrderRepository::new(&pool).update_status(id, status).await?;
    println!("order {id} is now {updated}");
    Ok(())
}
