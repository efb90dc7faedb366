//! ZED CLI - Database migrations and store management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! zed-cli migrate
//!
//! # Show or change the flat shipping fee
//! zed-cli shipping show
//! zed-cli shipping set 150
//!
//! # Progress an order's fulfillment status
//! zed-cli order status 7d7f... shipping
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use zed_core::{OrderId, OrderStatus};

mod commands;

#[derive(Parser)]
#[command(name = "zed-cli")]
#[command(author, version, about = "ZED store management tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the flat shipping fee
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
    /// Manage orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum ShippingAction {
    /// Show the current shipping fee
    Show,
    /// Set the shipping fee charged on every order
    Set {
        /// New fee amount, e.g. 150 or 199.50
        amount: Decimal,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Move an order to the next fulfillment status
    Status {
        /// Order id
        id: OrderId,
        /// Target status: shipping, delivered, or cancelled
        status: OrderStatus,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Shipping { action } => match action {
            ShippingAction::Show => commands::shipping::show().await?,
            ShippingAction::Set { amount } => commands::shipping::set(amount).await?,
        },
        Commands::Order { action } => match action {
            OrderAction::Status { id, status } => commands::order::set_status(id, status).await?,
        },
    }
    Ok(())
}
