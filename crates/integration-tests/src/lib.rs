//! Integration tests for ZED.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p zed-cli -- migrate
//!
//! # Start the storefront, then run the ignored tests
//! cargo test -p zed-integration-tests -- --ignored
//! ```
//!
//! Tests exercise the HTTP surface end to end through a cookie-holding
//! client; they require a running storefront and a seeded catalog
//! (`TEST_PRODUCT_ID` must name a product with a "medium" size variant).
