//! Domain models for the storefront.
//!
//! These types are either carried in signed guest tokens ([`cart`],
//! [`checkout`], [`order::GuestOrders`]) or persisted through the
//! repositories in [`crate::db`].

pub mod cart;
pub mod checkout;
pub mod order;
