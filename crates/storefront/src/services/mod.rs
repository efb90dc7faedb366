//! The cart/checkout pipeline.
//!
//! [`cart`] turns token line items into priced, displayable entries;
//! [`checkout`] re-validates them authoritatively and commits the order.

pub mod cart;
pub mod checkout;
