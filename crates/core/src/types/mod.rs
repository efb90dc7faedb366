//! Core types for the ZED store.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod size;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use size::{SizeMeasurements, SizeSelector, SizeVariant};
pub use status::{OrderStatus, PaymentMethod};
