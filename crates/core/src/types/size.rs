//! Garment size selection and catalog size variants.
//!
//! A cart line item carries a [`SizeSelector`]: either the name of a size
//! from the product's size chart ("medium") or explicit chest/length
//! measurements for made-to-measure products. The catalog side is a
//! [`SizeVariant`] row; checkout re-validates every selector against the
//! variants that exist for the product at commit time.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{ProductId, SizeVariantId};

/// Chest and length measurements, in the store's sizing unit (inches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeMeasurements {
    pub chest: i32,
    pub length: i32,
}

impl fmt::Display for SizeMeasurements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\" x {}\"", self.chest, self.length)
    }
}

/// The size a guest picked for a line item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSelector {
    /// A named size from the product's size chart.
    Named(String),
    /// Explicit custom measurements.
    Custom(SizeMeasurements),
}

impl SizeSelector {
    /// Human-readable label ("medium" or `40" x 28"`).
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Named(name) => name.clone(),
            Self::Custom(measurements) => measurements.to_string(),
        }
    }
}

/// An immutable catalog fact: one size offered for a product.
///
/// A `None` name marks a custom-measurement variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    pub id: SizeVariantId,
    pub product_id: ProductId,
    pub name: Option<String>,
    pub measurements: SizeMeasurements,
}

impl SizeVariant {
    /// Whether a submitted selector resolves to this variant.
    ///
    /// Named selectors match by name; custom selectors match by exact
    /// measurements, so edits to a product's size chart invalidate stale
    /// cart selections at checkout.
    #[must_use]
    pub fn matches(&self, selector: &SizeSelector) -> bool {
        match selector {
            SizeSelector::Named(name) => self.name.as_deref() == Some(name.as_str()),
            SizeSelector::Custom(measurements) => self.measurements == *measurements,
        }
    }

    /// The snapshot fields recorded on an order item for this variant.
    #[must_use]
    pub fn snapshot(&self) -> (Option<String>, SizeMeasurements) {
        (self.name.clone(), self.measurements)
    }
}
