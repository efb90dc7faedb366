//! Checkout form data and the saved "remember me" profile.

use serde::{Deserialize, Serialize};

use zed_core::{Email, PaymentMethod};

/// Raw checkout form fields as submitted by the client.
///
/// Everything is optional at this stage: saved profile fields fill the gaps
/// during the load step, and the merged result is validated as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutSubmission {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub payment_method: Option<String>,
    pub billing_address: Option<String>,
    pub remember_me: Option<String>,
}

impl CheckoutSubmission {
    /// Whether the guest asked for their details to be remembered.
    ///
    /// HTML checkboxes submit "on"; fetch-based clients tend to send "true".
    #[must_use]
    pub fn wants_remember_me(&self) -> bool {
        self.remember_me
            .as_deref()
            .is_some_and(|v| matches!(v, "on" | "true" | "1"))
    }
}

/// A complete, validated set of checkout details.
///
/// Doubles as the saved profile carried in the checkout token when the
/// guest opts in to "remember me".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutProfile {
    pub email: Email,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub country: String,
    pub province: String,
    pub payment_method: PaymentMethod,
    pub billing_address: Option<String>,
}

impl CheckoutProfile {
    /// The single-line shipping address recorded on the order.
    #[must_use]
    pub fn full_address(&self) -> String {
        match &self.address_line_2 {
            Some(line_2) if !line_2.is_empty() => {
                format!("{} | {line_2}", self.address_line_1)
            }
            _ => self.address_line_1.clone(),
        }
    }
}

/// The subset of a saved profile that is shown back to the guest.
///
/// The billing address freeform text and the payment selection are withheld
/// to limit what a shared browser exposes.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub email: Email,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub address_line_1: String,
    pub address_line_2: Option<String>,
    pub city: String,
    pub country: String,
    pub province: String,
}

impl From<&CheckoutProfile> for ProfileView {
    fn from(profile: &CheckoutProfile) -> Self {
        Self {
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            address_line_1: profile.address_line_1.clone(),
            address_line_2: profile.address_line_2.clone(),
            city: profile.city.clone(),
            country: profile.country.clone(),
            province: profile.province.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> CheckoutProfile {
        CheckoutProfile {
            email: Email::parse("guest@example.com").unwrap(),
            phone: "03001234567".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Khan".to_owned(),
            address_line_1: "12 Canal Road".to_owned(),
            address_line_2: Some("Apartment 4".to_owned()),
            city: "Karachi".to_owned(),
            country: "PK".to_owned(),
            province: "Sindh".to_owned(),
            payment_method: PaymentMethod::CashOnDelivery,
            billing_address: Some("Somewhere else entirely".to_owned()),
        }
    }

    #[test]
    fn test_wants_remember_me() {
        for truthy in ["on", "true", "1"] {
            let submission = CheckoutSubmission {
                remember_me: Some(truthy.to_owned()),
                ..CheckoutSubmission::default()
            };
            assert!(submission.wants_remember_me());
        }
        assert!(!CheckoutSubmission::default().wants_remember_me());
        let submission = CheckoutSubmission {
            remember_me: Some("off".to_owned()),
            ..CheckoutSubmission::default()
        };
        assert!(!submission.wants_remember_me());
    }

    #[test]
    fn test_full_address_joins_lines() {
        assert_eq!(profile().full_address(), "12 Canal Road | Apartment 4");

        let mut single_line = profile();
        single_line.address_line_2 = None;
        assert_eq!(single_line.full_address(), "12 Canal Road");
    }

    #[test]
    fn test_profile_view_withholds_sensitive_fields() {
        let view = ProfileView::from(&profile());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("billing_address").is_none());
        assert!(json.get("payment_method").is_none());
        assert_eq!(json["city"], "Karachi");
    }
}
