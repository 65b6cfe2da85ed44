//! Payment types and data structures

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of payment instrument a gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSourceKind {
    CreditCard,
}

/// Credit card presented for a purchase
///
/// No Luhn or expiry validation happens here; the processor decides.
#[derive(Clone)]
pub struct CreditCard {
    number: SecretString,
    /// Expiry month, 1-12
    pub month: u8,
    /// Four-digit expiry year
    pub year: u16,
    verification_value: SecretString,
}

impl CreditCard {
    /// Create a card
    pub fn new(
        number: impl Into<String>,
        month: u8,
        year: u16,
        verification_value: impl Into<String>,
    ) -> Self {
        Self {
            number: SecretString::new(number.into().into()),
            month,
            year,
            verification_value: SecretString::new(verification_value.into().into()),
        }
    }

    /// Full card number
    pub fn number(&self) -> &str {
        self.number.expose_secret()
    }

    /// Card verification value
    pub fn verification_value(&self) -> &str {
        self.verification_value.expose_secret()
    }

    /// Last four digits, for display
    pub fn last4(&self) -> &str {
        let number = self.number();
        number
            .char_indices()
            .rev()
            .nth(3)
            .map(|(idx, _)| &number[idx..])
            .unwrap_or(number)
    }

    /// Expiry in processor format
    pub fn expiry(&self) -> String {
        format_expiry(self.month, self.year)
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("last4", &self.last4())
            .field("month", &self.month)
            .field("year", &self.year)
            .finish_non_exhaustive()
    }
}

/// Two-digit month followed by the last two digits of the year.
///
/// ```
/// use qualpay_gateway::format_expiry;
///
/// assert_eq!(format_expiry(3, 2027), "0327");
/// ```
pub fn format_expiry(month: u8, year: u16) -> String {
    format!("{:02}{:02}", month, year % 100)
}

/// Billing address used for AVS
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingAddress {
    /// Street line 1
    pub address1: String,
    /// Street line 2
    pub address2: Option<String>,
    /// City
    pub city: Option<String>,
    /// State or region
    pub state: Option<String>,
    /// Postal code
    pub zip: String,
    /// Country
    pub country: Option<String>,
}

impl BillingAddress {
    /// Create with the fields AVS needs
    pub fn new(address1: impl Into<String>, zip: impl Into<String>) -> Self {
        Self {
            address1: address1.into(),
            zip: zip.into(),
            ..Default::default()
        }
    }
}

/// Per-purchase options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOptions {
    /// Caller order id; a random purchase id is generated when absent
    pub order_id: Option<String>,
    /// Tax portion in minor units
    pub tax: Option<u64>,
    /// Billing address
    pub billing_address: BillingAddress,
}

impl PurchaseOptions {
    /// Create with a billing address
    pub fn new(billing_address: BillingAddress) -> Self {
        Self {
            order_id: None,
            tax: None,
            billing_address,
        }
    }

    /// With order id
    pub fn order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    /// With tax amount
    pub fn tax(mut self, tax: u64) -> Self {
        self.tax = Some(tax);
        self
    }
}

/// Normalized result of a purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOutcome {
    /// Whether the processor approved the sale
    pub success: bool,
    /// Processor message, or the diagnostic for unreadable replies
    pub message: String,
    /// Processor reply as received, for diagnostics
    pub params: serde_json::Value,
    /// Processor authorization code
    pub authorization: Option<String>,
    /// Whether the sale ran against the sandbox
    pub test: bool,
    /// Purchase id sent to the processor
    pub purchase_id: String,
}

impl PurchaseOutcome {
    /// Processor result code, if the reply carried one
    pub fn result_code(&self) -> Option<&str> {
        self.params.get("rcode").and_then(serde_json::Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_expiry() {
        assert_eq!(format_expiry(3, 2027), "0327");
        assert_eq!(format_expiry(12, 2099), "1299");
        assert_eq!(format_expiry(1, 2100), "0100");
    }

    #[test]
    fn test_card_accessors() {
        let card = CreditCard::new("4111111111111111", 9, 2030, "123");
        assert_eq!(card.number(), "4111111111111111");
        assert_eq!(card.verification_value(), "123");
        assert_eq!(card.last4(), "1111");
        assert_eq!(card.expiry(), "0930");
    }

    #[test]
    fn test_last4_short_number() {
        let card = CreditCard::new("42", 1, 2030, "1");
        assert_eq!(card.last4(), "42");
    }

    #[test]
    fn test_card_debug_is_redacted() {
        let card = CreditCard::new("4111111111111111", 9, 2030, "987");
        let rendered = format!("{:?}", card);
        assert!(rendered.contains("1111"));
        assert!(!rendered.contains("4111111111111111"));
        assert!(!rendered.contains("987"));
    }

    #[test]
    fn test_purchase_options_builder() {
        let options = PurchaseOptions::new(BillingAddress::new("1 Main St", "94107"))
            .order_id("R100")
            .tax(80);
        assert_eq!(options.order_id.as_deref(), Some("R100"));
        assert_eq!(options.tax, Some(80));
        assert_eq!(options.billing_address.zip, "94107");
    }

    #[test]
    fn test_outcome_result_code() {
        let outcome = PurchaseOutcome {
            success: false,
            message: "Declined".into(),
            params: serde_json::json!({"rcode": "005"}),
            authorization: None,
            test: true,
            purchase_id: "p1".into(),
        };
        assert_eq!(outcome.result_code(), Some("005"));
    }
}
