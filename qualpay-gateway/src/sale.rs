//! Qualpay sale wire format

use crate::config::QualpayConfig;
use crate::types::{CreditCard, PurchaseOptions, PurchaseOutcome, format_expiry};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{Map, Value};

/// Result code of an approved sale
pub const SUCCESS_CODE: &str = "000";

/// Value of the `response_format` field
pub const RESPONSE_FORMAT: &str = "JSON";

const INVALID_RESPONSE_MESSAGE: &str = "Invalid response received from the Qualpay API.  Please contact Qualpay support if you continue to receive this message.";

/// Body of `POST /pg/sale`
///
/// Borrows the secrets it carries; it only lives until it is encoded.
#[derive(Serialize)]
pub struct SaleRequest<'a> {
    pub response_format: &'static str,
    pub merchant_id: &'a str,
    pub security_key: &'a str,
    pub purchase_id: &'a str,
    pub merch_ref_num: &'a str,
    pub avs_address: &'a str,
    pub avs_zip: &'a str,
    pub card_number: &'a str,
    pub exp_date: String,
    pub cvv2: &'a str,
    pub amt_tran: u64,
    pub amt_tax: Option<u64>,
}

impl<'a> SaleRequest<'a> {
    /// Assemble a sale from the purchase inputs
    pub fn new(
        config: &'a QualpayConfig,
        purchase_id: &'a str,
        amount: u64,
        card: &'a CreditCard,
        options: &'a PurchaseOptions,
    ) -> Self {
        Self {
            response_format: RESPONSE_FORMAT,
            merchant_id: &config.merchant_id,
            security_key: config.security_key.expose_secret(),
            purchase_id,
            merch_ref_num: &config.merchant_reference,
            avs_address: &options.billing_address.address1,
            avs_zip: &options.billing_address.zip,
            card_number: card.number(),
            exp_date: format_expiry(card.month, card.year),
            cvv2: card.verification_value(),
            amt_tran: amount,
            amt_tax: options.tax,
        }
    }
}

/// Parsed processor reply
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorReply {
    fields: Map<String, Value>,
    well_formed: bool,
}

impl ProcessorReply {
    /// Parse a reply body.
    ///
    /// Anything that is not a JSON object becomes a synthetic reply whose
    /// `message` carries a diagnostic and the raw body.
    pub fn parse(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(fields)) => Self {
                fields,
                well_formed: true,
            },
            _ => Self::invalid(body),
        }
    }

    fn invalid(body: &str) -> Self {
        let message = format!(
            "{}  (The raw response returned by the API was {:?})",
            INVALID_RESPONSE_MESSAGE, body
        );
        let mut fields = Map::new();
        fields.insert("message".to_string(), Value::String(message));
        Self {
            fields,
            well_formed: false,
        }
    }

    /// Whether the body was a JSON object
    pub fn is_well_formed(&self) -> bool {
        self.well_formed
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Result code
    pub fn rcode(&self) -> Option<&str> {
        self.text("rcode")
    }

    /// Processor message
    pub fn rmsg(&self) -> Option<&str> {
        self.text("rmsg")
    }

    /// Authorization code
    pub fn auth_code(&self) -> Option<&str> {
        self.text("auth_code")
    }

    /// Diagnostic message of a synthetic reply
    pub fn message(&self) -> Option<&str> {
        self.text("message")
    }

    /// Approved iff the result code is exactly `"000"`
    pub fn is_success(&self) -> bool {
        self.rcode() == Some(SUCCESS_CODE)
    }

    /// Normalize into an outcome
    pub fn into_outcome(self, purchase_id: String, test: bool) -> PurchaseOutcome {
        let success = self.is_success();
        let message = self
            .rmsg()
            .or_else(|| self.message())
            .unwrap_or_default()
            .to_string();
        let authorization = self.auth_code().map(str::to_string);

        PurchaseOutcome {
            success,
            message,
            params: Value::Object(self.fields),
            authorization,
            test,
            purchase_id,
        }
    }
}
