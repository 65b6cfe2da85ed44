//! Qualpay payment gateway implementation

use crate::{
    config::QualpayConfig,
    error::{PaymentError, PaymentResult},
    provider::PaymentGateway,
    sale::{ProcessorReply, SaleRequest},
    scrub::scrub_transcript,
    types::{CreditCard, PaymentSourceKind, PurchaseOptions, PurchaseOutcome},
};
use async_trait::async_trait;
use qualpay_log::{debug, info, warn};
use reqwest::{Client, header::CONTENT_TYPE};
use std::collections::HashMap;
use url::Url;
use uuid::Uuid;

const LOG_TARGET: &str = "qualpay::gateway";

/// Qualpay gateway
pub struct QualpayGateway {
    config: QualpayConfig,
    client: Client,
}

impl QualpayGateway {
    /// Create a gateway, failing when a credential is missing
    pub fn new(config: QualpayConfig) -> PaymentResult<Self> {
        config.validate()?;

        let base = Url::parse(config.resolved_base_url())?;
        if config.require_tls && base.scheme() != "https" {
            return Err(PaymentError::Config(format!(
                "base URL must use https, got '{}'",
                base.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .https_only(config.require_tls)
            .user_agent(format!("qualpay-gateway/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PaymentError::Config(format!("failed to build HTTP client: {}", e)))?;

        debug!(
            target: LOG_TARGET,
            "Qualpay gateway ready for merchant {} on {:?}", config.merchant_id, config.endpoint
        );

        Ok(Self { config, client })
    }

    /// Create a gateway from a generic option map
    pub fn from_options(options: &HashMap<String, String>) -> PaymentResult<Self> {
        Self::new(QualpayConfig::from_options(options)?)
    }

    /// Create a gateway from `QUALPAY_*` environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(QualpayConfig::from_env()?)
    }

    /// Gateway configuration
    pub fn config(&self) -> &QualpayConfig {
        &self.config
    }

    /// Whether sales run against the sandbox
    pub fn is_test(&self) -> bool {
        self.config.endpoint.is_test()
    }

    fn generate_purchase_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl PaymentGateway for QualpayGateway {
    fn name(&self) -> &'static str {
        "qualpay"
    }

    fn method_type(&self) -> &'static str {
        "qualpay"
    }

    fn payment_source(&self) -> PaymentSourceKind {
        PaymentSourceKind::CreditCard
    }

    async fn purchase(
        &self,
        amount: u64,
        card: &CreditCard,
        options: &PurchaseOptions,
    ) -> PaymentResult<PurchaseOutcome> {
        if amount == 0 {
            return Err(PaymentError::InvalidAmount(
                "amount must be greater than zero".to_string(),
            ));
        }

        let purchase_id = options
            .order_id
            .clone()
            .filter(|id| !id.is_empty())
            .unwrap_or_else(Self::generate_purchase_id);

        let request = SaleRequest::new(&self.config, &purchase_id, amount, card, options);

        // Resolved per call so the endpoint always follows the current config.
        let url = self.config.sale_url();

        debug!(
            target: LOG_TARGET,
            "Submitting sale {} for {} (card ending {}) to {}",
            purchase_id,
            amount,
            card.last4(),
            url
        );

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(
                target: LOG_TARGET,
                "Processor answered sale {} with HTTP {}", purchase_id, status
            );
        }

        let reply = ProcessorReply::parse(&body);
        if !reply.is_well_formed() {
            warn!(
                target: LOG_TARGET,
                "Processor reply for sale {} was not a JSON object", purchase_id
            );
        }

        let outcome = reply.into_outcome(purchase_id, self.is_test());

        info!(
            target: LOG_TARGET,
            "Sale {} {} (rcode {})",
            outcome.purchase_id,
            if outcome.success { "approved" } else { "declined" },
            outcome.result_code().unwrap_or("none")
        );

        Ok(outcome)
    }

    fn supports_scrubbing(&self) -> bool {
        true
    }

    fn scrub(&self, transcript: &str) -> String {
        scrub_transcript(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Endpoint, types::BillingAddress};

    fn config() -> QualpayConfig {
        QualpayConfig::new("212000000001", "sk_test")
    }

    #[test]
    fn test_identity_metadata() {
        let gateway = QualpayGateway::new(config()).unwrap();
        assert_eq!(gateway.name(), "qualpay");
        assert_eq!(gateway.method_type(), "qualpay");
        assert_eq!(gateway.payment_source(), PaymentSourceKind::CreditCard);
        assert!(gateway.supports_scrubbing());
    }

    #[test]
    fn test_new_rejects_missing_credentials() {
        let err = QualpayGateway::new(QualpayConfig::new("", "sk_test")).err().unwrap();
        assert!(matches!(err, PaymentError::Config(_)));

        let err = QualpayGateway::new(QualpayConfig::new("212000000001", "")).err().unwrap();
        assert!(matches!(err, PaymentError::Config(_)));
    }

    #[test]
    fn test_new_rejects_plain_http_when_tls_required() {
        let err = QualpayGateway::new(config().base_url("http://localhost:8080"))
            .err()
            .unwrap();
        assert!(matches!(err, PaymentError::Config(msg) if msg.contains("https")));
    }

    #[test]
    fn test_new_rejects_malformed_base_url() {
        let err = QualpayGateway::new(config().base_url("::not a url::")).err().unwrap();
        assert!(matches!(err, PaymentError::Config(_)));
    }

    #[test]
    fn test_test_flag_follows_endpoint() {
        assert!(QualpayGateway::new(config()).unwrap().is_test());
        assert!(
            !QualpayGateway::new(config().endpoint(Endpoint::Live))
                .unwrap()
                .is_test()
        );
    }

    #[test]
    fn test_generated_purchase_id_shape() {
        let id = QualpayGateway::generate_purchase_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(id, QualpayGateway::generate_purchase_id());
    }

    #[test]
    fn test_zero_amount_rejected_before_network() {
        let gateway = QualpayGateway::new(config()).unwrap();
        let card = CreditCard::new("4111111111111111", 3, 2027, "999");
        let options = PurchaseOptions::new(BillingAddress::new("1 Main St", "94107"));

        let result = tokio_test::block_on(gateway.purchase(0, &card, &options));
        assert!(matches!(result, Err(PaymentError::InvalidAmount(_))));
    }

    #[test]
    fn test_scrub_delegates_to_transcript_scrubber() {
        let gateway = QualpayGateway::new(config()).unwrap();
        assert_eq!(gateway.scrub("card_ccv2=123"), "card_ccv2=[FILTERED]");
    }
}
