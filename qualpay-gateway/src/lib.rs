//! Qualpay Gateway Adapter
//!
//! Charges credit cards through the Qualpay payment gateway: builds the
//! processor's sale request, posts it over TLS, turns the reply into a
//! normalized [`PurchaseOutcome`] and scrubs transcripts of the exchange
//! before they are logged.
//!
//! ## Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      PaymentProcessor                          │
//! │            purchase() | transcript() | log_transcript()        │
//! └───────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                       QualpayGateway                           │
//! │                                                                │
//! │  SaleRequest ──► POST /pg/sale ──► ProcessorReply ──► Outcome  │
//! │                                                                │
//! │  scrub(): Authorization: Basic | card_num= | card_ccv2=        │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qualpay_gateway::*;
//!
//! let gateway = QualpayGateway::new(
//!     QualpayConfig::new("212000000001", "security-key").live(),
//! )?;
//! let processor = PaymentProcessor::new(gateway);
//!
//! let card = CreditCard::new("4111111111111111", 3, 2027, "999");
//! let options = PurchaseOptions::new(BillingAddress::new("1 Main St", "94107"))
//!     .order_id("R100");
//!
//! let outcome = processor.purchase(1000, &card, &options).await?;
//! if outcome.success {
//!     println!("approved: {:?}", outcome.authorization);
//! } else {
//!     println!("declined: {}", outcome.message);
//! }
//! ```

pub mod config;
pub mod error;
pub mod provider;
pub mod sale;
pub mod scrub;
pub mod types;

pub mod providers;

pub use config::*;
pub use error::*;
pub use provider::*;
pub use sale::{ProcessorReply, SaleRequest, SUCCESS_CODE};
pub use scrub::*;
pub use types::*;

#[cfg(feature = "qualpay")]
pub use providers::QualpayGateway;

use qualpay_log::Level;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LOG_TARGET: &str = "qualpay::processor";

/// Front for a payment gateway
pub struct PaymentProcessor<G: PaymentGateway> {
    gateway: Arc<G>,
    config: ProcessorConfig,
}

impl<G: PaymentGateway> PaymentProcessor<G> {
    /// Create a new payment processor
    pub fn new(gateway: G) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config: ProcessorConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(gateway: G, config: ProcessorConfig) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config,
        }
    }

    /// Get the gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Get the configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Authorize and capture a payment
    pub async fn purchase(
        &self,
        amount: u64,
        card: &CreditCard,
        options: &PurchaseOptions,
    ) -> PaymentResult<PurchaseOutcome> {
        let result = self.gateway.purchase(amount, card, options).await;

        if self.config.log_transactions {
            match &result {
                Ok(outcome) => qualpay_log::info!(
                    target: LOG_TARGET,
                    "{} purchase {}: success={} test={} message={:?}",
                    self.gateway.name(),
                    outcome.purchase_id,
                    outcome.success,
                    outcome.test,
                    outcome.message
                ),
                Err(err) => qualpay_log::error!(
                    target: LOG_TARGET,
                    "{} purchase failed: {}",
                    self.gateway.name(),
                    err
                ),
            }
        }

        result
    }

    /// Scrubbed copy of a transcript
    ///
    /// `None` when the gateway cannot scrub, so nothing unredacted is handed
    /// out.
    pub fn transcript(&self, raw: &str) -> Option<String> {
        self.gateway
            .supports_scrubbing()
            .then(|| self.gateway.scrub(raw))
    }

    /// Log a transcript at debug level after scrubbing it
    ///
    /// Returns whether the transcript was written.
    pub fn log_transcript(&self, raw: &str) -> bool {
        if !self.gateway.supports_scrubbing() {
            qualpay_log::warn!(
                target: LOG_TARGET,
                "{} cannot scrub transcripts; transcript dropped",
                self.gateway.name()
            );
            return false;
        }

        qualpay_log::transcript(Level::Debug, LOG_TARGET, raw, |t| self.gateway.scrub(t));
        true
    }
}

impl<G: PaymentGateway> Clone for PaymentProcessor<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: self.config.clone(),
        }
    }
}

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Log a summary line for every purchase
    pub log_transactions: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            log_transactions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OpaqueGateway;

    #[async_trait]
    impl PaymentGateway for OpaqueGateway {
        fn name(&self) -> &'static str {
            "opaque"
        }

        fn method_type(&self) -> &'static str {
            "opaque"
        }

        fn payment_source(&self) -> PaymentSourceKind {
            PaymentSourceKind::CreditCard
        }

        async fn purchase(
            &self,
            _amount: u64,
            _card: &CreditCard,
            options: &PurchaseOptions,
        ) -> PaymentResult<PurchaseOutcome> {
            Ok(PurchaseOutcome {
                success: false,
                message: "Declined".to_string(),
                params: serde_json::json!({"rcode": "005"}),
                authorization: None,
                test: true,
                purchase_id: options.order_id.clone().unwrap_or_default(),
            })
        }
    }

    #[test]
    fn test_processor_config_default() {
        let config = ProcessorConfig::default();
        assert!(config.log_transactions);
    }

    #[test]
    fn test_default_trait_methods_do_not_scrub() {
        let gateway = OpaqueGateway;
        assert!(!gateway.supports_scrubbing());
        assert_eq!(gateway.scrub("card_num=4111"), "card_num=4111");
    }

    #[test]
    fn test_transcript_withheld_without_scrubbing() {
        let processor = PaymentProcessor::new(OpaqueGateway);
        assert_eq!(processor.transcript("card_num=4111"), None);
        assert!(!processor.log_transcript("card_num=4111"));
    }

    #[cfg(feature = "qualpay")]
    #[test]
    fn test_transcript_scrubbed_by_qualpay() {
        let gateway = QualpayGateway::new(QualpayConfig::new("m", "k")).unwrap();
        let processor = PaymentProcessor::new(gateway);
        assert_eq!(
            processor.transcript("card_num=4111&x=1").as_deref(),
            Some("card_num=[FILTERED]&x=1")
        );
        assert!(processor.log_transcript("Authorization: Basic abc123"));
    }

    #[tokio::test]
    async fn test_processor_delegates_purchase() {
        let processor = PaymentProcessor::with_config(
            OpaqueGateway,
            ProcessorConfig {
                log_transactions: false,
            },
        );
        let card = CreditCard::new("4111111111111111", 3, 2027, "999");
        let options =
            PurchaseOptions::new(BillingAddress::new("1 Main St", "94107")).order_id("R1");

        let outcome = processor.clone().purchase(500, &card, &options).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.purchase_id, "R1");
        assert_eq!(outcome.result_code(), Some("005"));
    }
}
