//! Payment gateway trait

use crate::{
    error::PaymentResult,
    types::{CreditCard, PaymentSourceKind, PurchaseOptions, PurchaseOutcome},
};
use async_trait::async_trait;

/// Payment gateway trait
///
/// Implement this trait for each card processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Get gateway name
    fn name(&self) -> &'static str;

    /// Stable tag the host system uses to route and display this gateway
    fn method_type(&self) -> &'static str;

    /// Payment instrument accepted
    fn payment_source(&self) -> PaymentSourceKind;

    /// Authorize and capture `amount` minor units in one step
    ///
    /// Declines are `Ok` outcomes with `success == false`; only setup and
    /// transport failures are errors.
    async fn purchase(
        &self,
        amount: u64,
        card: &CreditCard,
        options: &PurchaseOptions,
    ) -> PaymentResult<PurchaseOutcome>;

    /// Whether [`scrub`](Self::scrub) redacts anything
    fn supports_scrubbing(&self) -> bool {
        false
    }

    /// Redact sensitive values from an HTTP transcript
    fn scrub(&self, transcript: &str) -> String {
        transcript.to_string()
    }
}
