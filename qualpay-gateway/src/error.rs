//! Error types for the Qualpay gateway

use thiserror::Error;

/// Payment error types
///
/// A declined card is not an error: it comes back as a
/// [`PurchaseOutcome`](crate::PurchaseOutcome) with `success == false`.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Missing credential, malformed endpoint or unusable HTTP client
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Connection, TLS or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The processor did not answer within the configured timeout
    #[error("Request to payment processor timed out")]
    Timeout,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Whether the failure happened on the wire rather than in setup.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PaymentError::Timeout
        } else {
            PaymentError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for PaymentError {
    fn from(err: url::ParseError) -> Self {
        PaymentError::Config(format!("invalid base URL: {}", err))
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_classification() {
        assert!(PaymentError::Timeout.is_transport());
        assert!(PaymentError::Network("refused".into()).is_transport());
        assert!(!PaymentError::Config("merchant_id".into()).is_transport());
        assert!(!PaymentError::InvalidAmount("0".into()).is_transport());
    }

    #[test]
    fn test_url_error_maps_to_config() {
        let err: PaymentError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, PaymentError::Config(msg) if msg.starts_with("invalid base URL")));
    }
}
