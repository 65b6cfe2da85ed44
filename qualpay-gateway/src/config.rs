//! Gateway configuration.

use crate::error::{PaymentError, PaymentResult};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Live processor host.
pub const LIVE_BASE_URL: &str = "https://api.qualpay.com";

/// Sandbox processor host.
pub const SANDBOX_BASE_URL: &str = "https://api-test.qualpay.com";

/// Path of the sale (authorize + capture) operation.
pub const SALE_PATH: &str = "/pg/sale";

/// Merchant reference label sent with every sale unless overridden.
pub const DEFAULT_MERCHANT_REFERENCE: &str = "C17854 - Road Solutions Inc";

/// Environment variable prefix used by [`QualpayConfig::from_env`].
pub const ENV_PREFIX: &str = "QUALPAY";

/// Processor environment tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Production processing, real money moves
    Live,
    /// Test processing
    #[default]
    Sandbox,
}

impl Endpoint {
    /// Base URL of this tier.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Live => LIVE_BASE_URL,
            Self::Sandbox => SANDBOX_BASE_URL,
        }
    }

    /// Whether transactions on this tier are test transactions.
    pub fn is_test(&self) -> bool {
        matches!(self, Self::Sandbox)
    }

    /// Parse from a configuration value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "live" | "production" | "prod" => Some(Self::Live),
            "sandbox" | "test" => Some(Self::Sandbox),
            _ => None,
        }
    }
}

/// Qualpay gateway configuration.
///
/// Credentials are fixed once a gateway is built from this value.
#[derive(Debug, Clone)]
pub struct QualpayConfig {
    /// Processor merchant identifier.
    pub merchant_id: String,
    /// Processor shared secret.
    pub security_key: SecretString,
    /// Environment tier.
    pub endpoint: Endpoint,
    /// Replaces the tier's host, e.g. for a local mock processor.
    pub base_url: Option<String>,
    /// Whole-request timeout, including reading the reply.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Refuse plain HTTP.
    pub require_tls: bool,
    /// Value of the `merch_ref_num` field.
    pub merchant_reference: String,
}

impl QualpayConfig {
    /// Create a sandbox configuration with the given credentials.
    pub fn new(merchant_id: impl Into<String>, security_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            security_key: SecretString::new(security_key.into().into()),
            endpoint: Endpoint::default(),
            base_url: None,
            timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(10),
            require_tls: true,
            merchant_reference: DEFAULT_MERCHANT_REFERENCE.to_string(),
        }
    }

    /// Select the environment tier.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Shorthand for the live tier.
    pub fn live(self) -> Self {
        self.endpoint(Endpoint::Live)
    }

    /// Override the processor host.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Allow or refuse plain HTTP.
    pub fn require_tls(mut self, require: bool) -> Self {
        self.require_tls = require;
        self
    }

    /// Set the merchant reference label.
    pub fn merchant_reference(mut self, reference: impl Into<String>) -> Self {
        self.merchant_reference = reference.into();
        self
    }

    /// Build from a generic option map.
    ///
    /// Recognized keys: `merchant_id` (or `merchantid`), `security_key`,
    /// `endpoint`, `base_url`, `timeout_secs`, `merchant_reference`.
    pub fn from_options(options: &HashMap<String, String>) -> PaymentResult<Self> {
        let merchant_id = options
            .get("merchant_id")
            .or_else(|| options.get("merchantid"))
            .ok_or_else(|| missing("merchant_id"))?;
        let security_key = options
            .get("security_key")
            .ok_or_else(|| missing("security_key"))?;

        let mut config = Self::new(merchant_id.as_str(), security_key.as_str());

        if let Some(name) = options.get("endpoint") {
            let endpoint = Endpoint::from_name(name).ok_or_else(|| {
                PaymentError::Config(format!("unknown endpoint '{}'", name))
            })?;
            config = config.endpoint(endpoint);
        }

        if let Some(url) = options.get("base_url") {
            config = config.base_url(url.as_str());
        }

        if let Some(secs) = options.get("timeout_secs") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                PaymentError::Config(format!("timeout_secs must be an integer, got '{}'", secs))
            })?;
            config = config.timeout(Duration::from_secs(secs));
        }

        if let Some(reference) = options.get("merchant_reference") {
            config = config.merchant_reference(reference.as_str());
        }

        config.validate()?;
        Ok(config)
    }

    /// Build from `QUALPAY_*` environment variables.
    pub fn from_env() -> PaymentResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Build from `{prefix}_*` environment variables.
    pub fn from_env_with_prefix(prefix: &str) -> PaymentResult<Self> {
        let prefix = format!("{}_", prefix.trim_end_matches('_'));

        let options: HashMap<String, String> = env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(&prefix)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();

        Self::from_options(&options)
    }

    /// Check that both credentials are present.
    pub fn validate(&self) -> PaymentResult<()> {
        if self.merchant_id.trim().is_empty() {
            return Err(missing("merchant_id"));
        }
        if self.security_key.expose_secret().trim().is_empty() {
            return Err(missing("security_key"));
        }
        if self.merchant_reference.is_empty() {
            return Err(PaymentError::Config(
                "merchant_reference must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Host the next request goes to.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.endpoint.base_url())
    }

    /// Full URL of the sale operation.
    pub fn sale_url(&self) -> String {
        format!("{}{}", self.resolved_base_url().trim_end_matches('/'), SALE_PATH)
    }
}

fn missing(option: &str) -> PaymentError {
    PaymentError::Config(format!("missing required option '{}'", option))
}
