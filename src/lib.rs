// Qualpay - credit card gateway adapter
//
// Re-exports the gateway adapter and its logging crate behind one name.

// Re-export gateway functionality
pub use qualpay_gateway::*;

// Re-export logging
pub use qualpay_log as log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BillingAddress,
        CreditCard,
        Endpoint,
        PaymentError,
        PaymentGateway,
        PaymentProcessor,
        PaymentResult,
        ProcessorConfig,
        PurchaseOptions,
        PurchaseOutcome,
        QualpayConfig,
        QualpayGateway,
    };
}
