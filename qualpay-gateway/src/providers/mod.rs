//! Payment gateway implementations

#[cfg(feature = "qualpay")]
pub mod qualpay;

#[cfg(feature = "qualpay")]
pub use qualpay::QualpayGateway;
