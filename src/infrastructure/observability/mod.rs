//! Pull-free observability for CrashGuard
//!
//! Metrics are rendered once per run and written out as a Prometheus text
//! file; nothing listens for incoming requests.

pub mod metrics;

pub use metrics::Metrics;
