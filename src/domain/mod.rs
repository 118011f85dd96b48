// Domain-specific error types
pub mod errors;

// Rolling CRI history records
pub mod history;

// Indicators and price series
pub mod market;

// Port interfaces
pub mod ports;

// Crash Risk Index scoring engine
pub mod scoring;

// Per-ticker technical signals
pub mod signals;
