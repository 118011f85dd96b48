// Wiring of live adapters into the run service
pub mod bootstrap;

// Run orchestration
pub mod crash_guard;

// Indicator collection
pub mod indicator_snapshot;

// Alert delivery with channel fallback
pub mod notification_service;

// Ticker universe fan-out
pub mod universe_scanner;
