pub mod core;
pub mod market_data;
pub mod mock;
pub mod notifications;
pub mod observability;
pub mod persistence;

pub use persistence::JsonHistoryStore;
