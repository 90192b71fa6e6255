//! Data models shared by the store, services and HTTP handlers.

/// Account entity and account endpoint bodies
pub mod account;
/// Deposit and withdrawal request bodies
pub mod transaction;
