//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They own all access to the ledger store's transactions.

pub mod account_service;
pub mod notifier;
