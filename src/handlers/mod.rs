//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls into the account service or notifier
//! 3. Returns HTTP response (JSON, status code) or upgrades to a WebSocket

/// Account creation, balance and listing endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// WebSocket subscription channels
pub mod notifier;
/// Deposit and withdrawal endpoints
pub mod transactions;
