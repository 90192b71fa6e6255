//! Wallet Ledger Service
//!
//! A REST and WebSocket API for a minimal wallet ledger: create accounts, deposit and withdraw funds, query balances, and stream live balance updates to subscribers.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server, WebSocket upgrades)
//! - **Storage**: in-memory ledger with snapshot-isolated transactions ([`db`])
//! - **Notifications**: one polling loop per WebSocket subscriber ([`services::notifier`])
//! - **Format**: JSON requests/responses
//!
//! # Components
//!
//! 1. [`db::Ledger`] owns all account state and only exposes it through transactions
//! 2. [`services::account_service::AccountService`] implements the wallet operations on top of it
//! 3. [`services::notifier::Notifier`] snapshots the ledger and pushes changes
//! 4. [`app::router`] wires handlers, middleware and shared state together

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod shutdown;
