//! Account data models and API request/response types.
//!
//! This module defines:
//! - `Account`: ledger entry held by the store
//! - `CreateAccountRequest`: Request body for creating accounts
//! - `CreateAccountResponse` and `BalanceResponse`: Response bodies returned to clients

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// A single ledger entry.
///
/// # Balance Storage
///
/// Balances are plain `i64` amounts in the smallest currency unit. The store
/// never lets a withdrawal take a balance below zero.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Alex",
///   "balance": 10000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier, generated at creation
    pub id: Uuid,

    /// Display label, fixed at creation
    pub name: String,

    /// Current balance in the smallest currency unit
    pub balance: i64,
}

impl Account {
    /// New account with a fresh identifier and a zero balance.
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: 0,
        }
    }
}

/// Request body for creating a new account.
///
/// ```json
/// { "name": "Alex" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Display name; a missing name is reported as blank
    #[serde(default)]
    pub name: String,
}

/// Response body for `POST /api/user/create`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountResponse {
    pub id: Uuid,
}

/// Response body for `GET /api/wallet/balance/{id}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

/// Resolve a client-supplied identifier.
///
/// Identifiers are opaque to clients, so anything that is not a UUID simply
/// names an account that does not exist.
pub fn parse_account_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::AccountNotFound)
}
