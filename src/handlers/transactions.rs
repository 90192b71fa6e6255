//! Wallet transaction HTTP handlers.
//!
//! This module implements the balance-changing endpoints:
//! - POST /api/wallet/deposit - Add money to account
//! - POST /api/wallet/withdraw - Remove money from account
//!
//! Both answer with a bare JSON `true` on success.

use crate::{
    app::AppState,
    error::AppError,
    models::{account::parse_account_id, transaction::AmountRequest},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// Deposit into an account.
///
/// # Request Body
///
/// ```json
/// { "id": "550e8400-...", "amount": 10000 }
/// ```
///
/// # Response
///
/// - **Success (200)**: `true`
/// - **Error (400)**: Amount blank or below the minimum
/// - **Error (404)**: Unknown account
pub async fn deposit(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<bool>, AppError> {
    let Json(request) = payload?;
    let id = parse_account_id(&request.id)?;

    state.accounts.deposit(id, request.amount).await?;

    Ok(Json(true))
}

/// Withdraw from an account.
///
/// # Endpoint
///
/// `POST /api/wallet/withdraw`
///
/// # Validation
///
/// - Amount must be present and at least the configured minimum (400)
/// - Account must have sufficient balance (402, balance untouched)
pub async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<bool>, AppError> {
    let Json(request) = payload?;
    let id = parse_account_id(&request.id)?;

    state.accounts.withdraw(id, request.amount).await?;

    Ok(Json(true))
}
