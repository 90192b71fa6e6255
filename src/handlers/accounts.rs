//! Account HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - POST /api/user/create - Create new account
//! - GET /api/wallet/balance/{id} - Get account balance
//! - GET /api/wallet/accounts - List all accounts

use crate::{
    app::AppState,
    error::AppError,
    models::account::{
        Account, BalanceResponse, CreateAccountRequest, CreateAccountResponse, parse_account_id,
    },
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

/// Create a new account.
///
/// # Endpoint
///
/// `POST /api/user/create`
///
/// # Request Body
///
/// ```json
/// { "name": "Alex" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "id": "550e8400-e29b-41d4-a716-446655440000" }`
/// - **Error (400)**: Missing or blank name, malformed JSON
///
/// The new account starts with a zero balance.
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<CreateAccountResponse>, AppError> {
    let Json(request) = payload?;

    let id = state.accounts.create(&request.name).await?;

    Ok(Json(CreateAccountResponse { id }))
}

/// Get the balance of one account.
///
/// # Endpoint
///
/// `GET /api/wallet/balance/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: `{ "balance": 5000 }`
/// - **Error (404)**: Unknown account
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let id = parse_account_id(&account_id)?;

    let balance = state.accounts.get_balance(id).await?;

    Ok(Json(BalanceResponse { balance }))
}

/// List all accounts, ordered by ID.
///
/// # Endpoint
///
/// `GET /api/wallet/accounts`
///
/// ```json
/// [
///   { "id": "550e8400-...", "name": "Alex", "balance": 5000 },
///   { "id": "660e8400-...", "name": "Sam", "balance": 0 }
/// ]
/// ```
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, AppError> {
    let accounts = state.accounts.list_all().await?;

    Ok(Json(accounts))
}
