//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::db::StoreError;

/// A validation problem tied to one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_name: String,
    pub error: String,
}

impl FieldError {
    pub fn new(field_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            error: error.into(),
        }
    }
}

/// JSON body of every error response.
///
/// ```json
/// {
///   "error": "Validation errors occurred",
///   "fields": [{ "field_name": "amount", "error": "cannot be blank" }]
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Resource Errors**: Requested account not found
/// - **Business Logic Errors**: Withdrawals that would overdraw an account
/// - **Validation Errors**: Invalid request data, with per-field detail
/// - **Internal Errors**: Store or runtime failures, never shown in detail to clients
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Requested account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Entity not found")]
    AccountNotFound,

    /// One or more request fields failed validation.
    ///
    /// Returns HTTP 400 Bad Request with a `fields` list.
    #[error("Validation errors occurred")]
    Validation(Vec<FieldError>),

    /// Account balance is lower than the requested withdrawal.
    ///
    /// Returns HTTP 402 Payment Required.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// Request body could not be parsed.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Ledger store failure.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// Anything else that went wrong on our side, including caught panics.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid_field(field_name: &str, error: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field_name, error)])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AccountNotFound => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InsufficientFunds => StatusCode::PAYMENT_REQUIRED,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::AccountNotFound,
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Status Code Mapping
///
/// - `AccountNotFound` → 404 Not Found
/// - `Validation` / `InvalidRequest` → 400 Bad Request
/// - `InsufficientFunds` → 402 Payment Required
/// - `Store` / `Internal` → 500 Internal Server Error (hides details from client)
///
/// Internal failures are logged here. The request span opened by the trace
/// layer carries the `request_id`, so the log line and the `x-request-id`
/// response header can be matched up.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::Validation(fields) => ErrorResponse {
                error: "Validation errors occurred".to_string(),
                fields: Some(fields),
            },
            AppError::Store(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                ErrorResponse {
                    error: "An internal error occurred".to_string(),
                    fields: None,
                }
            }
            other => ErrorResponse {
                error: other.to_string(),
                fields: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn body_of(err: AppError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let (status, body) = body_of(AppError::invalid_field("amount", "cannot be blank")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Validation errors occurred");
        assert_eq!(
            body.fields.unwrap(),
            vec![FieldError::new("amount", "cannot be blank")]
        );
    }

    #[tokio::test]
    async fn insufficient_funds_is_payment_required() {
        let (status, body) = body_of(AppError::InsufficientFunds).await;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body.error, "insufficient funds");
        assert!(body.fields.is_none());
    }

    #[tokio::test]
    async fn internal_details_are_hidden() {
        let (status, body) = body_of(AppError::Internal("db on fire".into())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "An internal error occurred");
    }

    #[test]
    fn store_not_found_maps_to_account_not_found() {
        let err: AppError = StoreError::NotFound(Uuid::new_v4()).into();
        assert!(matches!(err, AppError::AccountNotFound));

        let err: AppError = StoreError::ReadOnly.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
