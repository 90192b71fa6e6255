//! Wallet operation request types.
//!
//! Deposits and withdrawals share one body shape; the route decides which
//! direction the amount moves.

use serde::{Deserialize, Serialize};

/// Request to move money into or out of an account.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "amount": 10000
/// }
/// ```
///
/// # Validation
///
/// - `id` must name an existing account (404 otherwise)
/// - `amount` must be present and at least the configured minimum (400 otherwise)
#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Account identifier as issued by `POST /api/user/create`
    pub id: String,

    /// Amount in the smallest currency unit; missing means zero, which is rejected as blank
    #[serde(default)]
    pub amount: i64,
}
