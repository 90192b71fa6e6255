//! HTTP middleware components.
//!
//! Middleware wrap every route handler. They:
//! - Tag requests with a correlation id
//! - Turn handler panics into 500 responses

/// Panic-to-response conversion and panic logging
pub mod panic;
/// Correlation id and request span
pub mod request_id;
