//! Panic handling.
//!
//! A panic inside a handler must not take the process down. The catch-panic
//! layer turns it into a 500 response, and the process panic hook logs it
//! with a backtrace captured at the panic site.

use std::any::Any;
use std::backtrace::Backtrace;

use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// Response for a request whose handler panicked.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Internal(format!("panic: {}", panic_message(payload.as_ref()))).into_response()
}

/// Log every panic through `tracing`, with a backtrace.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let backtrace = Backtrace::force_capture();
        tracing::error!(panic = %info, %backtrace, "panic caught");
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
