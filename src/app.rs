//! Application state and HTTP router.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    config::Config,
    db::Ledger,
    handlers, middleware,
    services::{account_service::AccountService, notifier::Notifier},
    shutdown::Shutdown,
};

/// Shared with every handler through axum's `State` extractor.
///
/// All components are built around the same [`Ledger`] handle.
#[derive(Debug, Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub notifier: Notifier,
    pub shutdown: Shutdown,
}

impl AppState {
    pub fn new(config: &Config, ledger: Ledger, shutdown: Shutdown) -> Self {
        Self {
            accounts: AccountService::new(ledger.clone(), config.min_amount),
            notifier: Notifier::new(ledger, config.poll_interval()),
            shutdown,
        }
    }
}

/// Build the HTTP router with routes and middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/health", get(handlers::health::health_check))
        // Account routes
        .route("/api/user/create", post(handlers::accounts::create_account))
        .route("/api/wallet/accounts", get(handlers::accounts::list_accounts))
        .route(
            "/api/wallet/balance/{id}",
            get(handlers::accounts::get_balance),
        )
        // Wallet transaction routes
        .route("/api/wallet/deposit", post(handlers::transactions::deposit))
        .route("/api/wallet/withdraw", post(handlers::transactions::withdraw))
        // Subscription channels
        .route("/ws/topic/leaderboard", get(handlers::notifier::leaderboard))
        .route("/ws/topic/outcomes", get(handlers::notifier::outcomes))
        // Innermost: panics become 500 responses inside the request span
        .layer(CatchPanicLayer::custom(middleware::panic::handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::request_id::make_span))
        .layer(middleware::request_id::propagate_request_id())
        // Outermost: the id must exist before the span is created
        .layer(middleware::request_id::set_request_id())
        .with_state(state)
}
