// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Result, anyhow};
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
};
use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tower::ServiceExt;
use wallet_ledger::{
    app::{self, AppState},
    config::Config,
    db::Ledger,
    models::account::Account,
    shutdown::{self, ShutdownTrigger},
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a push before giving up.
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// A router over a fresh ledger, plus handles to drive it from tests.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub trigger: ShutdownTrigger,
}

/// Default configuration with a short poll interval.
pub fn test_app() -> TestApp {
    test_app_with(Config {
        poll_interval_ms: 20,
        ..Config::default()
    })
}

pub fn test_app_with(config: Config) -> TestApp {
    let (trigger, shutdown) = shutdown::channel();
    let state = AppState::new(&config, Ledger::new(), shutdown);
    TestApp {
        router: app::router(state.clone()),
        state,
        trigger,
    }
}

/// Send one request through the router and decode the JSON response body.
///
/// An empty body decodes to `Value::Null`.
pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, HeaderMap, Value)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, headers, value))
}

pub async fn post(app: &TestApp, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let (status, _, value) = send(app, Method::POST, uri, Some(body)).await?;
    Ok((status, value))
}

pub async fn get(app: &TestApp, uri: &str) -> Result<(StatusCode, Value)> {
    let (status, _, value) = send(app, Method::GET, uri, None).await?;
    Ok((status, value))
}

/// Serve the router on an ephemeral local port.
pub async fn spawn_server(app: &TestApp) -> Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = app.router.clone();

    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(addr)
}

pub async fn subscribe(addr: SocketAddr, channel: &str) -> Result<WsClient> {
    let url = format!("ws://{addr}/ws/topic/{channel}");
    let (ws, _) = tokio_tungstenite::connect_async(url).await?;
    Ok(ws)
}

/// Next pushed snapshot.
pub async fn next_accounts(ws: &mut WsClient) -> Result<Vec<Account>> {
    let message = tokio::time::timeout(PUSH_TIMEOUT, ws.next())
        .await?
        .ok_or_else(|| anyhow!("subscriber socket closed"))??;
    Ok(serde_json::from_str(message.to_text()?)?)
}

/// Create an account through the service and fund it.
pub async fn seed_account(app: &TestApp, name: &str, balance: i64) -> Result<uuid::Uuid> {
    let id = app.state.accounts.create(name).await?;
    if balance > 0 {
        app.state.accounts.deposit(id, balance).await?;
    }
    Ok(id)
}
