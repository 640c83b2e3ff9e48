//! GrahamIQ API server: Graham intrinsic value for Brazilian tickers.

pub mod auth;
pub mod config;
pub mod request_id;
pub mod stock_routes;

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use fundamentus_client::{FundamentusClient, PageSource};
use graham_valuation::GrahamCalculator;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use valuation_core::ScrapeError;

pub use auth::{AuthError, TokenAllowlist};
pub use config::AppConfig;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Process-wide, read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub pages: Arc<dyn PageSource>,
    pub tokens: Arc<TokenAllowlist>,
    pub calculator: GrahamCalculator,
}

impl AppState {
    pub fn new(pages: Arc<dyn PageSource>, tokens: TokenAllowlist) -> Self {
        Self {
            pages,
            tokens: Arc::new(tokens),
            calculator: GrahamCalculator::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(FundamentusClient::with_base_url(&config.upstream_base_url)),
            TokenAllowlist::new(&config.auth_tokens),
        )
    }
}

/// Serialize `body` with the `application/json; charset=utf-8` content type.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Terminal request error, written as `{"error": message}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, "unauthorized")
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

impl std::error::Error for AppError {}

impl From<AuthError> for AppError {
    fn from(_: AuthError) -> Self {
        AppError::unauthorized()
    }
}

impl From<ScrapeError> for AppError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::NotFound => AppError::with_status(StatusCode::NOT_FOUND, "no stock found"),
            ScrapeError::Upstream(_) => AppError::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not get stock data",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        json_response(self.status, &json!({ "error": self.message }))
    }
}

async fn health() -> Response {
    json_response(StatusCode::OK, &json!({ "status": "ok" }))
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(stock_routes::stock_routes())
        .with_state(state)
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

pub fn init_tracing(json_logging: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "api_server=info,tower_http=info".into());

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.json_logging);

    tracing::info!("Starting GrahamIQ API server");
    tracing::info!("  Upstream: {}", config.upstream_base_url);
    if config.auth_tokens.is_empty() {
        tracing::warn!("AUTH_TOKENS not set; token authentication disabled");
    } else {
        tracing::info!("  Auth tokens: {}", config.auth_tokens.len());
    }

    let state = AppState::from_config(&config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
