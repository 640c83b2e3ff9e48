//! Stock valuation endpoint.
//!
//! Accepts any HTTP method. Parameters come from the query string and from a
//! form-encoded body, body values taking precedence.

use axum::{
    extract::{rejection::FormRejection, Query, State},
    http::StatusCode,
    response::Response,
    routing::any,
    Extension, Form, Router,
};
use std::collections::HashMap;
use valuation_core::{normalize_ticker, StockReport};

use crate::request_id::RequestId;
use crate::{json_response, AppError, AppState};

/// `stock` and `token` merged from every parameter source. Blank values
/// (`""` and `"0"`) count as not supplied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StockParams {
    pub stock: Option<String>,
    pub token: Option<String>,
}

impl StockParams {
    pub fn merge(query: HashMap<String, String>, body: Option<HashMap<String, String>>) -> Self {
        let mut params = query;
        if let Some(body) = body {
            params.extend(body);
        }

        Self {
            stock: params.remove("stock").filter(|v| !is_blank(v)),
            token: params.remove("token").filter(|v| !is_blank(v)),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}

pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", any(stock_valuation))
        .route("/stock", any(stock_valuation))
}

async fn stock_valuation(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<HashMap<String, String>>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Response, AppError> {
    let params = StockParams::merge(query, form.ok().map(|Form(body)| body));

    state.tokens.verify(params.token.as_deref())?;

    let requested = match params.stock.as_deref() {
        Some(stock) => stock,
        None => return Err(AppError::bad_request("no stock code")),
    };
    let stock = normalize_ticker(requested);

    let fields = state.pages.fetch_fields(stock).await.map_err(|e| {
        tracing::warn!("[{}] lookup failed for {}: {}", request_id, stock, e);
        AppError::from(e)
    })?;

    let valuation = state.calculator.value(&fields);
    let report = StockReport::new(stock, &fields, valuation);

    tracing::info!(
        stock = %report.stock,
        price = report.price,
        iv = report.iv,
        sm = report.sm,
        "valuation served"
    );

    Ok(json_response(StatusCode::OK, &report))
}
