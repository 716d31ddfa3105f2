use std::sync::Arc;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::db::LedgerStorage;
use crate::handlers::{expenses, rates, reports, sales};

/// Entry forms are small; anything past this is a caller bug.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct LedgerState {
    pub storage: LedgerStorage,
    pub service_key: Arc<str>,
}

impl LedgerState {
    pub fn new(storage: LedgerStorage, service_key: Arc<str>) -> Self {
        Self {
            storage,
            service_key,
        }
    }
}

pub fn ledger_router(state: LedgerState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/rates",
            get(rates::rate_board_handler).put(rates::upsert_rates_handler),
        )
        .route("/rates/history", get(rates::rate_history_handler))
        .route(
            "/expenses",
            post(expenses::add_expense_handler).get(expenses::list_expenses_handler),
        )
        .route(
            "/sales",
            post(sales::add_sale_handler).get(sales::list_sales_handler),
        )
        .route("/sales/quote", post(sales::quote_sale_handler))
        .route("/reports/summary", get(reports::summary_handler))
        .route("/reports/daily", get(reports::daily_handler))
        .route("/reports/materials", get(reports::materials_handler))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
