use axum::{
    Json,
    extract::{Query, State},
};
use chrono::Utc;
use tracing::info;

use crate::db::DbRate;
use crate::error::LedgerError;
use crate::handlers::validate_range;
use crate::middleware::RequireKeyAuth;
use crate::router::LedgerState;
use crate::types::rates::{
    RateBoardQuery, RateHistoryQuery, RatesUpsertRequest, RatesUpsertResponse,
};

/// GET /rates -> the rate board for one day (today when unspecified).
pub async fn rate_board_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<RateBoardQuery>,
) -> Result<Json<Vec<DbRate>>, LedgerError> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let rates = state.storage.rates_for_date(date).await?;
    Ok(Json(rates))
}

/// PUT /rates -> upsert a day's board in one transaction.
pub async fn upsert_rates_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Json(req): Json<RatesUpsertRequest>,
) -> Result<Json<RatesUpsertResponse>, LedgerError> {
    if req.rates.is_empty() {
        return Err(LedgerError::InvalidInput("no rates to save".to_string()));
    }
    if req.inserted_by.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            "inserted_by must not be empty".to_string(),
        ));
    }
    for entry in &req.rates {
        if entry.n_price <= 0.0 || entry.o_price <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "non-positive price for {} {}",
                entry.material, entry.karat
            )));
        }
    }

    state
        .storage
        .upsert_rates(req.asof_date, &req.inserted_by, &req.rates)
        .await?;

    info!(
        asof_date = %req.asof_date,
        count = req.rates.len(),
        inserted_by = %req.inserted_by,
        "daily rates saved"
    );
    Ok(Json(RatesUpsertResponse {
        asof_date: req.asof_date,
        saved: req.rates.len(),
    }))
}

/// GET /rates/history?from=&to=
pub async fn rate_history_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<RateHistoryQuery>,
) -> Result<Json<Vec<DbRate>>, LedgerError> {
    validate_range(query.from, query.to)?;
    let rates = state.storage.list_rates(query.from, query.to).await?;
    Ok(Json(rates))
}
