use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::info;

use crate::db::DbSale;
use crate::error::LedgerError;
use crate::handlers::validate_range;
use crate::middleware::RequireKeyAuth;
use crate::router::LedgerState;
use crate::service::pricing::{self, QuoteBasis, SaleQuote, SellingTerms};
use crate::types::sale::{NewSale, QuoteRequest, QuoteResponse, SalesListQuery};

/// POST /sales -> record one sale. Profit is recomputed server-side
/// from the submitted costs; a same-day repeat of a tag number is a 409.
pub async fn add_sale_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Json(req): Json<NewSale>,
) -> Result<(StatusCode, Json<DbSale>), LedgerError> {
    for (field, value) in [
        ("customer_name", &req.customer_name),
        ("customer_phone", &req.customer_phone),
        ("tag_no", &req.tag_no),
        ("item_name", &req.item_name),
        ("item_type", &req.item_type),
        ("inserted_by", &req.inserted_by),
    ] {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidInput(format!(
                "{field} must not be empty"
            )));
        }
    }
    if req.p_grams <= 0.0 || req.p_purity <= 0.0 {
        return Err(LedgerError::InvalidInput(
            "p_grams and p_purity must be positive".to_string(),
        ));
    }
    if req.p_cost <= 0.0 || req.s_cost <= 0.0 {
        return Err(LedgerError::InvalidInput(
            "p_cost and s_cost must be positive".to_string(),
        ));
    }

    let profit = pricing::profit(req.s_cost, req.p_cost, req.o_cost.unwrap_or(0.0));
    let row = state.storage.insert_sale(&req, profit).await?;
    info!(
        id = row.id,
        asof_date = %row.asof_date,
        tag_no = %row.tag_no,
        customer = %row.customer_name,
        s_cost = row.s_cost,
        profit = row.profit,
        "sale recorded"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /sales?from=&to=&material=
pub async fn list_sales_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<SalesListQuery>,
) -> Result<Json<Vec<DbSale>>, LedgerError> {
    validate_range(query.from, query.to)?;
    let rows = state
        .storage
        .list_sales(query.from, query.to, query.material)
        .await?;
    Ok(Json(rows))
}

/// POST /sales/quote -> price a prospective sale off the posted rate
/// board without recording anything.
pub async fn quote_sale_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, LedgerError> {
    if req.grams <= 0.0 || req.purity <= 0.0 {
        return Err(LedgerError::InvalidInput(
            "grams and purity must be positive".to_string(),
        ));
    }
    for lot in &req.old_lots {
        if lot.gram <= 0.0 || lot.purity <= 0.0 {
            return Err(LedgerError::InvalidInput(
                "old lot gram and purity must be positive".to_string(),
            ));
        }
    }
    let terms = match (req.wastage, req.s_cost) {
        (Some(w), None) => SellingTerms::Wastage(w),
        (None, Some(s)) => SellingTerms::SellingCost(s),
        _ => {
            return Err(LedgerError::InvalidInput(
                "provide exactly one of wastage or s_cost".to_string(),
            ));
        }
    };

    let rate = state
        .storage
        .rate_for(req.asof_date, req.material, req.karat.as_str())
        .await?
        .ok_or(LedgerError::RateNotFound {
            asof_date: req.asof_date,
            material: req.material.to_string(),
            karat: req.karat.to_string(),
        })?;

    let quote = SaleQuote::compute(
        QuoteBasis {
            n_price: rate.n_price,
            o_price: rate.o_price,
        },
        req.grams,
        req.purity,
        terms,
        &req.old_lots,
    )?;

    Ok(Json(QuoteResponse {
        asof_date: req.asof_date,
        material: req.material,
        karat: req.karat,
        n_price: rate.n_price,
        o_price: rate.o_price,
        quote,
    }))
}
