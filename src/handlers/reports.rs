use axum::{
    Json,
    extract::{Query, State},
};

use crate::error::LedgerError;
use crate::handlers::validate_range;
use crate::middleware::RequireKeyAuth;
use crate::router::LedgerState;
use crate::types::report::{DailyReportRow, MaterialReportRow, ReportRangeQuery, ReportSummary};

/// GET /reports/summary?from=&to= -> range totals and the bottom line.
pub async fn summary_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<ReportSummary>, LedgerError> {
    validate_range(query.from, query.to)?;
    let sales = state.storage.sales_totals(query.from, query.to).await?;
    let expenses = state.storage.expense_totals(query.from, query.to).await?;
    let net = sales.profit - expenses.total;
    Ok(Json(ReportSummary {
        from: query.from,
        to: query.to,
        sales,
        expenses,
        net,
    }))
}

/// GET /reports/daily?from=&to=
pub async fn daily_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<Vec<DailyReportRow>>, LedgerError> {
    validate_range(query.from, query.to)?;
    let rows = state.storage.daily_breakdown(query.from, query.to).await?;
    Ok(Json(rows))
}

/// GET /reports/materials?from=&to=
pub async fn materials_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<Vec<MaterialReportRow>>, LedgerError> {
    validate_range(query.from, query.to)?;
    let rows = state
        .storage
        .material_breakdown(query.from, query.to)
        .await?;
    Ok(Json(rows))
}
