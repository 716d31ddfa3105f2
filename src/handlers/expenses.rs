use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::info;

use crate::db::DbExpense;
use crate::error::LedgerError;
use crate::handlers::validate_range;
use crate::middleware::RequireKeyAuth;
use crate::router::LedgerState;
use crate::types::expense::{ExpenseListQuery, NewExpense};

/// POST /expenses -> record one expense. A same-day repeat of the same
/// type and item is a 409, naming who entered it first.
pub async fn add_expense_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Json(req): Json<NewExpense>,
) -> Result<(StatusCode, Json<DbExpense>), LedgerError> {
    if req.item_name.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            "item_name must not be empty".to_string(),
        ));
    }
    if req.inserted_by.trim().is_empty() {
        return Err(LedgerError::InvalidInput(
            "inserted_by must not be empty".to_string(),
        ));
    }
    if req.cost <= 0.0 {
        return Err(LedgerError::InvalidInput(
            "cost must be positive".to_string(),
        ));
    }

    let row = state.storage.insert_expense(&req).await?;
    info!(
        id = row.id,
        asof_date = %row.asof_date,
        expense_type = %row.expense_type,
        item = %row.item_name,
        cost = row.cost,
        udhaar = row.udhaar,
        "expense recorded"
    );
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /expenses?from=&to=&expense_type=&udhaar=
pub async fn list_expenses_handler(
    _auth: RequireKeyAuth,
    State(state): State<LedgerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<DbExpense>>, LedgerError> {
    validate_range(query.from, query.to)?;
    let rows = state
        .storage
        .list_expenses(query.from, query.to, query.expense_type, query.udhaar)
        .await?;
    Ok(Json(rows))
}
