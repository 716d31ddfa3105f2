use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

use crate::service::pricing::PricingError;

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("No rate posted for {material} {karat} on {asof_date}")]
    RateNotFound {
        asof_date: NaiveDate,
        material: String,
        karat: String,
    },

    #[error("Duplicate expense; already entered by {inserted_by}")]
    DuplicateExpense { inserted_by: String },

    #[error("Duplicate sale for tag {tag_no}; already entered by {inserted_by}")]
    DuplicateSale { tag_no: String, inserted_by: String },
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            LedgerError::Database(_) | LedgerError::Json(_) => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                };
                (status, body)
            }
            LedgerError::InvalidInput(msg) => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorBody {
                    code: "INVALID_INPUT".to_string(),
                    message: msg,
                };
                (status, body)
            }
            LedgerError::Pricing(e) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                let body = ApiErrorBody {
                    code: "UNPROCESSABLE".to_string(),
                    message: e.to_string(),
                };
                (status, body)
            }
            err @ LedgerError::RateNotFound { .. } => {
                let status = StatusCode::NOT_FOUND;
                let body = ApiErrorBody {
                    code: "RATE_NOT_FOUND".to_string(),
                    message: err.to_string(),
                };
                (status, body)
            }
            err @ (LedgerError::DuplicateExpense { .. } | LedgerError::DuplicateSale { .. }) => {
                let status = StatusCode::CONFLICT;
                let body = ApiErrorBody {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: err.to_string(),
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
