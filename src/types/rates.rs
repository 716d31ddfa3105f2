use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::service::pricing::{Karat, Material};

/// One line of the rate board: both prices for a material/karat pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RateEntry {
    pub material: Material,
    pub karat: Karat,
    pub n_price: f64,
    pub o_price: f64,
}

/// Batch upsert of a day's rate board.
#[derive(Debug, Deserialize)]
pub struct RatesUpsertRequest {
    pub asof_date: NaiveDate,
    pub inserted_by: String,
    pub rates: Vec<RateEntry>,
}

/// `GET /rates`: defaults to today when `date` is absent.
#[derive(Debug, Deserialize)]
pub struct RateBoardQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RateHistoryQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize)]
pub struct RatesUpsertResponse {
    pub asof_date: NaiveDate,
    pub saved: usize,
}
