use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::service::pricing::{Karat, Material, OldLot, SaleQuote};

/// `POST /sales` payload, the sale entry form. Costs arrive as typed
/// on the form; the server recomputes profit before persisting.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub asof_date: NaiveDate,
    pub customer_name: String,
    pub customer_phone: String,
    pub tag_no: String,
    pub item_name: String,
    pub material: Material,
    pub item_type: String,
    pub p_grams: f64,
    pub p_purity: f64,
    pub p_cost: f64,
    pub s_purity: Option<f64>,
    pub wastage: Option<f64>,
    pub s_cost: f64,
    pub o_cost: Option<f64>,
    pub o1_gram: Option<f64>,
    pub o1_purity: Option<f64>,
    pub o2_gram: Option<f64>,
    pub o2_purity: Option<f64>,
    pub inserted_by: String,
}

#[derive(Debug, Deserialize)]
pub struct SalesListQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub material: Option<Material>,
}

/// `POST /sales/quote`: price a prospective sale off the posted rate
/// board. Exactly one of `wastage` / `s_cost` must be given; the other
/// is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub asof_date: NaiveDate,
    pub material: Material,
    pub karat: Karat,
    pub grams: f64,
    pub purity: f64,
    pub wastage: Option<f64>,
    pub s_cost: Option<f64>,
    #[serde(default)]
    pub old_lots: Vec<OldLot>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub asof_date: NaiveDate,
    pub material: Material,
    pub karat: Karat,
    pub n_price: f64,
    pub o_price: f64,
    #[serde(flatten)]
    pub quote: SaleQuote,
}
