use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::service::pricing::{Karat, Material};
use crate::types::expense::ExpenseType;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbRate {
    pub id: i64,
    pub asof_date: NaiveDate,
    pub material: Material,
    pub karat: Karat,
    pub n_price: f64,
    pub o_price: f64,
    pub inserted_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbExpense {
    pub id: i64,
    pub asof_date: NaiveDate,
    pub expense_type: ExpenseType,
    pub item_name: String,
    pub cost: f64,
    pub udhaar: bool,
    pub inserted_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DbSale {
    pub id: i64,
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
    pub profit: f64,
    pub inserted_by: String,
    pub created_at: DateTime<Utc>,
}
