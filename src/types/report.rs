use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::service::pricing::Material;

#[derive(Debug, Deserialize)]
pub struct ReportRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SalesTotals {
    pub count: i64,
    pub revenue: f64,
    pub purchase_cost: f64,
    pub old_cost: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ExpenseTotals {
    pub count: i64,
    pub total: f64,
    pub direct: f64,
    pub indirect: f64,
    pub udhaar_total: f64,
}

/// `GET /reports/summary`: range totals plus the bottom line.
#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub sales: SalesTotals,
    pub expenses: ExpenseTotals,
    /// `sales.profit - expenses.total`
    pub net: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyReportRow {
    pub asof_date: NaiveDate,
    pub revenue: f64,
    pub profit: f64,
    pub expense_total: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialReportRow {
    pub material: Material,
    pub sales_count: i64,
    pub revenue: f64,
    pub profit: f64,
    /// Average posted new-stock rate over the range, when any was posted.
    pub avg_n_price: Option<f64>,
}
