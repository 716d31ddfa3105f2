use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two expense buckets the books distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseType {
    Direct,
    Indirect,
}

impl ExpenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Direct => "direct",
            ExpenseType::Indirect => "indirect",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(ExpenseType::Direct),
            "indirect" => Ok(ExpenseType::Indirect),
            other => Err(format!("unknown expense type: {other}")),
        }
    }
}

/// `POST /expenses` payload. `udhaar` marks a credit-basis entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExpense {
    pub asof_date: NaiveDate,
    pub expense_type: ExpenseType,
    pub item_name: String,
    pub cost: f64,
    #[serde(default)]
    pub udhaar: bool,
    pub inserted_by: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseListQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub expense_type: Option<ExpenseType>,
    pub udhaar: Option<bool>,
}
