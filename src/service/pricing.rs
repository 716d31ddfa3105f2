//! Sale pricing arithmetic.
//!
//! Costs are derived from the daily rate board: the purchase side
//! prices metal at the new-stock gram rate scaled by purity, the
//! selling side applies the retailer's wastage markup on the raw gram
//! rate, and old-material trade-ins price at the buy-back gram rate.
//! All money values are rupees as `f64`, matching the stored columns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    Gold,
    Silver,
}

impl Material {
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Gold => "gold",
            Material::Silver => "silver",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gold" => Ok(Material::Gold),
            "silver" => Ok(Material::Silver),
            other => Err(format!("unknown material: {other}")),
        }
    }
}

/// Purity grade selecting the applicable daily rate row. The grade only
/// picks the rate; entry forms still carry free-form purity percents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Karat {
    #[serde(rename = "24k")]
    K24,
    #[serde(rename = "22k")]
    K22,
    #[serde(rename = "18k")]
    K18,
}

impl Karat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Karat::K24 => "24k",
            Karat::K22 => "22k",
            Karat::K18 => "18k",
        }
    }
}

impl fmt::Display for Karat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Karat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24k" => Ok(Karat::K24),
            "22k" => Ok(Karat::K22),
            "18k" => Ok(Karat::K18),
            other => Err(format!("unknown karat: {other}")),
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum PricingError {
    #[error("grams x rate must be positive to derive wastage")]
    ZeroBase,
}

/// An old-material trade-in lot handed over at sale time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OldLot {
    pub gram: f64,
    pub purity: f64,
}

/// `rate x grams x purity%`: cost of the fine metal actually bought.
pub fn purchase_cost(rate_per_gram: f64, grams: f64, purity_pct: f64) -> f64 {
    rate_per_gram * grams * (purity_pct / 100.0)
}

/// `grams x rate x (1 + wastage%)`: ticket price with the retail markup.
pub fn selling_cost(rate_per_gram: f64, grams: f64, wastage_pct: f64) -> f64 {
    grams * rate_per_gram * (1.0 + wastage_pct / 100.0)
}

/// Inverts [`selling_cost`]: the wastage percentage implied by a quoted
/// ticket price. Requires `grams x rate > 0`.
pub fn wastage_pct(selling_cost: f64, grams: f64, rate_per_gram: f64) -> Result<f64, PricingError> {
    let base = grams * rate_per_gram;
    if base <= 0.0 {
        return Err(PricingError::ZeroBase);
    }
    Ok((selling_cost / base - 1.0) * 100.0)
}

/// Trade-in credit: each lot priced at the buy-back gram rate scaled by
/// its purity.
pub fn old_cost(o_price_per_gram: f64, lots: &[OldLot]) -> f64 {
    lots.iter()
        .map(|lot| o_price_per_gram * lot.gram * (lot.purity / 100.0))
        .sum()
}

pub fn profit(s_cost: f64, p_cost: f64, o_cost: f64) -> f64 {
    s_cost - p_cost - o_cost
}

/// The two prices of a daily rate row a quote is computed against.
#[derive(Debug, Clone, Copy)]
pub struct QuoteBasis {
    /// New-stock price per gram (`n_price`).
    pub n_price: f64,
    /// Old-material buy-back price per gram (`o_price`).
    pub o_price: f64,
}

/// Selling side of a quote: the caller fixes one of the pair and the
/// other is derived.
#[derive(Debug, Clone, Copy)]
pub enum SellingTerms {
    Wastage(f64),
    SellingCost(f64),
}

/// Fully derived sale pricing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SaleQuote {
    pub p_cost: f64,
    pub s_cost: f64,
    pub wastage: f64,
    pub o_cost: f64,
    pub profit: f64,
}

impl SaleQuote {
    pub fn compute(
        basis: QuoteBasis,
        grams: f64,
        purity_pct: f64,
        terms: SellingTerms,
        lots: &[OldLot],
    ) -> Result<Self, PricingError> {
        let p_cost = purchase_cost(basis.n_price, grams, purity_pct);
        let (s_cost, wastage) = match terms {
            SellingTerms::Wastage(w) => (selling_cost(basis.n_price, grams, w), w),
            SellingTerms::SellingCost(s) => (s, wastage_pct(s, grams, basis.n_price)?),
        };
        let o_cost = old_cost(basis.o_price, lots);
        Ok(SaleQuote {
            p_cost,
            s_cost,
            wastage,
            o_cost,
            profit: profit(s_cost, p_cost, o_cost),
        })
    }
}
