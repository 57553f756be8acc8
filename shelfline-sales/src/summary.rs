use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SaleWithProduct;

/// Reporting periods for sales summaries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    /// Parse a period name, falling back to the weekly window
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "today" => Period::Today,
            "month" => Period::Month,
            _ => Period::Week,
        }
    }

    /// Start of the period relative to `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Today => now.date_naive().and_hms_opt(0, 0, 0).unwrap_or_default().and_utc(),
            Period::Week => now - Duration::days(7),
            Period::Month => now - Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesSummary {
    pub period: String,
    pub total_revenue_cents: i64,
    pub total_transactions: i64,
    pub total_units_sold: i64,
    pub average_transaction_value_cents: i64,
}

/// Aggregate the given sales into a summary for the period
pub fn summarize(period: Period, sales: &[SaleWithProduct]) -> SalesSummary {
    let total_revenue_cents: i64 = sales.iter().map(|s| s.sale.total_revenue_cents).sum();
    let total_transactions = sales.len() as i64;
    let total_units_sold: i64 = sales.iter().map(|s| s.sale.quantity_sold as i64).sum();

    let average_transaction_value_cents = if total_transactions > 0 {
        (total_revenue_cents as f64 / total_transactions as f64).round() as i64
    } else {
        0
    };

    SalesSummary {
        period: period.as_str().to_string(),
        total_revenue_cents,
        total_transactions,
        total_units_sold,
        average_transaction_value_cents,
    }
}
