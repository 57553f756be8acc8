use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Revenue and transaction count for one calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: String,
    pub sales_cents: i64,
    pub transactions: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesTrend {
    pub period: String,
    pub data: Vec<TrendPoint>,
}

/// Accumulated sales figures for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPerformance {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub total_revenue_cents: i64,
    pub total_units_sold: i64,
    pub sales_count: i64,
    pub profit_margin: f64,
}

/// Sort key for the top-products ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopProductsSort {
    Revenue,
    Quantity,
    Frequency,
}

impl TopProductsSort {
    /// Parse a sort key, falling back to revenue
    pub fn parse(s: &str) -> Self {
        match s {
            "quantity" => TopProductsSort::Quantity,
            "frequency" => TopProductsSort::Frequency,
            _ => TopProductsSort::Revenue,
        }
    }
}

/// One category's share of total revenue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub total_revenue_cents: i64,
    pub total_products: i64,
    pub percentage: f64,
}

/// Revenue, profit and transaction count over one reporting period
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodFigures {
    pub revenue_cents: i64,
    pub profit_cents: i64,
    pub transactions: i64,
}
