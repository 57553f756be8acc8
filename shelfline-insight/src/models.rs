use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Restocking urgency derived from the stockout projection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse a priority name, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HIGH" => Some(Priority::High),
            "MEDIUM" => Some(Priority::Medium),
            "LOW" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

/// A restocking insight for one product. At most one per product; the row
/// is replaced on regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: Uuid,
    pub product_id: Uuid,
    pub days_until_stockout: i32,
    pub recommended_reorder_qty: i32,
    pub priority: Priority,
    pub reason: String,
    pub action: String,
    pub confidence_score: f64,
    pub generated_at: DateTime<Utc>,
}

/// An insight joined with the product columns its read paths report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightWithProduct {
    pub insight: Insight,
    pub product_name: String,
    pub current_stock: i32,
}
