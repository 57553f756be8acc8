use chrono::Utc;
use shelfline_catalog::Product;
use uuid::Uuid;

use crate::models::{Insight, Priority};

/// Projection ceiling when a product has no recent sales
pub const NO_SALES_STOCKOUT_DAYS: i32 = 999;

/// Fixed confidence attached to formula-driven insights
pub const CONFIDENCE_SCORE: f64 = 0.85;

/// The arithmetic core of an insight: stockout horizon, reorder quantity
/// and the priority tier they fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub daily_average: f64,
    pub days_until_stockout: i32,
    pub recommended_reorder_qty: i32,
    pub priority: Priority,
}

/// Project stockout from the units sold over the trailing window.
///
/// Daily average is units sold / window length. Days until stockout is the
/// current quantity divided by that average, rounded up, capped by the
/// no-sales ceiling. The recommended reorder covers one full window of
/// average demand.
pub fn project(quantity: i32, units_sold: i64, window_days: u32) -> Projection {
    let daily_average = units_sold as f64 / window_days as f64;

    let days_until_stockout = if daily_average > 0.0 {
        (quantity as f64 / daily_average).ceil() as i32
    } else {
        NO_SALES_STOCKOUT_DAYS
    };

    let priority = if days_until_stockout <= 3 {
        Priority::High
    } else if days_until_stockout <= 7 {
        Priority::Medium
    } else {
        Priority::Low
    };

    let recommended_reorder_qty = (daily_average * window_days as f64).ceil() as i32;

    Projection {
        daily_average,
        days_until_stockout,
        recommended_reorder_qty,
        priority,
    }
}

/// Templated next-step recommendation for the projection's tier
pub fn build_action(priority: Priority, days: i32, qty: i32) -> String {
    match priority {
        Priority::High => format!("URGENT: Reorder {} units immediately to avoid stockout in {} days", qty, days),
        Priority::Medium => format!("Reorder {} units within next few days (stockout in {} days)", qty, days),
        Priority::Low => format!("Stock level adequate. Consider reordering {} units for optimal inventory", qty),
    }
}

/// Assemble the narrative prompt handed to the reasoning backend
pub fn build_prompt(product: &Product, units_sold: i64, projection: &Projection) -> String {
    format!(
        "Product: {} (Category: {})\nCurrent Stock: {}\nSales last 14 days: {} units\n\
         Daily average: {:.1} units\nDays until stockout: {}\nProfit margin: {:.1}%\nPriority: {}\n\n\
         Provide a brief insight (max 100 words) about this product's inventory status.",
        product.name,
        product.category,
        product.quantity,
        units_sold,
        projection.daily_average,
        projection.days_until_stockout,
        product.profit_margin(),
        projection.priority.as_str(),
    )
}

impl Insight {
    /// Build a complete insight from a projection and its narrative parts
    pub fn from_projection(product_id: Uuid, projection: &Projection, reason: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            days_until_stockout: projection.days_until_stockout,
            recommended_reorder_qty: projection.recommended_reorder_qty,
            priority: projection.priority,
            reason,
            action: build_action(projection.priority, projection.days_until_stockout, projection.recommended_reorder_qty),
            confidence_score: CONFIDENCE_SCORE,
            generated_at: Utc::now(),
        }
    }
}
