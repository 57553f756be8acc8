use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded sales transaction. Monetary values are integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity_sold: i32,
    pub sale_price_cents: i64,
    pub total_revenue_cents: i64,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Create a sale at the given unit price, revenue derived from quantity
    pub fn new(product_id: Uuid, user_id: Uuid, quantity_sold: i32, sale_price_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            user_id,
            quantity_sold,
            sale_price_cents,
            total_revenue_cents: sale_price_cents * quantity_sold as i64,
            sale_date: Utc::now(),
        }
    }
}

/// A sale joined with the columns of its product (and the recording user's
/// name) that the read paths and the analytics engine need
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithProduct {
    pub sale: Sale,
    pub product_name: String,
    pub product_category: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub user_name: String,
}
