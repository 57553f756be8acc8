use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stock level relative to the product's minimum threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Sufficient,
}

/// Core product structure. Prices are integer minor units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i32,
    pub minimum_threshold: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Profit margin as a percentage of the purchase price
    pub fn profit_margin(&self) -> f64 {
        profit_margin_pct(self.purchase_price_cents, self.selling_price_cents)
    }

    pub fn stock_status(&self) -> StockStatus {
        if self.quantity == 0 {
            StockStatus::OutOfStock
        } else if self.quantity <= self.minimum_threshold {
            StockStatus::LowStock
        } else {
            StockStatus::Sufficient
        }
    }
}

/// Margin percentage from integer prices. The ratio is rounded half-up to
/// two decimals before scaling, so the result lands on whole percents.
pub fn profit_margin_pct(purchase_price_cents: i64, selling_price_cents: i64) -> f64 {
    if purchase_price_cents == 0 {
        return 0.0;
    }
    let ratio = (selling_price_cents - purchase_price_cents) as f64 / purchase_price_cents as f64;
    (ratio * 100.0).round()
}

fn default_threshold() -> i32 {
    10
}

/// Validated input for product create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i32,
    #[serde(default = "default_threshold")]
    pub minimum_threshold: i32,
}

impl ProductDraft {
    pub fn validate(&self) -> Result<(), ProductError> {
        let name_len = self.name.trim().chars().count();
        if name_len < 2 || name_len > 255 {
            return Err(ProductError::InvalidName);
        }
        if self.category.trim().is_empty() {
            return Err(ProductError::MissingCategory);
        }
        if self.purchase_price_cents <= 0 || self.selling_price_cents <= 0 {
            return Err(ProductError::NonPositivePrice);
        }
        if self.quantity < 0 {
            return Err(ProductError::NegativeQuantity);
        }
        if self.minimum_threshold < 1 {
            return Err(ProductError::InvalidThreshold);
        }
        if self.selling_price_cents < self.purchase_price_cents {
            return Err(ProductError::SellingBelowPurchase);
        }
        Ok(())
    }

    /// Materialize a new product from the draft
    pub fn into_product(self) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: self.name,
            category: self.category,
            purchase_price_cents: self.purchase_price_cents,
            selling_price_cents: self.selling_price_cents,
            quantity: self.quantity,
            minimum_threshold: self.minimum_threshold,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Name must be between 2 and 255 characters")]
    InvalidName,

    #[error("Category is required")]
    MissingCategory,

    #[error("Prices must be greater than 0")]
    NonPositivePrice,

    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    #[error("Minimum threshold must be at least 1")]
    InvalidThreshold,

    #[error("Selling price must be greater than or equal to purchase price")]
    SellingBelowPurchase,

    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock { available: i32, requested: i32 },
}
