use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelfline_catalog::{Product, ProductDraft};
use shelfline_insight::{Insight, InsightWithProduct, Priority};
use shelfline_sales::{Sale, SaleWithProduct};
use uuid::Uuid;

use crate::identity::User;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: &Product) -> Result<(), RepoError>;

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError>;

    async fn list_products(&self) -> Result<Vec<Product>, RepoError>;

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepoError>;

    async fn list_low_stock(&self) -> Result<Vec<Product>, RepoError>;

    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, RepoError>;

    async fn list_categories(&self) -> Result<Vec<String>, RepoError>;

    async fn count_low_stock(&self) -> Result<i64, RepoError>;

    /// Overwrite the mutable columns, returning the updated row
    async fn update_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<Product>, RepoError>;

    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Relative stock adjustment (positive restocks, negative sells)
    async fn adjust_quantity(&self, id: Uuid, delta: i32) -> Result<Option<Product>, RepoError>;

    async fn set_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<Product>, RepoError>;
}

/// Repository trait for sales transaction access
#[async_trait]
pub trait SaleRepository: Send + Sync {
    async fn record_sale(&self, sale: &Sale) -> Result<(), RepoError>;

    async fn list_sales(&self) -> Result<Vec<SaleWithProduct>, RepoError>;

    async fn list_sales_since(&self, start: DateTime<Utc>) -> Result<Vec<SaleWithProduct>, RepoError>;

    async fn list_sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleWithProduct>, RepoError>;

    /// Total units of one product sold since the given instant
    async fn units_sold_since(&self, product_id: Uuid, start: DateTime<Utc>) -> Result<i64, RepoError>;
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<(), RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError>;
}

/// Repository trait for restocking insights
#[async_trait]
pub trait InsightRepository: Send + Sync {
    /// Insert or replace the product's insight, keyed on the product
    async fn upsert_insight(&self, insight: &Insight) -> Result<(), RepoError>;

    async fn list_insights(&self) -> Result<Vec<InsightWithProduct>, RepoError>;

    async fn list_by_priority(&self, priority: Priority) -> Result<Vec<InsightWithProduct>, RepoError>;
}
