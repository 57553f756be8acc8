use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelfline_catalog::{Product, ProductDraft};
use shelfline_core::repository::{ProductRepository, RepoError};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category: String,
    purchase_price_cents: i64,
    selling_price_cents: i64,
    quantity: i32,
    minimum_threshold: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            purchase_price_cents: row.purchase_price_cents,
            selling_price_cents: row.selling_price_cents,
            quantity: row.quantity,
            minimum_threshold: row.minimum_threshold,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, category, purchase_price_cents, selling_price_cents, quantity, minimum_threshold, created_at, updated_at";

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn create_product(&self, product: &Product) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, category, purchase_price_cents, selling_price_cents, quantity, minimum_threshold, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(product.purchase_price_cents)
        .bind(product.selling_price_cents)
        .bind(product.quantity)
        .bind(product.minimum_threshold)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE category = $1 ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE quantity <= minimum_threshold ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, RepoError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE name ILIKE '%' || $1 || '%' ORDER BY name",
            PRODUCT_COLUMNS
        ))
        .bind(term)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, RepoError> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM products ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn count_low_stock(&self) -> Result<i64, RepoError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE quantity <= minimum_threshold",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn update_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET name = $1, category = $2, purchase_price_cents = $3, selling_price_cents = $4,
                quantity = $5, minimum_threshold = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&draft.name)
        .bind(&draft.category)
        .bind(draft.purchase_price_cents)
        .bind(draft.selling_price_cents)
        .bind(draft.quantity)
        .bind(draft.minimum_threshold)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_quantity(&self, id: Uuid, delta: i32) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET quantity = quantity + $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(delta)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn set_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<Product>, RepoError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET quantity = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(quantity)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}
