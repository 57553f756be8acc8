use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelfline_core::repository::{RepoError, SaleRepository};
use shelfline_sales::{Sale, SaleWithProduct};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresSaleRepository {
    pool: PgPool,
}

impl PostgresSaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying of the sale/product join
#[derive(sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    product_id: Uuid,
    user_id: Uuid,
    quantity_sold: i32,
    sale_price_cents: i64,
    total_revenue_cents: i64,
    sale_date: DateTime<Utc>,
    product_name: String,
    product_category: String,
    purchase_price_cents: i64,
    selling_price_cents: i64,
    user_name: String,
}

impl From<SaleRow> for SaleWithProduct {
    fn from(row: SaleRow) -> Self {
        SaleWithProduct {
            sale: Sale {
                id: row.id,
                product_id: row.product_id,
                user_id: row.user_id,
                quantity_sold: row.quantity_sold,
                sale_price_cents: row.sale_price_cents,
                total_revenue_cents: row.total_revenue_cents,
                sale_date: row.sale_date,
            },
            product_name: row.product_name,
            product_category: row.product_category,
            purchase_price_cents: row.purchase_price_cents,
            selling_price_cents: row.selling_price_cents,
            user_name: row.user_name,
        }
    }
}

const JOINED_SELECT: &str = r#"
SELECT s.id, s.product_id, s.user_id, s.quantity_sold, s.sale_price_cents, s.total_revenue_cents, s.sale_date,
       p.name AS product_name, p.category AS product_category, p.purchase_price_cents, p.selling_price_cents,
       u.name AS user_name
FROM sales s
JOIN products p ON p.id = s.product_id
JOIN users u ON u.id = s.user_id
"#;

#[async_trait]
impl SaleRepository for PostgresSaleRepository {
    async fn record_sale(&self, sale: &Sale) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO sales (id, product_id, user_id, quantity_sold, sale_price_cents, total_revenue_cents, sale_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(sale.id)
        .bind(sale.product_id)
        .bind(sale.user_id)
        .bind(sale.quantity_sold)
        .bind(sale.sale_price_cents)
        .bind(sale.total_revenue_cents)
        .bind(sale.sale_date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<SaleWithProduct>, RepoError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!("{} ORDER BY s.sale_date DESC", JOINED_SELECT))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(SaleWithProduct::from).collect())
    }

    async fn list_sales_since(&self, start: DateTime<Utc>) -> Result<Vec<SaleWithProduct>, RepoError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} WHERE s.sale_date >= $1 ORDER BY s.sale_date DESC",
            JOINED_SELECT
        ))
        .bind(start)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleWithProduct::from).collect())
    }

    async fn list_sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleWithProduct>, RepoError> {
        let rows = sqlx::query_as::<_, SaleRow>(&format!(
            "{} WHERE s.sale_date BETWEEN $1 AND $2 ORDER BY s.sale_date DESC",
            JOINED_SELECT
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SaleWithProduct::from).collect())
    }

    async fn units_sold_since(&self, product_id: Uuid, start: DateTime<Utc>) -> Result<i64, RepoError> {
        let units = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(quantity_sold), 0) FROM sales WHERE product_id = $1 AND sale_date >= $2",
        )
        .bind(product_id)
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        Ok(units)
    }
}
