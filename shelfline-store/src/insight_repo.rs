use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelfline_core::repository::{InsightRepository, RepoError};
use shelfline_insight::{Insight, InsightWithProduct, Priority};
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresInsightRepository {
    pool: PgPool,
}

impl PostgresInsightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying of the insight/product join
#[derive(sqlx::FromRow)]
struct InsightRow {
    id: Uuid,
    product_id: Uuid,
    days_until_stockout: i32,
    recommended_reorder_qty: i32,
    priority: String,
    reason: Option<String>,
    action: Option<String>,
    confidence_score: f64,
    generated_at: DateTime<Utc>,
    product_name: String,
    current_stock: i32,
}

impl From<InsightRow> for InsightWithProduct {
    fn from(row: InsightRow) -> Self {
        InsightWithProduct {
            insight: Insight {
                id: row.id,
                product_id: row.product_id,
                days_until_stockout: row.days_until_stockout,
                recommended_reorder_qty: row.recommended_reorder_qty,
                priority: Priority::parse(&row.priority).unwrap_or(Priority::Low),
                reason: row.reason.unwrap_or_default(),
                action: row.action.unwrap_or_default(),
                confidence_score: row.confidence_score,
                generated_at: row.generated_at,
            },
            product_name: row.product_name,
            current_stock: row.current_stock,
        }
    }
}

const JOINED_SELECT: &str = r#"
SELECT i.id, i.product_id, i.days_until_stockout, i.recommended_reorder_qty, i.priority,
       i.reason, i.action, i.confidence_score, i.generated_at,
       p.name AS product_name, p.quantity AS current_stock
FROM insights i
JOIN products p ON p.id = i.product_id
"#;

#[async_trait]
impl InsightRepository for PostgresInsightRepository {
    async fn upsert_insight(&self, insight: &Insight) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO insights (id, product_id, days_until_stockout, recommended_reorder_qty, priority, reason, action, confidence_score, generated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (product_id) DO UPDATE SET
                days_until_stockout = EXCLUDED.days_until_stockout,
                recommended_reorder_qty = EXCLUDED.recommended_reorder_qty,
                priority = EXCLUDED.priority,
                reason = EXCLUDED.reason,
                action = EXCLUDED.action,
                confidence_score = EXCLUDED.confidence_score,
                generated_at = EXCLUDED.generated_at
            "#,
        )
        .bind(insight.id)
        .bind(insight.product_id)
        .bind(insight.days_until_stockout)
        .bind(insight.recommended_reorder_qty)
        .bind(insight.priority.as_str())
        .bind(&insight.reason)
        .bind(&insight.action)
        .bind(insight.confidence_score)
        .bind(insight.generated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_insights(&self) -> Result<Vec<InsightWithProduct>, RepoError> {
        let rows = sqlx::query_as::<_, InsightRow>(&format!(
            "{} ORDER BY i.generated_at DESC",
            JOINED_SELECT
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InsightWithProduct::from).collect())
    }

    async fn list_by_priority(&self, priority: Priority) -> Result<Vec<InsightWithProduct>, RepoError> {
        let rows = sqlx::query_as::<_, InsightRow>(&format!(
            "{} WHERE i.priority = $1 ORDER BY i.generated_at DESC",
            JOINED_SELECT
        ))
        .bind(priority.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(InsightWithProduct::from).collect())
    }
}
