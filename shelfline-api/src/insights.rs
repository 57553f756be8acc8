use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use shelfline_catalog::Product;
use shelfline_insight::{build_prompt, project, Insight, InsightWithProduct, Priority};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListInsightsQuery {
    pub priority: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub current_stock: i32,
    pub days_until_stockout: i32,
    pub recommended_reorder_qty: i32,
    pub priority: Priority,
    pub reason: String,
    pub action: String,
    pub confidence_score: f64,
    pub generated_at: DateTime<Utc>,
}

impl From<InsightWithProduct> for InsightResponse {
    fn from(row: InsightWithProduct) -> Self {
        InsightResponse {
            id: row.insight.id,
            product_id: row.insight.product_id,
            product_name: row.product_name,
            current_stock: row.current_stock,
            days_until_stockout: row.insight.days_until_stockout,
            recommended_reorder_qty: row.insight.recommended_reorder_qty,
            priority: row.insight.priority,
            reason: row.insight.reason,
            action: row.insight.action,
            confidence_score: row.insight.confidence_score,
            generated_at: row.insight.generated_at,
        }
    }
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/insights", get(list_insights))
        .route("/api/ai/insights/generate", post(trigger_generation))
        .route("/api/ai/insights/product/{id}", get(product_insight))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/ai/insights
async fn list_insights(
    State(state): State<AppState>,
    Query(query): Query<ListInsightsQuery>,
) -> Result<Json<Vec<InsightResponse>>, AppError> {
    let result = match query.priority.filter(|p| !p.is_empty()) {
        Some(raw) => {
            let priority = Priority::parse(&raw)
                .ok_or_else(|| AppError::ValidationError(format!("Unknown priority: {}", raw)))?;
            state.insight_repo.list_by_priority(priority).await
        }
        None => state.insight_repo.list_insights().await,
    };

    let insights = result.map_err(AppError::internal)?;
    Ok(Json(insights.into_iter().map(InsightResponse::from).collect()))
}

/// POST /api/ai/insights/generate
/// Kicks off a full regeneration sweep in the background
async fn trigger_generation(State(state): State<AppState>) -> Json<serde_json::Value> {
    info!("Manual insight generation triggered");
    tokio::spawn(run_generation_sweep(state));

    Json(json!({ "message": "AI insights generation started" }))
}

/// GET /api/ai/insights/product/{id}
/// Regenerates the product's insight on demand and returns it
async fn product_insight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InsightResponse>, AppError> {
    let product = state
        .product_repo
        .get_product(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", id)))?;

    let insight = generate_for_product(&state, &product)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(InsightResponse {
        id: insight.id,
        product_id: product.id,
        product_name: product.name,
        current_stock: product.quantity,
        days_until_stockout: insight.days_until_stockout,
        recommended_reorder_qty: insight.recommended_reorder_qty,
        priority: insight.priority,
        reason: insight.reason,
        action: insight.action,
        confidence_score: insight.confidence_score,
        generated_at: insight.generated_at,
    }))
}

// ============================================================================
// Generation
// ============================================================================

/// Project stockout for one product from its trailing sales window, narrate
/// it and persist the refreshed insight
pub(crate) async fn generate_for_product(
    state: &AppState,
    product: &Product,
) -> Result<Insight, shelfline_core::repository::RepoError> {
    info!("Generating insight for product: {}", product.id);

    let window_days = state.insights.analysis_window_days;
    let window_start = Utc::now() - Duration::days(window_days as i64);

    let units_sold = state.sale_repo.units_sold_since(product.id, window_start).await?;

    let projection = project(product.quantity, units_sold, window_days);
    let prompt = build_prompt(product, units_sold, &projection);
    let reason = state.narrator.generate(&prompt);

    let insight = Insight::from_projection(product.id, &projection, reason);
    state.insight_repo.upsert_insight(&insight).await?;

    Ok(insight)
}

/// Regenerate insights for every product, pacing between products to keep
/// the (future) reasoning backend within rate limits
pub(crate) async fn run_generation_sweep(state: AppState) {
    info!("Starting insight generation for all products");

    let products = match state.product_repo.list_products().await {
        Ok(products) => products,
        Err(e) => {
            error!("Failed to list products for insight generation: {}", e);
            return;
        }
    };

    let delay = std::time::Duration::from_millis(state.insights.product_delay_ms);

    for product in &products {
        if let Err(e) = generate_for_product(&state, product).await {
            error!("Error generating insight for product {}: {}", product.id, e);
        }
        sleep(delay).await;
    }

    info!("Completed insight generation for {} products", products.len());
}
