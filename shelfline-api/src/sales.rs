use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use shelfline_sales::{summarize, Period, Sale, SaleWithProduct};

use crate::{error::AppError, middleware::auth::Claims, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSaleRequest {
    pub product_id: Uuid,
    pub quantity_sold: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_category: String,
    pub quantity_sold: i32,
    pub sale_price_cents: i64,
    pub total_revenue_cents: i64,
    pub sale_date: DateTime<Utc>,
    pub remaining_stock: Option<i32>,
    pub user_name: String,
}

impl From<SaleWithProduct> for SaleResponse {
    fn from(row: SaleWithProduct) -> Self {
        SaleResponse {
            id: row.sale.id,
            product_id: row.sale.product_id,
            product_name: row.product_name,
            product_category: row.product_category,
            quantity_sold: row.sale.quantity_sold,
            sale_price_cents: row.sale.sale_price_cents,
            total_revenue_cents: row.sale.total_revenue_cents,
            sale_date: row.sale.sale_date,
            remaining_stock: None,
            user_name: row.user_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SalesHistoryQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummaryResponse {
    pub period: String,
    pub total_revenue_cents: i64,
    pub total_transactions: i64,
    pub total_units_sold: i64,
    pub average_transaction_value_cents: i64,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sales", post(record_sale).get(sales_history))
        .route("/api/sales/summary", get(sales_summary))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/sales
/// Records a sale at the product's current selling price and reduces stock.
/// The sale is attributed to the authenticated caller.
async fn record_sale(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RecordSaleRequest>,
) -> Result<(StatusCode, Json<SaleResponse>), AppError> {
    info!("Recording sale for product: {}, quantity: {}", req.product_id, req.quantity_sold);

    if req.quantity_sold < 1 {
        return Err(AppError::ValidationError("Quantity sold must be at least 1".to_string()));
    }

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::AuthenticationError("Invalid token subject".to_string()))?;

    let product = state
        .product_repo
        .get_product(req.product_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", req.product_id)))?;

    if product.quantity < req.quantity_sold {
        return Err(AppError::ConflictError(format!(
            "Insufficient stock. Available: {}, Requested: {}",
            product.quantity, req.quantity_sold
        )));
    }

    let sale = Sale::new(product.id, user_id, req.quantity_sold, product.selling_price_cents);
    state.sale_repo.record_sale(&sale).await.map_err(AppError::internal)?;

    let updated = state
        .product_repo
        .adjust_quantity(product.id, -req.quantity_sold)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", product.id)))?;

    info!("Sale recorded successfully: {}", sale.id);

    Ok((
        StatusCode::CREATED,
        Json(SaleResponse {
            id: sale.id,
            product_id: product.id,
            product_name: product.name,
            product_category: product.category,
            quantity_sold: sale.quantity_sold,
            sale_price_cents: sale.sale_price_cents,
            total_revenue_cents: sale.total_revenue_cents,
            sale_date: sale.sale_date,
            remaining_stock: Some(updated.quantity),
            user_name: claims.name,
        }),
    ))
}

/// GET /api/sales
/// Full history, or restricted by `from`/`to` timestamps, newest first
async fn sales_history(
    State(state): State<AppState>,
    Query(query): Query<SalesHistoryQuery>,
) -> Result<Json<Vec<SaleResponse>>, AppError> {
    let result = match (query.from, query.to) {
        (Some(from), Some(to)) => state.sale_repo.list_sales_between(from, to).await,
        (Some(from), None) => state.sale_repo.list_sales_since(from).await,
        _ => state.sale_repo.list_sales().await,
    };

    let sales = result.map_err(AppError::internal)?;
    Ok(Json(sales.into_iter().map(SaleResponse::from).collect()))
}

/// GET /api/sales/summary
async fn sales_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SalesSummaryResponse>, AppError> {
    let period = Period::parse(query.period.as_deref().unwrap_or("week"));
    let start = period.start(Utc::now());

    let sales = state.sale_repo.list_sales_since(start).await.map_err(AppError::internal)?;
    let summary = summarize(period, &sales);

    Ok(Json(SalesSummaryResponse {
        period: summary.period,
        total_revenue_cents: summary.total_revenue_cents,
        total_transactions: summary.total_transactions,
        total_units_sold: summary.total_units_sold,
        average_transaction_value_cents: summary.average_transaction_value_cents,
    }))
}
