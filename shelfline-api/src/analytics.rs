use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shelfline_analytics::{
    category_distribution, period_figures, sales_trend, top_products, CategorySlice, PeriodFigures,
    ProductPerformance, TopProductsSort,
};
use shelfline_sales::Period;

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsQuery {
    pub limit: Option<usize>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPointResponse {
    pub date: String,
    pub sales_cents: i64,
    pub transactions: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrendResponse {
    pub period: String,
    pub data: Vec<TrendPointResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesResponse {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub total_revenue_cents: i64,
    pub total_units_sold: i64,
    pub sales_count: i64,
    pub profit_margin: f64,
}

impl From<ProductPerformance> for ProductSalesResponse {
    fn from(p: ProductPerformance) -> Self {
        ProductSalesResponse {
            product_id: p.product_id,
            product_name: p.product_name,
            category: p.category,
            total_revenue_cents: p.total_revenue_cents,
            total_units_sold: p.total_units_sold,
            sales_count: p.sales_count,
            profit_margin: p.profit_margin,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsResponse {
    pub products: Vec<ProductSalesResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDataResponse {
    pub category: String,
    pub total_revenue_cents: i64,
    pub total_products: i64,
    pub percentage: f64,
}

impl From<CategorySlice> for CategoryDataResponse {
    fn from(slice: CategorySlice) -> Self {
        CategoryDataResponse {
            category: slice.category,
            total_revenue_cents: slice.total_revenue_cents,
            total_products: slice.total_products,
            percentage: slice.percentage,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDistributionResponse {
    pub categories: Vec<CategoryDataResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummaryResponse {
    pub revenue_cents: i64,
    pub profit_cents: i64,
    pub transactions: i64,
}

impl From<PeriodFigures> for PeriodSummaryResponse {
    fn from(figures: PeriodFigures) -> Self {
        PeriodSummaryResponse {
            revenue_cents: figures.revenue_cents,
            profit_cents: figures.profit_cents,
            transactions: figures.transactions,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSummaryResponse {
    pub today: PeriodSummaryResponse,
    pub week: PeriodSummaryResponse,
    pub month: PeriodSummaryResponse,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/analytics/sales-trend", get(get_sales_trend))
        .route("/api/analytics/top-products", get(get_top_products))
        .route("/api/analytics/category-distribution", get(get_category_distribution))
        .route("/api/analytics/revenue-summary", get(get_revenue_summary))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/analytics/sales-trend
async fn get_sales_trend(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<SalesTrendResponse>, AppError> {
    let days = query.days.unwrap_or(7);
    let start = Utc::now() - Duration::days(days as i64);

    let sales = state.sale_repo.list_sales_since(start).await.map_err(AppError::internal)?;
    let trend = sales_trend(days, &sales);

    Ok(Json(SalesTrendResponse {
        period: trend.period,
        data: trend
            .data
            .into_iter()
            .map(|p| TrendPointResponse {
                date: p.date,
                sales_cents: p.sales_cents,
                transactions: p.transactions,
            })
            .collect(),
    }))
}

/// GET /api/analytics/top-products
async fn get_top_products(
    State(state): State<AppState>,
    Query(query): Query<TopProductsQuery>,
) -> Result<Json<TopProductsResponse>, AppError> {
    let limit = query.limit.unwrap_or(5);
    let sort_by = TopProductsSort::parse(query.sort_by.as_deref().unwrap_or("revenue"));

    let sales = state.sale_repo.list_sales().await.map_err(AppError::internal)?;
    let ranked = top_products(limit, sort_by, &sales);

    Ok(Json(TopProductsResponse {
        products: ranked.into_iter().map(ProductSalesResponse::from).collect(),
    }))
}

/// GET /api/analytics/category-distribution
async fn get_category_distribution(
    State(state): State<AppState>,
) -> Result<Json<CategoryDistributionResponse>, AppError> {
    let sales = state.sale_repo.list_sales().await.map_err(AppError::internal)?;
    let products = state.product_repo.list_products().await.map_err(AppError::internal)?;

    let slices = category_distribution(&sales, &products);

    Ok(Json(CategoryDistributionResponse {
        categories: slices.into_iter().map(CategoryDataResponse::from).collect(),
    }))
}

/// GET /api/analytics/revenue-summary
async fn get_revenue_summary(State(state): State<AppState>) -> Result<Json<RevenueSummaryResponse>, AppError> {
    let now = Utc::now();

    let today = state
        .sale_repo
        .list_sales_since(Period::Today.start(now))
        .await
        .map_err(AppError::internal)?;
    let week = state
        .sale_repo
        .list_sales_since(Period::Week.start(now))
        .await
        .map_err(AppError::internal)?;
    let month = state
        .sale_repo
        .list_sales_since(Period::Month.start(now))
        .await
        .map_err(AppError::internal)?;

    Ok(Json(RevenueSummaryResponse {
        today: period_figures(&today).into(),
        week: period_figures(&week).into(),
        month: period_figures(&month).into(),
    }))
}
