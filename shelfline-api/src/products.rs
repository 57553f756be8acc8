use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shelfline_catalog::{Product, ProductDraft, StockStatus};

use crate::{error::AppError, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    pub category: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i32,
    pub minimum_threshold: Option<i32>,
}

impl ProductRequest {
    fn into_draft(self) -> ProductDraft {
        ProductDraft {
            name: self.name,
            category: self.category,
            purchase_price_cents: self.purchase_price_cents,
            selling_price_cents: self.selling_price_cents,
            quantity: self.quantity,
            minimum_threshold: self.minimum_threshold.unwrap_or(10),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub purchase_price_cents: i64,
    pub selling_price_cents: i64,
    pub quantity: i32,
    pub minimum_threshold: i32,
    pub profit_margin: f64,
    pub stock_status: StockStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        ProductResponse {
            profit_margin: product.profit_margin(),
            stock_status: product.stock_status(),
            id: product.id,
            name: product.name,
            category: product.category,
            purchase_price_cents: product.purchase_price_cents,
            selling_price_cents: product.selling_price_cents,
            quantity: product.quantity,
            minimum_threshold: product.minimum_threshold,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub category: Option<String>,
    pub low_stock: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StockAdjustRequest {
    pub quantity: i32,
    pub action: Option<String>,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/categories", get(list_categories))
        .route("/api/products/stats", get(product_stats))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/{id}/stock", patch(update_stock))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/products
/// Optional filters: search term, category, low stock only
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let result = if let Some(term) = query.search.filter(|s| !s.is_empty()) {
        state.product_repo.search_by_name(&term).await
    } else if let Some(category) = query.category.filter(|c| !c.is_empty()) {
        state.product_repo.list_by_category(&category).await
    } else if query.low_stock == Some(true) {
        state.product_repo.list_low_stock().await
    } else {
        state.product_repo.list_products().await
    };

    let products = result.map_err(AppError::internal)?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// GET /api/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .product_repo
        .get_product(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", id)))?;

    Ok(Json(product.into()))
}

/// POST /api/products
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    info!("Creating new product: {}", req.name);

    let draft = req.into_draft();
    draft.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

    let product = draft.into_product();
    state.product_repo.create_product(&product).await.map_err(AppError::internal)?;

    info!("Product created successfully with id: {}", product.id);
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// PUT /api/products/{id}
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    info!("Updating product with id: {}", id);

    let draft = req.into_draft();
    draft.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;

    let product = state
        .product_repo
        .update_product(id, &draft)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", id)))?;

    Ok(Json(product.into()))
}

/// DELETE /api/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    info!("Deleting product with id: {}", id);

    let deleted = state.product_repo.delete_product(id).await.map_err(AppError::internal)?;
    if !deleted {
        return Err(AppError::NotFoundError(format!("Product not found with id: {}", id)));
    }

    Ok(Json(json!({
        "message": "Product deleted successfully",
        "id": id.to_string(),
    })))
}

/// GET /api/products/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let categories = state.product_repo.list_categories().await.map_err(AppError::internal)?;
    Ok(Json(categories))
}

/// GET /api/products/stats
async fn product_stats(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let total_products = state.product_repo.list_products().await.map_err(AppError::internal)?.len();
    let low_stock_count = state.product_repo.count_low_stock().await.map_err(AppError::internal)?;
    let categories = state.product_repo.list_categories().await.map_err(AppError::internal)?.len();

    Ok(Json(json!({
        "totalProducts": total_products,
        "lowStockCount": low_stock_count,
        "categories": categories,
    })))
}

/// PATCH /api/products/{id}/stock
/// Adjusts relatively for `increase`/`decrease`, otherwise sets the
/// absolute quantity
async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<StockAdjustRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    info!("Adjusting stock for product id: {}", id);

    if req.quantity < 0 {
        return Err(AppError::ValidationError("Quantity cannot be negative".to_string()));
    }

    let result = match req.action.as_deref() {
        Some("increase") => state.product_repo.adjust_quantity(id, req.quantity).await,
        Some("decrease") => {
            let product = state
                .product_repo
                .get_product(id)
                .await
                .map_err(AppError::internal)?
                .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", id)))?;

            if product.quantity < req.quantity {
                return Err(AppError::ConflictError(format!(
                    "Insufficient stock. Available: {}, Requested: {}",
                    product.quantity, req.quantity
                )));
            }

            state.product_repo.adjust_quantity(id, -req.quantity).await
        }
        _ => state.product_repo.set_quantity(id, req.quantity).await,
    };

    let updated = result
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Product not found with id: {}", id)))?;

    Ok(Json(updated.into()))
}
