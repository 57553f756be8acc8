use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use tower::util::ServiceExt;
use uuid::Uuid;

use shelfline_api::state::{AppState, AuthConfig};
use shelfline_catalog::{Product, ProductDraft};
use shelfline_core::identity::User;
use shelfline_core::repository::{
    InsightRepository, ProductRepository, RepoError, SaleRepository, UserRepository,
};
use shelfline_insight::{Insight, InsightNarrator, InsightWithProduct, Priority};
use shelfline_sales::{Sale, SaleWithProduct};
use shelfline_store::app_config::InsightsConfig;

// ============================================================================
// In-memory repositories
// ============================================================================

#[derive(Default)]
pub struct MemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn create_product(&self, product: &Product) -> Result<(), RepoError> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn get_product(&self, id: Uuid) -> Result<Option<Product>, RepoError> {
        Ok(self.products.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepoError> {
        let mut products = self.products.lock().unwrap().clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn list_by_category(&self, category: &str) -> Result<Vec<Product>, RepoError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn list_low_stock(&self) -> Result<Vec<Product>, RepoError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.quantity <= p.minimum_threshold)
            .cloned()
            .collect())
    }

    async fn search_by_name(&self, term: &str) -> Result<Vec<Product>, RepoError> {
        let needle = term.to_lowercase();
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>, RepoError> {
        let mut categories: Vec<String> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn count_low_stock(&self) -> Result<i64, RepoError> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.quantity <= p.minimum_threshold)
            .count() as i64)
    }

    async fn update_product(&self, id: Uuid, draft: &ProductDraft) -> Result<Option<Product>, RepoError> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = draft.name.clone();
        product.category = draft.category.clone();
        product.purchase_price_cents = draft.purchase_price_cents;
        product.selling_price_cents = draft.selling_price_cents;
        product.quantity = draft.quantity;
        product.minimum_threshold = draft.minimum_threshold;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn delete_product(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }

    async fn adjust_quantity(&self, id: Uuid, delta: i32) -> Result<Option<Product>, RepoError> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.quantity += delta;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    async fn set_quantity(&self, id: Uuid, quantity: i32) -> Result<Option<Product>, RepoError> {
        let mut products = self.products.lock().unwrap();
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.quantity = quantity;
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }
}

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepoError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, RepoError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.email == email))
    }
}

/// Joins sales against the product and user stores at read time, the way
/// the SQL repository does
pub struct MemorySaleRepository {
    sales: Mutex<Vec<Sale>>,
    products: Arc<MemoryProductRepository>,
    users: Arc<MemoryUserRepository>,
}

impl MemorySaleRepository {
    pub fn new(products: Arc<MemoryProductRepository>, users: Arc<MemoryUserRepository>) -> Self {
        Self {
            sales: Mutex::new(Vec::new()),
            products,
            users,
        }
    }

    fn joined(&self) -> Vec<SaleWithProduct> {
        let products = self.products.products.lock().unwrap();
        let users = self.users.users.lock().unwrap();
        let mut rows: Vec<SaleWithProduct> = self
            .sales
            .lock()
            .unwrap()
            .iter()
            .filter_map(|sale| {
                let product = products.iter().find(|p| p.id == sale.product_id)?;
                let user_name = users
                    .iter()
                    .find(|u| u.id == sale.user_id)
                    .map(|u| u.name.clone())
                    .unwrap_or_default();
                Some(SaleWithProduct {
                    sale: sale.clone(),
                    product_name: product.name.clone(),
                    product_category: product.category.clone(),
                    purchase_price_cents: product.purchase_price_cents,
                    selling_price_cents: product.selling_price_cents,
                    user_name,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.sale.sale_date.cmp(&a.sale.sale_date));
        rows
    }
}

#[async_trait]
impl SaleRepository for MemorySaleRepository {
    async fn record_sale(&self, sale: &Sale) -> Result<(), RepoError> {
        self.sales.lock().unwrap().push(sale.clone());
        Ok(())
    }

    async fn list_sales(&self) -> Result<Vec<SaleWithProduct>, RepoError> {
        Ok(self.joined())
    }

    async fn list_sales_since(&self, start: DateTime<Utc>) -> Result<Vec<SaleWithProduct>, RepoError> {
        Ok(self.joined().into_iter().filter(|s| s.sale.sale_date >= start).collect())
    }

    async fn list_sales_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleWithProduct>, RepoError> {
        Ok(self
            .joined()
            .into_iter()
            .filter(|s| s.sale.sale_date >= start && s.sale.sale_date <= end)
            .collect())
    }

    async fn units_sold_since(&self, product_id: Uuid, start: DateTime<Utc>) -> Result<i64, RepoError> {
        Ok(self
            .sales
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.product_id == product_id && s.sale_date >= start)
            .map(|s| s.quantity_sold as i64)
            .sum())
    }
}

pub struct MemoryInsightRepository {
    insights: Mutex<HashMap<Uuid, Insight>>,
    products: Arc<MemoryProductRepository>,
}

impl MemoryInsightRepository {
    pub fn new(products: Arc<MemoryProductRepository>) -> Self {
        Self {
            insights: Mutex::new(HashMap::new()),
            products,
        }
    }

    fn joined(&self) -> Vec<InsightWithProduct> {
        let products = self.products.products.lock().unwrap();
        self.insights
            .lock()
            .unwrap()
            .values()
            .filter_map(|insight| {
                let product = products.iter().find(|p| p.id == insight.product_id)?;
                Some(InsightWithProduct {
                    insight: insight.clone(),
                    product_name: product.name.clone(),
                    current_stock: product.quantity,
                })
            })
            .collect()
    }
}

#[async_trait]
impl InsightRepository for MemoryInsightRepository {
    async fn upsert_insight(&self, insight: &Insight) -> Result<(), RepoError> {
        self.insights.lock().unwrap().insert(insight.product_id, insight.clone());
        Ok(())
    }

    async fn list_insights(&self) -> Result<Vec<InsightWithProduct>, RepoError> {
        Ok(self.joined())
    }

    async fn list_by_priority(&self, priority: Priority) -> Result<Vec<InsightWithProduct>, RepoError> {
        Ok(self
            .joined()
            .into_iter()
            .filter(|i| i.insight.priority == priority)
            .collect())
    }
}

// ============================================================================
// Test harness
// ============================================================================

pub fn test_state() -> AppState {
    let products = Arc::new(MemoryProductRepository::default());
    let users = Arc::new(MemoryUserRepository::default());
    let sales = Arc::new(MemorySaleRepository::new(products.clone(), users.clone()));
    let insights = Arc::new(MemoryInsightRepository::new(products.clone()));

    AppState {
        product_repo: products,
        sale_repo: sales,
        user_repo: users,
        insight_repo: insights,
        narrator: Arc::new(InsightNarrator::new(None)),
        auth: AuthConfig {
            secret: "integration-test-secret".to_string(),
            expiration: 3600,
        },
        insights: InsightsConfig {
            analysis_window_days: 14,
            worker_hour_utc: 3,
            product_delay_ms: 0,
            api_key: None,
        },
    }
}

pub fn test_app() -> Router {
    shelfline_api::app(test_state())
}

/// Fire one request at the router and decode the JSON response
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build failed"),
        None => builder.body(Body::empty()).expect("request build failed"),
    };

    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// Register a fresh account and hand back its bearer token
pub async fn register_and_login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "hunter22",
            "name": "Test Clerk",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["token"].as_str().expect("token missing").to_string()
}
