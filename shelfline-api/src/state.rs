use std::sync::Arc;

use shelfline_core::repository::{InsightRepository, ProductRepository, SaleRepository, UserRepository};
use shelfline_insight::InsightNarrator;
use shelfline_store::app_config::InsightsConfig;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub product_repo: Arc<dyn ProductRepository>,
    pub sale_repo: Arc<dyn SaleRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub insight_repo: Arc<dyn InsightRepository>,
    pub narrator: Arc<InsightNarrator>,
    pub auth: AuthConfig,
    pub insights: InsightsConfig,
}
