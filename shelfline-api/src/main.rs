use std::net::SocketAddr;
use std::sync::Arc;

use shelfline_api::{app, state::{AppState, AuthConfig}, worker};
use shelfline_insight::InsightNarrator;
use shelfline_store::{
    DbClient, PostgresInsightRepository, PostgresProductRepository, PostgresSaleRepository,
    PostgresUserRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shelfline_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = shelfline_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Shelfline API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to database");
    db.migrate().await.expect("Failed to run migrations");

    let app_state = AppState {
        product_repo: Arc::new(PostgresProductRepository::new(db.pool.clone())),
        sale_repo: Arc::new(PostgresSaleRepository::new(db.pool.clone())),
        user_repo: Arc::new(PostgresUserRepository::new(db.pool.clone())),
        insight_repo: Arc::new(PostgresInsightRepository::new(db.pool.clone())),
        narrator: Arc::new(InsightNarrator::new(config.insights.api_key.clone())),
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
        insights: config.insights.clone(),
    };

    // Daily insight regeneration
    tokio::spawn(worker::start_insight_worker(app_state.clone()));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
