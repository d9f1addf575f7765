use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod state;

use newsfeed_search::config;
use newsfeed_search::search::{MemorySessionStore, SearchGateway};
use newsfeed_search::storage::NewsIndex;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsfeed_search=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration / 加载配置
    config::init_config()?;
    let app_config = config::config();
    tracing::info!("Server will listen on {}:{}", app_config.server.host, app_config.server.port);

    // Create data directory if not exists / 创建数据目录
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| app_config.get_database_url());

    // Storage probes FTS5 once here; the gateway keeps that choice / 启动时探测全文索引
    let index = NewsIndex::open(&database_url, app_config.search.fts_enabled).await?;
    let sessions = MemorySessionStore::new(
        app_config.search.session_capacity,
        app_config.search.session_ttl_secs,
    );
    let gateway = SearchGateway::new(Arc::new(index), Arc::new(sessions));

    let state = Arc::new(AppState::new(gateway));

    let app = Router::new()
        .route("/api/health", get(api::server::health_check))
        .route("/api/search", get(api::search::search))
        .route("/api/search/session", post(api::search::create_session))
        .route("/api/search/session/:key", get(api::search::session_page))
        .route("/api/news/latest", get(api::news::latest))
        .route("/api/news/stats", get(api::news::stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let bind_addr = app_config.get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;

    state.index().close().await;
    Ok(())
}
