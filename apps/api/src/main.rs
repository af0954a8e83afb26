mod assets;
mod batch;
mod config;
mod db;
mod errors;
mod layout;
mod record;
mod render;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::AssetCatalog;
use crate::batch::BatchOrchestrator;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::layout::a4_two_column;
use crate::render::RenderContext;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgCvStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    if config.run_migrations {
        run_migrations(&db).await?;
    }
    let store = Arc::new(PgCvStore::new(db));

    // Static assets are resolved once; a missing header image is not fatal
    let catalog = AssetCatalog::new(&config.asset_dir);
    let header_image = catalog.load_image(&config.header_image_asset);
    let render = RenderContext::new(a4_two_column(), header_image);

    let orchestrator = BatchOrchestrator::new(
        store,
        render,
        config.max_concurrent_renders,
        &config.scratch_dir,
    );
    info!(
        "Batch orchestrator ready (max {} concurrent renders, scratch in {})",
        config.max_concurrent_renders,
        config.scratch_dir.display()
    );

    // Build router
    let app = build_router(AppState::new(orchestrator))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
