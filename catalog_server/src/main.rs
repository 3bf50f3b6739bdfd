//! Catalog server: opens the store, seeds it, then serves the demon API.
//!
//! Run from repo root: `cargo run -p catalog-server`

use demon_catalog::{app_router, from_env, load_dir, AppState, RecordStore};
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("demon_catalog=info,catalog_server=info,tower_http=info")),
        )
        .init();

    let config = from_env()?;

    // No storage, no service.
    let store = RecordStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;
    tracing::info!(database = %config.database_url, "store ready");

    // Seeding finishes before the listener exists, so no request sees a partial table.
    let report = load_dir(&store, &config.seed_dir).await;
    tracing::info!(
        dir = %config.seed_dir.display(),
        files_loaded = report.files_loaded,
        files_failed = report.files_failed,
        inserted = report.inserted,
        skipped = report.skipped,
        "seeding complete"
    );

    let state = AppState::new(store, config.max_page_size);
    let app = app_router(state, &config);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;
    Ok(())
}
