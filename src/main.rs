use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use holiday_rental_web::cache::{start_cache_warmer, AppCache};
use holiday_rental_web::config::AppConfig;
use holiday_rental_web::{db, routes, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    telemetry::init(&config.telemetry).context("initialising tracing")?;

    let pool = db::connect(&config.database)
        .await
        .context("connecting to the database")?;
    db::migrate(&pool).await.context("running migrations")?;

    let cache = AppCache::new();
    tokio::spawn(start_cache_warmer(cache.clone(), pool.clone()));

    let addr = config.server.socket_addr()?;
    let state = AppState {
        db: pool,
        cache,
        config: Arc::new(config),
    };
    let environment = state.config.environment;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(?environment, %addr, "holiday rental service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
