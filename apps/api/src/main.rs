mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::screening::matcher::Matcher;
use crate::state::AppState;
use crate::storage::postgres::PgStore;

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

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    config
        .matching
        .validate()
        .context("invalid matching configuration")?;
    info!(
        "Matching: threshold {}, shortlist {}, baseline {} years, weights {}/{}",
        config.matching.minimum_score_threshold,
        config.matching.shortlist_size,
        config.matching.target_experience_years,
        config.matching.skill_weight,
        config.matching.experience_weight
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Model scoring is optional; without a key every resume is scored by the heuristic
    let matcher = Matcher::from_config(config.matching.clone(), config.anthropic_api_key.as_deref());

    let state = AppState {
        store: Arc::new(PgStore::new(db.clone())),
        db,
        config: config.clone(),
        matcher,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
