mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;
mod translation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{PgCredentialPool, PgDocumentStore};
use crate::translation::pipeline::Translator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Translator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_api_url.clone())?;
    info!(
        "LLM client initialized (primary: {}, fallback: {})",
        config.primary_model, config.fallback_model
    );

    let translator = Translator::new(
        Arc::new(llm),
        Arc::new(PgCredentialPool::new(db.clone())),
        config.model_pair(),
        config.retry_policy(),
        config.credential_service.clone(),
    );
    info!(
        "Translation retries: {} (delay unit {}ms)",
        config.max_retries, config.retry_delay_ms
    );

    // Build app state
    let state = AppState {
        documents: Arc::new(PgDocumentStore::new(db)),
        translator: Arc::new(translator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins before public deployment

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
