mod analysis;
mod config;
mod errors;
mod feedback;
mod llm_client;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::vocabulary::SkillVocabulary;
use crate::analysis::Analyzer;
use crate::config::Config;
use crate::feedback::FeedbackGenerator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Compile the skill vocabulary once; every component shares it
    let vocabulary =
        Arc::new(SkillVocabulary::standard().context("Failed to build skill vocabulary")?);
    info!(skills = vocabulary.len(), "Skill vocabulary compiled");

    let analyzer = Arc::new(Analyzer::new(vocabulary, config.thresholds.clone())?);

    // Feedback provider (template unless AI_PROVIDER selects one with a key)
    let feedback = Arc::new(FeedbackGenerator::from_config(&config)?);
    info!(
        ai_provider = %config.ai_provider,
        provider = feedback.provider_name(),
        timeout_secs = config.feedback_timeout.as_secs(),
        "Feedback generator initialized"
    );

    let state = AppState {
        config: config.clone(),
        analyzer,
        feedback,
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
