//! Main Entrypoint for the Course Advisor API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Building the routing pipeline from the curriculum file and assistant profile.
//! 3. Initializing shared services (the LLM client and the website scraper).
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use advisor_api::{config::Config, router::create_router, state::AppState};
use advisor_core::{
    assistant::{Assistant, AssistantConfig},
    curriculum::FileCurriculumStore,
    llm_client::OpenAICompatibleClient,
    session::SessionStore,
    website::WebsiteScraper,
};
use anyhow::Context;
use async_openai::config::OpenAIConfig;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Build the Routing Pipeline ---
    let assistant_config = match &config.assistant_profile_path {
        Some(path) => {
            info!(path = %path.display(), "Loading assistant profile.");
            AssistantConfig::from_file(path)?
        }
        None => AssistantConfig::default(),
    };
    let store = Arc::new(FileCurriculumStore::new(config.curriculum_path.clone()));
    let assistant = Arc::new(Assistant::new(assistant_config, store));

    // --- 4. Initialize Shared Services ---
    let api_key = config
        .api_key()
        .context("No API key configured for the selected provider")?;
    info!(provider = ?config.provider, "Using chat-completion provider.");
    let openai_config = OpenAIConfig::new()
        .with_api_key(api_key)
        .with_api_base(config.provider.api_base());
    let llm_client = Arc::new(OpenAICompatibleClient::new(
        openai_config,
        config.chat_model.clone(),
    ));
    let website = Arc::new(WebsiteScraper::new(
        config.website_url.clone(),
        config.website_timeout,
    )?);

    let app_state = Arc::new(AppState::new(
        assistant,
        llm_client,
        website,
        SessionStore::with_limits(config.session_idle_timeout, config.max_sessions),
        config.rate_limit_window,
        config.chat_temperature,
    ));

    // Idle sessions and stale rate-limiter entries are dropped in the background.
    let sweeper_state = app_state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweeper_state.sweep().await;
        }
    });

    // --- 5. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 6. Start Server ---
    info!(
        provider = ?config.provider,
        model = %config.chat_model,
        curriculum = %config.curriculum_path.display(),
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
