//! Referee HTTP server.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use referee::adapters::ai::{GeminiConfig, GeminiProvider, MockAIProvider};
use referee::adapters::analysis::{LlmOptionComparator, LlmParameterSynthesizer};
use referee::adapters::http::{referee_router, RefereeAppState};
use referee::adapters::storage::InMemorySessionRepository;
use referee::config::{AiConfig, AiProvider, AppConfig, ServerConfig, ValidationError};
use referee::ports::AIProvider as AIProviderPort;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let provider = build_provider(&config.ai)?;
    let repository = Arc::new(
        InMemorySessionRepository::new().with_idle_ttl(config.server.session_idle_ttl()),
    );
    spawn_session_sweeper(repository.clone(), config.server.session_sweep_interval());

    let state = RefereeAppState::new(
        Arc::new(LlmParameterSynthesizer::new(
            provider.clone(),
            config.ai.setup_model.clone(),
        )),
        Arc::new(
            LlmOptionComparator::new(provider, config.ai.analysis_model.clone())
                .with_limits(config.ai.comparison_limits()),
        ),
        repository,
    );

    let app = build_app(state, &config.server);
    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        provider = ?config.ai.provider,
        "Referee listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(server.log_level.as_str()));

    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn AIProviderPort>, Box<dyn Error>> {
    match ai.provider {
        AiProvider::Mock => {
            tracing::warn!("Using mock AI provider; suggestions and comparisons are placeholders");
            Ok(Arc::new(MockAIProvider::new()))
        }
        AiProvider::Gemini => {
            let key = ai
                .gemini_api_key
                .as_ref()
                .ok_or(ValidationError::MissingRequired("GEMINI_API_KEY"))?;
            let gemini = GeminiConfig::new(key.expose_secret().clone())
                .with_base_url(ai.base_url.clone())
                .with_model(ai.analysis_model.clone())
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            Ok(Arc::new(GeminiProvider::new(gemini)?))
        }
    }
}

/// Periodically drops sessions past their idle TTL.
fn spawn_session_sweeper(repository: Arc<InMemorySessionRepository>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            repository.evict_idle().await;
        }
    });
}

fn build_app(state: RefereeAppState, server: &ServerConfig) -> Router {
    referee_router()
        .with_state(state)
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() && !server.is_production() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
