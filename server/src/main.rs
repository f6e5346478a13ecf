mod analyzer;
mod config;
mod routes;
mod stats;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::analyzer::{Analyzer, OpenAiClient};
use crate::config::Config;
use crate::stats::{MlbClient, StatsService, TtlCache};

#[derive(Parser)]
#[command(name = "linedrive", about = "Line Drive — MLB player stats and AI analysis API")]
struct Cli {
    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,

    /// Load config from a specific .env file
    #[arg(long)]
    config_file: Option<String>,
}

/// Shared application state passed to all route handlers via Axum's State
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<StatsService<MlbClient>>,
    pub analyzer: Arc<Analyzer<OpenAiClient>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env_file(cli.config_file.as_deref())?;
    let port = cli.port.unwrap_or(config.port);

    let openai = OpenAiClient::new(&config.openai_api_key, &config.openai_model);
    if openai.is_configured() {
        info!("Completion client configured (model={})", config.openai_model);
    } else {
        warn!("OPENAI_API_KEY not set — analysis requests will return degraded text");
    }

    let mlb = MlbClient::new(&config.mlb_api_base);
    let cache = TtlCache::new(chrono::Duration::minutes(config.cache_ttl_minutes));

    let state = AppState {
        stats: Arc::new(StatsService::new(mlb, Box::new(cache))),
        analyzer: Arc::new(Analyzer::new(openai)),
    };

    let cors = if config.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origin: HeaderValue = config
            .cors_origin
            .parse()
            .map_err(|_| anyhow::anyhow!("CORS_ORIGIN is not a valid origin"))?;
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/analyze/:player_name", get(routes::analyze::analyze_player))
        .route("/search/:query", get(routes::search::search_players))
        .route("/player/:player1/:player2", get(routes::compare::compare_players))
        .route("/team/:team_name/roster", get(routes::roster::team_roster))
        .route("/ask", get(routes::ask::ask_question))
        .route("/health", get(routes::health::health))
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Line Drive AI listening on {}", addr);
    info!("Routes:");
    info!("  GET  /");
    info!("  GET  /analyze/{{player_name}}");
    info!("  GET  /search/{{query}}");
    info!("  GET  /player/{{player1}}/{{player2}}");
    info!("  GET  /team/{{team_name}}/roster");
    info!("  GET  /ask?question=...");
    info!("  GET  /health");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
