use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nocturne::api::routes::build_router;
use nocturne::api::state::AppState;
use nocturne::auth::TokenSigner;
use nocturne::config::AppConfig;
use nocturne::storage::{RecordStore, StorageConfig};
use nocturne::tips::{OllamaBackend, TipBackend, TipGenerator};

#[derive(Parser)]
#[command(name = "nocturne")]
#[command(about = "Personal sleep tracker with AI-generated sleep hygiene tips")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting nocturne v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let mut config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        tracing::debug!("No config file at {:?}, using defaults", config_path);
        AppConfig::default()
    };

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Ok(secret) = std::env::var("NOCTURNE_TOKEN_SECRET") {
        config.auth.token_secret = secret;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let store = RecordStore::open(StorageConfig::new(config.data_dir.clone()))?;
            let backend = select_backend(&config);

            let state = AppState {
                store: Arc::new(store),
                tips: Arc::new(TipGenerator::new(backend)),
                signer: Arc::new(TokenSigner::new(
                    config.auth.token_secret.clone(),
                    config.auth.token_ttl_minutes,
                )),
            };

            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Select the best available AI backend.
///
/// When the `remote-ai` feature is active, the configured backend is
/// "anthropic", and `ANTHROPIC_API_KEY` is set, uses AnthropicBackend.
/// Otherwise falls back to OllamaBackend.
fn select_backend(config: &AppConfig) -> Arc<dyn TipBackend> {
    #[cfg(feature = "remote-ai")]
    {
        if config.ai.backend == "anthropic" {
            if let Ok(api_key) = std::env::var("ANTHROPIC_API_KEY") {
                tracing::info!("Using Anthropic backend ({})", config.ai.model);
                return Arc::new(nocturne::tips::AnthropicBackend::new(
                    api_key,
                    config.ai.model.clone(),
                    config.ai.timeout_seconds,
                ));
            }
            tracing::warn!("ANTHROPIC_API_KEY not set, falling back to Ollama");
        }
    }

    tracing::info!("Using Ollama backend ({})", config.ai.model);
    Arc::new(OllamaBackend::new(
        config.ai.base_url.clone(),
        config.ai.model.clone(),
        config.ai.timeout_seconds,
    ))
}
