use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::ConfigService;
use crate::infrastructure::llm_clients::{GeminiClient, LLMClient};
use crate::interfaces::http::{start_server, AppState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub async fn run() -> std::io::Result<()> {
    // A missing .env file is normal outside local development.
    let dotenv = dotenvy::dotenv();

    init_tracing();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = ConfigService::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    if config.gemini.credential().is_none() {
        warn!("GEMINI_API_KEY is not set; evaluation and phrase requests will fail until it is configured");
    }
    info!(
        model = %config.gemini.model,
        timeout_secs = config.gemini.request_timeout_secs,
        "Upstream configured"
    );

    let gemini = GeminiClient::new().map_err(|err| {
        error!(error = %err, "Failed to initialize Gemini client");
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;
    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(gemini);
    let state = AppState::new(config, llm_client);

    start_server(state)?.await
}
