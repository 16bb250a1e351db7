//! Chat service binary.
//!
//! Reads `.env` before parsing arguments so `GEMINI_API_KEY` can live there.

use anyhow::{Result, bail};
use chatbot_server::gemini::{DEFAULT_GEMINI_URL, DEFAULT_MODEL, GeminiClient};
use chatbot_server::{AppState, router};
use clap::Parser;
use tracing::info;

/// CLI arguments for the chat service.
#[derive(Parser, Debug)]
#[command(name = "chatbot-server", version, about = "Chat service backed by the Gemini API")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini model name.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the Gemini API.
    #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_URL)]
    gemini_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,chatbot_server=debug")),
        )
        .init();

    let args = Args::parse();

    let Some(api_key) = args.gemini_api_key.filter(|key| !key.trim().is_empty()) else {
        bail!("GEMINI_API_KEY environment variable not set. Please check your .env file.");
    };

    let state = AppState {
        gemini: GeminiClient::new(&args.gemini_url, &args.model, &api_key),
    };

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %listener.local_addr()?, model = %args.model, "chat service listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
