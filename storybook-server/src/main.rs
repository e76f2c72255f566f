use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use storybook_server::config::ServerConfig;
use storybook_server::http::{build_router, ApiState};
use storybook_server::vendor::ElevenLabsVendor;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "storybook-server", about = "Narration proxy for the storybook UI")]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Directory of static UI assets
    #[arg(long, default_value = "public")]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let args = Args::parse();
    let config = ServerConfig::from_env();
    if config.api_key.is_none() {
        warn!("ELEVENLABS_API_KEY is not set; narration requests will answer 400");
    }

    let vendor = ElevenLabsVendor::new(&config)
        .context("Failed to create ElevenLabs client")?;
    let state = ApiState {
        config: Arc::new(config),
        vendor: Arc::new(vendor),
    };

    let static_dir = args.static_dir.is_dir().then(|| args.static_dir.clone());
    if static_dir.is_none() {
        warn!(
            "Static asset directory {} not found; serving API routes only",
            args.static_dir.display()
        );
    }
    let app = build_router(state, static_dir);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Narration proxy listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
