use anyhow::{Context, Result};
use clap::Parser;
use scribe_live::{config, create_router, AppState, Config, Coordinator, GeminiSummarizer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Live meeting transcription relay with end-of-session summaries
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file path (extension optional)
    #[arg(long, default_value = "config/scribe-live")]
    config: String,

    /// Override the HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Local runs keep GEMINI_API_KEY in .env
    match config::load_dotenv(".env") {
        Ok(true) => info!("Loaded environment from .env"),
        Ok(false) => {}
        Err(e) => warn!("Ignoring .env: {:#}", e),
    }

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        cfg.service.http.bind = bind;
    }
    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Summarizer: {} via {}",
        cfg.summarizer.model, cfg.summarizer.base_url
    );

    let summarizer = Arc::new(GeminiSummarizer::new(&cfg.summarizer)?);
    let (coordinator, coordinator_task) = Coordinator::spawn(summarizer);
    let app = create_router(AppState::new(coordinator.clone()));

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("> Ready on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    coordinator.shutdown()?;

    // In-flight summaries are still delivered, bounded by the provider timeout
    let drain = Duration::from_secs(cfg.summarizer.timeout_secs);
    match tokio::time::timeout(drain, coordinator_task).await {
        Ok(joined) => joined.context("Coordinator task panicked")?,
        Err(_) => warn!("Coordinator still busy after {:?}, exiting anyway", drain),
    }

    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
