use std::net::SocketAddr;
use std::sync::Arc;

use docsum::{logger, AppState, AzureOpenAiProvider, DocumentSummaryService, ServiceConfig};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cfg = match ServiceConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = logger::init_logger(&cfg) {
        eprintln!("Failed to init logger: {err}");
        std::process::exit(1);
    }

    cfg.log_summary();

    if let Err(err) = run(cfg).await {
        error!("Server error: {err}");
        std::process::exit(1);
    }
}

async fn run(cfg: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = AzureOpenAiProvider::new(cfg.azure.clone())?;
    let service = DocumentSummaryService::new(Arc::new(provider));
    let state = AppState::new(service)
        .environment(cfg.environment)
        .max_text_length(cfg.max_text_length);

    let app = docsum::router(state);

    let addr = SocketAddr::new(cfg.host.parse()?, cfg.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
