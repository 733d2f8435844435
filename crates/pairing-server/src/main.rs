//! Project Pairing Server
//!
//! Serves solo/team project preference predictions and dataset summaries.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use pairing_core::Features;
use pairing_server::cli::{Cli, Commands};
use pairing_server::{create_router, state, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!("Model: {}", config.model_path.display());
    info!("Dataset: {}", config.dataset_path.display());

    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Summarize => {
            let state = AppState::new(config)?;
            let summary = state::execute_summary(&state).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Commands::Predict {
            introversion_extraversion,
            risk_taking,
            club,
            weekly_hobby_hours,
        } => {
            let state = AppState::new(config)?;
            let features =
                Features::new(introversion_extraversion, risk_taking, club, weekly_hobby_hours);
            let prediction = state::classify(&state, &features).await?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
            Ok(())
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    info!("Starting Project Pairing server");

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;

    // Load the classifier once; every request shares it
    let state = AppState::new(config)?.with_metrics(metrics_handle);
    info!("Application state initialized successfully");

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("pairing=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pairing=info,tower_http=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "pairing_predictions_total",
        "Total number of predictions served by label"
    );
    metrics::describe_counter!(
        "pairing_dataset_append_failures_total",
        "Submissions that could not be written to the dataset"
    );
    metrics::describe_counter!(
        "pairing_summary_requests_total",
        "Total number of dataset summaries computed"
    );
    metrics::describe_histogram!(
        "pairing_inference_latency_us",
        metrics::Unit::Microseconds,
        "Classifier latency in microseconds by mode"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
