//! Ledgermatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use ledgermatch::config::Config;
use ledgermatch::embedding::{ContactEncoder, EncoderConfig, EncoderHandle};
use ledgermatch::gateway::{HandlerState, create_router_with_state};
use ledgermatch::ingest::ingest_csv;
use ledgermatch::store::{InvoiceStore, MemoryStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("ingest") {
        let csv_path = args
            .get(2)
            .context("usage: ledgermatch ingest <invoices.csv>")?;
        return run_ingest(&config, Path::new(csv_path));
    }

    serve(config).await
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Ledgermatch starting"
    );

    let store = match MemoryStore::load(&config.store_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!("Failed to load invoice snapshot: {}. Starting empty.", e);
            MemoryStore::new()
        }
    };
    tracing::info!(invoices = store.count(), "Invoice store ready");

    let encoder_handle = Arc::new(EncoderHandle::new());

    // Model loading can take a while; serve /healthz and /ready in the
    // meantime and flip the handle when the encoder is in.
    let loader_handle = encoder_handle.clone();
    let encoder_config = encoder_config_from(&config);
    tokio::task::spawn_blocking(move || match ContactEncoder::load(encoder_config) {
        Ok(encoder) => loader_handle.install(encoder),
        Err(e) => tracing::error!("Failed to load contact encoder: {}", e),
    });

    let state = HandlerState::new(Arc::new(store), encoder_handle);
    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Ledgermatch shutdown complete");
    Ok(())
}

fn run_ingest(config: &Config, csv_path: &Path) -> anyhow::Result<()> {
    let encoder = ContactEncoder::load(encoder_config_from(config))?;
    let store = MemoryStore::new();

    let report = ingest_csv(csv_path, &encoder, &store, config.ingest_batch_size)?;
    store.persist(&config.store_path)?;

    tracing::info!(
        inserted = report.inserted,
        unique_contacts = report.unique_contacts,
        snapshot = %config.store_path.display(),
        "Ingestion finished"
    );

    if let Some((min, max)) = report.date_range {
        tracing::info!(from = %min, to = %max, "Invoice date range");
    }

    Ok(())
}

fn encoder_config_from(config: &Config) -> EncoderConfig {
    match &config.model_dir {
        Some(dir) => EncoderConfig::new(dir.clone()),
        None => {
            tracing::warn!("No LEDGERMATCH_MODEL_DIR configured, running encoder in stub mode");
            EncoderConfig::stub()
        }
    }
}

fn run_health_check() -> i32 {
    let port = std::env::var("LEDGERMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
