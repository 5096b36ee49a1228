use anyhow::Context;
use clap::Parser;

use cockpin_server::{Config, LocationStore, logging, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init_logging(config.log_level());

    let store = LocationStore::open(&config.data_file, &config.image_dir)
        .context("failed to open location store")?;
    let images = store.image_dir().to_path_buf();

    let app = router(store, config.router_options());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("bind failed on {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        addr = %addr,
        data_file = %config.data_file.display(),
        image_dir = %images.display(),
        debug = config.debug,
        max_body_bytes = config.max_body_bytes,
        "server running at http://{addr}"
    );
    if config.debug {
        tracing::warn!("debug mode: internal error details are returned to clients");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
