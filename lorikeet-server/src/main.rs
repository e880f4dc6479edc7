//! lorikeet-server - HTTP transcription service

use clap::Parser;
use eyre::{Result, WrapErr};
use lorikeet_server::config::ServerConfig;
use lorikeet_server::lifecycle::{self, Lifecycle};
use lorikeet_server::routes;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::parse();

    let lifecycle = Arc::new(Lifecycle::new());

    // Requests observe the loading state until this task finishes
    let loader = Arc::clone(&lifecycle);
    let model_dir = config.model_dir.clone();
    tokio::task::spawn_blocking(move || lifecycle::load_from_dir(&loader, &model_dir));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, routes::router(lifecycle))
        .await
        .wrap_err("server error")
}
