//! hotnot web: a shared markdown board where visitors comment on topics and
//! rate them Hot, Not or Shrug.
//!
//! Visitors are identified by a hash of their network address. Everything is
//! kept as plain files under the data directory.

mod config;
mod error;
mod pages;
mod routes;

use std::net::SocketAddr;

use clap::Parser;
use hotnot_board::Board;
use tracing::info;

use crate::config::Config;

#[tokio::main]
async fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hotnot_web=info,hotnot_board=info".into()),
        )
        .init();

    let config = Config::parse();

    let board = Board::open(config.board_config());
    let router = routes::create_router(board, &config.images_dir);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .map_err(|e| miette::miette!("failed to bind {}: {}", config.listen, e))?;

    info!(
        listen = %config.listen,
        data_dir = %config.data_dir.display(),
        "hotnot-web started"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| miette::miette!("server error: {}", e))?;

    info!("hotnot-web stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
