use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tubeshelf_http::{AppState, create_router};

use crate::{build_client, get_region, open_history};

pub(crate) async fn run(port: u16, host: String, static_dir: PathBuf) -> Result<()> {
    let client = build_client()?;
    tracing::info!(
        keys = client.fetcher().pool().size(),
        base_url = client.fetcher().base_url(),
        "video client ready"
    );

    let history = open_history()?;
    tracing::info!(entries = history.len(), "watch history loaded");

    if !static_dir.join("index.html").is_file() {
        tracing::warn!("{} has no index.html, the front end will 404", static_dir.display());
    }

    let state = Arc::new(AppState::new(client, history, get_region()));
    let router = create_router(state, &static_dir);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
