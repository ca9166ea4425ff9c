use crate::api;
use anyhow::{Context, Result};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::shared::{load_serve_cfg, open_desk};

pub(super) async fn run() -> Result<()> {
    let cfg = load_serve_cfg()?;
    info!("Serve config: {cfg}");

    let desk = Arc::new(open_desk(cfg.db_path.as_deref())?);
    info!("Desk: {desk}");

    let app = api::create_router(desk).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    info!("Triage API listening on http://{}", cfg.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for ctrl-c: {e}");
            }
            info!("Shutting down.");
        })
        .await?;

    Ok(())
}
