//! `biblib serve`.

use biblib_api::{AppState, build_router, serve, shutdown_signal};
use tokio::net::TcpListener;

use crate::config::BiblibConfig;
use crate::{Error, Result};

/// Connects the store, binds, and serves until Ctrl-C.
pub async fn cmd_serve(config: &BiblibConfig, bind: Option<&str>) -> Result<()> {
    let store = biblib_storage::connect(&config.store_config()).await?;
    store.health_check().await?;
    tracing::info!(backend = store.backend_name(), "storage ready");

    let app = build_router(AppState::new(store), config.auth_config()?);

    let addr = bind.unwrap_or(&config.server.bind);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::io_with_path(e, addr))?;
    serve(listener, app, shutdown_signal())
        .await
        .map_err(|e| Error::io_with_path(e, addr))?;

    tracing::info!("server stopped");
    Ok(())
}
