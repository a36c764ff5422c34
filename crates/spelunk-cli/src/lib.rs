//! spelunk command-line interface.
//!
pub mod options;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::net::TcpListener;
use tracing::info;

use spelunk_core::SnapshotRegistry;
use spelunk_error::{Error, Result};
use spelunk_render::ProcessRenderer;
use spelunk_server::{AppState, ServerConfig};

pub use options::{IgnoreOptions, RendererOptions, ServeOptions};

/// Options for running spelunk.
#[derive(Debug, Clone)]
pub struct SpelunkOptions {
    pub registry: PathBuf,
    pub serve: ServeOptions,
    pub renderer: RendererOptions,
    pub ignore: IgnoreOptions,
}

/// Load the registry snapshot and assemble the shared server state.
pub fn build_state(opts: &SpelunkOptions) -> Result<AppState> {
    let start = Instant::now();
    let registry = SnapshotRegistry::from_path(&opts.registry)?;
    info!(
        path = %opts.registry.display(),
        modules = registry.modules.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "registry loaded"
    );

    let renderer = ProcessRenderer::new(opts.renderer.renderer_config());
    info!(
        format = %opts.renderer.format,
        command = %renderer.config().display(),
        "renderer configured"
    );

    let config = ServerConfig {
        port: opts.serve.port,
        format: opts.renderer.format,
        views_dir: opts.serve.views_dir.clone(),
        base_options: opts.ignore.filter_options(),
    };
    AppState::new(Arc::new(registry), Arc::new(renderer), config)
}

/// Main entry point: serve until interrupted.
pub async fn run_main(opts: &SpelunkOptions) -> Result<()> {
    let state = build_state(opts)?;
    let app = spelunk_server::router(state);

    let addr = format!("{}:{}", opts.serve.host, opts.serve.port);
    let listener = TcpListener::bind(&addr).await.map_err(|err| {
        Error::from(err)
            .with_operation("serve::bind")
            .with_context("addr", addr.clone())
    })?;
    info!(%addr, "listening on http://{addr}/deps");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| Error::from(err).with_operation("serve::run"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
