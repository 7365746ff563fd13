use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::api::{build_router, AppState};
use crate::config::Config;
use crate::error::AppError;
use crate::utils::logging::{log_shutdown, log_startup};

/// Application root: shared state plus the HTTP server
pub struct App {
    state: Arc<AppState>,
}

impl App {
    /// Prepares directories, templates and converters
    pub async fn initialize(config: Config) -> Result<Self> {
        let state = AppState::initialize(config)
            .await
            .context("failed to initialise application state")?;

        log_startup(&state.config, state.sessions.template_names().len());

        Ok(Self {
            state: Arc::new(state),
        })
    }

    pub fn state(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Serves until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let address = self
            .state
            .config
            .socket_addr()
            .map_err(AppError::from)?;
        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("failed to bind {}", address))?;
        info!("listening on {}", listener.local_addr()?);

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        log_shutdown();
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
