//! HTTP surface for export and import.
//!
//! | route | auth | handler |
//! |---|---|---|
//! | `GET /health` | no | [`routes::health`] |
//! | `GET /export` | yes | [`routes::export_handler`] |
//! | `POST /import` | yes | [`routes::import_handler`] |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifedash::api::{serve, AppState};
//! use lifedash::db::db::Db;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let state = AppState::new(Db::open_in_memory()?.into_shared());
//! serve(state, "127.0.0.1:3030").await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod routes;

use crate::db::db::Database;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::{msg_error_anyhow, msg_info};
use anyhow::Result;
use auth::{Authenticator, TokenAuthenticator};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Largest accepted import body.
pub const MAX_IMPORT_BYTES: usize = 32 * 1024 * 1024;

/// Everything a request handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<dyn Authenticator>,
    pub config: Config,
}

impl AppState {
    /// State backed by the token authenticator over `db`.
    pub fn new(db: Database) -> Self {
        let auth = Arc::new(TokenAuthenticator::new(db.clone()));
        Self {
            db,
            auth,
            config: Config::default(),
        }
    }

    pub fn with_authenticator(mut self, auth: Arc<dyn Authenticator>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn clear_caches(&self) {
        self.auth.clear_cache();
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/export", get(routes::export_handler))
        .route("/import", post(routes::import_handler))
        .layer(DefaultBodyLimit::max(MAX_IMPORT_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `address` and serves until Ctrl+C.
pub async fn serve(state: AppState, address: &str) -> Result<()> {
    let addr: SocketAddr = address
        .parse()
        .map_err(|_| msg_error_anyhow!(Message::InvalidServerAddress(address.to_string())))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    msg_info!(Message::ServerListening(addr.to_string()));

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    msg_info!(Message::ServerStopped);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
