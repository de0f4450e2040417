//! certdesk-server: reference participant API.
//!
//! Serves the collection the certdesk console talks to, using `axum` +
//! `tokio`. The roster lives in memory and is optionally persisted to a
//! JSON file after every successful change.
//!
//! Endpoints:
//! - GET    /health                    - Server status
//! - GET    /participants              - All participants, insertion order
//! - POST   /participants              - Add a participant (no password)
//! - PUT    /participants/{serial}     - Update, password in body
//! - DELETE /participants/{serial}     - Delete, `{ "password" }` body
//! - POST   /verify-password           - 200 if the password is right, else 401
//!
//! All responses use Content-Type: application/json.

mod error;
mod handlers;
pub mod roster;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use certdesk_core::{ErrorBody, Secret};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ServerError;
pub use roster::{Roster, RosterError};
pub use state::AppState;

use self::handlers::{
    handle_create, handle_delete, handle_health, handle_list, handle_not_found, handle_update,
    handle_verify,
};

/// Maximum request body size: 1 MB.
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> impl IntoResponse {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_password: Secret,
    pub data_file: Option<PathBuf>,
    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,
}

impl ServerConfig {
    pub fn new(port: u16, admin_password: Secret) -> Self {
        ServerConfig {
            port,
            admin_password,
            data_file: None,
            tls_cert: None,
            tls_key: None,
        }
    }
}

/// Build the router over shared state.
///
/// CORS is permissive: the API is meant to be called from a browser
/// dashboard on another origin.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/participants", get(handle_list).post(handle_create))
        .route(
            "/participants/{serial}",
            put(handle_update).delete(handle_delete),
        )
        .route("/verify-password", post(handle_verify))
        .fallback(handle_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C.
///
/// When TLS cert/key paths are provided (and the `tls` feature is on), the
/// server listens over HTTPS using `axum-server` with rustls.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::load(config.admin_password, config.data_file.clone()).await?);
    let records = state.roster.read().await.len();
    match &config.data_file {
        Some(path) => tracing::info!(records, path = %path.display(), "roster loaded"),
        None => tracing::info!("no data file configured; roster is in-memory only"),
    }

    let router = app(state);
    let addr = format!("0.0.0.0:{}", config.port);

    #[cfg(feature = "tls")]
    if let (Some(cert_path), Some(key_path)) = (&config.tls_cert, &config.tls_key) {
        let tls = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path).await?;
        let socket_addr: std::net::SocketAddr = addr.parse().map_err(|e| ServerError::Bind {
            addr: addr.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        })?;
        eprintln!("certdesk API listening on https://{}", addr);
        axum_server::bind_rustls(socket_addr, tls)
            .serve(router.into_make_service())
            .await?;
        return Ok(());
    }

    #[cfg(not(feature = "tls"))]
    if config.tls_cert.is_some() {
        tracing::warn!("built without the `tls` feature; ignoring --tls-cert/--tls-key");
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    eprintln!("certdesk API listening on http://{}", addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    eprintln!("\nServer shut down.");
    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    eprintln!("\nReceived shutdown signal...");
}
