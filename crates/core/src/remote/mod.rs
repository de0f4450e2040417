//! The remote participant API as seen by the console.
//!
//! [`Remote`] is the seam between the sync workflow and the network.
//! Two implementations ship with the crate:
//! - [`http::HttpRemote`] talks JSON over HTTP (feature `http`)
//! - [`memory::MemoryRemote`] keeps everything in process, for tests and demos

#[cfg(feature = "http")]
pub mod http;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::participant::Participant;
use crate::secret::Secret;

// ──────────────────────────────────────────────
// Wire types
// ──────────────────────────────────────────────

/// PUT body: the participant fields plus the admin password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBody {
    #[serde(flatten)]
    pub record: Participant,
    pub password: Secret,
}

/// `{"message": ...}` returned by successful mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// `{"error": ...}` returned by failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ──────────────────────────────────────────────
// RemoteError
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// No HTTP response at all (connection refused, DNS, reset, timeout).
    #[error("could not reach the server: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose body could not be understood.
    #[error("unexpected response from the server: {0}")]
    Decode(String),

    /// The client itself is misconfigured (bad base URL).
    #[error("invalid API configuration: {0}")]
    Config(String),
}

impl RemoteError {
    pub fn is_transport(&self) -> bool {
        matches!(self, RemoteError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Remote trait
// ──────────────────────────────────────────────

/// List, create, update, delete and password verification against the
/// participant collection.
///
/// Every method maps to exactly one request. Implementations must not retry.
#[async_trait]
pub trait Remote: Send + Sync {
    /// GET `/participants`
    async fn list(&self) -> Result<Vec<Participant>, RemoteError>;

    /// POST `/participants`
    async fn create(&self, record: &Participant) -> Result<(), RemoteError>;

    /// PUT `/participants/{original_serial}` with the password in the body.
    async fn update(
        &self,
        original_serial: &str,
        record: &Participant,
        secret: &Secret,
    ) -> Result<(), RemoteError>;

    /// DELETE `/participants/{serial}` with `{ "password": ... }` as body.
    async fn delete(&self, serial: &str, secret: &Secret) -> Result<(), RemoteError>;

    /// POST `/verify-password`. `Ok` only when the server accepted it.
    async fn verify(&self, secret: &Secret) -> Result<(), RemoteError>;
}
