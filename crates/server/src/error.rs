use std::path::PathBuf;

/// Errors that stop the server from starting or from persisting a change.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No admin password was configured.
    #[error("admin password is not set (export CERTDESK_ADMIN_PASSWORD)")]
    MissingPassword,

    #[error("data file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The data file exists but is not a JSON array of participants.
    #[error("data file {path} is not a participant list: {source}")]
    DataFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
