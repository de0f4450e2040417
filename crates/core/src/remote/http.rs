//! HTTP remote: the participant API over JSON.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Non-2xx responses are read rather than
//! raised by ureq so the server's `{"error": ...}` text reaches the user.

use std::time::Duration;

use async_trait::async_trait;
use ureq::http::Response;
use ureq::Body;
use url::Url;

use super::{ErrorBody, Remote, RemoteError, UpdateBody};
use crate::participant::Participant;
use crate::secret::{PasswordBody, Secret};

/// Client for the participant API rooted at a base URL.
///
/// The base URL may carry a path prefix (`https://host/api`); endpoint
/// segments are appended to it and percent-encoded.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    base: Url,
    agent: ureq::Agent,
}

impl HttpRemote {
    /// Client with no request timeout.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Self::build(base_url, None)
    }

    /// Client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let base = Url::parse(base_url)
            .map_err(|e| RemoteError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(RemoteError::Config(format!(
                "base URL '{}' must be an http or https URL",
                base_url
            )));
        }

        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();

        Ok(HttpRemote {
            base,
            agent: ureq::Agent::new_with_config(config),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base URLs are rejected in `build`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Run a blocking request on the blocking pool.
    async fn run<T, F>(&self, call: F) -> Result<T, RemoteError>
    where
        F: FnOnce(ureq::Agent) -> Result<T, RemoteError> + Send + 'static,
        T: Send + 'static,
    {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || call(agent))
            .await
            .map_err(|e| RemoteError::Transport(format!("task join error: {}", e)))?
    }
}

/// Convert a ureq error (no response received) into a transport error.
fn transport(err: ureq::Error, operation: &str) -> RemoteError {
    RemoteError::Transport(format!("{} failed: {}", operation, err))
}

/// Pass 2xx responses through; turn anything else into `RemoteError::Status`.
fn expect_success(mut response: Response<Body>) -> Result<Response<Body>, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.body_mut().read_to_string().unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message: error_message(&text, status.canonical_reason()),
    })
}

/// Prefer the server's `{"error": ...}`, then the raw body, then the reason phrase.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    reason.unwrap_or("request failed").to_string()
}

#[async_trait]
impl Remote for HttpRemote {
    async fn list(&self) -> Result<Vec<Participant>, RemoteError> {
        let url = self.endpoint(&["participants"]);
        tracing::debug!(%url, "listing participants");

        self.run(move |agent| {
            let response = agent
                .get(url.as_str())
                .call()
                .map_err(|e| transport(e, "list"))?;
            expect_success(response)?
                .into_body()
                .read_json::<Vec<Participant>>()
                .map_err(|e| RemoteError::Decode(format!("participant list: {}", e)))
        })
        .await
    }

    async fn create(&self, record: &Participant) -> Result<(), RemoteError> {
        let url = self.endpoint(&["participants"]);
        tracing::debug!(%url, serial = %record.serial_number, "creating participant");

        let body = record.clone();
        self.run(move |agent| {
            let response = agent
                .post(url.as_str())
                .send_json(&body)
                .map_err(|e| transport(e, "create"))?;
            expect_success(response).map(|_| ())
        })
        .await
    }

    async fn update(
        &self,
        original_serial: &str,
        record: &Participant,
        secret: &Secret,
    ) -> Result<(), RemoteError> {
        let url = self.endpoint(&["participants", original_serial]);
        tracing::debug!(%url, "updating participant");

        let body = UpdateBody {
            record: record.clone(),
            password: secret.clone(),
        };
        self.run(move |agent| {
            let response = agent
                .put(url.as_str())
                .send_json(&body)
                .map_err(|e| transport(e, "update"))?;
            expect_success(response).map(|_| ())
        })
        .await
    }

    async fn delete(&self, serial: &str, secret: &Secret) -> Result<(), RemoteError> {
        let url = self.endpoint(&["participants", serial]);
        tracing::debug!(%url, "deleting participant");

        let body = PasswordBody {
            password: secret.clone(),
        };
        self.run(move |agent| {
            let response = agent
                .delete(url.as_str())
                .force_send_body()
                .send_json(&body)
                .map_err(|e| transport(e, "delete"))?;
            expect_success(response).map(|_| ())
        })
        .await
    }

    async fn verify(&self, secret: &Secret) -> Result<(), RemoteError> {
        let url = self.endpoint(&["verify-password"]);
        tracing::debug!(%url, "verifying admin password");

        let body = PasswordBody {
            password: secret.clone(),
        };
        self.run(move |agent| {
            let response = agent
                .post(url.as_str())
                .send_json(&body)
                .map_err(|e| transport(e, "verify"))?;
            expect_success(response).map(|_| ())
        })
        .await
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
