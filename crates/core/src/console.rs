//! The admin console: one owner for all client-side state.
//!
//! [`AdminConsole`] holds the record store, the filter, the form buffer and
//! the password gate, and changes them only through the methods below.
//!
//! Consistency model: last refresh wins. Every successful create, update or
//! delete is followed by a full re-fetch of the collection; nothing is
//! patched locally and a failed call leaves every piece of state as it was.

use std::fmt;
use std::future::Future;

use crate::filter::{filter_view, FilterQuery};
use crate::form::{FormBuffer, FormMode};
use crate::gate::{ActionKind, Gate, PendingAction};
use crate::participant::{Field, Participant};
use crate::remote::{Remote, RemoteError};
use crate::secret::Secret;
use crate::store::RecordStore;
use crate::validate::{validate, ValidationError};

/// The mutating call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => f.write_str("adding participant"),
            Operation::Update => f.write_str("updating participant"),
            Operation::Delete => f.write_str("deleting participant"),
        }
    }
}

/// Everything that can go wrong in the console. `Display` is the message
/// meant for the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsoleError {
    /// The server could not be reached, or the list could not be loaded.
    #[error("{0}")]
    Connectivity(RemoteError),

    /// Caught before anything was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The gate's password check did not succeed, for whatever reason.
    #[error("invalid password")]
    InvalidCredential,

    /// The server refused a create, update or delete.
    #[error("{operation} failed: {source}")]
    MutationFailed {
        operation: Operation,
        source: RemoteError,
    },

    #[error("{0}")]
    Gate(#[from] crate::gate::GateError),

    #[error("no participant with serial number '{0}'")]
    UnknownRecord(String),
}

impl ConsoleError {
    fn from_mutation(operation: Operation, err: RemoteError) -> Self {
        match err {
            RemoteError::Transport(_) | RemoteError::Config(_) => ConsoleError::Connectivity(err),
            other => ConsoleError::MutationFailed {
                operation,
                source: other,
            },
        }
    }
}

/// Result of a successful [`AdminConsole::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The form buffer now holds the record and is in edit mode.
    EditStarted { serial: String },
    /// The record was deleted. `stale` is set when the follow-up refresh
    /// failed and the store may still show it.
    Deleted { serial: String, stale: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitKind {
    Created,
    Updated,
}

/// Result of a successful [`AdminConsole::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub kind: SubmitKind,
    pub serial: String,
    /// The follow-up refresh failed; the store predates this change.
    pub stale: bool,
}

/// Set `loading` for the duration of `call`.
async fn tracked<T>(loading: &mut bool, call: impl Future<Output = T>) -> T {
    *loading = true;
    let out = call.await;
    *loading = false;
    out
}

pub struct AdminConsole<R: Remote> {
    remote: R,
    store: RecordStore,
    filter: FilterQuery,
    form: FormBuffer,
    gate: Gate,
    loading: bool,
}

impl<R: Remote> AdminConsole<R> {
    pub fn new(remote: R) -> Self {
        AdminConsole {
            remote,
            store: RecordStore::new(),
            filter: FilterQuery::default(),
            form: FormBuffer::new(),
            gate: Gate::new(),
            loading: false,
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn form(&self) -> &FormBuffer {
        &self.form
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn filter(&self) -> &FilterQuery {
        &self.filter
    }

    /// A request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ── Record store ─────────────────────────────────────────────────────

    /// Re-fetch the whole collection. On failure the store is untouched.
    pub async fn refresh(&mut self) -> Result<usize, ConsoleError> {
        match tracked(&mut self.loading, self.remote.list()).await {
            Ok(records) => {
                self.store.replace(records);
                tracing::debug!(count = self.store.len(), "record store refreshed");
                Ok(self.store.len())
            }
            Err(err) => {
                tracing::warn!(error = %err, "refresh failed; keeping previous records");
                Err(ConsoleError::Connectivity(err))
            }
        }
    }

    async fn refresh_after_mutation(&mut self) -> bool {
        self.refresh().await.is_err()
    }

    // ── Filter view ──────────────────────────────────────────────────────

    /// The store seen through the current filter.
    pub fn visible(&self) -> Vec<&Participant> {
        filter_view(self.store.records(), &self.filter)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
    }

    pub fn set_position_filter(&mut self, position: impl Into<String>) {
        self.filter.position = position.into();
    }

    pub fn set_match_program_events(&mut self, enabled: bool) {
        self.filter.match_program_events = enabled;
    }

    pub fn clear_filters(&mut self) {
        self.filter = FilterQuery::default();
    }

    // ── Form buffer ──────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Replace every field of the draft at once, keeping the mode.
    pub fn fill_form(&mut self, record: Participant) {
        self.form.fill(record);
    }

    /// Drop the draft and leave edit mode.
    pub fn cancel_edit(&mut self) {
        self.form.clear();
    }

    /// Validate the draft and send it: create in create mode, update of
    /// the original serial in edit mode.
    ///
    /// Exactly one mutating request is sent. On success the form is cleared
    /// and the store refreshed; on failure nothing changes.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ConsoleError> {
        let record = self.form.submission();
        validate(&record)?;

        let (kind, result) = match self.form.mode().clone() {
            FormMode::Create => {
                let result = tracked(&mut self.loading, self.remote.create(&record)).await;
                (SubmitKind::Created, result)
            }
            FormMode::Edit {
                original_serial,
                secret,
            } => {
                let result = tracked(
                    &mut self.loading,
                    self.remote.update(&original_serial, &record, &secret),
                )
                .await;
                (SubmitKind::Updated, result)
            }
        };

        if let Err(err) = result {
            let operation = match kind {
                SubmitKind::Created => Operation::Create,
                SubmitKind::Updated => Operation::Update,
            };
            tracing::warn!(serial = %record.serial_number, error = %err, "{} failed", operation);
            return Err(ConsoleError::from_mutation(operation, err));
        }

        tracing::info!(serial = %record.serial_number, ?kind, "participant saved");
        self.form.clear();
        let stale = self.refresh_after_mutation().await;
        Ok(SubmitOutcome {
            kind,
            serial: record.serial_number,
            stale,
        })
    }

    // ── Authorization gate ───────────────────────────────────────────────

    /// Ask for the password before editing `serial`.
    pub fn request_edit(&mut self, serial: &str) -> Result<PendingAction, ConsoleError> {
        self.request(ActionKind::Edit, serial)
    }

    /// Ask for the password before deleting `serial`.
    pub fn request_delete(&mut self, serial: &str) -> Result<PendingAction, ConsoleError> {
        self.request(ActionKind::Delete, serial)
    }

    fn request(&mut self, kind: ActionKind, serial: &str) -> Result<PendingAction, ConsoleError> {
        let target = self
            .store
            .get(serial)
            .cloned()
            .ok_or_else(|| ConsoleError::UnknownRecord(serial.to_string()))?;
        let pending = self.gate.request(kind, target)?;
        tracing::debug!(%kind, serial, "gate opened");
        Ok(pending)
    }

    /// Close the gate without sending anything.
    pub fn cancel_gate(&mut self) -> Option<PendingAction> {
        let discarded = self.gate.cancel();
        if let Some(action) = &discarded {
            tracing::debug!(kind = %action.kind, serial = %action.target.serial_number, "gate cancelled");
        }
        discarded
    }

    /// Supply the password for the waiting action.
    ///
    /// Edit: the password is checked with the server; only on success is
    /// the record copied into the form and edit mode entered. Any failure,
    /// including a transport error, is reported as an invalid password.
    ///
    /// Delete: the password travels with the delete request and the server
    /// decides. On success the store is refreshed and the form cleared.
    pub async fn confirm(&mut self, secret: impl Into<Secret>) -> Result<GateOutcome, ConsoleError> {
        let challenge = self.gate.submit(secret.into())?;
        let serial = challenge.target.serial_number.clone();

        match challenge.kind {
            ActionKind::Edit => {
                let verdict =
                    tracked(&mut self.loading, self.remote.verify(&challenge.secret)).await;
                if let Err(err) = &verdict {
                    tracing::warn!(%serial, error = %err, "password check failed");
                }
                match self.gate.resolve(verdict.is_ok())? {
                    Some(released) => {
                        self.form.begin_edit(released.target, released.secret);
                        tracing::debug!(%serial, "edit mode entered");
                        Ok(GateOutcome::EditStarted { serial })
                    }
                    None => Err(ConsoleError::InvalidCredential),
                }
            }
            ActionKind::Delete => {
                let result = tracked(
                    &mut self.loading,
                    self.remote.delete(&serial, &challenge.secret),
                )
                .await;
                match result {
                    Ok(()) => {
                        self.gate.resolve(true)?;
                        tracing::info!(%serial, "participant deleted");
                        self.form.clear();
                        let stale = self.refresh_after_mutation().await;
                        Ok(GateOutcome::Deleted { serial, stale })
                    }
                    Err(err) => {
                        self.gate.resolve(false)?;
                        tracing::warn!(%serial, error = %err, "delete failed");
                        Err(ConsoleError::from_mutation(Operation::Delete, err))
                    }
                }
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
