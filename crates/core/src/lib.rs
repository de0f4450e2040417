//! certdesk-core: client-side workflow for the certificate participant admin.
//!
//! Keeps a local copy of the remote participant collection, filters it,
//! drafts new and edited records, and gates edit and delete behind the
//! shared admin password. All state lives in [`AdminConsole`]; the network
//! is reached only through the [`Remote`] trait.
//!
//! # Public API
//!
//! - [`AdminConsole`] -- owns the store, filter, form and gate
//! - [`Participant`], [`Field`] -- the record and its field names
//! - [`validate()`] -- ordered, short-circuiting record validation
//! - [`filter_view()`], [`FilterQuery`] -- search and position filtering
//! - [`Gate`] -- the password challenge state machine
//! - [`Remote`], [`HttpRemote`], [`MemoryRemote`] -- the remote API

pub mod console;
pub mod filter;
pub mod form;
pub mod gate;
pub mod participant;
pub mod remote;
pub mod secret;
pub mod store;
pub mod validate;

// ── Convenience re-exports ───────────────────────────────────────────

pub use console::{AdminConsole, ConsoleError, GateOutcome, Operation, SubmitKind, SubmitOutcome};
pub use filter::{filter_view, FilterQuery};
pub use form::{FormBuffer, FormMode};
pub use gate::{ActionKind, Challenge, Gate, GateError, GateState, PendingAction};
pub use participant::{Field, Participant, UnknownField};
pub use remote::memory::{MemoryRemote, RemoteCall};
pub use remote::{ErrorBody, MessageBody, Remote, RemoteError, UpdateBody};
pub use secret::{PasswordBody, Secret};
pub use store::RecordStore;
pub use validate::{validate, ValidationError};

#[cfg(feature = "http")]
pub use remote::http::HttpRemote;
