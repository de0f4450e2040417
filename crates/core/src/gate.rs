//! Password challenge in front of edit and delete.
//!
//! The gate only sequences the exchange (ask, relay, act or abort). It never
//! checks the password itself; whoever drives it relays the [`Challenge`] to
//! the server and reports back through [`Gate::resolve`].
//!
//! ```text
//! Closed --request--> Open --submit--> Verifying --resolve--> Closed
//!   ^                  |                   |
//!   +------cancel------+-------cancel------+
//! ```

use std::fmt;

use crate::participant::Participant;
use crate::secret::Secret;

/// Which protected action is waiting on the password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Edit,
    Delete,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Edit => f.write_str("edit"),
            ActionKind::Delete => f.write_str("delete"),
        }
    }
}

/// A protected action waiting for the admin password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub target: Participant,
    pub prompt_title: String,
    pub prompt_message: String,
}

impl PendingAction {
    pub fn new(kind: ActionKind, target: Participant) -> Self {
        let (prompt_title, verb) = match kind {
            ActionKind::Edit => ("Edit participant", "edit"),
            ActionKind::Delete => ("Delete participant", "delete"),
        };
        let prompt_message = format!(
            "Enter the admin password to {} {} ({}).",
            verb, target.name, target.serial_number
        );
        PendingAction {
            kind,
            target,
            prompt_title: prompt_title.to_string(),
            prompt_message,
        }
    }
}

/// What the driver must relay to the server, and what it gets back once
/// the server accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub kind: ActionKind,
    pub target: Participant,
    pub secret: Secret,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GateState {
    #[default]
    Closed,
    Open(PendingAction),
    Verifying {
        action: PendingAction,
        secret: Secret,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("a password check is already in progress")]
    Busy,

    #[error("no protected action is waiting for a password")]
    NotOpen,

    #[error("no password check is in progress")]
    NotVerifying,

    #[error("password must not be empty")]
    EmptySecret,
}

#[derive(Debug, Clone, Default)]
pub struct Gate {
    state: GateState,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, GateState::Closed)
    }

    /// The action the gate is currently guarding, if any.
    pub fn pending(&self) -> Option<&PendingAction> {
        match &self.state {
            GateState::Closed => None,
            GateState::Open(action) => Some(action),
            GateState::Verifying { action, .. } => Some(action),
        }
    }

    /// Open the gate for `kind` on `target`.
    ///
    /// A request while already open replaces the waiting action.
    pub fn request(
        &mut self,
        kind: ActionKind,
        target: Participant,
    ) -> Result<PendingAction, GateError> {
        if matches!(self.state, GateState::Verifying { .. }) {
            return Err(GateError::Busy);
        }
        let action = PendingAction::new(kind, target);
        self.state = GateState::Open(action.clone());
        Ok(action)
    }

    /// Hand over the password and move to `Verifying`.
    ///
    /// An empty password leaves the gate open.
    pub fn submit(&mut self, secret: Secret) -> Result<Challenge, GateError> {
        let action = match &self.state {
            GateState::Closed => return Err(GateError::NotOpen),
            GateState::Verifying { .. } => return Err(GateError::Busy),
            GateState::Open(action) => action.clone(),
        };
        if secret.is_empty() {
            return Err(GateError::EmptySecret);
        }
        let challenge = Challenge {
            kind: action.kind,
            target: action.target.clone(),
            secret: secret.clone(),
        };
        self.state = GateState::Verifying { action, secret };
        Ok(challenge)
    }

    /// Close the gate with the server's verdict.
    ///
    /// Returns the released challenge when `accepted`, otherwise `None` and
    /// the pending action is dropped.
    pub fn resolve(&mut self, accepted: bool) -> Result<Option<Challenge>, GateError> {
        match std::mem::take(&mut self.state) {
            GateState::Verifying { action, secret } => Ok(accepted.then(|| Challenge {
                kind: action.kind,
                target: action.target,
                secret,
            })),
            other => {
                self.state = other;
                Err(GateError::NotVerifying)
            }
        }
    }

    /// Abandon whatever is pending without contacting anyone.
    pub fn cancel(&mut self) -> Option<PendingAction> {
        match std::mem::take(&mut self.state) {
            GateState::Closed => None,
            GateState::Open(action) => Some(action),
            GateState::Verifying { action, .. } => Some(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Participant {
        Participant {
            serial_number: "A20250001".to_string(),
            name: "Jane Doe".to_string(),
            ..Participant::default()
        }
    }

    #[test]
    fn full_cycle_releases_challenge() {
        let mut gate = Gate::new();
        let pending = gate.request(ActionKind::Edit, target()).unwrap();
        assert_eq!(pending.prompt_title, "Edit participant");
        assert!(pending.prompt_message.contains("A20250001"));

        let challenge = gate.submit(Secret::new("pw")).unwrap();
        assert_eq!(challenge.kind, ActionKind::Edit);
        assert!(matches!(gate.state(), GateState::Verifying { .. }));

        let released = gate.resolve(true).unwrap().unwrap();
        assert_eq!(released.target.serial_number, "A20250001");
        assert_eq!(released.secret.expose(), "pw");
        assert!(gate.is_closed());
    }

    #[test]
    fn rejection_discards_action() {
        let mut gate = Gate::new();
        gate.request(ActionKind::Delete, target()).unwrap();
        gate.submit(Secret::new("wrong")).unwrap();
        assert_eq!(gate.resolve(false), Ok(None));
        assert!(gate.is_closed());
        assert!(gate.pending().is_none());
    }

    #[test]
    fn cancel_from_open_and_verifying() {
        let mut gate = Gate::new();
        gate.request(ActionKind::Edit, target()).unwrap();
        assert_eq!(gate.cancel().map(|a| a.kind), Some(ActionKind::Edit));
        assert!(gate.is_closed());

        gate.request(ActionKind::Delete, target()).unwrap();
        gate.submit(Secret::new("pw")).unwrap();
        assert_eq!(gate.cancel().map(|a| a.kind), Some(ActionKind::Delete));
        assert!(gate.is_closed());
        assert_eq!(gate.cancel(), None);
    }

    #[test]
    fn empty_secret_keeps_gate_open() {
        let mut gate = Gate::new();
        gate.request(ActionKind::Edit, target()).unwrap();
        assert_eq!(gate.submit(Secret::new("")), Err(GateError::EmptySecret));
        assert!(matches!(gate.state(), GateState::Open(_)));
    }

    #[test]
    fn out_of_order_calls_are_rejected() {
        let mut gate = Gate::new();
        assert_eq!(gate.submit(Secret::new("pw")), Err(GateError::NotOpen));
        assert_eq!(gate.resolve(true), Err(GateError::NotVerifying));

        gate.request(ActionKind::Edit, target()).unwrap();
        assert_eq!(gate.resolve(true), Err(GateError::NotVerifying));
        assert!(matches!(gate.state(), GateState::Open(_)));

        gate.submit(Secret::new("pw")).unwrap();
        assert_eq!(
            gate.request(ActionKind::Delete, target()).map(|_| ()),
            Err(GateError::Busy)
        );
        assert_eq!(gate.submit(Secret::new("pw")), Err(GateError::Busy));
    }

    #[test]
    fn request_while_open_replaces_action() {
        let mut gate = Gate::new();
        gate.request(ActionKind::Edit, target()).unwrap();
        gate.request(ActionKind::Delete, target()).unwrap();
        assert_eq!(gate.pending().map(|a| a.kind), Some(ActionKind::Delete));
    }
}
