//! In-process participant collection implementing [`Remote`].
//!
//! Behaves like the reference server (duplicate serials rejected, wrong
//! password rejected, unknown serials reported as 404) and records every
//! call so tests can assert on exactly what went over the "wire".

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{Remote, RemoteError};
use crate::participant::Participant;
use crate::secret::Secret;

/// One request as the memory remote received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    List,
    Create(Participant),
    Update {
        path_serial: String,
        record: Participant,
    },
    Delete(String),
    Verify,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Vec<Participant>,
    calls: Vec<RemoteCall>,
    injected: VecDeque<RemoteError>,
    injected_list: VecDeque<RemoteError>,
    offline: bool,
}

#[derive(Debug)]
pub struct MemoryRemote {
    password: Secret,
    state: Mutex<MemoryState>,
}

impl MemoryRemote {
    pub fn new(password: impl Into<Secret>) -> Self {
        Self::with_records(password, Vec::new())
    }

    pub fn with_records(password: impl Into<Secret>, records: Vec<Participant>) -> Self {
        MemoryRemote {
            password: password.into(),
            state: Mutex::new(MemoryState {
                records,
                ..MemoryState::default()
            }),
        }
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Make the next call fail with `error`. Queued errors are used in order.
    pub fn fail_next(&self, error: RemoteError) {
        self.lock().injected.push_back(error);
    }

    /// Make the next `list` call fail with `error`, leaving other calls alone.
    pub fn fail_next_list(&self, error: RemoteError) {
        self.lock().injected_list.push_back(error);
    }

    /// Server-side contents, in insertion order.
    pub fn records(&self) -> Vec<Participant> {
        self.lock().records.clone()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // Recover data even if a test thread panicked while holding the lock
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the call, then apply offline mode or an injected failure.
    fn enter(
        &self,
        call: RemoteCall,
    ) -> Result<std::sync::MutexGuard<'_, MemoryState>, RemoteError> {
        let mut state = self.lock();
        let is_list = call == RemoteCall::List;
        state.calls.push(call);
        if state.offline {
            return Err(RemoteError::Transport("connection refused".to_string()));
        }
        if is_list {
            if let Some(err) = state.injected_list.pop_front() {
                return Err(err);
            }
        }
        if let Some(err) = state.injected.pop_front() {
            return Err(err);
        }
        Ok(state)
    }

    fn check_password(&self, secret: &Secret) -> Result<(), RemoteError> {
        if *secret == self.password {
            Ok(())
        } else {
            Err(status(401, "invalid password"))
        }
    }
}

fn status(status: u16, message: &str) -> RemoteError {
    RemoteError::Status {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl Remote for MemoryRemote {
    async fn list(&self) -> Result<Vec<Participant>, RemoteError> {
        let state = self.enter(RemoteCall::List)?;
        Ok(state.records.clone())
    }

    async fn create(&self, record: &Participant) -> Result<(), RemoteError> {
        let mut state = self.enter(RemoteCall::Create(record.clone()))?;
        if state
            .records
            .iter()
            .any(|p| p.serial_number == record.serial_number)
        {
            return Err(status(409, "serial number already exists"));
        }
        state.records.push(record.clone());
        Ok(())
    }

    async fn update(
        &self,
        original_serial: &str,
        record: &Participant,
        secret: &Secret,
    ) -> Result<(), RemoteError> {
        let mut state = self.enter(RemoteCall::Update {
            path_serial: original_serial.to_string(),
            record: record.clone(),
        })?;
        self.check_password(secret)?;
        let slot = state
            .records
            .iter_mut()
            .find(|p| p.serial_number == original_serial)
            .ok_or_else(|| status(404, "participant not found"))?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, serial: &str, secret: &Secret) -> Result<(), RemoteError> {
        let mut state = self.enter(RemoteCall::Delete(serial.to_string()))?;
        self.check_password(secret)?;
        let index = state
            .records
            .iter()
            .position(|p| p.serial_number == serial)
            .ok_or_else(|| status(404, "participant not found"))?;
        state.records.remove(index);
        Ok(())
    }

    async fn verify(&self, secret: &Secret) -> Result<(), RemoteError> {
        let _state = self.enter(RemoteCall::Verify)?;
        self.check_password(secret)
    }
}
