//! Application state shared across request handlers.

use std::path::PathBuf;

use certdesk_core::Secret;
use tokio::sync::RwLock;

use crate::error::ServerError;
use crate::roster::Roster;

pub struct AppState {
    /// The participant collection.
    pub(crate) roster: RwLock<Roster>,
    /// The shared admin password every protected call is checked against.
    pub(crate) admin_password: Secret,
    /// Where the roster is persisted. `None` keeps it in memory only.
    pub(crate) data_file: Option<PathBuf>,
}

impl AppState {
    pub fn new(roster: Roster, admin_password: Secret, data_file: Option<PathBuf>) -> Self {
        AppState {
            roster: RwLock::new(roster),
            admin_password,
            data_file,
        }
    }

    /// Load the roster from `data_file` (if any) and build the state.
    pub async fn load(
        admin_password: Secret,
        data_file: Option<PathBuf>,
    ) -> Result<Self, ServerError> {
        if admin_password.is_empty() {
            return Err(ServerError::MissingPassword);
        }
        let roster = match &data_file {
            Some(path) => Roster::load(path).await?,
            None => Roster::default(),
        };
        Ok(AppState::new(roster, admin_password, data_file))
    }

    pub(crate) fn password_matches(&self, candidate: Option<&Secret>) -> bool {
        candidate.is_some_and(|c| *c == self.admin_password)
    }

    /// Persist `roster` when a data file is configured.
    pub(crate) async fn persist(&self, roster: &Roster) -> Result<(), ServerError> {
        match &self.data_file {
            Some(path) => roster.save(path).await,
            None => Ok(()),
        }
    }
}
