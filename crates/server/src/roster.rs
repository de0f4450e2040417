//! The server-side participant collection.
//!
//! Records keep insertion order, like rows appended to a sheet. The roster
//! can be loaded from and written back to a JSON file.

use std::path::Path;

use certdesk_core::Participant;

use crate::error::ServerError;

/// All errors a roster mutation can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("serial number {0} already exists")]
    Duplicate(String),

    #[error("participant {0} not found")]
    NotFound(String),

    /// An update tried to move a record to a different serial number.
    #[error("serial number is immutable: cannot change {from} to {to}")]
    SerialChanged { from: String, to: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    records: Vec<Participant>,
}

impl Roster {
    pub fn new(records: Vec<Participant>) -> Self {
        Roster { records }
    }

    pub fn records(&self) -> &[Participant] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn index_of(&self, serial: &str) -> Option<usize> {
        self.records.iter().position(|p| p.serial_number == serial)
    }

    pub fn insert(&mut self, record: Participant) -> Result<(), RosterError> {
        if self.index_of(&record.serial_number).is_some() {
            return Err(RosterError::Duplicate(record.serial_number));
        }
        self.records.push(record);
        Ok(())
    }

    /// Replace the record stored under `serial`, in place.
    pub fn update(&mut self, serial: &str, record: Participant) -> Result<(), RosterError> {
        let index = self
            .index_of(serial)
            .ok_or_else(|| RosterError::NotFound(serial.to_string()))?;
        if record.serial_number != serial {
            return Err(RosterError::SerialChanged {
                from: serial.to_string(),
                to: record.serial_number,
            });
        }
        self.records[index] = record;
        Ok(())
    }

    pub fn remove(&mut self, serial: &str) -> Result<Participant, RosterError> {
        let index = self
            .index_of(serial)
            .ok_or_else(|| RosterError::NotFound(serial.to_string()))?;
        Ok(self.records.remove(index))
    }

    /// Read a roster from a JSON array file. A missing file is an empty roster.
    pub async fn load(path: &Path) -> Result<Self, ServerError> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Roster::default()),
            Err(source) => {
                return Err(ServerError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let records: Vec<Participant> =
            serde_json::from_str(&text).map_err(|source| ServerError::DataFile {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Roster::new(records))
    }

    /// Write the roster as pretty JSON, replacing the file atomically.
    pub async fn save(&self, path: &Path) -> Result<(), ServerError> {
        let json = serde_json::to_string_pretty(&self.records).map_err(|source| {
            ServerError::DataFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |source| ServerError::Io {
            path: path.to_path_buf(),
            source,
        };
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(serial: &str, name: &str) -> Participant {
        Participant {
            serial_number: serial.to_string(),
            name: name.to_string(),
            ..Participant::default()
        }
    }

    #[test]
    fn insert_keeps_order_and_rejects_duplicates() {
        let mut roster = Roster::default();
        roster.insert(record("A20250002", "B")).unwrap();
        roster.insert(record("A20250001", "A")).unwrap();
        assert_eq!(
            roster.insert(record("A20250001", "again")),
            Err(RosterError::Duplicate("A20250001".to_string()))
        );
        assert_eq!(roster.records()[0].serial_number, "A20250002");
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut roster = Roster::new(vec![record("A20250001", "A"), record("A20250002", "B")]);
        roster.update("A20250001", record("A20250001", "Z")).unwrap();
        assert_eq!(roster.records()[0].name, "Z");
    }

    #[test]
    fn update_rejects_serial_change_and_unknown() {
        let mut roster = Roster::new(vec![record("A20250001", "A")]);
        assert!(matches!(
            roster.update("A20250001", record("A99999999", "A")),
            Err(RosterError::SerialChanged { .. })
        ));
        assert_eq!(
            roster.update("A20250009", record("A20250009", "A")),
            Err(RosterError::NotFound("A20250009".to_string()))
        );
        assert_eq!(roster.records()[0], record("A20250001", "A"));
    }

    #[test]
    fn remove_returns_record() {
        let mut roster = Roster::new(vec![record("A20250001", "A")]);
        assert_eq!(roster.remove("A20250001").unwrap().name, "A");
        assert!(roster.is_empty());
        assert!(roster.remove("A20250001").is_err());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.json");

        assert!(Roster::load(&path).await.unwrap().is_empty());

        let roster = Roster::new(vec![record("A20250001", "A"), record("A20250002", "B")]);
        roster.save(&path).await.unwrap();
        assert_eq!(Roster::load(&path).await.unwrap(), roster);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn load_rejects_malformed_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("roster.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Roster::load(&path).await,
            Err(ServerError::DataFile { .. })
        ));
    }
}
