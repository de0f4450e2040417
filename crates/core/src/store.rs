//! Client-side copy of the server's participant collection.
//!
//! The store is only ever replaced wholesale. Records changed by another
//! client become visible on the next refresh and not before.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::participant::Participant;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Participant>,
    last_refreshed: Option<OffsetDateTime>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a freshly fetched one.
    ///
    /// Records are kept sorted by serial number. The sort is stable so
    /// duplicate serials from a misbehaving server keep their fetch order.
    pub fn replace(&mut self, mut records: Vec<Participant>) {
        records.sort_by(|a, b| a.serial_number.cmp(&b.serial_number));
        self.records = records;
        self.last_refreshed = Some(OffsetDateTime::now_utc());
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

    pub fn get(&self, serial: &str) -> Option<&Participant> {
        self.records.iter().find(|p| p.serial_number == serial)
    }

    /// Distinct non-empty positions, sorted. Feeds the category filter.
    pub fn positions(&self) -> Vec<&str> {
        self.position_counts().into_keys().collect()
    }

    /// Number of records per non-empty position.
    pub fn position_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            if !record.position.is_empty() {
                *counts.entry(record.position.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// When the last successful refresh landed. `None` before the first one.
    pub fn last_refreshed(&self) -> Option<OffsetDateTime> {
        self.last_refreshed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(serial: &str, position: &str) -> Participant {
        Participant {
            serial_number: serial.to_string(),
            position: position.to_string(),
            ..Participant::default()
        }
    }

    #[test]
    fn replace_sorts_by_serial() {
        let mut store = RecordStore::new();
        assert!(store.last_refreshed().is_none());
        store.replace(vec![
            record("A20250003", "Lead"),
            record("A20250001", "Volunteer"),
            record("A20250002", "Lead"),
        ]);
        let serials: Vec<_> = store.records().iter().map(|p| p.serial_number.as_str()).collect();
        assert_eq!(serials, ["A20250001", "A20250002", "A20250003"]);
        assert!(store.last_refreshed().is_some());
    }

    #[test]
    fn replace_discards_previous_contents() {
        let mut store = RecordStore::new();
        store.replace(vec![record("A20250001", "Lead")]);
        store.replace(vec![record("A20250009", "Lead")]);
        assert_eq!(store.len(), 1);
        assert!(store.get("A20250001").is_none());
        assert!(store.get("A20250009").is_some());
    }

    #[test]
    fn positions_are_distinct_and_sorted() {
        let mut store = RecordStore::new();
        store.replace(vec![
            record("A20250001", "Volunteer"),
            record("A20250002", "Lead"),
            record("A20250003", "Volunteer"),
            record("A20250004", ""),
        ]);
        assert_eq!(store.positions(), ["Lead", "Volunteer"]);
        assert_eq!(store.position_counts().get("Volunteer"), Some(&2));
    }
}
