//! Search and category filtering over the record store.

use crate::participant::Participant;

/// Inputs to [`filter_view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterQuery {
    /// Free-text query, matched case-insensitively as a substring.
    pub query: String,
    /// Exact position to keep. Empty keeps every position.
    pub position: String,
    /// Also match the query against program-events text.
    pub match_program_events: bool,
}

impl FilterQuery {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty() && self.position.is_empty()
    }

    fn matches(&self, record: &Participant, needle: &str) -> bool {
        let text_ok = needle.is_empty()
            || record.name.to_lowercase().contains(needle)
            || record.serial_number.to_lowercase().contains(needle)
            || (self.match_program_events
                && record.program_events.to_lowercase().contains(needle));
        let position_ok = self.position.is_empty() || record.position == self.position;
        text_ok && position_ok
    }
}

/// The records satisfying `filter`, in their original order.
pub fn filter_view<'a>(records: &'a [Participant], filter: &FilterQuery) -> Vec<&'a Participant> {
    let needle = filter.query.trim().to_lowercase();
    records
        .iter()
        .filter(|record| filter.matches(record, &needle))
        .collect()
}
