//! Participant validation.
//!
//! Checks run in a fixed order and stop at the first violation, so a caller
//! always gets exactly one message to show.

use time::macros::format_description;

use crate::participant::Participant;

/// Identifier prefix required on every serial number.
pub const SERIAL_PREFIX: char = 'A';

/// Number of digits following [`SERIAL_PREFIX`].
pub const SERIAL_DIGITS: usize = 8;

/// The first rule a participant record breaks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("serial number must be 'A' followed by 8 digits (got '{0}')")]
    InvalidSerialNumber(String),

    #[error("name is required")]
    MissingName,

    #[error("program events are required")]
    MissingProgramEvents,

    #[error("issue date must be a valid YYYY-MM-DD date (got '{0}')")]
    InvalidIssueDate(String),

    #[error("position is required")]
    MissingPosition,
}

/// Validate a participant record, returning the first violation found.
pub fn validate(record: &Participant) -> Result<(), ValidationError> {
    if !is_valid_serial(&record.serial_number) {
        return Err(ValidationError::InvalidSerialNumber(
            record.serial_number.clone(),
        ));
    }
    if record.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if record.program_events.trim().is_empty() {
        return Err(ValidationError::MissingProgramEvents);
    }
    if !is_valid_issue_date(&record.issue_date) {
        return Err(ValidationError::InvalidIssueDate(record.issue_date.clone()));
    }
    if record.position.trim().is_empty() {
        return Err(ValidationError::MissingPosition);
    }
    Ok(())
}

/// `A` followed by exactly eight ASCII digits.
pub fn is_valid_serial(serial: &str) -> bool {
    match serial.strip_prefix(SERIAL_PREFIX) {
        Some(digits) => digits.len() == SERIAL_DIGITS && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Zero-padded `YYYY-MM-DD` naming a real calendar day.
pub fn is_valid_issue_date(date: &str) -> bool {
    let bytes = date.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return false;
    }
    time::Date::parse(date, format_description!("[year]-[month]-[day]")).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Participant {
        Participant {
            serial_number: "A20250001".to_string(),
            name: "Ada Lovelace".to_string(),
            program_events: "Workshop".to_string(),
            issue_date: "2025-01-01".to_string(),
            position: "Volunteer".to_string(),
            ..Participant::default()
        }
    }

    #[test]
    fn accepts_complete_record() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn serial_pattern() {
        assert!(is_valid_serial("A20250001"));
        assert!(!is_valid_serial("X1234567"));
        assert!(!is_valid_serial("A1234567"));
        assert!(!is_valid_serial("A123456789"));
        assert!(!is_valid_serial("a20250001"));
        assert!(!is_valid_serial("A2025000x"));
        assert!(!is_valid_serial(""));
    }

    #[test]
    fn date_pattern() {
        assert!(is_valid_issue_date("2025-01-01"));
        assert!(is_valid_issue_date("2024-02-29"));
        assert!(!is_valid_issue_date("2025-1-1"));
        assert!(!is_valid_issue_date("2025-02-30"));
        assert!(!is_valid_issue_date("2025/01/01"));
        assert!(!is_valid_issue_date("+2025-01-1"));
        assert!(!is_valid_issue_date(""));
    }

    #[test]
    fn reports_first_violation_only() {
        let record = Participant {
            serial_number: "X1234567".to_string(),
            ..Participant::default()
        };
        assert_eq!(
            validate(&record),
            Err(ValidationError::InvalidSerialNumber("X1234567".to_string()))
        );

        let mut record = valid();
        record.name = "   ".to_string();
        record.issue_date = "bad".to_string();
        assert_eq!(validate(&record), Err(ValidationError::MissingName));
    }

    #[test]
    fn checks_run_in_fixed_order() {
        let mut record = valid();
        record.position.clear();
        assert_eq!(validate(&record), Err(ValidationError::MissingPosition));

        record.issue_date = "2025-1-1".to_string();
        assert_eq!(
            validate(&record),
            Err(ValidationError::InvalidIssueDate("2025-1-1".to_string()))
        );

        record.program_events.clear();
        assert_eq!(validate(&record), Err(ValidationError::MissingProgramEvents));
    }

    #[test]
    fn links_are_not_checked() {
        let mut record = valid();
        record.program_photo_link = "not a url".to_string();
        assert_eq!(validate(&record), Ok(()));
    }
}
