use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A certificate participant as exchanged with the remote API.
///
/// Wire names are camelCase. The two link fields are optional on the wire
/// and default to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub serial_number: String,
    pub name: String,
    pub program_events: String,
    pub issue_date: String,
    pub position: String,
    #[serde(default)]
    pub program_photo_link: String,
    #[serde(default)]
    pub certificate_url: String,
}

impl Participant {
    /// Read a single field by name.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::SerialNumber => &self.serial_number,
            Field::Name => &self.name,
            Field::ProgramEvents => &self.program_events,
            Field::IssueDate => &self.issue_date,
            Field::Position => &self.position,
            Field::ProgramPhotoLink => &self.program_photo_link,
            Field::CertificateUrl => &self.certificate_url,
        }
    }

    /// Overwrite a single field by name.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::SerialNumber => self.serial_number = value,
            Field::Name => self.name = value,
            Field::ProgramEvents => self.program_events = value,
            Field::IssueDate => self.issue_date = value,
            Field::Position => self.position = value,
            Field::ProgramPhotoLink => self.program_photo_link = value,
            Field::CertificateUrl => self.certificate_url = value,
        }
    }
}

/// Names one of the seven participant fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SerialNumber,
    Name,
    ProgramEvents,
    IssueDate,
    Position,
    ProgramPhotoLink,
    CertificateUrl,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::SerialNumber,
        Field::Name,
        Field::ProgramEvents,
        Field::IssueDate,
        Field::Position,
        Field::ProgramPhotoLink,
        Field::CertificateUrl,
    ];

    /// The camelCase key used in JSON bodies.
    pub fn wire_name(self) -> &'static str {
        match self {
            Field::SerialNumber => "serialNumber",
            Field::Name => "name",
            Field::ProgramEvents => "programEvents",
            Field::IssueDate => "issueDate",
            Field::Position => "position",
            Field::ProgramPhotoLink => "programPhotoLink",
            Field::CertificateUrl => "certificateUrl",
        }
    }

    /// The kebab-case name used on the command line.
    pub fn cli_name(self) -> &'static str {
        match self {
            Field::SerialNumber => "serial-number",
            Field::Name => "name",
            Field::ProgramEvents => "program-events",
            Field::IssueDate => "issue-date",
            Field::Position => "position",
            Field::ProgramPhotoLink => "program-photo-link",
            Field::CertificateUrl => "certificate-url",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Returned when a string names no participant field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown participant field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.wire_name() == s || f.cli_name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
