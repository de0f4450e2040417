//! `add`, `edit` and `delete`: the commands that change the collection.

use certdesk_core::{Field, GateOutcome, SubmitKind, SubmitOutcome};
use clap::Args;
use serde_json::json;

use crate::config::ClientConfig;
use crate::OutputFormat;

use super::{connect, obtain_password, Printer};

/// Participant field flags shared by `add` and `edit`.
#[derive(Debug, Default, Clone, Args)]
pub(crate) struct RecordArgs {
    /// Serial number ('A' followed by 8 digits)
    #[arg(long)]
    pub serial: Option<String>,
    /// Participant name
    #[arg(long)]
    pub name: Option<String>,
    /// Program events attended
    #[arg(long)]
    pub events: Option<String>,
    /// Issue date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
    /// Position held
    #[arg(long)]
    pub position: Option<String>,
    /// Link to a program photo
    #[arg(long)]
    pub photo: Option<String>,
    /// Link to the certificate
    #[arg(long)]
    pub certificate: Option<String>,
}

impl RecordArgs {
    /// The fields that were given on the command line.
    pub(crate) fn changes(&self) -> Vec<(Field, &str)> {
        [
            (Field::SerialNumber, &self.serial),
            (Field::Name, &self.name),
            (Field::ProgramEvents, &self.events),
            (Field::IssueDate, &self.date),
            (Field::Position, &self.position),
            (Field::ProgramPhotoLink, &self.photo),
            (Field::CertificateUrl, &self.certificate),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

fn report_saved(outcome: &SubmitOutcome, printer: Printer) -> Result<(), String> {
    let verb = match outcome.kind {
        SubmitKind::Created => "created",
        SubmitKind::Updated => "updated",
    };
    if outcome.stale {
        printer.warn("the change was saved but the list could not be reloaded");
    }
    match printer.output {
        OutputFormat::Json => printer.json(&json!({
            "status": verb,
            "serialNumber": outcome.serial,
            "stale": outcome.stale,
        })),
        OutputFormat::Text => {
            printer.status(&format!("Participant {} {}.", outcome.serial, verb));
            Ok(())
        }
    }
}

/// `certdesk add`: create a participant. Validation runs before anything
/// is sent.
pub(crate) async fn cmd_add(
    config: &ClientConfig,
    record: RecordArgs,
    printer: Printer,
) -> Result<(), String> {
    let mut console = connect(config)?;
    for (field, value) in record.changes() {
        console.set_field(field, value);
    }
    let outcome = console.submit().await.map_err(|e| e.to_string())?;
    report_saved(&outcome, printer)
}

/// `certdesk edit SERIAL`: pass the password gate, apply the given field
/// changes and submit the update.
pub(crate) async fn cmd_edit(
    config: &ClientConfig,
    serial: &str,
    password: Option<String>,
    record: RecordArgs,
    printer: Printer,
) -> Result<(), String> {
    let changes = record.changes();
    if changes.is_empty() {
        return Err("nothing to change: pass at least one field flag".to_string());
    }

    let mut console = connect(config)?;
    console.refresh().await.map_err(|e| e.to_string())?;
    let pending = console.request_edit(serial).map_err(|e| e.to_string())?;

    let secret = obtain_password(password, &pending.prompt_message)?;
    match console.confirm(secret).await.map_err(|e| e.to_string())? {
        GateOutcome::EditStarted { .. } => {}
        GateOutcome::Deleted { serial, .. } => {
            return Err(format!("unexpected delete of {} during edit", serial));
        }
    }

    for (field, value) in changes {
        if field == Field::SerialNumber && value != serial {
            printer.warn(&format!(
                "serial numbers cannot be changed; keeping {}",
                serial
            ));
        }
        console.set_field(field, value);
    }

    let outcome = console.submit().await.map_err(|e| e.to_string())?;
    report_saved(&outcome, printer)
}

/// `certdesk delete SERIAL`: pass the password gate, which sends the delete.
pub(crate) async fn cmd_delete(
    config: &ClientConfig,
    serial: &str,
    password: Option<String>,
    printer: Printer,
) -> Result<(), String> {
    let mut console = connect(config)?;
    console.refresh().await.map_err(|e| e.to_string())?;
    let pending = console.request_delete(serial).map_err(|e| e.to_string())?;

    let secret = obtain_password(password, &pending.prompt_message)?;
    let (serial, stale) = match console.confirm(secret).await.map_err(|e| e.to_string())? {
        GateOutcome::Deleted { serial, stale } => (serial, stale),
        GateOutcome::EditStarted { serial } => {
            return Err(format!("unexpected edit of {} during delete", serial));
        }
    };

    if stale {
        printer.warn("the participant was deleted but the list could not be reloaded");
    }
    match printer.output {
        OutputFormat::Json => printer.json(&json!({
            "status": "deleted",
            "serialNumber": serial,
            "stale": stale,
        })),
        OutputFormat::Text => {
            printer.status(&format!("Participant {} deleted.", serial));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_lists_only_given_fields_in_field_order() {
        let args = RecordArgs {
            position: Some("Lead".into()),
            name: Some("Jane".into()),
            ..RecordArgs::default()
        };
        assert_eq!(
            args.changes(),
            vec![(Field::Name, "Jane"), (Field::Position, "Lead")]
        );
    }

    #[test]
    fn empty_strings_still_count_as_changes() {
        let args = RecordArgs {
            photo: Some(String::new()),
            ..RecordArgs::default()
        };
        assert_eq!(args.changes(), vec![(Field::ProgramPhotoLink, "")]);
    }
}
