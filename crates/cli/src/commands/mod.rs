//! Subcommand implementations.
//!
//! Every `cmd_*` function returns `Err(message)` on failure; `main` turns
//! that into a report on stderr and exit status 1.

pub(crate) mod browse;
pub(crate) mod manage;
pub(crate) mod serve;

use std::io::{BufRead, Write};

use certdesk_core::{AdminConsole, HttpRemote, Participant, Secret};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::OutputFormat;

/// Shared by every command that prints something.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Printer {
    pub output: OutputFormat,
    pub quiet: bool,
}

impl Printer {
    /// Print `value` as pretty JSON on stdout.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), String> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| format!("serialization error: {}", e))?;
        println!("{}", text);
        Ok(())
    }

    /// A one-line confirmation, suppressed by `--quiet`.
    pub(crate) fn status(&self, message: &str) {
        if !self.quiet {
            println!("{}", message);
        }
    }

    /// A warning on stderr, suppressed by `--quiet`.
    pub(crate) fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("warning: {}", message);
        }
    }
}

/// Build a console over the configured API.
pub(crate) fn connect(config: &ClientConfig) -> Result<AdminConsole<HttpRemote>, String> {
    let remote = match config.timeout {
        Some(timeout) => HttpRemote::with_timeout(&config.api_url, timeout),
        None => HttpRemote::new(&config.api_url),
    }
    .map_err(|e| e.to_string())?;
    tracing::debug!(api = %remote.base_url(), timeout = ?config.timeout, "client configured");
    Ok(AdminConsole::new(remote))
}

/// Use the password given by flag or environment, or ask for one on stdin.
pub(crate) fn obtain_password(given: Option<String>, prompt: &str) -> Result<Secret, String> {
    if let Some(password) = given {
        return Ok(Secret::new(password));
    }

    eprint!("{}\nAdmin password: ", prompt);
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| format!("could not read password: {}", e))?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err("no password given".to_string());
    }
    Ok(Secret::new(password))
}

/// Render participants as an aligned text table.
pub(crate) fn render_table(records: &[&Participant]) -> String {
    const HEADERS: [&str; 5] = ["SERIAL", "NAME", "POSITION", "ISSUED", "EVENTS"];

    let rows: Vec<[&str; 5]> = records
        .iter()
        .map(|p| {
            [
                p.serial_number.as_str(),
                p.name.as_str(),
                p.position.as_str(),
                p.issue_date.as_str(),
                p.program_events.as_str(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in std::iter::once(&HEADERS).chain(&rows) {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(serial: &str, name: &str, position: &str) -> Participant {
        Participant {
            serial_number: serial.into(),
            name: name.into(),
            program_events: "Workshop".into(),
            issue_date: "2025-03-01".into(),
            position: position.into(),
            ..Participant::default()
        }
    }

    #[test]
    fn table_aligns_columns() {
        let a = p("A20250001", "Jane Doe", "Volunteer");
        let b = p("A20250002", "Li", "Lead");
        let table = render_table(&[&a, &b]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("SERIAL     NAME      POSITION"));
        assert!(lines[2].starts_with("A20250002  Li        Lead"));
    }

    #[test]
    fn table_with_no_rows_is_just_the_header() {
        assert_eq!(render_table(&[]).lines().count(), 1);
    }

    #[test]
    fn given_password_skips_the_prompt() {
        let secret = obtain_password(Some("pw".into()), "unused").unwrap();
        assert_eq!(secret.expose(), "pw");
    }
}
