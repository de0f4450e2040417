use crate::config::ClientConfig;
use crate::OutputFormat;

use super::{connect, render_table, Printer};

pub(crate) struct ListOptions {
    pub search: Option<String>,
    pub position: Option<String>,
    pub match_events: bool,
}

/// `certdesk list`: load the collection and print the filtered view.
pub(crate) async fn cmd_list(
    config: &ClientConfig,
    options: ListOptions,
    printer: Printer,
) -> Result<(), String> {
    let mut console = connect(config)?;
    console.refresh().await.map_err(|e| e.to_string())?;

    if let Some(query) = options.search {
        console.set_query(query);
    }
    if let Some(position) = options.position {
        console.set_position_filter(position);
    }
    console.set_match_program_events(options.match_events);

    let visible = console.visible();
    match printer.output {
        OutputFormat::Json => printer.json(&visible)?,
        OutputFormat::Text => {
            if visible.is_empty() {
                printer.status("No participants found.");
            } else {
                print!("{}", render_table(&visible));
                if !printer.quiet {
                    println!(
                        "\n{} of {} participant(s) shown",
                        visible.len(),
                        console.store().len()
                    );
                }
            }
        }
    }
    Ok(())
}

/// `certdesk positions`: distinct positions and how many hold each.
pub(crate) async fn cmd_positions(config: &ClientConfig, printer: Printer) -> Result<(), String> {
    let mut console = connect(config)?;
    console.refresh().await.map_err(|e| e.to_string())?;

    let counts = console.store().position_counts();
    match printer.output {
        OutputFormat::Json => printer.json(&counts)?,
        OutputFormat::Text => {
            if counts.is_empty() {
                printer.status("No positions recorded.");
            }
            let width = counts.keys().map(|p| p.chars().count()).max().unwrap_or(0);
            for (position, count) in &counts {
                println!("{:<width$}  {}", position, count, width = width);
            }
        }
    }
    Ok(())
}
