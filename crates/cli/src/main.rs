mod commands;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use commands::browse::{cmd_list, cmd_positions, ListOptions};
use commands::manage::{cmd_add, cmd_delete, cmd_edit, RecordArgs};
use commands::serve::{cmd_serve, ServeOptions};
use commands::Printer;
use config::{ClientConfig, Overrides};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Certificate participant registry.
#[derive(Parser)]
#[command(
    name = "certdesk",
    version,
    about = "Certificate participant registry console"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the certdesk API
    #[arg(long, global = true, env = "CERTDESK_API_URL")]
    api: Option<String>,

    /// Path to a TOML config file (default: ./certdesk.toml if present)
    #[arg(long, global = true, env = "CERTDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "CERTDESK_TIMEOUT_SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List participants, optionally filtered
    List {
        /// Case-insensitive text to look for in name and serial number
        #[arg(long)]
        search: Option<String>,
        /// Only show participants holding exactly this position
        #[arg(long)]
        position: Option<String>,
        /// Also search program events
        #[arg(long)]
        events: bool,
    },

    /// Show the distinct positions and how many participants hold each
    Positions,

    /// Add a participant
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Edit a participant (requires the admin password)
    Edit {
        /// Serial number of the participant to edit
        serial_number: String,
        /// Admin password (prompted for when omitted)
        #[arg(long, env = "CERTDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Delete a participant (requires the admin password)
    Delete {
        /// Serial number of the participant to delete
        serial_number: String,
        /// Admin password (prompted for when omitted)
        #[arg(long, env = "CERTDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Run the reference participant API (admin password from CERTDESK_ADMIN_PASSWORD)
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = certdesk_server::DEFAULT_PORT)]
        port: u16,
        /// JSON file to load participants from and save them to
        #[arg(long)]
        data: Option<PathBuf>,
        /// Path to TLS certificate PEM file (requires the tls feature)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires the tls feature)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let printer = Printer {
        output: cli.output,
        quiet: cli.quiet,
    };
    let overrides = Overrides {
        api_url: cli.api,
        timeout_secs: cli.timeout,
        config: cli.config,
    };

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
    if let Err(msg) = rt.block_on(run(cli.command, &overrides, printer)) {
        report_error(&msg, printer.output, printer.quiet);
        process::exit(1);
    }
}

async fn run(command: Commands, overrides: &Overrides, printer: Printer) -> Result<(), String> {
    let client = || ClientConfig::resolve(overrides).map_err(|e| e.to_string());

    match command {
        Commands::List {
            search,
            position,
            events,
        } => {
            let options = ListOptions {
                search,
                position,
                match_events: events,
            };
            cmd_list(&client()?, options, printer).await
        }
        Commands::Positions => cmd_positions(&client()?, printer).await,
        Commands::Add { record } => cmd_add(&client()?, record, printer).await,
        Commands::Edit {
            serial_number,
            password,
            record,
        } => cmd_edit(&client()?, &serial_number, password, record, printer).await,
        Commands::Delete {
            serial_number,
            password,
        } => cmd_delete(&client()?, &serial_number, password, printer).await,
        Commands::Serve {
            port,
            data,
            tls_cert,
            tls_key,
        } => {
            cmd_serve(ServeOptions {
                port,
                data,
                admin_password: std::env::var("CERTDESK_ADMIN_PASSWORD").ok(),
                tls_cert,
                tls_key,
            })
            .await
        }
    }
}

/// Diagnostics go to stderr so stdout stays clean for results. Failures
/// are already reported by `report_error`, so by default only errors the
/// user would not otherwise see are logged.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "off",
        (false, false) => "error",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
    }
}
