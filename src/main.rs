use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use pathlink::commands::{self, LinksAction, OutputFormat};
use pathlink::{diagnostics, error};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PATHLINK_LOG=debug`.
const LOG_ENV: &str = "PATHLINK_LOG";

#[derive(Parser)]
#[command(name = "pathlink", about = "Find and resolve file paths in markdown and MDX")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the path grammar, resolution rules, and current config
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Switch link scanning on or off (open keeps working either way)
    Links {
        /// What to do with the toggle
        #[arg(value_enum, default_value = "status")]
        action: LinksAction,
    },
    /// Resolve the path under a cursor and print it
    Open {
        /// Document containing the cursor
        file: PathBuf,
        /// One-based line number
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        line: usize,
        /// One-based character column
        #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        column: usize,
        /// Workspace root (repeatable; the first anchors `/` paths)
        #[arg(long = "workspace")]
        workspace: Vec<PathBuf>,
    },
    /// Show how a token resolves from a document
    Resolve {
        /// Path token as written in the document
        token: String,
        /// Document the token appears in
        #[arg(long)]
        from: PathBuf,
        /// Workspace root (repeatable; the first anchors `/` paths)
        #[arg(long = "workspace")]
        workspace: Vec<PathBuf>,
    },
    /// List every link whose target exists
    Scan {
        /// Files or directories to scan (default: current directory)
        paths: Vec<PathBuf>,
        /// Workspace root (repeatable; the first anchors `/` paths)
        #[arg(long = "workspace")]
        workspace: Vec<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Info { json } => commands::info(json).map(|()| return ExitCode::SUCCESS),
        Commands::Links { action } => commands::links(action).map(|()| return ExitCode::SUCCESS),
        Commands::Open { file, line, column, workspace } => {
            commands::open(&file, line, column, &workspace).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Resolve { token, from, workspace } => commands::resolve(&token, &from, &workspace),
        Commands::Scan { paths, workspace, format } => {
            commands::scan(&paths, &workspace, format).map(|()| return ExitCode::SUCCESS)
        },
    };

    return match result {
        Ok(code) => code,
        Err(e) => exit_with_error(&e),
    };
}

/// Print the diagnostic and pick the exit code: 1 for "nothing there", 2 otherwise.
fn exit_with_error(e: &error::Error) -> ExitCode {
    diagnostics::print_error(e);
    if e.is_not_found() {
        return ExitCode::from(1);
    }
    return ExitCode::from(2);
}

/// Log to stderr so stdout stays clean for paths and JSON.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
