//! appseed CLI tool

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use appseed::observability::{self, ObservabilityConfig};
use clap::{Parser, Subcommand};
use commands::{ConfigCommand, CreateCommand, StockCommand};

#[derive(Parser)]
#[command(name = "appseed")]
#[command(version)]
#[command(about = "Create mobile app projects from templates", long_about = None)]
struct Cli {
    /// Show detailed progress and debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Settings file layered above the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    Create {
        /// Destination directory (must be absent or empty)
        path: PathBuf,
        /// App id in reverse-domain form, e.g. `org.example.hello`
        id: Option<String>,
        /// Display name
        name: Option<String>,
        /// Template: local path, npm package or git URL
        #[arg(short, long)]
        template: Option<String>,
        /// Symlink template content instead of copying it
        #[arg(long)]
        link: bool,
    },
    /// Inspect or rebuild the bundled stock template
    Stock {
        #[command(subcommand)]
        command: StockCommands,
    },
    /// Print the effective settings as TOML
    Config,
}

#[derive(Subcommand)]
enum StockCommands {
    /// Print the stock template directory
    Path,
    /// Rewrite the unpacked stock template
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _scratch = appseed::cleanup_guard();

    observability::init(
        &ObservabilityConfig::default()
            .with_verbose(cli.verbose)
            .with_json(cli.json_logs),
    )?;

    let settings = commands::load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Create {
            path,
            id,
            name,
            template,
            link,
        } => {
            let cmd = CreateCommand {
                path,
                id,
                name,
                template,
                link,
                verbose: cli.verbose,
                json_logs: cli.json_logs,
            };
            cmd.execute(settings).await?;
        }
        Commands::Stock { command } => {
            let cmd = match command {
                StockCommands::Path => StockCommand::Path,
                StockCommands::Refresh => StockCommand::Refresh,
            };
            cmd.execute(&settings)?;
        }
        Commands::Config => {
            ConfigCommand::execute(&settings)?;
        }
    }

    Ok(())
}
