//! `artpath`: browse Artifactory repositories like a filesystem

mod commands;

use anyhow::{Context, Result};
use artpath_core::ArtConfig;
use artpath_telemetry::{TelemetryOptions, init_telemetry};
use clap::{Parser, Subcommand};
use commands::Target;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "artpath", version, about = "Browse Artifactory repositories like a filesystem")]
struct Cli {
    /// Configuration file (defaults to artpath.toml in the working directory or a parent)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the configured server base URI
    #[arg(long, global = true, value_name = "URI")]
    base_uri: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the storage status of a file or folder as JSON
    Stat { path: String },

    /// List a folder
    Ls {
        path: String,

        /// Show type and size for each entry
        #[arg(short, long)]
        long: bool,
    },

    /// Write a file to stdout
    Cat {
        path: String,

        /// Start reading at this byte offset
        #[arg(long, requires = "length")]
        offset: Option<u64>,

        /// Read at most this many bytes
        #[arg(long)]
        length: Option<u64>,
    },

    /// Walk a folder tree
    Walk {
        path: String,

        /// Visit children before their parents
        #[arg(long)]
        bottom_up: bool,
    },

    /// Find descendants matching a glob pattern (`*`, `?`, `[...]`, `**`)
    Glob { path: String, pattern: String },

    /// Print the download and storage URIs of a path
    Uri { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => ArtConfig::load_from(path)?,
        None => ArtConfig::load()?,
    };

    let options = TelemetryOptions::new(
        cli.json_logs || config.observability.json_logs,
        config.observability.log_filter.clone(),
    );
    init_telemetry(&options).context("Failed to initialize logging")?;

    let session = config
        .session()
        .context("Failed to build HTTP session from configuration")?;
    let base_uri = cli
        .base_uri
        .clone()
        .or_else(|| config.server.base_uri.clone());
    debug!(
        base_uri = base_uri.as_deref().unwrap_or("<unset>"),
        auth = config.auth.method(),
        "Configuration loaded"
    );
    let target = Target::new(base_uri, session);

    let mut stdout = tokio::io::stdout();
    match cli.command {
        Command::Stat { path } => commands::stat(&target, &path, &mut stdout).await,
        Command::Ls { path, long } => commands::ls(&target, &path, long, &mut stdout).await,
        Command::Cat {
            path,
            offset,
            length,
        } => commands::cat(&target, &path, offset, length, &mut stdout).await,
        Command::Walk { path, bottom_up } => {
            commands::walk(&target, &path, !bottom_up, &mut stdout).await
        }
        Command::Glob { path, pattern } => {
            commands::glob(&target, &path, &pattern, &mut stdout).await
        }
        Command::Uri { path } => commands::uri(&target, &path, &mut stdout).await,
    }
}
