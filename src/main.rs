mod config;
mod document;
mod editor;
mod file;
mod keys;
mod prompt;
mod render;
mod search;
mod terminal;
mod view;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kilo", version, about = "Small terminal text editor")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// File to open; also the default save target
    file: Option<PathBuf>,

    /// TOML settings file (built-in defaults when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `kilo=trace`
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    if let Some(Commands::Config) = cli.command {
        print!("{}", config::render_config(&cfg)?);
        return Ok(());
    }

    if let Some(path) = cli.log_file.as_deref() {
        init_logging(path, &cli.log_level)?;
    }
    tracing::info!(file = ?cli.file, "starting");
    editor::run(cli.file, cfg)
}

/// Sends tracing output to `path`. The terminal is owned by the screen, so
/// nothing is ever logged to stdout or stderr.
fn init_logging(path: &Path, level: &str) -> Result<()> {
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("Invalid log level `{level}`"))?;
    let name = path
        .file_name()
        .with_context(|| format!("Log path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(appender))
        .try_init()
        .context("Failed to install log subscriber")
}
