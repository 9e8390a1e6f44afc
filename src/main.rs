use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use v2x_delivery::config::Config;
use v2x_delivery::pipeline::{analyze_files, Variant};
use v2x_delivery::report::{render, ReportFormat};

/// Message delivery analysis for V2X simulation logs.
#[derive(Parser)]
#[command(name = "v2x-delivery", about)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Logging verbosity level (trace, debug, info, warn, error).
    /// Overrides the configuration file. Logs go to stderr.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Report format. Overrides the configuration file.
    #[arg(long, value_enum, global = true)]
    format: Option<ReportFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Correlate roadside triggers (GPS log) with DENM receptions (LDM log).
    V2i(LogPair),

    /// Correlate sent CAM beacons (CAM log) with CAM receptions (LDM log).
    V2v(LogPair),

    /// Print version information and exit.
    Version,
}

#[derive(Args)]
struct LogPair {
    /// Send-side log file.
    sent: PathBuf,

    /// Receive-side log file.
    received: PathBuf,
}

/// Build-time version info, injected via RUSTFLAGS.
mod version {
    /// Release version string (set at build time).
    pub const RELEASE: &str = env!("CARGO_PKG_VERSION");

    /// Git commit hash (set at build time via env, or "unknown").
    pub fn git_commit() -> &'static str {
        option_env!("GIT_COMMIT").unwrap_or("unknown")
    }

    /// Full version string with platform info.
    pub fn full() -> String {
        format!(
            "{} (commit: {}, {}/{})",
            RELEASE,
            git_commit(),
            std::env::consts::OS,
            std::env::consts::ARCH,
        )
    }
}

fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_error(err),
    };

    let (variant, logs) = match cli.command {
        Command::Version => {
            println!("v2x-delivery {}", version::full());
            return Ok(ExitCode::SUCCESS);
        }
        Command::V2i(logs) => (Variant::V2i, logs),
        Command::V2v(logs) => (Variant::V2v, logs),
    };

    let mut cfg = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(format) = cli.format {
        cfg.report.format = format;
    }

    // Initialize tracing. Stdout carries the report only.
    let log_level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("invalid log level: {log_level}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        version = version::RELEASE,
        commit = version::git_commit(),
        variant = %variant,
        "starting v2x-delivery",
    );

    let analysis = analyze_files(variant, &cfg.markers, &logs.sent, &logs.received)?;
    let report = render(&analysis, &cfg.report)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .context("writing report")?;

    Ok(ExitCode::SUCCESS)
}

/// Help and version requests exit 0; any other argument error prints the
/// message with usage to stdout and exits 1 before any log is opened.
fn usage_error(err: clap::Error) -> Result<ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print().context("printing help")?;
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            print!("{}", err.render());
            Ok(ExitCode::FAILURE)
        }
    }
}
