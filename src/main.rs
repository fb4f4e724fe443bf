//! # RockBLOCK Decode
//!
//! Decode RockBLOCK relay email bodies into balloon telemetry reports.
//!
//! Reads one or more email bodies (files, or stdin with `-`), decodes each
//! into an envelope record and prints either a text report or JSON lines.
//! Fetching mail is left to whatever feeds this tool.
//!
//! # Examples
//!
//! ```bash
//! rockblock-decode message.txt
//! rockblock-decode --json --config rockblock.toml inbox/*.txt
//! rockblock-decode --hex 524200333f51...
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use rockblock_telemetry::config::{Config, LoggingConfig};
use rockblock_telemetry::envelope::record::EnvelopeRecord;
use rockblock_telemetry::telemetry::jsonl::write_json_line;

/// Characters of an email body logged when it fails to decode
const BODY_PREVIEW_CHARS: usize = 200;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "rockblock-decode", version)]
#[command(about = "Decode RockBLOCK relay emails into balloon telemetry")]
struct Cli {
    /// Email body files to decode ("-" reads stdin)
    #[arg(default_value = "-")]
    inputs: Vec<PathBuf>,

    /// Decode a bare hex payload instead of email bodies
    #[arg(long)]
    hex: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print JSON lines instead of text reports
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    // Keep the guard alive so buffered file logs are flushed on exit
    let _log_guard = init_logging(&config.logging).with_context(|| {
        format!("Failed to open log directory {}", config.logging.log_dir)
    })?;

    info!("RockBLOCK decoder v{} starting...", env!("CARGO_PKG_VERSION"));

    let parser = config.envelope_parser();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(hex) = &cli.hex {
        let frame = parser.decoder().decode_hex(hex);
        if !frame.is_valid {
            warn!("Payload did not decode to a valid frame");
        }

        if cli.json {
            serde_json::to_writer(&mut out, &frame)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", frame)?;
        }
        return Ok(());
    }

    let mut usable = 0usize;
    for input in &cli.inputs {
        let body = match read_input(input) {
            Ok(body) => body,
            Err(e) => {
                error!("{:#}", e);
                continue;
            }
        };

        let record = parser.parse(&body);
        if record.is_usable() {
            usable += 1;
        } else {
            warn!("Failed to parse valid telemetry from {}", input.display());
            info!("Body preview: {}", body_preview(&body));
        }

        emit(&mut out, &record, cli.json)?;
    }

    info!("Decoded {} of {} message(s)", usable, cli.inputs.len());

    Ok(())
}

/// Initialize tracing to stderr, or to a daily-rolling file when configured
///
/// `RUST_LOG` overrides the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.log_dir.is_empty() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return Ok(None);
    }

    let appender = file_appender(logging)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

/// Daily-rolling appender in `log_dir`, creating the directory if needed
fn file_appender(logging: &LoggingConfig) -> Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(logging.file_prefix.as_str())
        .build(&logging.log_dir)?;
    Ok(appender)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read email body from stdin")?;
        return Ok(body);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn emit<W: Write>(out: &mut W, record: &EnvelopeRecord, json: bool) -> Result<()> {
    if json {
        write_json_line(out, record)?;
    } else {
        writeln!(out, "{}\n", record)?;
    }
    Ok(())
}

fn body_preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
