//! forticonf - FortiGate-style configuration checker and formatter
//!
//! # Usage
//!
//! ```bash
//! forticonf check fw.conf                  # Report validation issues
//! forticonf check fw.conf --strict         # Exit non-zero on any issue
//! forticonf fmt fw.conf                    # Print canonical text
//! forticonf fmt fw.conf --diff             # Show what formatting would change
//! forticonf fmt fw.conf --in-place         # Rewrite the file atomically
//! forticonf export fw.conf --format json   # Dump the parsed snapshot as JSON
//! forticonf fingerprint fw.conf            # SHA-256 of the formatted text
//! ```
//!
//! Logging goes to stderr; `-v` enables debug output.

use clap::{Parser, Subcommand, ValueEnum};
use forticonf::{DialectConfig, Snapshot, load_config};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

#[derive(Parser)]
#[command(name = "forticonf")]
#[command(about = "Parse, validate and format FortiGate-style configuration", long_about = None)]
struct Cli {
    /// Dialect settings file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and list issues
    Check {
        file: PathBuf,
        /// Fail when any issue is found
        #[arg(long)]
        strict: bool,
    },
    /// Rewrite a configuration file in canonical form
    Fmt {
        file: PathBuf,
        /// Print a diff against the file instead of the formatted text
        #[arg(long, conflicts_with = "in_place")]
        diff: bool,
        /// Replace the file with its formatted text
        #[arg(short, long)]
        in_place: bool,
    },
    /// Export a configuration file as canonical text or JSON
    Export {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Conf)]
        format: ExportFormat,
    },
    /// Print the fingerprint of a configuration file
    Fingerprint { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Conf,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_snapshot(path: &Path) -> Result<(String, Snapshot), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let snapshot = Snapshot::parse(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok((text, snapshot))
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config: DialectConfig = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { file, strict } => {
            let (_, snapshot) = read_snapshot(&file)?;
            let issues = snapshot.validate_with(&config);
            for issue in &issues {
                println!("{issue}");
            }
            println!(
                "{}: {} entities, {} issues",
                file.display(),
                snapshot.len(),
                issues.len()
            );
            if strict && !issues.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Fmt {
            file,
            diff,
            in_place,
        } => {
            let (text, snapshot) = read_snapshot(&file)?;
            let formatted = snapshot.to_text_with(&config);

            if diff {
                let changes = similar::TextDiff::from_lines(&text, &formatted);
                let original = file.display().to_string();
                let formatted_name = format!("{original} (formatted)");
                let mut unified = changes.unified_diff();
                unified.header(&original, &formatted_name);
                print!("{unified}");
            } else if in_place {
                if formatted == text {
                    debug!("{} already formatted", file.display());
                } else {
                    forticonf::utils::write_atomic(&file, &formatted)?;
                }
            } else {
                print!("{formatted}");
            }
        }
        Commands::Export { file, format } => {
            let (_, snapshot) = read_snapshot(&file)?;
            match format {
                ExportFormat::Conf => print!("{}", snapshot.to_text_with(&config)),
                ExportFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            }
        }
        Commands::Fingerprint { file } => {
            let (_, snapshot) = read_snapshot(&file)?;
            println!("{}  {}", snapshot.fingerprint_with(&config), file.display());
        }
    }

    Ok(ExitCode::SUCCESS)
}
