//! `journal` -- check lesson-journal spreadsheets before submission.
//!
//! ```text
//! journal check journal.xls
//! journal check journal.xlsx --format json --config autumn.yaml
//! journal rules
//! journal config > limits.yaml
//! ```
//!
//! Exit codes: `0` valid, `1` problems found, `2` the file or config could
//! not be used. Set `RUST_LOG` to override the log filter.

mod render;
mod sheet;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use journal_core::{EngineConfig, ValidationEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::sheet::{load_table, UploadPolicy};

/// Upper bound for `--max-size-mb` (1 TiB).
const MAX_SIZE_MB: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "journal")]
#[command(about = "Check lesson-journal spreadsheets against the school's rules")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a journal file
    Check {
        /// Spreadsheet to check (.xls, .xlsx, .xlsm, .ods or .csv)
        file: PathBuf,

        /// YAML or JSON file overriding the default limits
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Print the table with flagged cells marked
        #[arg(long)]
        show_table: bool,

        /// Largest accepted file, in megabytes
        #[arg(
            long,
            default_value_t = 16,
            value_parser = clap::value_parser!(u64).range(1..=MAX_SIZE_MB)
        )]
        max_size_mb: u64,
    },

    /// List the rules that will be applied
    Rules {
        /// YAML or JSON file overriding the default limits
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as YAML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "journal=debug,journal_core=debug"
    } else {
        "journal=warn,journal_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn megabytes(mb: u64) -> u64 {
    mb.saturating_mul(1024 * 1024)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::from_file(path)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Check {
            file,
            config,
            format,
            show_table,
            max_size_mb,
        } => {
            let config = load_config(config.as_deref())?;
            let policy = UploadPolicy::default().with_max_bytes(megabytes(max_size_mb));
            let table = load_table(&file, &policy)
                .with_context(|| format!("Cannot use {}", file.display()))?;

            let verdict = ValidationEngine::new(&config).validate(&table);
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());

            match format {
                Format::Text => print!("{}", render::text_report(&name, &table, &verdict)),
                Format::Json => println!("{}", render::json_report(&name, &table, &verdict)?),
            }
            if show_table {
                println!();
                print!("{}", render::grid(&table, &verdict));
            }

            Ok(if verdict.is_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Command::Rules { config } => {
            let config = load_config(config.as_deref())?;
            let engine = ValidationEngine::new(&config);
            for rule in engine.rules() {
                println!("{:<18} {}", rule.id(), rule.description());
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Config => {
            print!("{}", EngineConfig::default().to_yaml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_args() {
        let cli = Cli::try_parse_from(["journal", "check", "j.xls", "--format", "json"]).unwrap();
        match cli.command {
            Command::Check { file, format, max_size_mb, .. } => {
                assert_eq!(file, PathBuf::from("j.xls"));
                assert!(matches!(format, Format::Json));
                assert_eq!(max_size_mb, 16);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_max_size_out_of_range_rejected() {
        let huge = u64::MAX.to_string();
        let result = Cli::try_parse_from(["journal", "check", "j.csv", "--max-size-mb", &huge]);
        assert!(result.is_err());

        let zero = Cli::try_parse_from(["journal", "check", "j.csv", "--max-size-mb", "0"]);
        assert!(zero.is_err());

        let cli = Cli::try_parse_from(["journal", "check", "j.csv", "--max-size-mb", "1048576"])
            .unwrap();
        assert!(matches!(cli.command, Command::Check { max_size_mb: MAX_SIZE_MB, .. }));
    }

    #[test]
    fn test_megabytes_saturates() {
        assert_eq!(megabytes(16), 16 * 1024 * 1024);
        assert_eq!(megabytes(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_missing_config_is_error() {
        assert!(load_config(Some(Path::new("does-not-exist.yaml"))).is_err());
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
