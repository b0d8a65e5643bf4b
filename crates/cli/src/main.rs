// qdedup - arbitrate duplicate question pairs by exam priority

mod dedup;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dedup::ReportFormat;
use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "qdedup")]
#[command(about = "Pick one question from each duplicate pair by exam priority")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every duplicate pair in a report and write the selection tables
    #[command(after_help = "\
Examples:
  qdedup run Duplicate_Detection_Report.xlsx
  qdedup run pairs.csv --out-dir out/
  qdedup run pairs.csv --config physics.dedup.toml --format xlsx
  qdedup run pairs.csv --json > result.json
  qdedup run report.xlsx --csv-copy -v")]
    Run {
        /// Duplicate report (.csv or .xlsx) with one pair per row
        input: PathBuf,

        /// TOML config (column names, output file names, date format)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Directory for the report files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Report format: three CSV files or one workbook
        #[arg(long, value_enum, default_value = "csv")]
        format: ReportFormat,

        /// Print the full result as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Write the full result as JSON to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also save an .xlsx input as CSV in the output directory
        #[arg(long)]
        csv_copy: bool,
    },

    /// Convert a workbook sheet to CSV
    #[command(after_help = "\
Examples:
  qdedup convert Duplicate_Detection_Report.xlsx
  qdedup convert report.xlsx --output pairs.csv --sheet Duplicates")]
    Convert {
        /// Input workbook (.xlsx)
        input: PathBuf,

        /// Output CSV path (default: input path with .csv extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Sheet to convert (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  qdedup validate physics.dedup.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Log to stderr. RUST_LOG wins over `-v`; the default keeps stderr to
/// warnings so the human summary stays readable.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: qdedup <command> [options]");
            eprintln!("       qdedup --help for more information");
            Ok(())
        }
        Some(Commands::Run {
            input,
            config,
            out_dir,
            format,
            json,
            output,
            csv_copy,
        }) => dedup::cmd_run(input, config, out_dir, format, json, output, csv_copy),
        Some(Commands::Convert { input, output, sheet }) => dedup::cmd_convert(input, output, sheet),
        Some(Commands::Validate { config }) => dedup::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<qdedup_io::IoError> for CliError {
    fn from(err: qdedup_io::IoError) -> Self {
        let hint = match &err {
            qdedup_io::IoError::UnsupportedFormat { .. } => {
                Some("save the report as .csv or .xlsx".to_string())
            }
            qdedup_io::IoError::Table(qdedup_recon::DedupError::MissingColumn { .. }) => {
                Some("set [input] left_column / right_column in a --config file".to_string())
            }
            _ => None,
        };
        Self { code: exit_codes::io_exit_code(&err), message: err.to_string(), hint }
    }
}

impl From<qdedup_recon::DedupError> for CliError {
    fn from(err: qdedup_recon::DedupError) -> Self {
        Self::new(exit_codes::dedup_exit_code(&err), err.to_string())
    }
}
