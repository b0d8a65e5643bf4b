//! `qdedup run | convert | validate`: load pairs, run the engine, write reports.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use qdedup_io::{InputFormat, IoError};
use qdedup_recon::model::{DedupInput, DedupResult, PriorityTier};
use qdedup_recon::DedupConfig;

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SKIPPED, EXIT_UNSUPPORTED_INPUT};
use crate::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Selection, mapping and consolidated report as three CSV files
    Csv,
    /// The same three tables as sheets of one workbook
    Xlsx,
}

/// Read and validate a config file; no path means the built-in defaults.
fn load_config(path: Option<&Path>) -> Result<DedupConfig, CliError> {
    let Some(path) = path else {
        return Ok(DedupConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(EXIT_RUNTIME, format!("cannot read config {}: {e}", path.display()))
    })?;
    let config = DedupConfig::from_toml(&config_str).map_err(|e| {
        CliError::new(EXIT_INVALID_CONFIG, format!("{}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), name = %config.name, "config loaded");
    Ok(config)
}

// ============================================================================
// run
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn cmd_run(
    input_path: PathBuf,
    config_path: Option<PathBuf>,
    out_dir: PathBuf,
    format: ReportFormat,
    json_output: bool,
    output_file: Option<PathBuf>,
    csv_copy: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    let input_format = InputFormat::from_path(&input_path)?;
    if csv_copy && input_format != InputFormat::Xlsx {
        return Err(CliError::args("--csv-copy needs an .xlsx input")
            .with_hint("the input is already CSV; drop --csv-copy"));
    }

    let pairs = qdedup_io::load_pairs(&input_path, &config.input)?;
    let result = qdedup_recon::run(&config, &DedupInput { pairs })?;

    if csv_copy {
        std::fs::create_dir_all(&out_dir).map_err(|e| {
            CliError::new(EXIT_RUNTIME, format!("cannot create {}: {e}", out_dir.display()))
        })?;
        let file_name = input_path.with_extension("csv");
        let file_name = file_name.file_name().unwrap_or_default();
        let written = qdedup_io::xlsx::convert_to_csv(
            &input_path,
            Some(&out_dir.join(file_name)),
            config.input.sheet.as_deref(),
        )?;
        eprintln!("wrote {}", written.display());
    }

    let written = match format {
        ReportFormat::Csv => qdedup_io::report::write_csv_reports(&result, &config, &out_dir)?,
        ReportFormat::Xlsx => {
            vec![qdedup_io::xlsx::write_report_workbook(&result, &config, &out_dir)?]
        }
    };
    for path in &written {
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = output_file {
        qdedup_io::json::export(&result, path)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{}", qdedup_io::json::to_json(&result)?);
    }

    print_summary(&result);

    let skipped = result.summary.skipped;
    if skipped > 0 && config.fail_on_skipped {
        return Err(CliError::new(
            EXIT_SKIPPED,
            format!("{skipped} pair(s) skipped (fail_on_skipped)"),
        )
        .with_hint("run with -vv to see the row and reason of each skip"));
    }

    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &DedupResult) {
    let s = &result.summary;
    eprintln!(
        "dedup: {} pairs: {} resolved, {} skipped",
        s.total_pairs, s.resolved, s.skipped,
    );

    if !s.skipped_by_reason.is_empty() {
        let reasons: Vec<String> = s
            .skipped_by_reason
            .iter()
            .map(|(code, n)| format!("{code} {n}"))
            .collect();
        eprintln!("  skipped: {}", reasons.join(", "));
    }

    eprintln!(
        "questions: {} distinct, {} kept, {} rejected",
        s.distinct_questions, s.survivors, s.rejected,
    );

    let tiers: Vec<String> = PriorityTier::ALL
        .iter()
        .map(|tier| {
            let n = s.selected_by_tier.get(tier.label()).copied().unwrap_or(0);
            format!("{} {n}", tier.label())
        })
        .collect();
    eprintln!("  selected by priority: {}", tiers.join(", "));

    if s.conflicting_observations > 0 || s.corrected_selections > 0 {
        eprintln!(
            "  reconciled: {} question(s) seen at more than one priority, {} selection(s) corrected",
            s.conflicting_observations, s.corrected_selections,
        );
    }
}

// ============================================================================
// convert
// ============================================================================

pub fn cmd_convert(
    input_path: PathBuf,
    output: Option<PathBuf>,
    sheet: Option<String>,
) -> Result<(), CliError> {
    match InputFormat::from_path(&input_path) {
        Ok(InputFormat::Xlsx) => {}
        Ok(InputFormat::Csv) => {
            return Err(CliError::new(
                EXIT_UNSUPPORTED_INPUT,
                format!("{} is already CSV", input_path.display()),
            ))
        }
        Err(e @ IoError::UnsupportedFormat { .. }) => {
            return Err(CliError::from(e).with_hint("convert reads .xlsx workbooks"))
        }
        Err(e) => return Err(e.into()),
    }

    let written =
        qdedup_io::xlsx::convert_to_csv(&input_path, output.as_deref(), sheet.as_deref())?;
    eprintln!("wrote {}", written.display());
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    eprintln!(
        "valid: '{}' reading {} / {}, dates as {}",
        config.name, config.input.left_column, config.input.right_column, config.output.date_format,
    );
    Ok(())
}
