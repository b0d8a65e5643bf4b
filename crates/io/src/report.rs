//! Report tables rendered from a [`DedupResult`].
//!
//! Three tables are produced: the per-pair selection table, the priority
//! mapping, and the consolidated report of reconciled selections.

use std::path::{Path, PathBuf};

use qdedup_recon::config::{DedupConfig, InputConfig};
use qdedup_recon::model::{DedupResult, Side};
use serde::Serialize;

use crate::error::IoError;

/// One row per resolved pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionRow {
    pub selected_question_id: String,
    pub rejected_question_id: String,
    pub selected_priority: u8,
    pub rejected_priority: u8,
    pub chosen: String,
}

impl SelectionRow {
    pub const HEADERS: &'static [&'static str] = &[
        "selected_question_id",
        "rejected_question_id",
        "selected_priority",
        "rejected_priority",
        "chosen",
    ];
}

/// One row per distinct identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRow {
    pub question_id: String,
    pub priority: u8,
    pub priority_label: String,
}

impl MappingRow {
    pub const HEADERS: &'static [&'static str] = &["question_id", "priority", "priority_label"];
}

/// One row per reconciled selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidatedRow {
    pub selected_question_id: String,
    pub rejected_question_id: String,
    pub selected_priority: u8,
    pub rejected_priority: u8,
    pub chosen: String,
    pub priority_label: String,
    pub corrected: bool,
    pub processing_date: String,
}

impl ConsolidatedRow {
    pub const HEADERS: &'static [&'static str] = &[
        "selected_question_id",
        "rejected_question_id",
        "selected_priority",
        "rejected_priority",
        "chosen",
        "priority_label",
        "corrected",
        "processing_date",
    ];
}

/// Reports name the chosen side after its source column.
fn side_column(side: Side, input: &InputConfig) -> String {
    match side {
        Side::Left => input.left_column.clone(),
        Side::Right => input.right_column.clone(),
    }
}

pub fn selection_rows(result: &DedupResult, input: &InputConfig) -> Vec<SelectionRow> {
    result
        .outcomes
        .iter()
        .map(|o| SelectionRow {
            selected_question_id: o.selected_id.clone(),
            rejected_question_id: o.rejected_id.clone(),
            selected_priority: o.selected_priority.value(),
            rejected_priority: o.rejected_priority.value(),
            chosen: side_column(o.chosen, input),
        })
        .collect()
}

pub fn mapping_rows(result: &DedupResult) -> Vec<MappingRow> {
    result
        .mapping
        .iter()
        .map(|(id, tier)| MappingRow {
            question_id: id.to_string(),
            priority: tier.value(),
            priority_label: tier.label().to_string(),
        })
        .collect()
}

pub fn consolidated_rows(result: &DedupResult, input: &InputConfig) -> Vec<ConsolidatedRow> {
    result
        .selections
        .iter()
        .map(|s| ConsolidatedRow {
            selected_question_id: s.selected_id.clone(),
            rejected_question_id: s.rejected_id.clone(),
            selected_priority: s.selected_priority.value(),
            rejected_priority: s.rejected_priority.value(),
            chosen: s.chosen.map(|side| side_column(side, input)).unwrap_or_default(),
            priority_label: s.selected_priority.label().to_string(),
            corrected: s.corrected,
            processing_date: result.meta.processing_date.clone(),
        })
        .collect()
}

/// Write the three CSV reports into `dir`. Returns the paths written.
pub fn write_csv_reports(
    result: &DedupResult,
    config: &DedupConfig,
    dir: &Path,
) -> Result<Vec<PathBuf>, IoError> {
    std::fs::create_dir_all(dir).map_err(|e| IoError::Write {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let out = &config.output;
    let selection_path = dir.join(&out.selection_file);
    let mapping_path = dir.join(&out.mapping_file);
    let report_path = dir.join(&out.report_file);

    crate::csv::write_rows(
        &selection_path,
        SelectionRow::HEADERS,
        &selection_rows(result, &config.input),
    )?;
    crate::csv::write_rows(&mapping_path, MappingRow::HEADERS, &mapping_rows(result))?;
    crate::csv::write_rows(
        &report_path,
        ConsolidatedRow::HEADERS,
        &consolidated_rows(result, &config.input),
    )?;

    for path in [&selection_path, &mapping_path, &report_path] {
        tracing::info!(path = %path.display(), "report written");
    }
    Ok(vec![selection_path, mapping_path, report_path])
}
