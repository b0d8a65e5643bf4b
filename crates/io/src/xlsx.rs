// Excel import/export

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use qdedup_recon::config::{DedupConfig, InputConfig};
use qdedup_recon::engine::pairs_from_table;
use qdedup_recon::model::{DedupResult, QuestionPair};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use serde::Serialize;

use crate::error::IoError;
use crate::report::{
    consolidated_rows, mapping_rows, selection_rows, ConsolidatedRow, MappingRow, SelectionRow,
};

/// Header row plus data rows of one worksheet, every cell as display text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read one worksheet (the first when `sheet` is `None`).
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, IoError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| IoError::Read {
        path: path.display().to_string(),
        message: format!("Failed to open Excel file: {e}"),
    })?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .cloned()
            .ok_or_else(|| {
                IoError::Workbook(format!(
                    "sheet '{name}' not found (available: {})",
                    sheet_names.join(", ")
                ))
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| IoError::Workbook("Excel file contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| IoError::Workbook(format!("Failed to read sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows().map(|r| r.iter().map(cell_text).collect::<Vec<_>>());
    let headers = rows.next().unwrap_or_default();
    let rows: Vec<Vec<String>> = rows.filter(|r| r.iter().any(|c| !c.is_empty())).collect();

    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "worksheet read");
    Ok(Table {
        sheet: sheet_name,
        headers,
        rows,
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Load duplicate pairs from an `.xlsx` workbook.
pub fn load_pairs(path: &Path, input: &InputConfig) -> Result<Vec<QuestionPair>, IoError> {
    let table = read_table(path, input.sheet.as_deref())?;
    Ok(pairs_from_table(&table.headers, table.rows, input)?)
}

/// Convert one worksheet to CSV. Defaults to the input path with a `.csv`
/// extension. Returns the path written.
pub fn convert_to_csv(
    path: &Path,
    output: Option<&Path>,
    sheet: Option<&str>,
) -> Result<PathBuf, IoError> {
    let table = read_table(path, sheet)?;
    let out = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.with_extension("csv"));
    crate::csv::write_table(&out, &table.headers, &table.rows)?;
    tracing::info!(from = %path.display(), to = %out.display(), "converted workbook to CSV");
    Ok(out)
}

// ---------------------------------------------------------------------------
// Report workbook
// ---------------------------------------------------------------------------

/// Write the selection, mapping and consolidated tables as three sheets of
/// one workbook in `dir`. Returns the path written.
pub fn write_report_workbook(
    result: &DedupResult,
    config: &DedupConfig,
    dir: &Path,
) -> Result<PathBuf, IoError> {
    let path = dir.join(&config.output.workbook_file);
    let xlsx_err = |e: XlsxError| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    std::fs::create_dir_all(dir).map_err(|e| IoError::Write {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let header = Format::new().set_bold();
    let mut workbook = XlsxWorkbook::new();

    write_sheet(
        workbook.add_worksheet(),
        "Selections",
        SelectionRow::HEADERS,
        &selection_rows(result, &config.input),
        &header,
    )
    .map_err(xlsx_err)?;
    write_sheet(
        workbook.add_worksheet(),
        "Priority Mapping",
        MappingRow::HEADERS,
        &mapping_rows(result),
        &header,
    )
    .map_err(xlsx_err)?;
    write_sheet(
        workbook.add_worksheet(),
        "Consolidated",
        ConsolidatedRow::HEADERS,
        &consolidated_rows(result, &config.input),
        &header,
    )
    .map_err(xlsx_err)?;

    workbook.save(&path).map_err(xlsx_err)?;
    tracing::info!(path = %path.display(), "report workbook written");
    Ok(path)
}

/// Bold header row first, then rows through serde in field order. Numbers
/// and booleans stay typed cells.
fn write_sheet<T: Serialize>(
    worksheet: &mut Worksheet,
    name: &str,
    headers: &[&str],
    rows: &[T],
    header: &Format,
) -> Result<(), XlsxError> {
    worksheet.set_name(name)?;
    for (col, title) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let serde_json::Value::Object(fields) = serde_json::to_value(row)
            .map_err(|e| XlsxError::ParameterError(e.to_string()))?
        else {
            continue;
        };

        let excel_row = (i + 1) as u32;
        for (col, value) in fields.values().enumerate() {
            let col = col as u16;
            match value {
                serde_json::Value::Number(n) => {
                    worksheet.write_number(excel_row, col, n.as_f64().unwrap_or_default())?;
                }
                serde_json::Value::Bool(b) => {
                    worksheet.write_boolean(excel_row, col, *b)?;
                }
                serde_json::Value::String(s) => {
                    worksheet.write_string(excel_row, col, s)?;
                }
                other => {
                    worksheet.write_string(excel_row, col, other.to_string())?;
                }
            }
        }
    }
    Ok(())
}
