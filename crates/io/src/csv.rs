// CSV import/export

use std::path::Path;

use qdedup_recon::config::InputConfig;
use qdedup_recon::engine::load_csv_pairs;
use qdedup_recon::model::QuestionPair;
use serde::Serialize;

use crate::error::IoError;

/// Load duplicate pairs from a CSV file, sniffing the delimiter.
pub fn load_pairs(path: &Path, input: &InputConfig) -> Result<Vec<QuestionPair>, IoError> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content, input);
    Ok(load_csv_pairs(&content, delimiter, input)?)
}

/// Pick the delimiter from the header line alone. The first candidate that
/// splits it into both configured column names wins; otherwise the one giving
/// the most fields. Data rows are never consulted: question texts are full
/// of commas and semicolons.
pub fn sniff_delimiter(content: &str, input: &InputConfig) -> u8 {
    const CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

    let header = content
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches('\u{feff}');
    let fields = |delim: u8| -> Vec<String> {
        csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .from_reader(header.as_bytes())
            .records()
            .next()
            .and_then(|r| r.ok())
            .map(|r| r.iter().map(|f| f.trim().to_string()).collect())
            .unwrap_or_default()
    };

    let names_both = |delim: u8| {
        let fields = fields(delim);
        fields.contains(&input.left_column) && fields.contains(&input.right_column)
    };
    if let Some(delim) = CANDIDATES.into_iter().find(|&d| names_both(d)) {
        return delim;
    }

    // Reversed so that ties keep the earlier candidate.
    CANDIDATES
        .into_iter()
        .rev()
        .map(|d| (fields(d).len(), d))
        .filter(|(n, _)| *n > 1)
        .max_by_key(|(n, _)| *n)
        .map(|(_, d)| d)
        .unwrap_or(b',')
}

/// Read a duplicate report as text. Spreadsheet exports that are not valid
/// UTF-8 are decoded as Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let bytes = std::fs::read(path).map_err(|e| IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    String::from_utf8(bytes).or_else(|e| {
        let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(e.as_bytes());
        tracing::debug!(path = %path.display(), "input is not UTF-8, decoded as Windows-1252");
        Ok(decoded.into_owned())
    })
}

/// Write serializable rows under an explicit header, so an empty table
/// still names its columns.
pub fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<(), IoError> {
    let write_err = |e: csv::Error| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(write_err)?;
    writer.write_record(headers).map_err(write_err)?;
    for row in rows {
        writer.serialize(row).map_err(write_err)?;
    }
    writer.flush().map_err(|e| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Write a raw string table (header row first).
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<(), IoError> {
    let write_err = |e: csv::Error| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    };
    // Excel rows can be ragged; keep them as they are.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(write_err)?;
    writer.write_record(headers).map_err(write_err)?;
    for row in rows {
        writer.write_record(row).map_err(write_err)?;
    }
    writer.flush().map_err(|e| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}
