// File I/O operations

pub mod csv;
pub mod error;
pub mod json;
pub mod report;
pub mod xlsx;

use std::path::Path;

use qdedup_recon::config::InputConfig;
use qdedup_recon::model::QuestionPair;

pub use error::IoError;

/// Tabular formats a duplicate report can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Xlsx,
}

impl InputFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            _ => Err(IoError::UnsupportedFormat {
                path: path.display().to_string(),
                extension: ext,
            }),
        }
    }
}

/// Load every duplicate pair from a `.csv` or `.xlsx` file.
pub fn load_pairs(path: &Path, input: &InputConfig) -> Result<Vec<QuestionPair>, IoError> {
    let pairs = match InputFormat::from_path(path)? {
        InputFormat::Csv => csv::load_pairs(path, input)?,
        InputFormat::Xlsx => xlsx::load_pairs(path, input)?,
    };
    tracing::info!(path = %path.display(), pairs = pairs.len(), "loaded duplicate pairs");
    Ok(pairs)
}
