// JSON export

use std::path::Path;

use qdedup_recon::model::DedupResult;

use crate::error::IoError;

pub fn to_json(result: &DedupResult) -> Result<String, IoError> {
    serde_json::to_string_pretty(result).map_err(|e| IoError::Write {
        path: "<json>".into(),
        message: format!("JSON serialization error: {e}"),
    })
}

pub fn export(result: &DedupResult, path: &Path) -> Result<(), IoError> {
    let json = to_json(result)?;
    std::fs::write(path, json).map_err(|e| IoError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
