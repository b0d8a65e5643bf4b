use std::fmt;

use qdedup_recon::DedupError;

#[derive(Debug)]
pub enum IoError {
    /// Input file extension is neither `.csv` nor `.xlsx`.
    UnsupportedFormat { path: String, extension: String },
    /// File could not be opened or read.
    Read { path: String, message: String },
    /// Output could not be written.
    Write { path: String, message: String },
    /// Workbook-level failure (missing sheet, empty workbook, etc.).
    Workbook(String),
    /// The table was read but its contents are unusable.
    Table(DedupError),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path, extension } if extension.is_empty() => {
                write!(f, "{path}: unsupported input format (expected .csv or .xlsx)")
            }
            Self::UnsupportedFormat { path, extension } => {
                write!(f, "{path}: unsupported input format '.{extension}' (expected .csv or .xlsx)")
            }
            Self::Read { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::Write { path, message } => write!(f, "cannot write {path}: {message}"),
            Self::Workbook(msg) => write!(f, "workbook error: {msg}"),
            Self::Table(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for IoError {}

impl From<DedupError> for IoError {
    fn from(e: DedupError) -> Self {
        Self::Table(e)
    }
}
