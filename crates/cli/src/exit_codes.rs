//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts rely on them, so a code never changes meaning once shipped.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | Reserved (never returned by qdedup)                   |
//! | 2    | CLI usage error (bad args)                            |
//! | 3    | Config file invalid                                   |
//! | 4    | Input format not supported (not .csv / .xlsx)         |
//! | 5    | Runtime error (unreadable input, missing column, IO)  |
//! | 6    | Pairs were skipped and `fail_on_skipped` is set       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant below
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use qdedup_io::IoError;
use qdedup_recon::DedupError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Input extension is neither `.csv` nor `.xlsx`. Nothing was read.
pub const EXIT_UNSUPPORTED_INPUT: u8 = 4;

/// Input unreadable, required column missing, or reports not writable.
pub const EXIT_RUNTIME: u8 = 5;

/// The run completed but left skipped pairs, with `fail_on_skipped = true`.
/// Reports are still written.
pub const EXIT_SKIPPED: u8 = 6;

/// Map a core error to its exit code.
pub fn dedup_exit_code(err: &DedupError) -> u8 {
    match err {
        DedupError::ConfigParse(_) | DedupError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        DedupError::MissingColumn { .. } | DedupError::Input(_) => EXIT_RUNTIME,
    }
}

/// Map an io-layer error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::UnsupportedFormat { .. } => EXIT_UNSUPPORTED_INPUT,
        IoError::Table(inner) => dedup_exit_code(inner),
        IoError::Read { .. } | IoError::Write { .. } | IoError::Workbook(_) => EXIT_RUNTIME,
    }
}
