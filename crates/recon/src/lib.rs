//! `qdedup-recon`: Duplicate question arbitration engine.
//!
//! Pure engine crate: receives pre-loaded question pairs, returns the
//! per-pair decisions, the reconciled priority mapping and a summary.
//! No CLI or file IO dependencies.

pub mod classify;
pub mod config;
pub mod consolidate;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod extract;
pub mod model;
pub mod resolve;

pub use config::DedupConfig;
pub use engine::run;
pub use error::DedupError;
pub use model::{DedupInput, DedupResult, PriorityTier, QuestionPair};
