use std::collections::BTreeMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the duplicate report: two texts asserted to be the same question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPair {
    /// 1-based data row in the source table (header excluded).
    pub row: usize,
    pub left: String,
    pub right: String,
}

impl QuestionPair {
    pub fn new(row: usize, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            row,
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Pre-loaded pairs, in source order.
#[derive(Debug, Clone, Default)]
pub struct DedupInput {
    pub pairs: Vec<QuestionPair>,
}

/// One side of a pair after its identifier was extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub identifier: String,
    pub source_text: String,
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Ordinal priority class. Lower value = higher priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum PriorityTier {
    JeeAdvanced = 1,
    JeeMains = 2,
    Ncert = 3,
    Other = 4,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 4] = [
        PriorityTier::JeeAdvanced,
        PriorityTier::JeeMains,
        PriorityTier::Ncert,
        PriorityTier::Other,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == value)
    }

    /// Human-readable name used in the `priority_label` report column.
    pub fn label(self) -> &'static str {
        match self {
            Self::JeeAdvanced => "JEE Advanced",
            Self::JeeMains => "JEE Mains",
            Self::Ncert => "NCERT",
            Self::Other => "Plain/Other",
        }
    }
}

impl From<PriorityTier> for u8 {
    fn from(tier: PriorityTier) -> u8 {
        tier.value()
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Pair resolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Which sides of a skipped pair carried the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairSides {
    Left,
    Right,
    Both,
}

impl std::fmt::Display for PairSides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// No "Question ID" marker on the given side(s).
    IdentifierNotFound { sides: PairSides },
    /// Marker present but not followed by exactly 24 hex characters.
    MalformedIdentifier { sides: PairSides },
    /// Both sides name the same question.
    SameIdentifier { identifier: String },
}

impl SkipReason {
    /// Stable reason code, used as the summary key.
    pub fn code(&self) -> &'static str {
        match self {
            Self::IdentifierNotFound { .. } => "identifier_not_found",
            Self::MalformedIdentifier { .. } => "malformed_identifier",
            Self::SameIdentifier { .. } => "same_identifier",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierNotFound { sides } => write!(f, "identifier not found ({sides})"),
            Self::MalformedIdentifier { sides } => write!(f, "malformed identifier ({sides})"),
            Self::SameIdentifier { identifier } => {
                write!(f, "both sides carry identifier {identifier}")
            }
        }
    }
}

/// The selected/rejected decision for one pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionOutcome {
    pub row: usize,
    pub selected_id: String,
    pub rejected_id: String,
    pub selected_priority: PriorityTier,
    pub rejected_priority: PriorityTier,
    pub chosen: Side,
}

impl ResolutionOutcome {
    pub fn left_id(&self) -> &str {
        match self.chosen {
            Side::Left => &self.selected_id,
            Side::Right => &self.rejected_id,
        }
    }

    pub fn right_id(&self) -> &str {
        match self.chosen {
            Side::Left => &self.rejected_id,
            Side::Right => &self.selected_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedPair {
    pub row: usize,
    pub reason: SkipReason,
}

// ---------------------------------------------------------------------------
// Consolidation
// ---------------------------------------------------------------------------

/// Identifier → best tier ever observed for it. One entry per identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PriorityMapping {
    entries: BTreeMap<String, PriorityTier>,
}

impl PriorityMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation. Keeps the lowest tier; returns `true` when the
    /// identifier had already been observed with a different tier.
    pub fn observe(&mut self, identifier: &str, tier: PriorityTier) -> bool {
        match self.entries.get_mut(identifier) {
            Some(existing) => {
                let disagrees = *existing != tier;
                if tier < *existing {
                    *existing = tier;
                }
                disagrees
            }
            None => {
                self.entries.insert(identifier.to_string(), tier);
                false
            }
        }
    }

    /// Merge another partial mapping into this one, lowest tier wins.
    pub fn merge(&mut self, other: &PriorityMapping) {
        for (id, tier) in &other.entries {
            self.observe(id, *tier);
        }
    }

    pub fn get(&self, identifier: &str) -> Option<PriorityTier> {
        self.entries.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PriorityTier)> {
        self.entries.iter().map(|(id, tier)| (id.as_str(), *tier))
    }
}

/// A reconciled selected/rejected designation. Within a result, no
/// identifier is both a `selected_id` and a `rejected_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalSelection {
    pub selected_id: String,
    pub rejected_id: String,
    pub selected_priority: PriorityTier,
    pub rejected_priority: PriorityTier,
    /// Side the survivor occupied in the pair that linked the two directly.
    /// `None` when they are only linked through other pairs.
    pub chosen: Option<Side>,
    /// No input pair produced this exact designation.
    pub corrected: bool,
    /// Rows of every resolved pair the rejected identifier took part in.
    pub source_rows: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct DedupSummary {
    pub total_pairs: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub skipped_by_reason: BTreeMap<String, usize>,
    pub distinct_questions: usize,
    pub survivors: usize,
    pub rejected: usize,
    /// Identifiers observed with more than one tier across pairs.
    pub conflicting_observations: usize,
    pub corrected_selections: usize,
    /// Per-pair selected tier distribution, keyed by label.
    pub selected_by_tier: BTreeMap<String, usize>,
    /// Final mapping distribution, keyed by label.
    pub mapping_by_tier: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    /// Date stamped on every consolidated report row.
    pub processing_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub meta: DedupMeta,
    pub summary: DedupSummary,
    pub outcomes: Vec<ResolutionOutcome>,
    pub skipped: Vec<SkippedPair>,
    pub mapping: PriorityMapping,
    pub selections: Vec<FinalSelection>,
}
