use std::collections::BTreeMap;

use crate::consolidate::Consolidation;
use crate::model::{DedupSummary, PriorityTier, ResolutionOutcome, SkippedPair};

/// Compute summary statistics from per-pair results and their consolidation.
pub fn compute_summary(
    total_pairs: usize,
    outcomes: &[ResolutionOutcome],
    skipped: &[SkippedPair],
    consolidation: &Consolidation,
) -> DedupSummary {
    let mut skipped_by_reason: BTreeMap<String, usize> = BTreeMap::new();
    for s in skipped {
        *skipped_by_reason.entry(s.reason.code().to_string()).or_insert(0) += 1;
    }

    let mut selected_by_tier = tier_counts();
    for o in outcomes {
        *selected_by_tier.entry(o.selected_priority.label().to_string()).or_insert(0) += 1;
    }

    let mut mapping_by_tier = tier_counts();
    for (_, tier) in consolidation.mapping.iter() {
        *mapping_by_tier.entry(tier.label().to_string()).or_insert(0) += 1;
    }

    let rejected = consolidation.selections.len();
    DedupSummary {
        total_pairs,
        resolved: outcomes.len(),
        skipped: skipped.len(),
        skipped_by_reason,
        distinct_questions: consolidation.mapping.len(),
        survivors: consolidation.mapping.len() - rejected,
        rejected,
        conflicting_observations: consolidation.conflicting_observations,
        corrected_selections: consolidation.corrected_selections,
        selected_by_tier,
        mapping_by_tier,
    }
}

/// Every tier label present, zero-filled, so reports have stable keys.
fn tier_counts() -> BTreeMap<String, usize> {
    PriorityTier::ALL
        .iter()
        .map(|t| (t.label().to_string(), 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;
    use crate::model::{PairSides, SkipReason, Side};

    fn outcome(row: usize, sel: &str, rej: &str, sp: PriorityTier, rp: PriorityTier) -> ResolutionOutcome {
        ResolutionOutcome {
            row,
            selected_id: sel.into(),
            rejected_id: rej.into(),
            selected_priority: sp,
            rejected_priority: rp,
            chosen: Side::Left,
        }
    }

    #[test]
    fn summary_counts() {
        let outcomes = vec![
            outcome(1, "a", "b", PriorityTier::JeeAdvanced, PriorityTier::Ncert),
            outcome(2, "b", "c", PriorityTier::Ncert, PriorityTier::Other),
            outcome(3, "d", "e", PriorityTier::JeeMains, PriorityTier::JeeMains),
        ];
        let skipped = vec![
            SkippedPair {
                row: 4,
                reason: SkipReason::IdentifierNotFound { sides: PairSides::Left },
            },
            SkippedPair {
                row: 5,
                reason: SkipReason::IdentifierNotFound { sides: PairSides::Both },
            },
            SkippedPair {
                row: 6,
                reason: SkipReason::SameIdentifier { identifier: "f".into() },
            },
        ];
        let consolidation = consolidate(&outcomes);
        let summary = compute_summary(6, &outcomes, &skipped, &consolidation);

        assert_eq!(summary.total_pairs, 6);
        assert_eq!(summary.resolved, 3);
        assert_eq!(summary.skipped, 3);
        assert_eq!(summary.skipped_by_reason["identifier_not_found"], 2);
        assert_eq!(summary.skipped_by_reason["same_identifier"], 1);
        assert_eq!(summary.distinct_questions, 5);
        assert_eq!(summary.survivors, 2);
        assert_eq!(summary.rejected, 3);
        assert_eq!(summary.corrected_selections, 1);
        assert_eq!(summary.selected_by_tier["JEE Advanced"], 1);
        assert_eq!(summary.selected_by_tier["NCERT"], 1);
        assert_eq!(summary.selected_by_tier["Plain/Other"], 0);
        assert_eq!(summary.mapping_by_tier["JEE Mains"], 2);
    }
}
