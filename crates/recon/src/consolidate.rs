//! Cross-pair consolidation.
//!
//! Pairs that share identifiers chain into clusters (A~B, B~C puts A, B and C
//! in one cluster). Each identifier's final tier is the best tier it was ever
//! observed with, and each cluster keeps exactly one survivor: the member with
//! the best final tier, earliest appearance breaking ties. Every other member
//! is rejected against that survivor, so no identifier ends up both selected
//! and rejected.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::model::{FinalSelection, PriorityMapping, PriorityTier, ResolutionOutcome, Side};

/// Result of consolidating every resolved pair.
#[derive(Debug, Clone, Default)]
pub struct Consolidation {
    pub mapping: PriorityMapping,
    pub selections: Vec<FinalSelection>,
    /// Identifiers observed with more than one tier.
    pub conflicting_observations: usize,
    /// Selections no input pair produced as-is.
    pub corrected_selections: usize,
}

/// Accumulates outcomes one at a time; [`Consolidator::finish`] reconciles.
#[derive(Debug, Default)]
pub struct Consolidator {
    mapping: PriorityMapping,
    conflicted: BTreeSet<String>,
    /// Identifiers in order of first appearance (left before right).
    ids: Vec<String>,
    index: HashMap<String, usize>,
    parent: Vec<usize>,
    /// (selected, rejected) designations produced by some pair.
    decided: HashSet<(usize, usize)>,
    /// (id, partner) -> side `id` held in the first pair linking them.
    sides: HashMap<(usize, usize), Side>,
    rows: HashMap<usize, Vec<usize>>,
}

impl Consolidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, outcome: &ResolutionOutcome) {
        let left = self.intern(outcome.left_id());
        let right = self.intern(outcome.right_id());

        for (id, tier) in [
            (&outcome.selected_id, outcome.selected_priority),
            (&outcome.rejected_id, outcome.rejected_priority),
        ] {
            if self.mapping.observe(id, tier) && self.conflicted.insert(id.clone()) {
                debug!(identifier = %id, row = outcome.row, "conflicting tier observation");
            }
        }

        let (selected, rejected) = match outcome.chosen {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };
        self.decided.insert((selected, rejected));
        self.sides.entry((left, right)).or_insert(Side::Left);
        self.sides.entry((right, left)).or_insert(Side::Right);
        self.rows.entry(left).or_default().push(outcome.row);
        self.rows.entry(right).or_default().push(outcome.row);

        self.union(left, right);
    }

    pub fn finish(mut self) -> Consolidation {
        // Cluster members keyed by root, clusters and members in appearance order.
        let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut first_seen: HashMap<usize, usize> = HashMap::new();
        for i in 0..self.ids.len() {
            let root = self.find(i);
            let first = *first_seen.entry(root).or_insert(i);
            clusters.entry(first).or_default().push(i);
        }

        let mut selections = Vec::new();
        let mut corrected_selections = 0;

        for members in clusters.values() {
            let Some(&survivor) = members.iter().min_by_key(|&&m| (self.tier_of(m), m)) else {
                continue;
            };

            for &member in members.iter().filter(|&&m| m != survivor) {
                let corrected = !self.decided.contains(&(survivor, member));
                if corrected {
                    corrected_selections += 1;
                    debug!(
                        selected = %self.ids[survivor],
                        rejected = %self.ids[member],
                        "selection corrected by consolidation"
                    );
                }

                selections.push(FinalSelection {
                    selected_id: self.ids[survivor].clone(),
                    rejected_id: self.ids[member].clone(),
                    selected_priority: self.tier_of(survivor),
                    rejected_priority: self.tier_of(member),
                    chosen: self.sides.get(&(survivor, member)).copied(),
                    corrected,
                    source_rows: self.rows.get(&member).cloned().unwrap_or_default(),
                });
            }
        }

        Consolidation {
            mapping: self.mapping,
            selections,
            conflicting_observations: self.conflicted.len(),
            corrected_selections,
        }
    }

    fn tier_of(&self, i: usize) -> PriorityTier {
        // Every interned id was observed at least once.
        self.mapping.get(&self.ids[i]).unwrap_or(PriorityTier::Other)
    }

    fn intern(&mut self, id: &str) -> usize {
        if let Some(&i) = self.index.get(id) {
            return i;
        }
        let i = self.ids.len();
        self.ids.push(id.to_string());
        self.index.insert(id.to_string(), i);
        self.parent.push(i);
        i
    }

    fn find(&mut self, mut i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Older root wins so roots stay stable in appearance order.
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}

/// Consolidate every outcome in order.
pub fn consolidate(outcomes: &[ResolutionOutcome]) -> Consolidation {
    let mut consolidator = Consolidator::new();
    for outcome in outcomes {
        consolidator.observe(outcome);
    }
    consolidator.finish()
}
