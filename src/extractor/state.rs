//! Per-attempt extraction state.
//!
//! Candidate scores and data-table marks live here, keyed by [`NodeId`],
//! rather than on the nodes themselves. A fresh state is created for every
//! attempt of the retry ladder so nothing leaks between attempts.

use std::collections::{HashMap, HashSet};

use crate::dom::NodeId;

/// Heuristic switches relaxed one at a time by the retry ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Flags {
    /// Remove nodes whose class/id look like page furniture.
    pub strip_unlikelys: bool,
    /// Add ±25 to candidates based on class/id.
    pub weight_classes: bool,
    /// Apply the conditional cleaning rules to containers.
    pub clean_conditionally: bool,
}

impl Flags {
    pub const ALL: Flags = Flags {
        strip_unlikelys: true,
        weight_classes: true,
        clean_conditionally: true,
    };
}

/// Attempts in order. Each one starts from a fresh copy of the prepared
/// document with one more heuristic switched off.
pub static RETRY_LADDER: [Flags; 4] = [
    Flags::ALL,
    Flags {
        strip_unlikelys: false,
        weight_classes: true,
        clean_conditionally: true,
    },
    Flags {
        strip_unlikelys: false,
        weight_classes: false,
        clean_conditionally: true,
    },
    Flags {
        strip_unlikelys: false,
        weight_classes: false,
        clean_conditionally: false,
    },
];

/// Scores and marks for one attempt.
#[derive(Debug, Default)]
pub struct ExtractionState {
    scores: HashMap<NodeId, f64>,
    data_tables: HashSet<NodeId>,
}

impl ExtractionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the node has been initialized as a candidate.
    #[must_use]
    pub fn is_candidate(&self, node: NodeId) -> bool {
        self.scores.contains_key(&node)
    }

    /// Score of a candidate, `0.0` for anything else.
    #[must_use]
    pub fn score(&self, node: NodeId) -> f64 {
        self.scores.get(&node).copied().unwrap_or(0.0)
    }

    pub fn set_score(&mut self, node: NodeId, score: f64) {
        self.scores.insert(node, score);
    }

    pub fn add_score(&mut self, node: NodeId, delta: f64) {
        *self.scores.entry(node).or_insert(0.0) += delta;
    }

    pub fn mark_data_table(&mut self, node: NodeId, is_data: bool) {
        if is_data {
            self.data_tables.insert(node);
        } else {
            self.data_tables.remove(&node);
        }
    }

    #[must_use]
    pub fn is_data_table(&self, node: NodeId) -> bool {
        self.data_tables.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_ladder_relaxes_one_flag_at_a_time() {
        assert_eq!(RETRY_LADDER[0], Flags::ALL);
        assert!(!RETRY_LADDER[1].strip_unlikelys && RETRY_LADDER[1].weight_classes);
        assert!(!RETRY_LADDER[2].weight_classes && RETRY_LADDER[2].clean_conditionally);
        assert!(!RETRY_LADDER[3].clean_conditionally);
    }

    #[test]
    fn test_scores() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let mut state = ExtractionState::new();
        assert!(!state.is_candidate(div));
        assert_eq!(state.score(div), 0.0);
        state.set_score(div, 5.0);
        state.add_score(div, 2.5);
        assert!(state.is_candidate(div));
        assert_eq!(state.score(div), 7.5);
    }
}
