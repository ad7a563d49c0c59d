//! Sparse score-to-count tables and the algebra the engine combines them with.

use std::collections::BTreeMap;

use num_bigint::BigUint;
use num_traits::Zero;

/// An unnormalized frequency table over integer scores.
///
/// Each score maps to the number of leaf subsets achieving it. Counts are
/// arbitrary precision: at the root they sum to C(n, k), which outgrows u64
/// for quite ordinary trees. Keys stay sorted, which reporting relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    entries: BTreeMap<i64, BigUint>,
}

impl ScoreTable {
    pub fn new() -> Self {
        ScoreTable {
            entries: BTreeMap::new(),
        }
    }

    /// Table holding a single entry.
    pub fn singleton(score: i64, count: BigUint) -> Self {
        let mut table = ScoreTable::new();
        table.accumulate(score, count);
        table
    }

    /// Add `count` ways of reaching `score`, inserting the entry if new.
    /// Zero counts are dropped so no entry ever holds an empty tally.
    pub fn accumulate(&mut self, score: i64, count: BigUint) {
        if count.is_zero() {
            return;
        }
        *self.entries.entry(score).or_default() += count;
    }

    /// New table equal to `self` with every entry of `other` folded in.
    pub fn merge(&self, other: &ScoreTable) -> ScoreTable {
        let mut merged = self.clone();
        for (&score, count) in &other.entries {
            merged.accumulate(score, count.clone());
        }
        merged
    }

    /// Sum of all counts: the number of subsets the table accounts for.
    pub fn total(&self) -> BigUint {
        self.entries.values().sum()
    }

    pub fn get(&self, score: i64) -> Option<&BigUint> {
        self.entries.get(&score)
    }

    /// Entries in ascending score order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &BigUint)> + '_ {
        self.entries.iter().map(|(&score, count)| (score, count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest and largest scores present.
    pub fn score_range(&self) -> Option<(i64, i64)> {
        let min = *self.entries.keys().next()?;
        let max = *self.entries.keys().next_back()?;
        Some((min, max))
    }
}
