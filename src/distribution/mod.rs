//! Exact subset-score distributions over the leaves of a rooted binary tree.
//!
//! For a subset S of k leaves, the score counts the rooted triplets `ab|c`
//! induced by the tree with both a and b drawn from S and c any leaf outside
//! the subtree of their lowest common ancestor. [`TripletDistribution`] runs
//! a bottom-up pass per subset size and records, at every node, how many
//! k-subsets achieve each score; the root tables then answer pdf, cdf,
//! quantile, and p-value queries exactly.

mod engine;
mod report;
mod table;

pub use engine::TripletDistribution;
pub use report::DistributionRow;
pub use table::ScoreTable;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

/// Errors from the distribution engine and its reports.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DistributionError {
    /// The root has no table for this subset size: k is 0, exceeds the leaf
    /// count, or exceeds the highest level computed so far.
    #[error("no distribution available for subset size {k}")]
    EmptyDistribution { k: usize },
    /// Combined scores left the i64 range.
    #[error("score arithmetic overflowed")]
    ScoreOverflow,
}

/// Exact binomial coefficient C(n, k).
pub fn binomial(n: u64, k: u64) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    let k = k.min(n - k);
    let mut result = BigUint::one();
    for i in 0..k {
        result *= n - i;
        result /= i + 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binomial_small_values() {
        assert_eq!(binomial(0, 0), BigUint::from(1u32));
        assert_eq!(binomial(4, 2), BigUint::from(6u32));
        assert_eq!(binomial(10, 3), BigUint::from(120u32));
        assert_eq!(binomial(52, 5), BigUint::from(2_598_960u32));
    }

    #[test]
    fn binomial_edges() {
        assert_eq!(binomial(7, 0), BigUint::from(1u32));
        assert_eq!(binomial(7, 7), BigUint::from(1u32));
        assert_eq!(binomial(3, 5), BigUint::zero());
    }

    #[test]
    fn binomial_symmetry() {
        for n in 0..=20u64 {
            for k in 0..=n {
                assert_eq!(binomial(n, k), binomial(n, n - k));
            }
        }
    }

    #[test]
    fn binomial_pascal_identity() {
        for n in 1..=25u64 {
            for k in 1..=n {
                assert_eq!(
                    binomial(n, k),
                    binomial(n - 1, k - 1) + binomial(n - 1, k)
                );
            }
        }
    }

    #[test]
    fn binomial_exceeds_machine_words() {
        // C(128, 64) ~ 2^128 / sqrt(64 pi), which needs 125 bits.
        let big = binomial(128, 64);
        assert!(big > BigUint::from(u64::MAX));
        assert_eq!(big.bits(), 125);
    }
}
