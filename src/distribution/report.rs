//! Probability readouts over the root tables: pdf, cdf, quantile, p-value.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::engine::TripletDistribution;
use super::DistributionError;

/// One row of a rendered distribution report.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionRow {
    pub score: i64,
    pub count: BigUint,
    pub pdf: f64,
    pub cdf: f64,
}

impl TripletDistribution {
    /// Probability mass function for subset size `k`: `(score, probability)`
    /// pairs in ascending score order.
    pub fn pdf(&self, k: usize) -> Result<Vec<(i64, f64)>, DistributionError> {
        let table = self.root_table(k)?;
        let total = table.total();
        Ok(table
            .iter()
            .map(|(score, count)| (score, ratio_to_f64(count, &total)))
            .collect())
    }

    /// Left-continuous cumulative distribution: each score pairs with
    /// `P(X < score)`, the mass strictly below it. The mass at the score
    /// itself is deliberately excluded so that `p_value`, computed from the
    /// same values, counts it in `P(X >= s)`.
    pub fn cdf(&self, k: usize) -> Result<Vec<(i64, f64)>, DistributionError> {
        let table = self.root_table(k)?;
        let total = table.total();
        let mut below = BigUint::zero();
        let mut out = Vec::with_capacity(table.len());
        for (score, count) in table.iter() {
            out.push((score, ratio_to_f64(&below, &total)));
            below += count;
        }
        Ok(out)
    }

    /// `P(X < observed)`: the cumulative value at the first tabulated score
    /// at or above `observed`, or 1.0 when `observed` lies beyond them all.
    pub fn quantile(&self, observed: i64, k: usize) -> Result<f64, DistributionError> {
        let cdf = self.cdf(k)?;
        let idx = cdf.partition_point(|&(score, _)| score < observed);
        Ok(match cdf.get(idx) {
            Some(&(_, below)) => below,
            None => 1.0,
        })
    }

    /// `P(X >= observed)` under the exact distribution.
    pub fn p_value(&self, observed: i64, k: usize) -> Result<f64, DistributionError> {
        Ok(1.0 - self.quantile(observed, k)?)
    }

    /// Smallest and largest achievable scores for subset size `k`.
    pub fn score_range(&self, k: usize) -> Result<(i64, i64), DistributionError> {
        let table = self.root_table(k)?;
        table
            .score_range()
            .ok_or(DistributionError::EmptyDistribution { k })
    }

    /// Everything a per-score report line needs: count, pdf, and cdf.
    pub fn distribution_rows(&self, k: usize) -> Result<Vec<DistributionRow>, DistributionError> {
        let table = self.root_table(k)?;
        let total = table.total();
        let mut below = BigUint::zero();
        let mut rows = Vec::with_capacity(table.len());
        for (score, count) in table.iter() {
            rows.push(DistributionRow {
                score,
                count: count.clone(),
                pdf: ratio_to_f64(count, &total),
                cdf: ratio_to_f64(&below, &total),
            });
            below += count;
        }
        Ok(rows)
    }
}

/// Exact `count / total` collapsed to f64 at the last moment. Going through
/// `BigRational` keeps the division correct even when both operands are far
/// beyond the f64 range.
fn ratio_to_f64(count: &BigUint, total: &BigUint) -> f64 {
    BigRational::new(BigInt::from(count.clone()), BigInt::from(total.clone()))
        .to_f64()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;

    fn quartet() -> TripletDistribution {
        let tree = Tree::from_newick("((A,B),(C,D));").unwrap();
        let mut dist = TripletDistribution::new(tree).unwrap();
        dist.compute_all(2).unwrap();
        dist
    }

    #[test]
    fn quartet_pdf() {
        // Root table at k = 2 is {0: 4, 2: 2} out of 6 pairs.
        let pdf = quartet().pdf(2).unwrap();
        assert_eq!(pdf.len(), 2);
        assert_eq!(pdf[0], (0, 4.0 / 6.0));
        assert_eq!(pdf[1], (2, 2.0 / 6.0));
    }

    #[test]
    fn pdf_sums_to_one() {
        let tree = Tree::from_newick("(((A,B),(C,(D,E))),(F,(G,H)));").unwrap();
        let mut dist = TripletDistribution::new(tree).unwrap();
        dist.compute_all(4).unwrap();
        for k in 1..=4 {
            let sum: f64 = dist.pdf(k).unwrap().iter().map(|&(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-12, "k = {k}: pdf sums to {sum}");
        }
    }

    #[test]
    fn cdf_is_left_continuous() {
        let dist = quartet();
        let cdf = dist.cdf(2).unwrap();
        // P(X < 0) = 0 and P(X < 2) excludes the mass sitting at 2.
        assert_eq!(cdf[0], (0, 0.0));
        assert_eq!(cdf[1], (2, 4.0 / 6.0));
    }

    #[test]
    fn cdf_matches_pdf_prefix_sums() {
        let tree = Tree::from_newick("((((A,B),C),(D,E)),((F,G),H));").unwrap();
        let mut dist = TripletDistribution::new(tree).unwrap();
        dist.compute_all(3).unwrap();
        let pdf = dist.pdf(3).unwrap();
        let cdf = dist.cdf(3).unwrap();
        let mut below = 0.0;
        for (&(score_p, mass), &(score_c, cumulative)) in pdf.iter().zip(cdf.iter()) {
            assert_eq!(score_p, score_c);
            assert!((cumulative - below).abs() < 1e-12);
            below += mass;
        }
    }

    #[test]
    fn quantile_brackets_the_table() {
        let dist = quartet();
        // Below every score, at each score, between scores, past the end.
        assert_eq!(dist.quantile(-5, 2).unwrap(), 0.0);
        assert_eq!(dist.quantile(0, 2).unwrap(), 0.0);
        assert_eq!(dist.quantile(1, 2).unwrap(), 4.0 / 6.0);
        assert_eq!(dist.quantile(2, 2).unwrap(), 4.0 / 6.0);
        assert_eq!(dist.quantile(3, 2).unwrap(), 1.0);
        assert_eq!(dist.quantile(i64::MAX, 2).unwrap(), 1.0);
    }

    #[test]
    fn quantile_is_monotonic() {
        let tree = Tree::from_newick("(((A,B),C),((D,E),(F,G)));").unwrap();
        let mut dist = TripletDistribution::new(tree).unwrap();
        dist.compute_all(3).unwrap();
        let (lo, hi) = dist.score_range(3).unwrap();
        let mut last = -1.0;
        for s in (lo - 1)..=(hi + 2) {
            let q = dist.quantile(s, 3).unwrap();
            assert!(q >= last, "quantile dropped at {s}");
            last = q;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn p_value_complements_quantile() {
        let dist = quartet();
        for s in -1..=3 {
            let q = dist.quantile(s, 2).unwrap();
            let p = dist.p_value(s, 2).unwrap();
            assert_eq!(p + q, 1.0);
        }
    }

    #[test]
    fn top_score_p_value_counts_only_its_own_mass() {
        // P(X >= 2) keeps the 2 pairs at the maximum: 2/6.
        let dist = quartet();
        assert!((dist.p_value(2, 2).unwrap() - 2.0 / 6.0).abs() < 1e-15);
    }

    #[test]
    fn single_leaf_reports() {
        let mut dist = TripletDistribution::new(Tree::from_newick("A;").unwrap()).unwrap();
        dist.compute_all(1).unwrap();
        assert_eq!(dist.pdf(1).unwrap(), vec![(0, 1.0)]);
        assert_eq!(
            dist.pdf(2),
            Err(DistributionError::EmptyDistribution { k: 2 })
        );
        assert_eq!(
            dist.quantile(0, 3),
            Err(DistributionError::EmptyDistribution { k: 3 })
        );
    }

    #[test]
    fn rows_align_with_pdf_and_cdf() {
        let dist = quartet();
        let rows = dist.distribution_rows(2).unwrap();
        let pdf = dist.pdf(2).unwrap();
        let cdf = dist.cdf(2).unwrap();
        assert_eq!(rows.len(), pdf.len());
        for ((row, &(_, mass)), &(_, cumulative)) in rows.iter().zip(&pdf).zip(&cdf) {
            assert_eq!(row.pdf, mass);
            assert_eq!(row.cdf, cumulative);
        }
        let counted: BigUint = rows.iter().map(|row| &row.count).sum();
        assert_eq!(counted, BigUint::from(6u32));
    }

    #[test]
    fn huge_counts_survive_the_f64_collapse() {
        // Both operands dwarf f64::MAX; the reduced ratio must not.
        let total = BigUint::from(1u32) << 4096usize;
        let half = &total / BigUint::from(2u32);
        assert_eq!(ratio_to_f64(&half, &total), 0.5);
        assert_eq!(ratio_to_f64(&total, &total), 1.0);
    }
}
