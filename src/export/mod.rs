//! Serializable report shapes shared by the CLI commands, with TSV and JSON
//! writers.

use std::io::{self, Write};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::distribution::{DistributionError, TripletDistribution};

/// Full score distribution for one subset size.
#[derive(Debug, Serialize, Deserialize)]
pub struct DistributionExport {
    pub tree_file: String,
    pub leaf_count: usize,
    pub subset_size: usize,
    /// C(leaf_count, subset_size) as a decimal string; the value outgrows
    /// every JSON-representable integer.
    pub total_subsets: String,
    pub rows: Vec<ScoreRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreRow {
    pub score: i64,
    pub count: String, // decimal, same reason as total_subsets
    pub pdf: f64,
    pub cdf: f64,
}

/// Quantile and p-value for one observed score.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignificanceExport {
    pub tree_file: String,
    pub leaf_count: usize,
    pub subset_size: usize,
    pub observed_score: i64,
    pub score_min: i64,
    pub score_max: i64,
    pub quantile: f64,
    pub p_value: f64,
}

impl DistributionExport {
    pub fn build(
        tree_file: &str,
        dist: &TripletDistribution,
        subset_size: usize,
    ) -> Result<Self, DistributionError> {
        let rows = dist.distribution_rows(subset_size)?;
        let total: BigUint = rows.iter().map(|row| &row.count).sum();
        Ok(DistributionExport {
            tree_file: tree_file.to_string(),
            leaf_count: dist.leaf_count(),
            subset_size,
            total_subsets: total.to_string(),
            rows: rows
                .into_iter()
                .map(|row| ScoreRow {
                    score: row.score,
                    count: row.count.to_string(),
                    pdf: row.pdf,
                    cdf: row.cdf,
                })
                .collect(),
        })
    }

    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "#tree={}", self.tree_file)?;
        writeln!(writer, "#leaves={}", self.leaf_count)?;
        writeln!(writer, "#k={}", self.subset_size)?;
        writeln!(writer, "#subsets={}", self.total_subsets)?;
        writeln!(writer, "Score\tCount\tPdf\tCdf")?;
        for row in &self.rows {
            writeln!(
                writer,
                "{}\t{}\t{}\t{}",
                row.score, row.count, row.pdf, row.cdf
            )?;
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
}

impl SignificanceExport {
    pub fn build(
        tree_file: &str,
        dist: &TripletDistribution,
        subset_size: usize,
        observed_score: i64,
    ) -> Result<Self, DistributionError> {
        let (score_min, score_max) = dist.score_range(subset_size)?;
        Ok(SignificanceExport {
            tree_file: tree_file.to_string(),
            leaf_count: dist.leaf_count(),
            subset_size,
            observed_score,
            score_min,
            score_max,
            quantile: dist.quantile(observed_score, subset_size)?,
            p_value: dist.p_value(observed_score, subset_size)?,
        })
    }

    pub fn write_tsv<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "#tree={}", self.tree_file)?;
        writeln!(writer, "#leaves={}", self.leaf_count)?;
        writeln!(writer, "#k={}", self.subset_size)?;
        writeln!(
            writer,
            "Observed_Score\tScore_Min\tScore_Max\tQuantile\tP_Value"
        )?;
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            self.observed_score, self.score_min, self.score_max, self.quantile, self.p_value
        )?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, self)
    }
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
    fn distribution_tsv_layout() {
        let export = DistributionExport::build("quartet.nwk", &quartet(), 2).unwrap();
        let mut out = Vec::new();
        export.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#tree=quartet.nwk");
        assert_eq!(lines[3], "#subsets=6");
        assert_eq!(lines[4], "Score\tCount\tPdf\tCdf");
        assert!(lines[5].starts_with("0\t4\t"));
        assert!(lines[6].starts_with("2\t2\t"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn distribution_json_round_trips() {
        let export = DistributionExport::build("quartet.nwk", &quartet(), 2).unwrap();
        let mut out = Vec::new();
        export.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["leaf_count"], 4);
        assert_eq!(value["subset_size"], 2);
        assert_eq!(value["total_subsets"], "6");
        assert_eq!(value["rows"][0]["score"], 0);
        assert_eq!(value["rows"][0]["count"], "4");
        assert_eq!(value["rows"][1]["score"], 2);
        let parsed: DistributionExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn significance_reports_the_tail() {
        let export = SignificanceExport::build("quartet.nwk", &quartet(), 2, 2).unwrap();
        assert_eq!(export.score_min, 0);
        assert_eq!(export.score_max, 2);
        assert_eq!(export.quantile, 4.0 / 6.0);
        assert_eq!(export.p_value, 1.0 - 4.0 / 6.0);

        let mut out = Vec::new();
        export.write_tsv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Observed_Score\tScore_Min\tScore_Max\tQuantile\tP_Value"));
        assert!(text.contains("2\t0\t2\t"));
    }

    #[test]
    fn build_propagates_missing_levels() {
        assert_eq!(
            DistributionExport::build("quartet.nwk", &quartet(), 5).unwrap_err(),
            DistributionError::EmptyDistribution { k: 5 }
        );
        assert_eq!(
            SignificanceExport::build("quartet.nwk", &quartet(), 0, 1).unwrap_err(),
            DistributionError::EmptyDistribution { k: 0 }
        );
    }
}
