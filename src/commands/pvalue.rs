use std::io::Write;

use anyhow::{bail, Result};

use crate::cli::OutputFormat;
use crate::export::SignificanceExport;

use super::{compute_levels, load_distribution, open_output};

pub fn run(
    tree_file: String,
    subset_size: usize,
    score: i64,
    output_file: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    if subset_size == 0 {
        bail!("subset size must be at least 1");
    }
    let mut dist = load_distribution(&tree_file)?;
    let leaves = dist.leaf_count();
    if subset_size > leaves {
        bail!("subset size {subset_size} exceeds the {leaves} leaves in the tree");
    }

    compute_levels(&mut dist, subset_size)?;
    let export = SignificanceExport::build(&tree_file, &dist, subset_size, score)?;

    let mut writer = open_output(output_file.as_deref())?;
    match format {
        OutputFormat::Tsv => export.write_tsv(&mut writer)?,
        OutputFormat::Json => {
            export.write_json(&mut writer)?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
