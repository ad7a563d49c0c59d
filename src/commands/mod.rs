pub mod distribution;
pub mod pvalue;
pub mod validate;

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::distribution::TripletDistribution;
use crate::tree::Tree;

/// Load a tree and wrap it in the engine, with the errors a CLI user needs.
fn load_distribution(tree_file: &str) -> Result<TripletDistribution> {
    let tree = Tree::from_newick_file(tree_file)
        .with_context(|| format!("failed to read tree from {tree_file}"))?;
    let dist = TripletDistribution::new(tree)
        .with_context(|| format!("{tree_file} is not a rooted binary tree"))?;
    Ok(dist)
}

/// Run the per-level passes up to `subset_size` behind a progress bar.
fn compute_levels(dist: &mut TripletDistribution, subset_size: usize) -> Result<()> {
    let progress = ProgressBar::new(subset_size as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] level {pos}/{len}")
            .unwrap(),
    );
    for level in 1..=subset_size {
        dist.compute_all(level)?;
        progress.inc(1);
    }
    progress.finish_and_clear();
    Ok(())
}

/// Writer for `-o FILE`, or stdout when no file was given.
fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("failed to create {path}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout()),
    })
}
