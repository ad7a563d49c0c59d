use anyhow::{Context, Result};

use crate::tree::Tree;

pub fn run(tree_file: String) -> Result<()> {
    let tree = Tree::from_newick_file(&tree_file)
        .with_context(|| format!("failed to read tree from {tree_file}"))?;
    println!("Tree: {tree_file}");
    println!("Nodes: {}", tree.node_count());
    println!("Leaves: {}", tree.leaf_count());
    tree.validate_binary()
        .with_context(|| format!("{tree_file} is not a rooted binary tree"))?;
    println!("Topology: rooted binary");
    Ok(())
}
