//! Bottom-up computation of the per-node score tables, one pass per subset
//! size.

use num_bigint::BigUint;

use crate::tree::{NodeId, Tree, TreeError};

use super::table::ScoreTable;
use super::DistributionError;

/// Exact subset-score distributions for every node of a rooted binary tree.
///
/// `tables[v]` holds one [`ScoreTable`] per computed subset size, indexed by
/// `k - 1`. A node with fewer than k leaves below it has no level-k table,
/// so each node's vector stays contiguous: sizes 1 through
/// `min(leaves(v), max_level)`.
#[derive(Debug)]
pub struct TripletDistribution {
    tree: Tree,
    order: Vec<NodeId>,
    leaf_counts: Vec<usize>,
    tables: Vec<Vec<ScoreTable>>,
    levels_done: usize,
}

impl TripletDistribution {
    /// Wrap a tree, rejecting non-binary topologies up front. The recurrence
    /// pairs exactly two children per internal node and never revisits a
    /// finished level, so a polytomy discovered later would leave half-built
    /// state behind.
    pub fn new(tree: Tree) -> Result<Self, TreeError> {
        tree.validate_binary()?;
        let order = tree.postorder();
        let leaf_counts = tree.leaf_counts();
        let tables = vec![Vec::new(); tree.node_count()];
        Ok(TripletDistribution {
            tree,
            order,
            leaf_counts,
            tables,
            levels_done: 0,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.leaf_counts[self.tree.root()]
    }

    /// Highest subset size computed so far.
    pub fn max_level(&self) -> usize {
        self.levels_done
    }

    /// The score table of `node` for subset size `k`, if that level reached
    /// the node.
    pub fn table(&self, node: NodeId, k: usize) -> Option<&ScoreTable> {
        k.checked_sub(1).and_then(|idx| self.tables[node].get(idx))
    }

    pub(super) fn root_table(&self, k: usize) -> Result<&ScoreTable, DistributionError> {
        self.table(self.tree.root(), k)
            .filter(|table| !table.is_empty())
            .ok_or(DistributionError::EmptyDistribution { k })
    }

    /// Compute every level up to `max_k`, keeping levels already done.
    ///
    /// Levels must run in increasing order: the level-k pass reads levels
    /// 1 through k of the children at every internal node.
    pub fn compute_all(&mut self, max_k: usize) -> Result<(), DistributionError> {
        for k in (self.levels_done + 1)..=max_k {
            if k == 1 {
                self.level_one();
            } else {
                self.level_k(k)?;
            }
            self.levels_done = k;
        }
        Ok(())
    }

    /// Base case: every way of picking a single leaf scores 0, so each node
    /// gets the table {0: leaves below it}.
    fn level_one(&mut self) {
        for idx in 0..self.order.len() {
            let v = self.order[idx];
            let ways = BigUint::from(self.leaf_counts[v]);
            debug_assert!(self.tables[v].is_empty());
            self.tables[v].push(ScoreTable::singleton(0, ways));
        }
    }

    /// One pass for subset size k >= 2, visiting nodes in postorder so both
    /// children already carry every level up to k.
    fn level_k(&mut self, k: usize) -> Result<(), DistributionError> {
        let n_total = self.leaf_count();
        for idx in 0..self.order.len() {
            let v = self.order[idx];
            if self.tree.is_leaf(v) {
                continue;
            }
            let children = self.tree.children(v);
            let (mut c1, mut c2) = (children[0], children[1]);
            let (mut n1, mut n2) = (self.leaf_counts[c1], self.leaf_counts[c2]);
            if n1 + n2 < k {
                // Too few leaves below v to ever pick k of them.
                continue;
            }
            if n1 > n2 {
                std::mem::swap(&mut c1, &mut c2);
                std::mem::swap(&mut n1, &mut n2);
            }
            let n3 = n_total - n1 - n2;

            // Subsets drawn wholly from one child: no pair straddles the
            // split, so the child tables carry over unchanged.
            let mut table = ScoreTable::new();
            if n1 >= k {
                table = table.merge(&self.tables[c1][k - 1]);
            }
            if n2 >= k {
                table = table.merge(&self.tables[c2][k - 1]);
            }

            // Split subsets: i leaves from the smaller child, j = k - i from
            // the larger. Every cross pair resolves against all n3 outside
            // leaves, adding i * j * n3 on top of the two partial scores.
            for i in (1..=n1.min(k - 1)).rev() {
                let j = k - i;
                if j > n2 {
                    continue;
                }
                let cross = cross_term(i, j, n3)?;
                let left = &self.tables[c1][i - 1];
                let right = &self.tables[c2][j - 1];
                for (s1, count1) in left.iter() {
                    for (s2, count2) in right.iter() {
                        let score = s1
                            .checked_add(s2)
                            .and_then(|sum| sum.checked_add(cross))
                            .ok_or(DistributionError::ScoreOverflow)?;
                        table.accumulate(score, count1 * count2);
                    }
                }
            }

            debug_assert_eq!(self.tables[v].len(), k - 1);
            self.tables[v].push(table);
        }
        Ok(())
    }
}

fn cross_term(i: usize, j: usize, n3: usize) -> Result<i64, DistributionError> {
    let product = i
        .checked_mul(j)
        .and_then(|ij| ij.checked_mul(n3))
        .ok_or(DistributionError::ScoreOverflow)?;
    i64::try_from(product).map_err(|_| DistributionError::ScoreOverflow)
}
