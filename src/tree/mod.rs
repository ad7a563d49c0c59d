//! Rooted-tree representation used by the distribution engine.
//!
//! Nodes live in an arena (`Vec<Node>`) addressed by [`NodeId`] indices, so
//! per-node state computed elsewhere can sit in plain vectors indexed the
//! same way. Trees are built by the Newick reader and are structurally
//! immutable afterwards.

pub mod newick;

pub use newick::NewickError;

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Arena index of a node within its [`Tree`].
pub type NodeId = usize;

/// Structural errors reported by tree validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A node violates the rooted-binary precondition of 0 or 2 children.
    #[error("node {node} has {arity} children; every node must have 0 or 2")]
    NotBinary { node: String, arity: usize },
}

/// A single node of a rooted tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A rooted tree with labeled leaves, stored as an arena.
///
/// The root is always node 0; the Newick reader allocates it first.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub(crate) fn new() -> Self {
        Tree { nodes: Vec::new() }
    }

    /// Parse a tree from a Newick string.
    pub fn from_newick(input: &str) -> Result<Self, NewickError> {
        newick::parse(input)
    }

    /// Read and parse a Newick file.
    pub fn from_newick_file<P: AsRef<Path>>(path: P) -> Result<Self, NewickError> {
        let text = fs::read_to_string(path)?;
        newick::parse(&text)
    }

    pub(crate) fn add_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: None,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    pub(crate) fn set_name(&mut self, id: NodeId, name: String) {
        self.nodes[id].name = Some(name);
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `id` has no children.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id].children.is_empty()
    }

    /// Child ids of `id`, in input order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    /// Label of `id`, if the input named it.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.nodes[id].name.as_deref()
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.children.is_empty()).count()
    }

    /// Node ids in postorder: children strictly before their parent, and the
    /// first child's subtree before the second's.
    pub fn postorder(&self) -> Vec<NodeId> {
        // Iterative so deep caterpillar trees cannot exhaust the call stack:
        // a root-first sweep visiting children right to left, reversed at
        // the end.
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend_from_slice(&self.nodes[id].children);
        }
        order.reverse();
        order
    }

    /// Number of leaves under each node, indexed by `NodeId`.
    pub fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for id in self.postorder() {
            counts[id] = if self.is_leaf(id) {
                1
            } else {
                self.children(id).iter().map(|&c| counts[c]).sum()
            };
        }
        counts
    }

    /// Check the rooted-binary precondition: every node has 0 or 2 children.
    ///
    /// The distribution recurrence is undefined on polytomies and unary
    /// nodes, so they are rejected before any computation starts.
    pub fn validate_binary(&self) -> Result<(), TreeError> {
        for (id, node) in self.nodes.iter().enumerate() {
            let arity = node.children.len();
            if arity != 0 && arity != 2 {
                return Err(TreeError::NotBinary {
                    node: self.describe(id),
                    arity,
                });
            }
        }
        Ok(())
    }

    fn describe(&self, id: NodeId) -> String {
        match self.name(id) {
            Some(name) => format!("'{name}'"),
            None => format!("#{id}"),
        }
    }
}
