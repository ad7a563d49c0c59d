pub mod cli;
pub mod commands;
pub mod distribution;
pub mod export;
pub mod tree;

// Re-export main API
pub use distribution::{binomial, DistributionError, DistributionRow, ScoreTable, TripletDistribution};
pub use tree::{NewickError, Tree, TreeError};
