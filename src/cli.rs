use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute the exact triplet-score distribution over k-leaf subsets
    Distribution {
        /// Rooted binary tree in Newick format
        tree_file: String,

        /// Subset size to tabulate
        #[arg(short = 'k', long = "subset-size")]
        subset_size: usize,

        /// Write the report here instead of stdout
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,

        /// Report format
        #[arg(long, default_value = "tsv", value_enum)]
        format: OutputFormat,
    },

    /// Quantile and p-value of an observed score under the exact distribution
    Pvalue {
        /// Rooted binary tree in Newick format
        tree_file: String,

        /// Subset size the observed score refers to
        #[arg(short = 'k', long = "subset-size")]
        subset_size: usize,

        /// Observed triplet score to test
        #[arg(short = 's', long = "score", allow_hyphen_values = true)]
        score: i64,

        /// Write the report here instead of stdout
        #[arg(short = 'o', long = "output")]
        output_file: Option<String>,

        /// Report format
        #[arg(long, default_value = "tsv", value_enum)]
        format: OutputFormat,
    },

    /// Parse a tree and check it satisfies the rooted-binary precondition
    Validate {
        /// Tree file in Newick format
        tree_file: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated table
    Tsv,
    /// Pretty-printed JSON document
    Json,
}
