mod cli;
mod commands;
mod distribution;
mod export;
mod tree;

use clap::Parser;

fn main() {
    let args = cli::Args::parse();

    let result = match args.command {
        cli::Commands::Distribution {
            tree_file,
            subset_size,
            output_file,
            format,
        } => commands::distribution::run(tree_file, subset_size, output_file, format),
        cli::Commands::Pvalue {
            tree_file,
            subset_size,
            score,
            output_file,
            format,
        } => commands::pvalue::run(tree_file, subset_size, score, output_file, format),
        cli::Commands::Validate { tree_file } => commands::validate::run(tree_file),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
