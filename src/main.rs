use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use clique_percolation::prelude::*;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::exit;

#[derive(Debug, Parser)]
#[command(name = "clique-percolation")]
#[command(about = "Clique percolation community detection on an edge list")]
struct Cli {
    /// Whitespace-separated edge list, one edge per line
    edge_list: PathBuf,

    /// Directory receiving one commK file per percolation level
    output_dir: PathBuf,

    /// Minimum clique size (at least 3)
    #[arg(short = 'k', default_value_t = 3)]
    k: u32,

    /// Treat node ids as opaque strings instead of 64-bit integers
    #[arg(long = "stringIDs")]
    string_ids: bool,

    /// Size of the clique index filter in bits
    #[arg(long)]
    filter_bits: Option<u64>,

    /// Seed for the clique index hash
    #[arg(long)]
    hash_seed: Option<u64>,

    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::try_parse().unwrap_or_else(|error| {
        if matches!(
            error.kind(),
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
        ) {
            error.exit();
        }
        eprintln!("{}", error);
        exit(1);
    });

    env_logger::builder()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    if cli.k < 3 {
        eprintln!("{}", Cli::command().render_usage());
        eprintln!(
            "error: the minimum clique size must be at least 3, received: {}",
            cli.k
        );
        exit(1);
    }

    let mut bloom = BloomConfig::default();
    if let Some(filter_bits) = cli.filter_bits {
        bloom.filter_bits = filter_bits;
    }
    if let Some(hash_seed) = cli.hash_seed {
        bloom.hash_seed = hash_seed;
    }

    let config = RunConfig {
        edge_list: cli.edge_list,
        output_dir: cli.output_dir,
        minimum_size: cli.k,
        string_ids: cli.string_ids,
        bloom,
    };

    if let Err(error) = run(&config) {
        eprintln!("error: {}", error);
        exit(1);
    }
}
