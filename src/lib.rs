#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::use_debug)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)] // inlined format args don's support batch renaming (yet?)
#![allow(clippy::cast_possible_truncation)] // vertex and clique counts are kept within u32
#![allow(clippy::missing_panics_doc)] // missing docs in general (todo!)
#![allow(clippy::missing_errors_doc)] // missing docs in general (todo!)

pub mod bloom;
pub mod cliques;
pub mod components;
pub mod error;
pub mod graph;
pub mod loading;
pub mod output;
pub mod percolation;
pub mod prelude;

use bloom::BloomConfig;
use error::Error;
use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub edge_list: PathBuf,
    pub output_dir: PathBuf,
    pub minimum_size: u32,
    pub string_ids: bool,
    pub bloom: BloomConfig,
}

// the whole pipeline: load the graph, enumerate its maximal cliques and
// percolate them level by level into community files
pub fn run(config: &RunConfig) -> Result<(), Error> {
    let start = Instant::now();

    let (graph, names) = loading::load_edge_list(&config.edge_list, config.string_ids)?;
    info!(
        "network loaded after {:.1}s: {} nodes, {} edges, max degree {}",
        start.elapsed().as_secs_f64(),
        graph.order(),
        graph.edge_count(),
        graph.max_degree()
    );

    let cliques = cliques::enumerate_cliques(&graph, config.minimum_size)?;
    if cliques.is_empty() {
        return Err(Error::NoCliques(config.minimum_size));
    }
    info!(
        "{} cliques of size >= {} found after {:.1}s",
        cliques.len(),
        config.minimum_size,
        start.elapsed().as_secs_f64()
    );
    log_size_histogram(&cliques);

    output::create_output_directory(&config.output_dir)?;
    percolation::percolate(
        &cliques,
        config.minimum_size,
        &config.bloom,
        |k, components, found_communities| {
            output::write_level(
                &config.output_dir,
                k,
                components,
                found_communities,
                &cliques,
                &names,
            )
        },
    )?;

    info!("done after {:.1}s", start.elapsed().as_secs_f64());
    Ok(())
}

fn log_size_histogram(cliques: &[cliques::Clique]) {
    let mut frequencies: BTreeMap<usize, usize> = BTreeMap::new();
    for clique in cliques {
        *frequencies.entry(clique.len()).or_insert(0) += 1;
    }
    for (size, count) in frequencies {
        info!("{}\t#{}", count, size);
    }
}
