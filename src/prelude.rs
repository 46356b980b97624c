//! Convenience re-export of common members.
//!
//! This module simplifies importing of common items.

pub use crate::bloom::BloomConfig;
pub use crate::cliques::{enumerate_cliques, find_cliques, Clique};
pub use crate::components::Components;
pub use crate::error::Error;
pub use crate::graph::Graph;
pub use crate::loading::{load_edge_list, parse_edge_list, NodeNameIndex};
pub use crate::percolation::percolate;
pub use crate::{run, RunConfig};
