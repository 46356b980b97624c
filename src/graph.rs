use crate::error::Error;
use rand::prelude::*;

// immutable undirected simple graph in compressed sparse row form
// the neighbor slice of every vertex is strictly ascending
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub struct Graph {
    offsets: Vec<usize>,
    adjacency: Vec<u32>,
    edge_count: usize,
}

impl Graph {
    // constructs a graph with no edges
    #[must_use]
    pub fn null_graph(order: usize) -> Self {
        Self {
            offsets: vec![0; order + 1],
            adjacency: Vec::new(),
            edge_count: 0,
        }
    }

    // constructs a graph where every pair of distinct vertices is connected
    #[must_use]
    pub fn complete_graph(order: usize) -> Self {
        let mut lists = vec![Vec::with_capacity(order.saturating_sub(1)); order];
        for (u, neighbors) in lists.iter_mut().enumerate() {
            neighbors.extend((0..order as u32).filter(|&v| v != u as u32));
        }
        Self::from_lists(lists)
    }

    // constructs a random graph after Gilbert's model G(n, p)
    #[must_use]
    pub fn random_graph(order: usize, probability: f64) -> Self {
        let mut rng = rand::thread_rng();
        let mut lists = vec![Vec::new(); order];

        for u in 0..order {
            for v in (u + 1)..order {
                if rng.gen_bool(probability) {
                    lists[u].push(v as u32);
                    lists[v].push(u as u32);
                }
            }
        }
        // each list is ascending by construction
        Self::from_lists(lists)
    }

    // builds the adjacency from an undirected edge list
    // duplicate edges are deduplicated, self-loops are rejected
    pub fn from_edges(order: usize, edges: &[(u32, u32)]) -> Result<Self, Error> {
        let mut lists = vec![Vec::new(); order];

        for &(u, v) in edges {
            if u == v {
                return Err(Error::SelfLoop(u.to_string()));
            }
            if u as usize >= order || v as usize >= order {
                return Err(Error::OutOfBounds(order, u.max(v) as usize));
            }
            lists[u as usize].push(v);
            lists[v as usize].push(u);
        }

        for neighbors in &mut lists {
            neighbors.sort_unstable();
            neighbors.dedup();
        }

        Ok(Self::from_lists(lists))
    }

    // flattens per-vertex neighbor lists into the CSR arrays
    fn from_lists(lists: Vec<Vec<u32>>) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        let mut adjacency = Vec::with_capacity(lists.iter().map(Vec::len).sum());

        offsets.push(0);
        for neighbors in &lists {
            adjacency.extend_from_slice(neighbors);
            offsets.push(adjacency.len());
        }

        let edge_count = adjacency.len() / 2;
        Self {
            offsets,
            adjacency,
            edge_count,
        }
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.offsets.len() - 1
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub fn degree(&self, vertex: u32) -> usize {
        self.offsets[vertex as usize + 1] - self.offsets[vertex as usize]
    }

    // sorted neighbors of the given vertex
    #[must_use]
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        &self.adjacency[self.offsets[vertex as usize]..self.offsets[vertex as usize + 1]]
    }

    #[must_use]
    pub fn are_connected(&self, u: u32, v: u32) -> bool {
        self.neighbors(u).binary_search(&v).is_ok()
    }

    #[must_use]
    pub fn max_degree(&self) -> usize {
        (0..self.order())
            .map(|vertex| self.degree(vertex as u32))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_edges_deduplicates() {
        let graph = Graph::from_edges(3, &[(0, 1), (1, 0), (0, 1), (1, 2)]).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.neighbors(2), &[1]);
    }

    #[test]
    fn from_edges_rejects_self_loop() {
        assert!(matches!(
            Graph::from_edges(3, &[(0, 1), (2, 2)]),
            Err(Error::SelfLoop(_))
        ));
    }

    #[test]
    fn from_edges_rejects_out_of_bounds() {
        assert!(matches!(
            Graph::from_edges(2, &[(0, 5)]),
            Err(Error::OutOfBounds(2, 5))
        ));
    }

    #[test]
    fn connectivity_is_symmetric() {
        let graph = Graph::from_edges(4, &[(0, 2), (2, 3)]).unwrap();

        for u in 0..4 {
            for v in 0..4 {
                assert_eq!(graph.are_connected(u, v), graph.are_connected(v, u));
            }
        }
        assert!(graph.are_connected(0, 2));
        assert!(!graph.are_connected(0, 3));
        assert!(!graph.are_connected(0, 0));
    }

    #[test]
    fn complete_graph_degrees() {
        let graph = Graph::complete_graph(5);

        assert_eq!(graph.edge_count(), 10);
        assert_eq!(graph.max_degree(), 4);
        for v in 0..5 {
            assert_eq!(graph.degree(v), 4);
            assert!(!graph.neighbors(v).contains(&v));
        }
    }

    #[test]
    fn null_graph_is_empty() {
        let graph = Graph::null_graph(3);

        assert_eq!(graph.order(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.max_degree(), 0);
    }
}
