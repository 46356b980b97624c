use crate::error::Error;
use crate::graph::Graph;
use log::debug;

// a maximal clique, vertices in ascending order
pub type Clique = Vec<u32>;

// collects every maximal clique of at least the given size into a vector
// cliques are numbered by their position, i.e. in discovery order
pub fn enumerate_cliques(graph: &Graph, minimum_size: u32) -> Result<Vec<Clique>, Error> {
    let mut cliques = Vec::new();
    find_cliques(graph, minimum_size, |clique| cliques.push(clique))?;
    Ok(cliques)
}

// Bron-Kerbosch with the fewest-disconnections pivot
// every maximal clique is found exactly once, at its smallest vertex
pub fn find_cliques<F>(graph: &Graph, minimum_size: u32, sink: F) -> Result<(), Error>
where
    F: FnMut(Clique),
{
    if minimum_size < 3 {
        return Err(Error::MinimumSizeTooSmall(minimum_size));
    }
    for v in 0..graph.order() as u32 {
        if graph.are_connected(v, v) {
            return Err(Error::SelfLoop(v.to_string()));
        }
    }

    let mut search = CliqueSearch {
        graph,
        minimum_size: minimum_size as usize,
        sink,
    };
    for v in 0..graph.order() as u32 {
        if v > 0 && v % 100 == 0 {
            debug!("processing vertex {} of {}", v, graph.order());
        }
        search.cliques_for_one_vertex(v);
    }
    Ok(())
}

struct CliqueSearch<'a, F> {
    graph: &'a Graph,
    minimum_size: usize,
    sink: F,
}

impl<F: FnMut(Clique)> CliqueSearch<'_, F> {
    // finds all maximal cliques whose smallest vertex is v:
    // neighbors below v start in Not, neighbors above v in Candidates
    fn cliques_for_one_vertex(&mut self, v: u32) {
        if self.graph.degree(v) + 1 < self.minimum_size {
            return;
        }

        let neighbors = self.graph.neighbors(v);
        let split = neighbors.partition_point(|&u| u < v);
        let not = neighbors[..split].to_vec();
        let candidates = neighbors[split..].to_vec();

        let mut compsub = vec![v];
        self.worker(&mut compsub, not, candidates);
    }

    // not and candidates are ascending; compsub is an unsorted stack
    fn worker(&mut self, compsub: &mut Vec<u32>, mut not: Vec<u32>, mut candidates: Vec<u32>) {
        if candidates.len() + compsub.len() < self.minimum_size {
            return;
        }

        if candidates.is_empty() {
            // no extension left, maximal iff nothing in Not covers it
            if not.is_empty() && compsub.len() >= self.minimum_size {
                let mut clique = compsub.clone();
                clique.sort_unstable();
                (self.sink)(clique);
            }
            return;
        }

        let (mut fewest_disc, pivot, pivot_in_candidates) =
            self.fewest_disconnections(&not, &candidates);
        if !pivot_in_candidates && fewest_disc == 0 {
            // a vertex in Not is connected to every candidate, nothing down
            // this branch can be maximal
            return;
        }

        let mut i = 0;
        while i < candidates.len() {
            if candidates.len() + compsub.len() < self.minimum_size {
                return;
            }
            let v = candidates[i];
            if fewest_disc > 0 && v != pivot && !self.graph.are_connected(v, pivot) {
                candidates.remove(i);
                self.try_candidate(compsub, &not, &candidates, v);
                let position = not.partition_point(|&u| u < v);
                not.insert(position, v); // Not must stay in order
                fewest_disc -= 1;
            } else {
                i += 1;
            }
        }

        if pivot_in_candidates {
            if candidates.len() + compsub.len() < self.minimum_size {
                return;
            }
            // the pivot may stay in candidates: the intersection with its
            // neighborhood drops it, as there are no self-loops
            self.try_candidate(compsub, &not, &candidates, pivot);
        }
    }

    fn try_candidate(
        &mut self,
        compsub: &mut Vec<u32>,
        not: &[u32],
        candidates: &[u32],
        selected: u32,
    ) {
        compsub.push(selected);

        let neighbors = self.graph.neighbors(selected);
        let new_not = intersect_sorted(not, neighbors);
        let new_candidates = intersect_sorted(candidates, neighbors);
        self.worker(compsub, new_not, new_candidates);

        compsub.pop();
    }

    // the vertex in Not or Candidates with the fewest disconnections to
    // Candidates; a candidate always counts itself as disconnected
    fn fewest_disconnections(&self, not: &[u32], candidates: &[u32]) -> (usize, u32, bool) {
        let mut fewest = usize::MAX;
        let mut vertex = 0;
        let mut in_candidates = false;

        for &v in not {
            let connections = intersection_size(candidates, self.graph.neighbors(v));
            let disconnections = candidates.len() - connections;
            if disconnections < fewest {
                fewest = disconnections;
                vertex = v;
                in_candidates = false;
                if fewest == 0 {
                    return (0, vertex, false);
                }
            }
        }
        for &v in candidates {
            let connections = intersection_size(candidates, self.graph.neighbors(v));
            let disconnections = candidates.len() - connections;
            if disconnections < fewest {
                fewest = disconnections;
                vertex = v;
                in_candidates = true;
            }
        }

        (fewest, vertex, in_candidates)
    }
}

// merge intersection of two ascending slices into a fresh ascending buffer
pub(crate) fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut intersection = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                intersection.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    intersection
}

// number of common elements of two ascending slices
pub(crate) fn intersection_size(a: &[u32], b: &[u32]) -> usize {
    let mut count = 0;
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }
    count
}
