use crate::bloom::{BloomConfig, CliqueIndex};
use crate::cliques::{intersection_size, Clique};
use crate::components::Components;
use crate::error::Error;
use log::{debug, info};
use std::time::Instant;

const ROOT: u32 = 1;

// one flag per tree node; a branch is done when every leaf below it is
// assigned, too small for the current level, or past the clique count
pub struct AssignedBranches {
    done: Vec<bool>,
}

impl AssignedBranches {
    #[must_use]
    pub fn new(power_up: u32, clique_count: u32) -> Self {
        let mut branches = Self {
            done: vec![false; 2 * power_up as usize],
        };
        // the tree may span the full u32 range, so size arithmetic is 64-bit
        for invalid_leaf in u64::from(power_up + clique_count)..2 * u64::from(power_up) {
            branches.mark_done(invalid_leaf as u32);
        }
        branches
    }

    #[must_use]
    pub fn is_done(&self, branch: u32) -> bool {
        self.done[branch as usize]
    }

    // when both siblings are done the parent is done as well, recursively
    pub fn mark_done(&mut self, branch: u32) {
        if self.done[branch as usize] {
            return;
        }
        self.done[branch as usize] = true;
        if branch > ROOT && self.done[(branch ^ 1) as usize] {
            self.mark_done(branch >> 1);
        }
    }
}

// runs clique percolation over every level k = minimum_size..=max_k, where
// max_k is the size of the largest clique; on_level receives the level, the
// component state and the component ids of the communities found there
pub fn percolate<F>(
    cliques: &[Clique],
    minimum_size: u32,
    config: &BloomConfig,
    mut on_level: F,
) -> Result<(), Error>
where
    F: FnMut(u32, &Components, &[u32]) -> Result<(), Error>,
{
    if cliques.is_empty() {
        return Err(Error::NoCliques(minimum_size));
    }
    if cliques.len() > i32::MAX as usize {
        return Err(Error::TooManyCliques(cliques.len()));
    }

    let clique_count = cliques.len() as u32;
    let max_k = cliques.iter().map(Vec::len).max().unwrap_or(0) as u32;
    debug_assert!(max_k >= minimum_size);

    let power_up = clique_count.next_power_of_two();
    let mut index = CliqueIndex::new(power_up, config);

    // the first level starts with every clique in one component
    let mut current = Components::new(cliques.len());
    let first_candidate = current.top_empty_component();
    for clique_id in 0..clique_count {
        current.move_node(clique_id, first_candidate);
    }
    let mut source_components = vec![first_candidate];

    let start = Instant::now();
    for k in minimum_size..=max_k {
        let threshold = k - 1;

        // cliques below the threshold cannot percolate at this level
        index.clear();
        for (id, clique) in cliques.iter().enumerate() {
            if clique.len() as u32 >= threshold {
                index.add_clique(clique, power_up + id as u32);
            }
        }
        debug!(
            "k = {}: index populated, {} of {} bits occupied",
            k,
            index.bloom().occupied(),
            index.bloom().bit_count()
        );

        let mut assigned = AssignedBranches::new(power_up, clique_count);
        for (id, clique) in cliques.iter().enumerate() {
            if clique.len() as u32 <= threshold {
                assigned.mark_done(power_up + id as u32);
            }
        }

        let mut level = Level {
            cliques,
            index: &index,
            assigned,
            components: current,
            threshold,
        };
        let found_communities = level.grow_communities(std::mem::take(&mut source_components));
        current = level.components;

        info!(
            "k = {}: found {} communities ({:.1}s)",
            k,
            found_communities.len(),
            start.elapsed().as_secs_f64()
        );
        on_level(k, &current, &found_communities)?;

        // carry each community's still-big-enough cliques into the next level
        if k < max_k {
            let mut next = Components::new(cliques.len());
            for &community in &found_communities {
                let destination = next.top_empty_component();
                for clique_id in current.members(community) {
                    if cliques[clique_id as usize].len() as u32 >= k + 1 {
                        next.move_node(clique_id, destination);
                    }
                }
                if next.member_count(destination) > 0 {
                    source_components.push(destination);
                }
            }
            current = next;
        }
    }

    Ok(())
}

// the mutable state of a single percolation level
struct Level<'a> {
    cliques: &'a [Clique],
    index: &'a CliqueIndex,
    assigned: AssignedBranches,
    components: Components,
    threshold: u32,
}

impl Level<'_> {
    // repeatedly seeds a fresh community with the first unassigned clique
    // of a source component and grows it to its full extent
    fn grow_communities(&mut self, mut source_components: Vec<u32>) -> Vec<u32> {
        let mut found_communities = Vec::new();

        while let Some(source) = source_components.pop() {
            while let Some(seed) = self.components.first_member(source) {
                debug_assert!(self.cliques[seed as usize].len() as u32 > self.threshold);
                debug_assert!(!self.assigned.is_done(self.index.power_up() + seed));

                let destination = self.components.top_empty_component();
                self.components.move_node(seed, destination);

                let mut frontier = vec![seed];
                while let Some(clique_id) = frontier.pop() {
                    self.assigned.mark_done(self.index.power_up() + clique_id);
                    if self.assigned.is_done(ROOT) {
                        // everything is assigned, no search can find more
                        continue;
                    }

                    let all_cliques = self.cliques;
                    let query = &all_cliques[clique_id as usize];
                    let mut neighbours = Vec::new();
                    self.search(ROOT, query, destination, &mut neighbours);

                    for &neighbour in &neighbours {
                        debug_assert_eq!(self.components.component_of(neighbour), source);
                        self.components.move_node(neighbour, destination);
                        frontier.push(neighbour);
                    }
                }

                debug!(
                    "k = {}: grew a community of {} cliques",
                    self.threshold + 1,
                    self.components.member_count(destination)
                );
                found_communities.push(destination);
            }
        }

        found_communities
    }

    // recursive descent over the index tree; a branch is entered only if
    // its bloom union could still reach the overlap threshold, so whole
    // subtrees are cut without pairwise comparisons
    fn search(&mut self, branch: u32, query: &[u32], skip: u32, found: &mut Vec<u32>) {
        debug_assert!(!self.assigned.is_done(branch));
        let power_up = self.index.power_up();

        if branch >= power_up {
            let leaf = branch - power_up;
            if leaf as usize >= self.cliques.len() {
                return;
            }
            if self.components.component_of(leaf) == skip {
                return;
            }

            let overlap = intersection_size(&self.cliques[leaf as usize], query);
            debug_assert!(overlap < query.len());
            if overlap as u32 >= self.threshold {
                found.push(leaf);
                // keeps later frontier searches from re-examining this leaf
                self.assigned.mark_done(branch);
            }
        } else {
            let left = branch << 1;
            let right = left + 1;
            if !self.assigned.is_done(left)
                && self.index.overlap_estimate(query, left) as u32 >= self.threshold
            {
                self.search(left, query, skip, found);
            }
            if !self.assigned.is_done(right)
                && self.index.overlap_estimate(query, right) as u32 >= self.threshold
            {
                self.search(right, query, skip, found);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    const TEST_CONFIG: BloomConfig = BloomConfig {
        filter_bits: 1 << 16,
        hash_seed: 0,
    };

    // communities per level as sets of clique ids
    fn collect_levels(cliques: &[Clique], minimum_size: u32) -> Vec<(u32, Vec<BTreeSet<u32>>)> {
        let mut levels = Vec::new();
        percolate(cliques, minimum_size, &TEST_CONFIG, |k, components, found| {
            let communities = found
                .iter()
                .map(|&community| components.members(community).collect::<BTreeSet<u32>>())
                .collect();
            levels.push((k, communities));
            Ok(())
        })
        .unwrap();
        levels
    }

    #[test]
    fn assigned_branches_premarks_invalid_leaves() {
        // power_up 4, three cliques: leaf 7 is invalid from the start
        let branches = AssignedBranches::new(4, 3);

        assert!(branches.is_done(7));
        assert!(!branches.is_done(6));
        assert!(!branches.is_done(3));
        assert!(!branches.is_done(ROOT));
    }

    #[test]
    fn marking_both_siblings_completes_the_parent() {
        let mut branches = AssignedBranches::new(4, 4);

        branches.mark_done(4);
        assert!(!branches.is_done(2));
        branches.mark_done(5);
        assert!(branches.is_done(2));
        assert!(!branches.is_done(ROOT));

        branches.mark_done(6);
        branches.mark_done(7);
        assert!(branches.is_done(3));
        assert!(branches.is_done(ROOT));
    }

    #[test]
    fn no_cliques_is_an_error() {
        assert!(matches!(
            percolate(&[], 3, &TEST_CONFIG, |_, _, _| Ok(())),
            Err(Error::NoCliques(3))
        ));
    }

    #[test]
    fn a_single_clique_is_a_community_at_every_level() {
        let cliques = vec![vec![0, 1, 2, 3]];

        let levels = collect_levels(&cliques, 3);

        assert_eq!(
            levels,
            vec![
                (3, vec![BTreeSet::from([0])]),
                (4, vec![BTreeSet::from([0])]),
            ]
        );
    }

    #[test]
    fn overlapping_triangles_merge() {
        // {0,1,2} and {1,2,3} share two vertices, the threshold at k = 3
        let cliques = vec![vec![0, 1, 2], vec![1, 2, 3]];

        let levels = collect_levels(&cliques, 3);

        assert_eq!(levels, vec![(3, vec![BTreeSet::from([0, 1])])]);
    }

    #[test]
    fn bow_tie_stays_apart() {
        // {0,1,2} and {2,3,4} share a single vertex, below the threshold
        let cliques = vec![vec![0, 1, 2], vec![2, 3, 4]];

        let levels = collect_levels(&cliques, 3);

        assert_eq!(levels.len(), 1);
        let (k, communities) = &levels[0];
        assert_eq!(*k, 3);
        let communities: BTreeSet<&BTreeSet<u32>> = communities.iter().collect();
        assert_eq!(
            communities,
            BTreeSet::from([&BTreeSet::from([0]), &BTreeSet::from([1])])
        );
    }

    #[test]
    fn smaller_cliques_drop_out_at_higher_levels() {
        // the triangle bridges the two four-cliques at k = 3 but cannot
        // reach k = 4, where the remaining overlap is too small
        let cliques = vec![vec![0, 1, 2, 3], vec![2, 3, 4], vec![3, 4, 5, 6]];

        let levels = collect_levels(&cliques, 3);

        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].0, 3);
        assert_eq!(levels[0].1, vec![BTreeSet::from([0, 1, 2])]);

        assert_eq!(levels[1].0, 4);
        let level_4: BTreeSet<&BTreeSet<u32>> = levels[1].1.iter().collect();
        assert_eq!(
            level_4,
            BTreeSet::from([&BTreeSet::from([0]), &BTreeSet::from([2])])
        );
    }
}
