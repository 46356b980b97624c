use foldhash::fast::FixedState;
use std::hash::BuildHasher;

// sizing knobs for the clique index filter
#[derive(Debug, Clone, Copy)]
pub struct BloomConfig {
    pub filter_bits: u64,
    pub hash_seed: u64,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            // 10 giga-bits, 1.25 GB
            filter_bits: 10_000_000_000,
            hash_seed: 0,
        }
    }
}

// fixed-size bloom filter with a single seeded hash function
// false positives are possible, false negatives are not
pub struct Bloom {
    words: Vec<u64>,
    bit_count: u64,
    occupied: u64,
    set_calls: u64,
    build_hasher: FixedState,
}

impl Bloom {
    #[must_use]
    pub fn new(bit_count: u64, hash_seed: u64) -> Self {
        assert!(bit_count > 0);
        let word_count = bit_count.div_ceil(64) as usize;
        Self {
            words: vec![0; word_count],
            bit_count,
            occupied: 0,
            set_calls: 0,
            build_hasher: FixedState::with_seed(hash_seed),
        }
    }

    fn position(&self, key: u64) -> (usize, u64) {
        let bit = self.build_hasher.hash_one(key) % self.bit_count;
        ((bit / 64) as usize, 1 << (bit % 64))
    }

    #[must_use]
    pub fn test(&self, key: u64) -> bool {
        let (word, mask) = self.position(key);
        self.words[word] & mask != 0
    }

    pub fn set(&mut self, key: u64) {
        self.set_calls += 1;
        let (word, mask) = self.position(key);
        if self.words[word] & mask == 0 {
            self.occupied += 1;
            self.words[word] |= mask;
        }
    }

    // resets all bits, keeping the allocation
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.occupied = 0;
        self.set_calls = 0;
    }

    #[must_use]
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    #[must_use]
    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    #[must_use]
    pub fn set_calls(&self) -> u64 {
        self.set_calls
    }
}

// a binary tree over all clique leaves, backed by the bloom filter
// node b covers leaves [b * 2^d, (b+1) * 2^d) at depth d below it; the bit
// for (b, v) is set iff some clique under b may contain vertex v
pub struct CliqueIndex {
    bloom: Bloom,
    power_up: u32,
}

impl CliqueIndex {
    // power_up is the smallest power of two at or above the clique count;
    // leaves occupy branch ids power_up..2*power_up
    #[must_use]
    pub fn new(power_up: u32, config: &BloomConfig) -> Self {
        assert!(power_up.is_power_of_two());
        Self {
            bloom: Bloom::new(config.filter_bits, config.hash_seed),
            power_up,
        }
    }

    #[must_use]
    pub fn power_up(&self) -> u32 {
        self.power_up
    }

    fn key(branch: u32, vertex: u32) -> u64 {
        (u64::from(branch) << 32) | u64::from(vertex)
    }

    // sets the bits of every clique vertex at the leaf and all its ancestors
    pub fn add_clique(&mut self, clique: &[u32], leaf: u32) {
        debug_assert!(leaf >= self.power_up && u64::from(leaf) < 2 * u64::from(self.power_up));
        let mut branch = leaf;
        while branch != 0 {
            for &vertex in clique {
                self.bloom.set(Self::key(branch, vertex));
            }
            branch >>= 1;
        }
    }

    // upper bound on the overlap between the query clique and any single
    // clique stored under the given branch
    #[must_use]
    pub fn overlap_estimate(&self, query: &[u32], branch: u32) -> usize {
        query
            .iter()
            .filter(|&&vertex| self.bloom.test(Self::key(branch, vertex)))
            .count()
    }

    #[must_use]
    pub fn bloom(&self) -> &Bloom {
        &self.bloom
    }

    pub fn clear(&mut self) {
        self.bloom.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TEST_CONFIG: BloomConfig = BloomConfig {
        filter_bits: 1 << 16,
        hash_seed: 7,
    };

    #[test]
    fn set_bits_are_observable() {
        let mut bloom = Bloom::new(1024, 0);

        assert!(!bloom.test(42));
        bloom.set(42);
        assert!(bloom.test(42));
        assert_eq!(bloom.occupied(), 1);
        assert_eq!(bloom.set_calls(), 1);

        bloom.set(42);
        assert_eq!(bloom.occupied(), 1);
        assert_eq!(bloom.set_calls(), 2);

        bloom.clear();
        assert!(!bloom.test(42));
        assert_eq!(bloom.occupied(), 0);
    }

    #[test]
    fn every_ancestor_sees_an_added_clique() {
        let power_up = 8;
        let mut index = CliqueIndex::new(power_up, &TEST_CONFIG);
        let cliques: [&[u32]; 3] = [&[1, 4, 9], &[2, 4, 6, 8], &[0, 9, 17]];

        for (id, clique) in cliques.iter().enumerate() {
            index.add_clique(clique, power_up + id as u32);
        }

        for (id, clique) in cliques.iter().enumerate() {
            let mut branch = power_up + id as u32;
            while branch != 0 {
                // no false negatives along the ancestor chain
                assert_eq!(index.overlap_estimate(clique, branch), clique.len());
                branch >>= 1;
            }
        }
    }

    #[test]
    fn estimate_bounds_the_real_overlap() {
        let power_up = 4;
        let mut index = CliqueIndex::new(power_up, &TEST_CONFIG);
        index.add_clique(&[3, 5, 7], power_up);
        index.add_clique(&[5, 7, 11], power_up + 1);

        // branch 2 covers both leaves; the union must dominate each overlap
        let query = [5, 7, 11, 13];
        assert!(index.overlap_estimate(&query, 2) >= 3);
        // an untouched subtree can only produce hash-collision positives,
        // never drop below the true overlap of zero
        let _ = index.overlap_estimate(&query, 3);
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut index = CliqueIndex::new(2, &TEST_CONFIG);
        index.add_clique(&[1, 2, 3], 2);
        assert!(index.bloom().occupied() > 0);

        index.clear();
        assert_eq!(index.bloom().occupied(), 0);
        assert_eq!(index.overlap_estimate(&[1, 2, 3], 1), 0);
    }
}
