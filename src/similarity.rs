//! Pairwise comparison and clustering of SimHash fingerprints
//!
//! Everything here works on fingerprints alone; the original texts are never
//! needed. All-pairs search is O(n²), which is fine for personal-library
//! sizes. There is no LSH bucketing.
//!
//! ## Clustering is seed-based, not transitive
//!
//! [`cluster_by_similarity`] makes a single greedy pass: the first unvisited
//! item seeds a cluster and absorbs every *later* unvisited item within the
//! threshold of that seed. Members are never compared with each other, so
//! for `A ~ B`, `B ~ C`, `A !~ C` with `A` first the result is `[A, B]`,
//! `[C]`. Chains are deliberately not followed.

use crate::simhash::SimHash64;
use crate::types::{SimilarPair, SimilarityConfig};
use rayon::prelude::*;
use tracing::info;

/// Fingerprint count at or above which pair search uses rayon
const PARALLEL_PAIR_THRESHOLD: usize = 512;

/// Number of bits that differ between two fingerprints, in `0..=64`
pub fn hamming_distance(a: SimHash64, b: SimHash64) -> u32 {
    a.hamming_distance(b)
}

/// Convert a Hamming distance to a similarity percentage
///
/// `round((1 - distance / 64) * 100)`; distances above 64 are clamped.
///
/// # Example
///
/// ```rust
/// use timeseal::similarity::distance_to_similarity;
///
/// assert_eq!(distance_to_similarity(0), 100);
/// assert_eq!(distance_to_similarity(6), 91);
/// assert_eq!(distance_to_similarity(64), 0);
/// ```
pub fn distance_to_similarity(distance: u32) -> u32 {
    let distance = distance.min(64);
    ((1.0 - f64::from(distance) / 64.0) * 100.0).round() as u32
}

/// Whether two fingerprints are within `threshold` bits of each other
pub fn is_similar(a: SimHash64, b: SimHash64, threshold: u32) -> bool {
    hamming_distance(a, b) <= threshold
}


/// All index pairs `i < j` within `threshold`, most similar first
///
/// Ties keep ascending `(i, j)` order, so the output is deterministic.
///
/// # Example
///
/// ```rust
/// use timeseal::SimHash64;
/// use timeseal::similarity::find_similar_pairs;
///
/// let prints = [SimHash64(0b1111), SimHash64(0b0111), SimHash64(u64::MAX)];
/// let pairs = find_similar_pairs(&prints, 6);
/// assert_eq!(pairs.len(), 1);
/// assert_eq!((pairs[0].i, pairs[0].j, pairs[0].similarity), (0, 1, 98));
/// ```
pub fn find_similar_pairs(fingerprints: &[SimHash64], threshold: u32) -> Vec<SimilarPair> {
    let pairs_from = |i: usize| -> Vec<SimilarPair> {
        let a = fingerprints[i];
        fingerprints[i + 1..]
            .iter()
            .enumerate()
            .filter_map(|(offset, &b)| {
                let distance = hamming_distance(a, b);
                (distance <= threshold).then(|| SimilarPair {
                    i,
                    j: i + 1 + offset,
                    distance,
                    similarity: distance_to_similarity(distance),
                })
            })
            .collect()
    };

    let mut pairs: Vec<SimilarPair> = if fingerprints.len() >= PARALLEL_PAIR_THRESHOLD {
        (0..fingerprints.len())
            .into_par_iter()
            .flat_map_iter(pairs_from)
            .collect()
    } else {
        (0..fingerprints.len()).flat_map(pairs_from).collect()
    };

    // Stable sort keeps (i, j) order among equal similarities.
    pairs.sort_by(|a, b| b.similarity.cmp(&a.similarity));

    info!(
        "Compared {} fingerprints: {} pairs within {} bits",
        fingerprints.len(),
        pairs.len(),
        threshold
    );
    pairs
}

/// Greedy single-pass clustering around seeds
///
/// Every index appears in exactly one cluster; clusters are ordered by their
/// seed and members within a cluster ascend.
///
/// # Example
///
/// ```rust
/// use timeseal::SimHash64;
/// use timeseal::similarity::cluster_by_similarity;
///
/// let a = SimHash64(0);
/// let b = SimHash64(0b111);           // 3 bits from a
/// let c = SimHash64(0b111_111);       // 6 bits from a, 3 from b
/// assert_eq!(cluster_by_similarity(&[a, b, c], 4), vec![vec![0, 1], vec![2]]);
/// ```
pub fn cluster_by_similarity(fingerprints: &[SimHash64], threshold: u32) -> Vec<Vec<usize>> {
    let mut visited = vec![false; fingerprints.len()];
    let mut clusters = Vec::new();

    for seed in 0..fingerprints.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let mut cluster = vec![seed];
        for candidate in seed + 1..fingerprints.len() {
            if !visited[candidate]
                && is_similar(fingerprints[seed], fingerprints[candidate], threshold)
            {
                visited[candidate] = true;
                cluster.push(candidate);
            }
        }
        clusters.push(cluster);
    }

    info!(
        "Clustered {} fingerprints into {} groups",
        fingerprints.len(),
        clusters.len()
    );
    clusters
}

/// Comparison functions bound to the threshold of a [`SimilarityConfig`]
///
/// ```rust
/// use timeseal::{SimHash64, SimilarityConfig};
/// use timeseal::similarity::SimilarityComparator;
///
/// let config = SimilarityConfig { threshold: 2, ..Default::default() };
/// let comparator = SimilarityComparator::from_config(&config);
/// assert!(comparator.is_similar(SimHash64(0), SimHash64(0b11)));
/// assert!(!comparator.is_similar(SimHash64(0), SimHash64(0b111)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityComparator {
    threshold: u32,
}

impl Default for SimilarityComparator {
    fn default() -> Self {
        Self::from_config(&SimilarityConfig::default())
    }
}

impl SimilarityComparator {
    /// Comparator with an explicit threshold in bits
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Comparator using `config.threshold`
    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(config.threshold)
    }

    /// Maximum Hamming distance counted as similar
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// See [`is_similar`]
    pub fn is_similar(&self, a: SimHash64, b: SimHash64) -> bool {
        is_similar(a, b, self.threshold)
    }

    /// See [`find_similar_pairs`]
    pub fn find_similar_pairs(&self, fingerprints: &[SimHash64]) -> Vec<SimilarPair> {
        find_similar_pairs(fingerprints, self.threshold)
    }

    /// See [`cluster_by_similarity`]
    pub fn cluster(&self, fingerprints: &[SimHash64]) -> Vec<Vec<usize>> {
        cluster_by_similarity(fingerprints, self.threshold)
    }
}
