//! Merkle tree over chunked content
//!
//! Content is split into fixed-size chunks, each chunk becomes a leaf, and
//! the tree is reduced bottom-up until a single root hash remains. The root
//! is the `contentHash` recorded in a [`TimeLockSeal`](crate::seal::TimeLockSeal).
//!
//! ## Tree Structure
//!
//! ```text
//!            Root
//!          /      \
//!     H(L0+L1)     L2        <- odd node promoted unchanged
//!     /     \      |
//!   L0      L1     L2        <- Lx = SHA-256(chunk x), hex
//!   |       |      |
//! chunk0  chunk1  chunk2
//! ```
//!
//! Internal nodes hash the *string* concatenation of their children's hex
//! digests. An unpaired node at the end of a level moves up as-is; it is not
//! duplicated. Both rules are part of the seal format and must not change,
//! because the standalone evidence verifier re-derives roots the same way.
//!
//! ## Performance
//!
//! - Leaves are independent and are hashed in parallel with rayon once the
//!   leaf count reaches the configured threshold
//! - Pairs within one level are independent and are reduced in parallel too;
//!   levels themselves are sequential
//! - Time complexity is O(n) hashes for n chunks, memory O(n)

use crate::utils::{self, DEFAULT_CHUNK_SIZE};
use rayon::prelude::*;
use tracing::trace;

/// Leaf count at or above which hashing is spread over the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// A Merkle tree built from content chunks
///
/// Keeps every level so callers can inspect how a root was derived.
/// `levels()[0]` holds the leaf hashes and the last level holds only the root.
///
/// # Example
///
/// ```rust
/// use timeseal::merkle::MerkleTree;
///
/// let tree = MerkleTree::from_content("hello world", 4096);
/// assert_eq!(tree.leaf_count(), 1);
/// assert_eq!(tree.root_hash(), timeseal::utils::hash_str("hello world"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree {
    levels: Vec<Vec<String>>,
}

impl MerkleTree {
    /// Build a tree from content using the given chunk size
    pub fn from_content(content: &str, chunk_size: usize) -> Self {
        Self::from_content_with_threshold(content, chunk_size, DEFAULT_PARALLEL_THRESHOLD)
    }

    /// Build a tree from content, choosing when to go parallel
    pub fn from_content_with_threshold(
        content: &str,
        chunk_size: usize,
        parallel_threshold: usize,
    ) -> Self {
        let chunks = utils::chunk_content(content, chunk_size);
        Self::from_chunks(&chunks, parallel_threshold)
    }

    /// Build a tree from pre-split chunks
    ///
    /// An empty chunk slice is treated as a single empty chunk so the tree
    /// always has a root.
    pub fn from_chunks(chunks: &[String], parallel_threshold: usize) -> Self {
        let parallel = chunks.len() >= parallel_threshold.max(1);

        let leaves: Vec<String> = if chunks.is_empty() {
            vec![utils::hash_str("")]
        } else if parallel {
            chunks.par_iter().map(|c| utils::hash_str(c)).collect()
        } else {
            chunks.iter().map(|c| utils::hash_str(c)).collect()
        };

        Self::from_leaf_hashes(leaves, parallel_threshold)
    }

    /// Build a tree from already-computed leaf hashes
    ///
    /// Returns a tree whose root is the hash of an empty chunk if `leaves`
    /// is empty.
    pub fn from_leaf_hashes(leaves: Vec<String>, parallel_threshold: usize) -> Self {
        let leaves = if leaves.is_empty() {
            vec![utils::hash_str("")]
        } else {
            leaves
        };

        let mut levels = vec![leaves];
        while let Some(current) = levels.last().filter(|level| level.len() > 1) {
            let next = reduce_level(current, current.len() >= parallel_threshold.max(1));
            levels.push(next);
        }

        trace!(
            "Built Merkle tree with {} leaves and {} levels",
            levels[0].len(),
            levels.len()
        );
        Self { levels }
    }

    /// Root hash as 64 lowercase hex characters
    pub fn root_hash(&self) -> &str {
        // Every constructor guarantees at least one level with one node.
        self.levels
            .last()
            .and_then(|level| level.first())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Leaf hashes in chunk order
    pub fn leaves(&self) -> &[String] {
        &self.levels[0]
    }

    /// Number of leaves (chunks)
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels including the leaf level and the root level
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// All levels, leaves first
    pub fn levels(&self) -> &[Vec<String>] {
        &self.levels
    }

    /// Check whether this tree's root equals `expected`
    pub fn verify_root(&self, expected: &str) -> bool {
        self.root_hash() == expected
    }
}

/// Compute the Merkle root of `content` with the default 4096-unit chunks
///
/// # Example
///
/// ```rust
/// use timeseal::merkle::build_root;
///
/// assert_eq!(build_root("same"), build_root("same"));
/// assert_ne!(build_root("same"), build_root("Same"));
/// ```
pub fn build_root(content: &str) -> String {
    MerkleTree::from_content(content, DEFAULT_CHUNK_SIZE)
        .root_hash()
        .to_string()
}

/// Pair adjacent hashes left to right; an odd trailing node moves up unchanged
fn reduce_level(level: &[String], parallel: bool) -> Vec<String> {
    let combine = |pair: &[String]| match pair {
        [left, right] => compute_internal_hash(left, right),
        [single] => single.clone(),
        _ => unreachable!("chunks(2) yields one or two nodes"),
    };

    if parallel {
        level.par_chunks(2).map(combine).collect()
    } else {
        level.chunks(2).map(combine).collect()
    }
}

/// Hash for an internal node: SHA-256 of `left + right` as hex text
fn compute_internal_hash(left: &str, right: &str) -> String {
    utils::hash_concat(left, right)
}
