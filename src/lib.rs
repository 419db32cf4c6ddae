//! # timeseal - Tamper-evident content seals and near-duplicate detection
//!
//! Two small engines that turn a blob of text into a compact fingerprint:
//!
//! - **Time-lock seals** prove that content existed, unmodified, at a point in
//!   time. The content is chunked, reduced to a Merkle root, and the root is
//!   bound to a timestamp and a random nonce with a second SHA-256 hash.
//! - **SimHash fingerprints** are 64-bit locality-sensitive digests: texts that
//!   share most of their vocabulary differ in only a few bits, so duplicates
//!   can be found by Hamming distance.
//!
//! Both are pure computations over the content. Storage, display and
//! transport of seals and fingerprints belong to the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use timeseal::{SealManager, generate_fingerprint, similarity};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Seal content and check it later
//! let manager = SealManager::new();
//! let seal = manager.create_seal("Minutes of the 3 May meeting")?;
//! let report = manager.verify("Minutes of the 3 May meeting", &seal);
//! assert!(report.valid);
//!
//! // Store the seal anywhere as JSON
//! let json = seal.to_json()?;
//! assert!(manager.verify_json("Minutes of the 3 May meeting", &json).valid);
//!
//! // Compare documents by fingerprint
//! let a = generate_fingerprint("The quick brown fox jumps");
//! let b = generate_fingerprint("The quick brown fox jumps");
//! assert_eq!(similarity::hamming_distance(a, b), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Seal Format
//!
//! ```text
//! contentHash = MerkleRoot(content)            chunk size 4096, SHA-256, hex
//! sealHash    = SHA-256(contentHash ":" timestamp ":" nonce)
//! ```
//!
//! The JSON field names (`contentHash`, `timestamp`, `nonce`, `sealHash`,
//! `version`) and the preimage format are fixed so that seals stay
//! verifiable by independent implementations.
//!
//! ## Error Handling
//!
//! Creating seals and decoding fingerprints strictly returns
//! `Result<T, SealError>`. Verifying a seal never fails: it returns a
//! [`SealVerification`] whose `reason` says what went wrong.
//!
//! ## Module Organization
//!
//! - [`seal`]: seal creation and verification
//! - [`merkle`]: Merkle tree over content chunks
//! - [`evidence`]: captured content bundled with its seal
//! - [`tokenizer`]: text normalization and term frequencies
//! - [`simhash`]: fingerprints and their hex form
//! - [`similarity`]: Hamming distance, pair search and clustering
//! - [`cache`]: caller-owned fingerprint memoization
//! - [`types`]: configuration and result types
//! - [`utils`]: hashing, chunking, nonces
//! - [`error`]: error types

pub mod cache;
pub mod error;
pub mod evidence;
pub mod merkle;
pub mod seal;
pub mod similarity;
pub mod simhash;
pub mod tokenizer;
pub mod types;
pub mod utils;

mod collections;

pub use cache::FingerprintCache;
pub use error::{Result, SealError};
pub use evidence::NotaryEvidence;
pub use merkle::{build_root, MerkleTree};
pub use seal::{SealManager, SealManagerBuilder, TimeLockSeal, SEAL_VERSION};
pub use similarity::SimilarityComparator;
pub use simhash::{generate_fingerprint, FingerprintBuilder, SimHash64};
pub use tokenizer::{tokenize, Tokenizer};
pub use types::*;
