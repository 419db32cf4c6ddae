//! Core data types used throughout the timeseal library
//!
//! ## Overview
//!
//! The types in this module represent:
//! - **Configuration**: `SealConfig`, `SimilarityConfig` - operation parameters
//! - **Verification**: `SealVerification`, `VerificationFailure` - structured
//!   outcomes of checking a seal against content
//! - **Similarity**: `SimilarPair` - results of pairwise fingerprint comparison
//!
//! ## Examples
//!
//! ```rust
//! use timeseal::types::{SealConfig, SimilarityConfig};
//!
//! let config = SealConfig {
//!     max_content_size: 10 * 1024 * 1024,
//!     ..Default::default()
//! };
//! assert_eq!(config.chunk_size, 4096);
//! assert_eq!(SimilarityConfig::default().threshold, 6);
//! ```

use crate::merkle::DEFAULT_PARALLEL_THRESHOLD;
use crate::utils::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default Hamming distance at or below which two fingerprints are similar
pub const DEFAULT_SIMILARITY_THRESHOLD: u32 = 6;

/// Configuration for seal creation and verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealConfig {
    /// Chunk size in UTF-16 code units; 4096 for interoperable seals
    pub chunk_size: usize,
    /// Maximum content size in bytes (0 = unlimited)
    pub max_content_size: usize,
    /// Leaf count at or above which Merkle hashing runs in parallel
    pub parallel_threshold: usize,
}

impl Default for SealConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_content_size: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Configuration for tokenizing and comparing fingerprints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Maximum Hamming distance for two fingerprints to count as similar
    pub threshold: u32,
    /// Shortest token kept by the tokenizer
    pub min_token_len: usize,
    /// Longest token kept by the tokenizer
    pub max_token_len: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            min_token_len: 2,
            max_token_len: 30,
        }
    }
}

/// Why a seal failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationFailure {
    /// The content's Merkle root differs from the sealed `contentHash`
    ContentModified,
    /// `sealHash` does not bind `contentHash`, `timestamp` and `nonce`
    SealTampered,
    /// The seal claims to have been created after the verification time
    FutureTimestamp,
    /// The seal could not be checked at all (malformed fields, bad JSON, ...)
    VerificationError,
}

impl VerificationFailure {
    /// Human-readable reason, stable across releases
    pub fn reason(&self) -> &'static str {
        match self {
            VerificationFailure::ContentModified => "Content has been modified",
            VerificationFailure::SealTampered => "Seal has been tampered with",
            VerificationFailure::FutureTimestamp => "Timestamp is in the future",
            VerificationFailure::VerificationError => "Verification error",
        }
    }
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Outcome of verifying a seal against content
///
/// Verification never fails with an error; every problem is folded into
/// `valid == false` with a `reason`.
///
/// # Examples
///
/// ```rust
/// # use timeseal::types::{SealVerification, VerificationFailure};
/// let ok = SealVerification::valid();
/// assert!(ok.valid);
/// assert!(ok.reason.is_none());
///
/// let bad = SealVerification::invalid(VerificationFailure::SealTampered);
/// assert_eq!(bad.reason_text(), Some("Seal has been tampered with"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealVerification {
    /// Whether the seal holds for the content
    pub valid: bool,
    /// Failure reason when `valid` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<VerificationFailure>,
}

impl SealVerification {
    /// A successful verification
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// A failed verification with the given reason
    pub fn invalid(reason: VerificationFailure) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    /// Failure reason as text, if any
    pub fn reason_text(&self) -> Option<&'static str> {
        self.reason.as_ref().map(VerificationFailure::reason)
    }
}

impl fmt::Display for SealVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            None => f.write_str("Seal is valid"),
            Some(reason) => write!(f, "Seal is invalid: {}", reason),
        }
    }
}

/// A pair of similar fingerprints found by pairwise comparison
///
/// `i < j` always holds; both are indices into the compared slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarPair {
    /// Index of the first fingerprint
    pub i: usize,
    /// Index of the second fingerprint
    pub j: usize,
    /// Hamming distance between the two
    pub distance: u32,
    /// Similarity percentage derived from the distance
    pub similarity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        assert_eq!(
            VerificationFailure::ContentModified.to_string(),
            "Content has been modified"
        );
        assert_eq!(
            VerificationFailure::FutureTimestamp.reason(),
            "Timestamp is in the future"
        );
    }

    #[test]
    fn test_valid_serializes_without_reason() {
        let json = serde_json::to_string(&SealVerification::valid()).unwrap();
        assert_eq!(json, r#"{"valid":true}"#);
    }

    #[test]
    fn test_verification_display() {
        let bad = SealVerification::invalid(VerificationFailure::VerificationError);
        assert_eq!(bad.to_string(), "Seal is invalid: Verification error");
    }
}
