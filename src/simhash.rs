//! SimHash fingerprints for near-duplicate detection
//!
//! A [`SimHash64`] is a 64-bit locality-sensitive digest of a text: texts
//! that share most of their vocabulary get fingerprints that differ in only
//! a few bits, so near-duplicates can be found by Hamming distance without
//! keeping the texts around.
//!
//! ## Algorithm
//!
//! 1. Tokenize the text (see [`tokenizer`](crate::tokenizer)); no tokens
//!    means the zero fingerprint
//! 2. Count term frequencies
//! 3. Hash each distinct token with 64-bit FNV-1a
//! 4. For each of the 64 bit positions keep a signed tally: add the token's
//!    frequency if its hash has the bit set, subtract it otherwise
//! 5. Bit `i` of the fingerprint is 1 iff tally `i` is strictly positive
//!
//! ## Storage format
//!
//! Fingerprints are stored as 16 lowercase hex characters, most significant
//! (high) 32-bit half first. [`SimHash64::high`] and [`SimHash64::low`]
//! expose the halves for stores that keep them separately.

use crate::error::{Result, SealError};
use crate::tokenizer::{term_frequencies, Tokenizer};
use crate::types::SimilarityConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Length of a serialized fingerprint
pub const SIMHASH_HEX_LEN: usize = 16;

/// 64-bit FNV-1a over the bytes of `data`
///
/// # Example
///
/// ```rust
/// use timeseal::simhash::fnv1a_64;
///
/// assert_eq!(fnv1a_64(""), 0xcbf29ce484222325);
/// assert_eq!(fnv1a_64("a"), 0xaf63dc4c8601ec8c);
/// ```
pub fn fnv1a_64(data: &str) -> u64 {
    data.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// A 64-bit SimHash fingerprint
///
/// Serializes to and from its 16-character hex form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SimHash64(pub u64);

impl SimHash64 {
    /// The all-zero fingerprint, produced for text with no usable tokens
    pub const ZERO: SimHash64 = SimHash64(0);

    /// Raw 64-bit value
    pub fn value(self) -> u64 {
        self.0
    }

    /// Whether this is the all-zero fingerprint
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Upper 32 bits
    pub fn high(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Lower 32 bits
    pub fn low(self) -> u32 {
        self.0 as u32
    }

    /// Reassemble a fingerprint from its two halves
    pub fn from_halves(high: u32, low: u32) -> Self {
        SimHash64((u64::from(high) << 32) | u64::from(low))
    }

    /// 16 lowercase hex characters, high half first
    pub fn to_hex(self) -> String {
        format!("{:016x}", self.0)
    }

    /// Decode a hex fingerprint, yielding [`SimHash64::ZERO`] if malformed
    ///
    /// A zero result you did not compute yourself should be treated as
    /// suspect. Use [`str::parse`] to get an error instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use timeseal::SimHash64;
    ///
    /// let f = SimHash64::from_halves(0xdeadbeef, 0x00c0ffee);
    /// assert_eq!(f.to_hex(), "deadbeef00c0ffee");
    /// assert_eq!(SimHash64::from_hex("deadbeef00c0ffee"), f);
    /// assert_eq!(SimHash64::from_hex("abc"), SimHash64::ZERO);
    /// ```
    pub fn from_hex(hex: &str) -> Self {
        match parse_hex(hex) {
            Ok(f) => f,
            Err(e) => {
                warn!("Treating malformed fingerprint {:?} as zero: {}", hex, e);
                Self::ZERO
            }
        }
    }

    /// Number of differing bits between two fingerprints
    pub fn hamming_distance(self, other: SimHash64) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for SimHash64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for SimHash64 {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self> {
        parse_hex(s)
    }
}

impl From<SimHash64> for String {
    fn from(f: SimHash64) -> Self {
        f.to_hex()
    }
}

impl TryFrom<String> for SimHash64 {
    type Error = SealError;

    fn try_from(s: String) -> Result<Self> {
        parse_hex(&s)
    }
}

impl From<u64> for SimHash64 {
    fn from(value: u64) -> Self {
        SimHash64(value)
    }
}

fn parse_hex(hex: &str) -> Result<SimHash64> {
    if hex.len() != SIMHASH_HEX_LEN {
        return Err(SealError::decode(format!(
            "expected {} hex characters, got {}",
            SIMHASH_HEX_LEN,
            hex.len()
        )));
    }
    // from_str_radix would also accept a leading '+'.
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SealError::decode("non-hex character in fingerprint"));
    }
    u64::from_str_radix(hex, 16)
        .map(SimHash64)
        .map_err(|e| SealError::decode(e.to_string()))
}

/// Computes SimHash fingerprints from text
///
/// # Example
///
/// ```rust
/// use timeseal::simhash::FingerprintBuilder;
///
/// let builder = FingerprintBuilder::new();
/// let a = builder.fingerprint("The quick brown fox jumps");
/// assert_eq!(a, builder.fingerprint("The quick brown fox jumps"));
/// assert!(builder.fingerprint("the a an 123 456").is_zero());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FingerprintBuilder {
    tokenizer: Tokenizer,
}

impl FingerprintBuilder {
    /// Create a builder with the default tokenizer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose tokenizer follows `config`
    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self {
            tokenizer: Tokenizer::from_config(config),
        }
    }

    /// Tokenizer used by this builder
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Fingerprint `text`
    pub fn fingerprint(&self, text: &str) -> SimHash64 {
        let tokens = self.tokenizer.tokenize(text);
        if tokens.is_empty() {
            return SimHash64::ZERO;
        }

        let frequencies = term_frequencies(&tokens);
        let features = frequencies
            .iter()
            .map(|(token, &count)| (fnv1a_64(token), i64::from(count)));
        let fingerprint = fingerprint_weighted(features);

        debug!(
            "Fingerprinted {} tokens ({} distinct): {}",
            tokens.len(),
            frequencies.len(),
            fingerprint
        );
        fingerprint
    }
}

/// Fingerprint `text` with the default tokenizer
pub fn generate_fingerprint(text: &str) -> SimHash64 {
    FingerprintBuilder::new().fingerprint(text)
}

/// Bit-voting over `(feature_hash, weight)` pairs
///
/// Bit `i` is set iff the weights of features with bit `i` set outweigh
/// those without it. Ties produce 0.
pub fn fingerprint_weighted<I>(features: I) -> SimHash64
where
    I: IntoIterator<Item = (u64, i64)>,
{
    let mut tally = [0i64; 64];
    for (hash, weight) in features {
        for (bit, slot) in tally.iter_mut().enumerate() {
            if (hash >> bit) & 1 == 1 {
                *slot += weight;
            } else {
                *slot -= weight;
            }
        }
    }

    let value = tally
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0)
        .fold(0u64, |acc, (bit, _)| acc | (1u64 << bit));
    SimHash64(value)
}
