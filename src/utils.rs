//! Utility functions for timeseal
//!
//! This module holds the leaf primitives the sealing engine is built from:
//!
//! - **Hashing**: SHA-256 over bytes or strings, rendered as lowercase hex
//! - **Chunking**: splitting content into fixed-size chunks for Merkle leaves
//! - **Nonces**: cryptographically secure random seal nonces
//! - **Clock**: the current time in milliseconds since the Unix epoch
//!
//! ## Chunk units
//!
//! Chunk sizes are counted in UTF-16 code units, the unit the browser-side
//! evidence verifier slices strings by. For ASCII and other BMP text this is
//! the same as counting characters. A surrogate pair that straddles a chunk
//! boundary is split, and each lone half is encoded as U+FFFD before hashing,
//! which is exactly what the verifier's UTF-8 encoder produces.
//!
//! ## Thread Safety
//!
//! All functions are pure (apart from reading the clock and the RNG) and can
//! be called concurrently from multiple threads.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Default chunk size, in UTF-16 code units
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Number of random bytes in a seal nonce
pub const NONCE_BYTES: usize = 16;

/// Hash arbitrary data using SHA-256
///
/// # Returns
///
/// Returns the SHA-256 hash as a 64-character lowercase hexadecimal string.
///
/// # Example
///
/// ```rust
/// use timeseal::utils::hash_data;
///
/// let hash = hash_data(b"abc");
/// assert_eq!(hash, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
/// ```
pub fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Hash the UTF-8 encoding of a string using SHA-256
pub fn hash_str(data: &str) -> String {
    hash_data(data.as_bytes())
}

/// Hash the concatenation of two strings without allocating the joined string
pub(crate) fn hash_concat(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}

/// Split content into consecutive chunks of at most `size` UTF-16 code units
///
/// Always returns at least one chunk: empty content yields a single empty
/// chunk so that a Merkle tree built from the result has a leaf.
///
/// # Panics
///
/// Never panics for `size > 0`. Callers validate `size` when building their
/// configuration; a `size` of zero is treated as one.
///
/// # Example
///
/// ```rust
/// use timeseal::utils::chunk_content;
///
/// assert_eq!(chunk_content("", 4096), vec![String::new()]);
///
/// let chunks = chunk_content(&"a".repeat(5000), 4096);
/// assert_eq!(chunks.len(), 2);
/// assert_eq!(chunks[0].len(), 4096);
/// assert_eq!(chunks[1].len(), 904);
/// ```
pub fn chunk_content(content: &str, size: usize) -> Vec<String> {
    let size = size.max(1);

    // Fast path: ASCII content has one code unit per byte.
    if content.is_ascii() {
        if content.is_empty() {
            return vec![String::new()];
        }
        return content
            .as_bytes()
            .chunks(size)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
    }

    let units: Vec<u16> = content.encode_utf16().collect();
    units
        .chunks(size)
        .map(String::from_utf16_lossy)
        .collect()
}

/// Number of UTF-16 code units in `content`
pub fn utf16_len(content: &str) -> usize {
    content.chars().map(char::len_utf16).sum()
}

/// Generate a fresh seal nonce: 16 random bytes as 32 lowercase hex chars
///
/// Uses the thread-local generator from `rand`, which is a CSPRNG seeded
/// from the operating system.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Current time in milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
