//! Time-lock seals: timestamped, tamper-evident proofs of content
//!
//! A seal binds the Merkle root of some content to the moment it was sealed
//! and to a random nonce:
//!
//! ```text
//! contentHash = MerkleRoot(content)
//! sealHash    = SHA-256(contentHash + ":" + timestamp + ":" + nonce)
//! ```
//!
//! `timestamp` is rendered as a decimal integer (milliseconds since the Unix
//! epoch) and every hash is lowercase hex. This preimage format, the JSON
//! field names and the 4096-unit chunk size are a wire contract shared with
//! standalone evidence verifiers, so seals created here can be re-checked
//! offline and older seals keep verifying.
//!
//! ## Verification
//!
//! [`SealManager::verify`] checks, in order:
//!
//! 1. The seal format version is one this build understands
//! 2. The content's Merkle root equals `contentHash`
//! 3. `sealHash` matches the recomputed binding
//! 4. `timestamp` is not in the future
//!
//! It never returns an error. Every failure becomes a
//! [`SealVerification`] with `valid == false` and a reason.
//!
//! ## Example
//!
//! ```rust
//! use timeseal::SealManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SealManager::new();
//! let seal = manager.create_seal("Breaking news: ...")?;
//!
//! assert!(manager.verify("Breaking news: ...", &seal).valid);
//! assert!(!manager.verify("Breaking news: edited", &seal).valid);
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SealError};
use crate::merkle::MerkleTree;
use crate::types::{SealConfig, SealVerification, VerificationFailure};
use crate::utils::{self, DEFAULT_CHUNK_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Current seal format version
pub const SEAL_VERSION: u32 = 1;

/// A point-in-time integrity proof for a piece of content
///
/// Serialized as JSON with camelCase field names:
///
/// ```json
/// {"contentHash":"…","timestamp":1700000000000,"nonce":"…","sealHash":"…","version":1}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLockSeal {
    /// Merkle root of the content at seal time
    pub content_hash: String,
    /// Milliseconds since the Unix epoch when the seal was created
    pub timestamp: i64,
    /// 16 random bytes, hex encoded
    pub nonce: String,
    /// SHA-256 of `contentHash:timestamp:nonce`
    pub seal_hash: String,
    /// Seal format version
    pub version: u32,
}

impl TimeLockSeal {
    /// Assemble a seal from its parts, computing `sealHash`
    pub fn new(content_hash: impl Into<String>, timestamp: i64, nonce: impl Into<String>) -> Self {
        let content_hash = content_hash.into();
        let nonce = nonce.into();
        let seal_hash = Self::compute_seal_hash(&content_hash, timestamp, &nonce);
        Self {
            content_hash,
            timestamp,
            nonce,
            seal_hash,
            version: SEAL_VERSION,
        }
    }

    /// Compute the binding hash over `contentHash:timestamp:nonce`
    ///
    /// # Example
    ///
    /// ```rust
    /// use timeseal::seal::TimeLockSeal;
    /// use timeseal::utils::hash_str;
    ///
    /// assert_eq!(
    ///     TimeLockSeal::compute_seal_hash("abc", 1700000000000, "00ff"),
    ///     hash_str("abc:1700000000000:00ff"),
    /// );
    /// ```
    pub fn compute_seal_hash(content_hash: &str, timestamp: i64, nonce: &str) -> String {
        utils::hash_str(&format!("{}:{}:{}", content_hash, timestamp, nonce))
    }

    /// Whether `sealHash` matches the other three fields
    pub fn is_internally_consistent(&self) -> bool {
        Self::compute_seal_hash(&self.content_hash, self.timestamp, &self.nonce) == self.seal_hash
    }

    /// Check that this build understands the seal's format version
    ///
    /// Field contents are not checked here. A wrong `contentHash`, `nonce`
    /// or `sealHash` is caught by the content and binding comparisons.
    ///
    /// # Errors
    ///
    /// - [`SealError::UnsupportedVersion`] for any version other than 1
    pub fn validate(&self) -> Result<()> {
        if self.version != SEAL_VERSION {
            return Err(SealError::UnsupportedVersion(self.version));
        }
        Ok(())
    }

    /// Creation time as a UTC datetime, if the timestamp is representable
    pub fn sealed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Time elapsed between sealing and `now_ms`; `None` if the seal is newer
    pub fn age_at(&self, now_ms: i64) -> Option<Duration> {
        let elapsed = now_ms.checked_sub(self.timestamp)?;
        u64::try_from(elapsed).ok().map(Duration::from_millis)
    }

    /// Time elapsed since sealing
    pub fn age(&self) -> Option<Duration> {
        self.age_at(utils::now_millis())
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a seal from JSON
    ///
    /// Only the shape is checked here; call [`validate`](Self::validate) or
    /// verify the seal to check its contents.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Creates and verifies time-lock seals
///
/// Stateless apart from its configuration and an optional dedicated thread
/// pool; one manager can be shared freely across threads.
///
/// # Examples
///
/// ```rust
/// use timeseal::SealManager;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = SealManager::builder()
///     .max_content_size(1024 * 1024)
///     .parallel_workers(2)
///     .build()?;
///
/// let seal = manager.create_seal("hello")?;
/// assert_eq!(seal.version, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SealManager {
    config: SealConfig,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl Default for SealManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SealManager {
    /// Create a manager with the default configuration and rayon's global pool
    pub fn new() -> Self {
        Self {
            config: SealConfig::default(),
            pool: None,
        }
    }

    /// Start building a manager with custom settings
    pub fn builder() -> SealManagerBuilder {
        SealManagerBuilder::new()
    }

    /// Active configuration
    pub fn config(&self) -> &SealConfig {
        &self.config
    }

    /// Number of threads Merkle hashing can use
    pub fn parallel_workers(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Build the Merkle tree for `content` using this manager's settings
    pub fn merkle_tree(&self, content: &str) -> MerkleTree {
        let build = || {
            MerkleTree::from_content_with_threshold(
                content,
                self.config.chunk_size,
                self.config.parallel_threshold,
            )
        };
        match &self.pool {
            Some(pool) => pool.install(build),
            None => build(),
        }
    }

    /// Merkle root of `content` using this manager's settings
    pub fn content_root(&self, content: &str) -> String {
        self.merkle_tree(content).root_hash().to_string()
    }

    /// Seal `content` at the current time
    ///
    /// # Errors
    ///
    /// - [`SealError::ContentTooLarge`] if `content` exceeds `max_content_size`
    pub fn create_seal(&self, content: &str) -> Result<TimeLockSeal> {
        self.create_seal_at(content, utils::now_millis())
    }

    /// Seal `content` with a caller-supplied timestamp (ms since epoch)
    ///
    /// # Errors
    ///
    /// - [`SealError::ContentTooLarge`] if `content` exceeds `max_content_size`
    /// - [`SealError::InvalidInput`] if `timestamp` is negative
    pub fn create_seal_at(&self, content: &str, timestamp: i64) -> Result<TimeLockSeal> {
        self.check_size(content)?;
        if timestamp < 0 {
            return Err(SealError::invalid_input(format!(
                "seal timestamp must not be negative, got {}",
                timestamp
            )));
        }

        let tree = self.merkle_tree(content);
        let seal = TimeLockSeal::new(tree.root_hash(), timestamp, utils::generate_nonce());

        debug!(
            "Sealed {} bytes ({} chunks) at {}: {}",
            content.len(),
            tree.leaf_count(),
            timestamp,
            short_hash(&seal.seal_hash)
        );
        Ok(seal)
    }

    /// Verify `seal` against `content` at the current time
    pub fn verify(&self, content: &str, seal: &TimeLockSeal) -> SealVerification {
        self.verify_at(content, seal, utils::now_millis())
    }

    /// Verify `seal` against `content` as of `now_ms`
    pub fn verify_at(&self, content: &str, seal: &TimeLockSeal, now_ms: i64) -> SealVerification {
        match self.try_verify(content, seal, now_ms) {
            Ok(Some(failure)) => {
                warn!("Seal verification failed: {}", failure);
                SealVerification::invalid(failure)
            }
            Ok(None) => SealVerification::valid(),
            Err(e) => {
                warn!("Seal could not be verified: {}", e);
                SealVerification::invalid(VerificationFailure::VerificationError)
            }
        }
    }

    /// Verify a JSON-encoded seal against `content`
    ///
    /// A seal that does not parse is reported as
    /// [`VerificationFailure::VerificationError`].
    pub fn verify_json(&self, content: &str, seal_json: &str) -> SealVerification {
        match TimeLockSeal::from_json(seal_json) {
            Ok(seal) => self.verify(content, &seal),
            Err(e) => {
                warn!("Seal JSON could not be parsed: {}", e);
                SealVerification::invalid(VerificationFailure::VerificationError)
            }
        }
    }

    fn try_verify(
        &self,
        content: &str,
        seal: &TimeLockSeal,
        now_ms: i64,
    ) -> Result<Option<VerificationFailure>> {
        seal.validate()?;

        let root = self.content_root(content);
        if root != seal.content_hash {
            debug!(
                "Merkle root mismatch: sealed {}, content {}",
                short_hash(&seal.content_hash),
                short_hash(&root)
            );
            return Ok(Some(VerificationFailure::ContentModified));
        }

        if !seal.is_internally_consistent() {
            return Ok(Some(VerificationFailure::SealTampered));
        }

        if seal.timestamp > now_ms {
            return Ok(Some(VerificationFailure::FutureTimestamp));
        }

        Ok(None)
    }

    fn check_size(&self, content: &str) -> Result<()> {
        let limit = self.config.max_content_size;
        if limit > 0 && content.len() > limit {
            return Err(SealError::ContentTooLarge {
                size: content.len(),
                limit,
            });
        }
        Ok(())
    }
}

/// Builder for configuring a [`SealManager`]
///
/// # Examples
///
/// ```rust
/// use timeseal::SealManagerBuilder;
///
/// let manager = SealManagerBuilder::new()
///     .chunk_size(4096)
///     .parallel_threshold(128)
///     .build()
///     .unwrap();
/// assert_eq!(manager.config().parallel_threshold, 128);
/// ```
#[derive(Debug, Clone)]
pub struct SealManagerBuilder {
    config: SealConfig,
    parallel_workers: Option<usize>,
}

impl Default for SealManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SealManagerBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: SealConfig::default(),
            parallel_workers: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: SealConfig) -> Self {
        Self {
            config,
            parallel_workers: None,
        }
    }

    /// Set the chunk size in UTF-16 code units
    ///
    /// Seals made with anything other than 4096 cannot be re-derived by the
    /// standalone evidence verifier.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the maximum content size in bytes (0 = no limit)
    pub fn max_content_size(mut self, size: usize) -> Self {
        self.config.max_content_size = size;
        self
    }

    /// Set the leaf count at which Merkle hashing goes parallel
    pub fn parallel_threshold(mut self, leaves: usize) -> Self {
        self.config.parallel_threshold = leaves;
        self
    }

    /// Use a dedicated pool of `count` threads instead of rayon's global pool
    ///
    /// Without this the manager runs on rayon's global pool, which has
    /// [`num_cpus::get()`] threads. Counts above four per CPU are capped.
    pub fn parallel_workers(mut self, count: usize) -> Self {
        self.parallel_workers = Some(count);
        self
    }

    /// Build the manager
    ///
    /// # Errors
    ///
    /// - [`SealError::InvalidConfiguration`] if the chunk size or worker count is zero
    /// - [`SealError::ThreadPool`] if the dedicated pool cannot be started
    pub fn build(self) -> Result<SealManager> {
        if self.config.chunk_size == 0 {
            return Err(SealError::invalid_configuration("chunk_size must be at least 1"));
        }
        if self.config.chunk_size != DEFAULT_CHUNK_SIZE {
            warn!(
                "Using chunk size {}; seals will not match verifiers expecting {}",
                self.config.chunk_size, DEFAULT_CHUNK_SIZE
            );
        }

        let pool = match self.parallel_workers {
            Some(0) => {
                return Err(SealError::invalid_configuration(
                    "parallel_workers must be at least 1",
                ))
            }
            Some(count) => {
                let cap = num_cpus::get().max(1) * 4;
                let workers = if count > cap {
                    warn!(
                        "Requested {} parallel workers; capping at {} ({} CPUs)",
                        count,
                        cap,
                        num_cpus::get()
                    );
                    cap
                } else {
                    count
                };
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("timeseal-{}", i))
                    .build()
                    .map_err(|e| SealError::ThreadPool(e.to_string()))?;
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(SealManager {
            config: self.config,
            pool,
        })
    }
}

/// Leading 12 characters of a hash for log lines
fn short_hash(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
