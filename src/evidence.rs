//! Notarized evidence: captured content bundled with its seal
//!
//! [`NotaryEvidence`] is the record a capture tool stores or exports: where
//! the content came from, the captured HTML itself, and the
//! [`TimeLockSeal`] made over that HTML at capture time. Re-verifying an
//! evidence record is just verifying its seal against its own
//! `contentHtml`.
//!
//! `signature` and `publicKey` are carried through untouched. Nothing in this
//! crate produces or checks them.

use crate::error::Result;
use crate::seal::{SealManager, TimeLockSeal};
use crate::types::SealVerification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Captured content together with the seal proving when it was captured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotaryEvidence {
    /// Unique identifier for this evidence record
    pub id: String,
    /// Where the content was captured from
    pub source_url: String,
    /// Title of the captured page or document
    pub title: String,
    /// The sealed content
    pub content_html: String,
    /// When the capture happened
    pub captured_at: DateTime<Utc>,
    /// Seal over `content_html`
    pub seal: TimeLockSeal,
    /// Opaque signature supplied by an external signer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Opaque public key matching `signature`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
}

impl NotaryEvidence {
    /// Capture content and seal it now
    ///
    /// # Errors
    ///
    /// Propagates seal creation errors such as
    /// [`SealError::ContentTooLarge`](crate::SealError::ContentTooLarge).
    ///
    /// # Example
    ///
    /// ```rust
    /// use timeseal::{NotaryEvidence, SealManager};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = SealManager::new();
    /// let evidence = NotaryEvidence::capture(
    ///     "https://example.com/post",
    ///     "A post",
    ///     "<p>hello</p>",
    ///     &manager,
    /// )?;
    /// assert!(evidence.verify(&manager).valid);
    /// # Ok(())
    /// # }
    /// ```
    pub fn capture(
        source_url: impl Into<String>,
        title: impl Into<String>,
        content_html: impl Into<String>,
        manager: &SealManager,
    ) -> Result<Self> {
        let content_html = content_html.into();
        let seal = manager.create_seal(&content_html)?;
        let captured_at = seal.sealed_at().unwrap_or_else(Utc::now);

        let evidence = Self {
            id: Uuid::new_v4().to_string(),
            source_url: source_url.into(),
            title: title.into(),
            content_html,
            captured_at,
            seal,
            signature: None,
            public_key: None,
        };

        info!(
            "Captured evidence {} from {} ({} bytes)",
            evidence.short_id(),
            evidence.source_url,
            evidence.content_html.len()
        );
        Ok(evidence)
    }

    /// Attach an externally produced signature and its public key
    pub fn with_signature(mut self, signature: impl Into<String>, public_key: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self.public_key = Some(public_key.into());
        self
    }

    /// Re-verify the seal against the stored content
    pub fn verify(&self, manager: &SealManager) -> SealVerification {
        manager.verify(&self.content_html, &self.seal)
    }

    /// First 8 characters of the id
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// Serialize to indented JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an evidence record from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the record to `path` as indented JSON
    ///
    /// # Errors
    ///
    /// - [`SealError::Io`](crate::SealError::Io) if the file cannot be written
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        debug!("Wrote evidence {} to {}", self.short_id(), path.display());
        Ok(())
    }

    /// Read a record previously written with [`save`](Self::save)
    ///
    /// # Errors
    ///
    /// - [`SealError::Io`](crate::SealError::Io) if the file cannot be read
    /// - [`SealError::Json`](crate::SealError::Json) if it is not an evidence record
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
