//! Integration tests for timeseal
//!
//! End-to-end scenarios across sealing, evidence and similarity, including
//! fixed vectors that other implementations of the seal format must match.

use ::timeseal::*;

/// Seal fields for "hello world" at a fixed time and nonce
pub const HELLO_ROOT: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";
pub const HELLO_TIMESTAMP: i64 = 1_700_000_000_000;
pub const HELLO_NONCE: &str = "00112233445566778899aabbccddeeff";
pub const HELLO_SEAL_HASH: &str = "674b7cb373d7824b8ca9ffb77bef7cddcafc536a6ae56a22d0d4b492cd6e0826";

pub const RUST_PARAGRAPH: &str = "Rust is a systems programming language focused on safety, \
speed and concurrency. Its ownership model guarantees memory safety without a garbage \
collector, and the borrow checker enforces these rules at compile time.";

pub const MONARCH_PARAGRAPH: &str = "The migration of monarch butterflies spans thousands of \
kilometres. Each autumn millions of insects fly south to overwintering sites in central \
Mexico, navigating by the position of the sun.";

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn test_known_seal_vector() {
        assert_eq!(build_root("hello world"), HELLO_ROOT);

        let seal = TimeLockSeal::new(HELLO_ROOT, HELLO_TIMESTAMP, HELLO_NONCE);
        assert_eq!(seal.seal_hash, HELLO_SEAL_HASH);
        assert!(SealManager::new().verify("hello world", &seal).valid);
    }

    #[test]
    fn test_known_seal_json_verifies() {
        let json = format!(
            r#"{{"contentHash":"{}","timestamp":{},"nonce":"{}","sealHash":"{}","version":1}}"#,
            HELLO_ROOT, HELLO_TIMESTAMP, HELLO_NONCE, HELLO_SEAL_HASH
        );
        let manager = SealManager::new();
        assert!(manager.verify_json("hello world", &json).valid);
        assert_eq!(
            manager.verify_json("hello world!", &json).reason,
            Some(VerificationFailure::ContentModified)
        );
    }

    #[test]
    fn test_known_multi_chunk_roots() {
        assert_eq!(
            build_root(&"a".repeat(5000)),
            "24c93ef894dbf85f7b43d1cdf67fc171f0324a8fc5ce15b1d9a985de0abf004c"
        );
        // Four chunks: two full pairs.
        assert_eq!(
            build_root(&"ab".repeat(6200)),
            "327001217f753788a01bd34f24119c7a8b1ca4d3a3f28b4d587f05502e528bf1"
        );
    }

    #[test]
    #[traced_test]
    fn test_tampered_seal_fields() {
        let manager = SealManager::new();
        let content = "Signed contract text";
        let seal = manager.create_seal(content).unwrap();

        let mut nonce = seal.clone();
        nonce.nonce = utils::generate_nonce();
        let mut seal_hash = seal.clone();
        seal_hash.seal_hash = utils::hash_str("forged");
        let mut content_hash = seal.clone();
        content_hash.content_hash = build_root("other text");

        for forged in [&nonce, &seal_hash, &content_hash] {
            assert!(!manager.verify(content, forged).valid);
        }
        assert!(logs_contain("Seal verification failed"));
    }

    #[test]
    fn test_future_seal_rejected() {
        let manager = SealManager::new();
        let seal = TimeLockSeal::new(
            build_root("doc"),
            utils::now_millis() + 1_000_000,
            utils::generate_nonce(),
        );
        let report = manager.verify("doc", &seal);
        assert!(!report.valid);
        assert_eq!(report.reason_text(), Some("Timestamp is in the future"));
    }

    #[test]
    fn test_evidence_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("evidence.json");
        let manager = SealManager::new();

        let evidence = NotaryEvidence::capture(
            "https://example.com/article",
            "Article",
            "<article>Original reporting</article>",
            &manager,
        )
        .unwrap();
        std::fs::write(&path, evidence.to_json().unwrap()).unwrap();

        let loaded = NotaryEvidence::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.id, evidence.id);
        assert!(loaded.verify(&manager).valid);
    }

    #[test]
    fn test_identical_text_fingerprint() {
        let a = generate_fingerprint("The quick brown fox jumps");
        let b = generate_fingerprint("The quick brown fox jumps");
        assert_eq!(a, b);
        assert_eq!(a, SimHash64(0xca22_981c_3e45_ed8e));
        assert_eq!(similarity::hamming_distance(a, b), 0);
        assert_eq!(
            similarity::distance_to_similarity(similarity::hamming_distance(a, b)),
            100
        );
    }

    #[test]
    fn test_near_duplicate_detection() {
        let original = generate_fingerprint(RUST_PARAGRAPH);
        let appended = generate_fingerprint(&format!(
            "{} Gardeners often plant tomatoes in late spring.",
            RUST_PARAGRAPH
        ));
        let unrelated = generate_fingerprint(MONARCH_PARAGRAPH);

        assert!(similarity::is_similar(original, appended, 20));
        assert!(!similarity::is_similar(original, unrelated, 20));
    }

    #[test]
    fn test_cluster_bridge_not_followed() {
        // B is close to both A and C, but A and C are far apart.
        let a = SimHash64(0);
        let b = SimHash64(0x0000_0000_0000_003f);
        let c = SimHash64(0x0000_0000_0000_0fff);
        let threshold = 6;
        assert!(similarity::hamming_distance(a, b) <= threshold);
        assert!(similarity::hamming_distance(b, c) <= threshold);
        assert!(similarity::hamming_distance(a, c) > threshold);

        let clusters = similarity::cluster_by_similarity(&[a, b, c], threshold);
        assert_eq!(clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_cache_backed_duplicate_scan() {
        let cache = FingerprintCache::new();
        let library = [
            ("note-1", RUST_PARAGRAPH.to_string()),
            ("note-2", format!("{} Gardeners often plant tomatoes in late spring.", RUST_PARAGRAPH)),
            ("note-3", MONARCH_PARAGRAPH.to_string()),
        ];
        let prints: Vec<SimHash64> = library
            .iter()
            .map(|(id, text)| cache.get_or_compute(id, text))
            .collect();

        let pairs = similarity::find_similar_pairs(&prints, 20);
        assert_eq!(pairs.len(), 1);
        assert_eq!((pairs[0].i, pairs[0].j), (0, 1));
        assert_eq!(cache.len(), 3);
    }
}
