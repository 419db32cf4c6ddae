//! Main test module for timeseal
//!
//! This module includes all test suites:
//! - Integration tests for end-to-end sealing and similarity scenarios
//! - Property-based tests for invariants

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::timeseal::*;

    #[test]
    fn test_empty_content_seal() {
        let manager = SealManager::new();
        let seal = manager.create_seal("").unwrap();
        assert_eq!(seal.content_hash, utils::hash_str(""));
        assert!(manager.verify("", &seal).valid);
        assert!(!manager.verify(" ", &seal).valid);
    }

    #[test]
    fn test_unicode_content_seal() {
        let content = "файл 文件 ファイル 파일 αρχείο 🚀🌟💾 ".repeat(500);
        let manager = SealManager::new();
        let seal = manager.create_seal(&content).unwrap();
        assert!(manager.merkle_tree(&content).leaf_count() > 1);
        assert!(manager.verify(&content, &seal).valid);
    }

    #[test]
    fn test_chunk_boundary_content() {
        let manager = SealManager::new();
        for len in [4095, 4096, 4097, 8192, 8193] {
            let content = "q".repeat(len);
            let seal = manager.create_seal(&content).unwrap();
            assert!(manager.verify(&content, &seal).valid, "length {}", len);
            assert!(!manager.verify(&content[..len - 1], &seal).valid, "length {}", len);
        }
    }

    #[test]
    fn test_stopword_only_fingerprint() {
        assert_eq!(generate_fingerprint("the a an 123 456"), SimHash64::ZERO);
        assert_eq!(generate_fingerprint("... --- !!!"), SimHash64::ZERO);
    }

    #[test]
    fn test_single_fingerprint_clusters() {
        let f = generate_fingerprint("lonely document");
        assert_eq!(similarity::cluster_by_similarity(&[f], 6), vec![vec![0]]);
        assert!(similarity::find_similar_pairs(&[f], 6).is_empty());
    }
}
