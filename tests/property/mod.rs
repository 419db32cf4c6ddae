//! Property-based testing for timeseal
//!
//! Uses proptest to verify invariants across randomly generated content
//! and fingerprints.

use ::timeseal::*;
use proptest::prelude::*;

/// Generate document-like content, including multi-chunk and non-ASCII text
fn content_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Short prose
        "[a-zA-Z0-9 ,.\n]{0,500}",
        // Spans several 4096-unit chunks
        "[a-z ]{4000,12000}",
        // Arbitrary unicode
        any::<String>(),
    ]
}

/// A lowercase hex string of the given length
fn hex_strategy(len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), len / 2).prop_map(hex::encode)
}

/// Replace the character at `index` (mod length) with `replacement`
fn mutate_char(content: &str, index: usize, replacement: char) -> Option<String> {
    let chars: Vec<char> = content.chars().collect();
    if chars.is_empty() {
        return None;
    }
    let at = index % chars.len();
    if chars[at] == replacement {
        return None;
    }
    let mut mutated = chars;
    mutated[at] = replacement;
    Some(mutated.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_root_is_deterministic(content in content_strategy()) {
        prop_assert_eq!(build_root(&content), build_root(&content));
    }

    #[test]
    fn prop_single_char_mutation_changes_root(
        content in content_strategy(),
        index in any::<usize>(),
        replacement in any::<char>(),
    ) {
        if let Some(mutated) = mutate_char(&content, index, replacement) {
            prop_assert_ne!(build_root(&content), build_root(&mutated));
        }
    }

    #[test]
    fn prop_chunks_cover_content(content in content_strategy(), size in 1usize..5000) {
        let chunks = utils::chunk_content(&content, size);
        prop_assert!(!chunks.is_empty());
        prop_assert!(chunks.iter().all(|c| utils::utf16_len(c) <= size));
        let total: usize = chunks.iter().map(|c| utils::utf16_len(c)).sum();
        prop_assert_eq!(total, utils::utf16_len(&content));
    }

    #[test]
    fn prop_seal_round_trip(content in content_strategy()) {
        let manager = SealManager::new();
        let seal = manager.create_seal(&content).unwrap();
        prop_assert!(manager.verify(&content, &seal).valid);

        let parsed = TimeLockSeal::from_json(&seal.to_json().unwrap()).unwrap();
        prop_assert_eq!(parsed, seal);
    }

    #[test]
    fn prop_appended_content_detected(content in content_strategy()) {
        let manager = SealManager::new();
        let seal = manager.create_seal(&content).unwrap();
        let report = manager.verify(&format!("{}x", content), &seal);
        prop_assert!(!report.valid);
        prop_assert_eq!(report.reason, Some(VerificationFailure::ContentModified));
    }

    #[test]
    fn prop_forged_fields_detected(
        content in "[a-z ]{1,200}",
        nonce in hex_strategy(32),
        seal_hash in hex_strategy(64),
    ) {
        let manager = SealManager::new();
        let seal = manager.create_seal(&content).unwrap();

        let mut forged = seal.clone();
        forged.nonce = nonce;
        if forged.nonce != seal.nonce {
            prop_assert!(!manager.verify(&content, &forged).valid);
        }

        let mut forged = seal.clone();
        forged.seal_hash = seal_hash;
        if forged.seal_hash != seal.seal_hash {
            prop_assert!(!manager.verify(&content, &forged).valid);
        }
    }

    #[test]
    fn prop_hex_round_trip(value in any::<u64>()) {
        let f = SimHash64(value);
        let hex = f.to_hex();
        prop_assert_eq!(hex.len(), 16);
        prop_assert_eq!(SimHash64::from_hex(&hex), f);
        prop_assert_eq!(SimHash64::from_halves(f.high(), f.low()), f);
    }

    #[test]
    fn prop_wrong_length_hex_is_zero(hex in "[0-9a-f]{0,32}") {
        prop_assume!(hex.len() != 16);
        prop_assert_eq!(SimHash64::from_hex(&hex), SimHash64::ZERO);
    }

    #[test]
    fn prop_hamming_bounds(a in any::<u64>(), b in any::<u64>()) {
        let (a, b) = (SimHash64(a), SimHash64(b));
        let d = similarity::hamming_distance(a, b);
        prop_assert!(d <= 64);
        prop_assert_eq!(d, similarity::hamming_distance(b, a));
        prop_assert_eq!(similarity::hamming_distance(a, a), 0);

        let brute = (0..64).filter(|bit| (a.0 >> bit) & 1 != (b.0 >> bit) & 1).count() as u32;
        prop_assert_eq!(d, brute);
    }

    #[test]
    fn prop_similarity_non_increasing(d in 0u32..64) {
        let s = similarity::distance_to_similarity(d);
        prop_assert!(s <= 100);
        prop_assert!(similarity::distance_to_similarity(d + 1) <= s);
    }

    #[test]
    fn prop_fingerprint_ignores_word_order(
        words in prop::collection::vec("[a-z]{2,12}", 1..40),
        seed in any::<u64>(),
    ) {
        let forward = words.join(" ");
        let mut shuffled = words.clone();
        // Deterministic rotation stands in for a shuffle.
        let shift = (seed as usize) % shuffled.len();
        shuffled.rotate_left(shift);
        prop_assert_eq!(generate_fingerprint(&forward), generate_fingerprint(&shuffled.join(" ")));
    }

    #[test]
    fn prop_clusters_partition_indices(values in prop::collection::vec(any::<u64>(), 0..60), threshold in 0u32..64) {
        let prints: Vec<SimHash64> = values.into_iter().map(SimHash64).collect();
        let clusters = similarity::cluster_by_similarity(&prints, threshold);
        let mut seen: Vec<usize> = clusters.iter().flatten().copied().collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..prints.len()).collect::<Vec<_>>());
        for cluster in &clusters {
            let seed = prints[cluster[0]];
            prop_assert!(cluster.iter().all(|&i| similarity::is_similar(seed, prints[i], threshold)));
        }
    }

    #[test]
    fn prop_pairs_within_threshold_and_sorted(values in prop::collection::vec(any::<u64>(), 0..40), threshold in 0u32..64) {
        let prints: Vec<SimHash64> = values.into_iter().map(SimHash64).collect();
        let pairs = similarity::find_similar_pairs(&prints, threshold);
        prop_assert!(pairs.iter().all(|p| p.i < p.j && p.distance <= threshold));
        prop_assert!(pairs.windows(2).all(|w| w[0].similarity >= w[1].similarity));
    }
}
