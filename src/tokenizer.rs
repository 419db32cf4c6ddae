//! Text normalization for similarity fingerprints
//!
//! The tokenizer turns free text into the bag of words a SimHash is computed
//! from:
//!
//! 1. Lowercase the text
//! 2. Replace every character that is neither a word character
//!    (`[A-Za-z0-9_]`) nor whitespace with a space
//! 3. Split on whitespace
//! 4. Drop tokens shorter than 2 or longer than 30 characters, stopwords,
//!    and tokens made only of digits
//!
//! Only term frequency survives into the fingerprint, so token order is
//! irrelevant downstream.
//!
//! Word characters are ASCII only. Accented and non-Latin letters act as
//! separators, so "café" yields the token "caf".

use crate::collections::{HashMap, HashMapExt};
use crate::types::SimilarityConfig;

/// English stopwords dropped before fingerprinting
pub const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "but", "by", "can", "could", "did", "do", "does", "for",
    "from", "had", "has", "have", "he", "her", "him", "his", "how", "i", "if", "in",
    "into", "is", "it", "its", "just", "me", "my", "no", "not", "of", "on", "or",
    "our", "she", "so", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "to", "us", "was", "we", "were", "what", "when", "which",
    "who", "will", "with", "would", "you", "your",
];

/// Whether `word` (already lowercase) is a stopword
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Splits text into normalized, filtered tokens
///
/// # Example
///
/// ```rust
/// use timeseal::tokenizer::Tokenizer;
///
/// let tokens = Tokenizer::default().tokenize("The Quick, brown fox! 42 x");
/// assert_eq!(tokens, vec!["quick", "brown", "fox"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    min_len: usize,
    max_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::from_config(&SimilarityConfig::default())
    }
}

impl Tokenizer {
    /// Create a tokenizer keeping tokens of `min_len..=max_len` characters
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// Create a tokenizer from a similarity configuration
    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(config.min_token_len, config.max_token_len)
    }

    /// Tokenize `text`
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
            .collect();

        normalized
            .split_whitespace()
            .filter(|token| self.keep(token))
            .map(str::to_owned)
            .collect()
    }

    fn keep(&self, token: &str) -> bool {
        // Tokens are ASCII after normalization, so byte length is char length.
        let len = token.len();
        len >= self.min_len
            && len <= self.max_len
            && !is_stopword(token)
            && !token.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Tokenize with the default settings
pub fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::default().tokenize(text)
}

/// Count occurrences of each distinct token
///
/// # Example
///
/// ```rust
/// use timeseal::tokenizer::term_frequencies;
///
/// let tokens = vec!["fox".to_string(), "dog".to_string(), "fox".to_string()];
/// let tf = term_frequencies(&tokens);
/// assert_eq!(tf["fox"], 2);
/// assert_eq!(tf["dog"], 1);
/// ```
pub fn term_frequencies(tokens: &[String]) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::with_capacity(tokens.len());
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
