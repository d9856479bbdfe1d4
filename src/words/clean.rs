//! Token cleaning and the exclusion set

use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Cleaned words shorter than this are dropped
pub const MIN_WORD_LEN: usize = 2;

/// Default byte limit for a cleaned word (a 64-byte buffer minus terminator)
pub const DEFAULT_MAX_WORD_LEN: usize = 63;

/// Strip everything but ASCII letters and lowercase the rest
///
/// Returns `None` when fewer than [`MIN_WORD_LEN`] letters remain. Words longer
/// than `max_len` bytes are truncated; the result is pure ASCII so any byte
/// boundary is a character boundary.
pub fn clean_token(token: &str, max_len: usize) -> Option<String> {
    let mut cleaned: String = token
        .bytes()
        .filter(u8::is_ascii_alphabetic)
        .map(|b| char::from(b.to_ascii_lowercase()))
        .collect();

    if cleaned.len() < MIN_WORD_LEN {
        return None;
    }
    cleaned.truncate(max_len);
    Some(cleaned)
}

/// Words that splitters must never emit
///
/// Entries are cleaned the same way input tokens are, so exclusion ignores case
/// and punctuation.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    words: HashSet<String>,
}

impl ExclusionSet {
    /// Build a set from whitespace-delimited text spanning any number of lines
    pub fn parse(text: &str, max_len: usize) -> Self {
        let words = text
            .split_ascii_whitespace()
            .filter_map(|token| clean_token(token, max_len))
            .collect();
        Self { words }
    }

    /// Load the exclusion file in full
    pub fn load(path: &Path, max_len: usize) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes), max_len))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tokenizes lines and filters them down to routable words
#[derive(Debug, Clone)]
pub struct Tokenizer {
    exclusions: ExclusionSet,
    max_len: usize,
}

impl Tokenizer {
    pub fn new(exclusions: ExclusionSet, max_len: usize) -> Self {
        Self {
            exclusions,
            max_len,
        }
    }

    /// Words of one line that survive cleaning, length and exclusion checks
    pub fn words<'a>(&'a self, line: &'a str) -> impl Iterator<Item = String> + 'a {
        line.split_ascii_whitespace()
            .filter_map(|token| clean_token(token, self.max_len))
            .filter(|word| !self.exclusions.contains(word))
    }
}
