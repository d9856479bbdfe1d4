//! Deterministic word → builder routing
//!
//! Every splitter routes with this function, so all occurrences of a word land
//! on the same builder. The hash is computed over the word's bytes in 32-bit
//! unsigned arithmetic with wraparound; changing the width or the arithmetic
//! changes the routing and breaks cross-process agreement.

/// Initial value of the hash accumulator
const SEED: u32 = 5381;

/// Hash a word: `hash = hash * 33 + byte` for every byte, wrapping at 32 bits
pub fn word_hash(word: &str) -> u32 {
    word.bytes().fold(SEED, |hash, byte| {
        hash.wrapping_mul(33).wrapping_add(u32::from(byte))
    })
}

/// Map a cleaned word to a builder index in `[0, builder_count)`
///
/// # Panics
///
/// Panics if `builder_count` is zero; configuration validation rejects that
/// before any worker is spawned.
pub fn partition(word: &str, builder_count: usize) -> usize {
    assert!(builder_count > 0, "builder_count must be positive");
    (word_hash(word) as usize) % builder_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_word_hashes_to_seed() {
        assert_eq!(word_hash(""), 5381);
    }

    #[test]
    fn test_known_hash_values() {
        // 5381 * 33 + 'a'
        assert_eq!(word_hash("a"), 177_670);
        assert_eq!(word_hash("ab"), 177_670 * 33 + u32::from(b'b'));
    }

    #[test]
    fn test_hash_wraps_instead_of_overflowing() {
        let long = "z".repeat(64);
        let expected = long
            .bytes()
            .fold(5381u64, |h, b| (h * 33 + u64::from(b)) & 0xFFFF_FFFF);
        assert_eq!(u64::from(word_hash(&long)), expected);
    }

    #[test]
    fn test_hash_is_position_sensitive() {
        assert_ne!(word_hash("stop"), word_hash("pots"));
    }

    #[test]
    fn test_single_builder_takes_everything() {
        for word in ["the", "cat", "supercalifragilistic"] {
            assert_eq!(partition(word, 1), 0);
        }
    }

    #[test]
    #[should_panic(expected = "builder_count must be positive")]
    fn test_zero_builders_panics() {
        partition("the", 0);
    }

    proptest! {
        #[test]
        fn test_partition_in_range(word in "[a-z]{2,40}", builders in 1usize..64) {
            prop_assert!(partition(&word, builders) < builders);
        }

        #[test]
        fn test_partition_is_deterministic(word in "[a-z]{2,40}", builders in 1usize..64) {
            let first = partition(&word, builders);
            let copy = word.clone();
            prop_assert_eq!(first, partition(&copy, builders));
        }
    }
}
