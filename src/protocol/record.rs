//! `word-count` records sent from builders to the orchestrator

use super::error::ProtocolError;
use crate::words::WordCount;

/// Encode one record, newline included
pub fn encode_record(entry: &WordCount) -> String {
    format!("{}-{}\n", entry.word, entry.count)
}

/// Parse one `word-count` record; the first `-` is the delimiter
pub fn parse_record(record: &str) -> Result<WordCount, ProtocolError> {
    let record = record.trim();
    let (word, count) = record
        .split_once('-')
        .ok_or_else(|| ProtocolError::MissingDelimiter(record.to_string()))?;

    let count = count
        .parse::<u64>()
        .map_err(|_| ProtocolError::InvalidCount {
            record: record.to_string(),
            count: count.to_string(),
        })?;

    Ok(WordCount::new(word, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_record() {
        assert_eq!(encode_record(&WordCount::new("the", 3)), "the-3\n");
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(parse_record("cat-2").unwrap(), WordCount::new("cat", 2));
        assert_eq!(parse_record("cat-2\n").unwrap(), WordCount::new("cat", 2));
    }

    #[test]
    fn test_parse_record_without_delimiter() {
        assert_eq!(
            parse_record("cat2"),
            Err(ProtocolError::MissingDelimiter("cat2".into()))
        );
    }

    #[test]
    fn test_parse_record_with_bad_count() {
        assert!(matches!(
            parse_record("cat-two"),
            Err(ProtocolError::InvalidCount { .. })
        ));
        assert!(matches!(
            parse_record("cat-1-2"),
            Err(ProtocolError::InvalidCount { .. })
        ));
        assert!(matches!(
            parse_record("cat--1"),
            Err(ProtocolError::InvalidCount { .. })
        ));
    }
}
