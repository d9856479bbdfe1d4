//! Work planning: line counting and shard assignment

use crate::error::helpers::setup_io_error;
use crate::error::{ErrorCode, Result};
use crate::worker::ShardAssignment;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Count lines the same way splitters iterate them
///
/// A final line without a trailing newline still counts.
pub fn count_lines<R: BufRead>(input: R) -> std::io::Result<usize> {
    let mut lines = 0;
    for line in input.split(b'\n') {
        line?;
        lines += 1;
    }
    Ok(lines)
}

pub fn count_file_lines(path: &Path) -> Result<usize> {
    File::open(path)
        .map(BufReader::new)
        .and_then(count_lines)
        .map_err(|err| setup_io_error(ErrorCode::SETUP_INPUT_UNREADABLE, path, err))
}

/// Split `[0, total_lines)` into `splitters` contiguous shards
///
/// Every shard gets `total_lines / splitters` lines and the last one also
/// takes the remainder. With fewer lines than splitters the leading shards
/// are empty.
pub fn plan_shards(total_lines: usize, splitters: usize) -> Vec<ShardAssignment> {
    if splitters == 0 {
        return Vec::new();
    }
    let per = total_lines / splitters;
    (0..splitters)
        .map(|id| {
            let start_line = id * per;
            let line_count = if id + 1 == splitters {
                total_lines - start_line
            } else {
                per
            };
            ShardAssignment {
                splitter_id: id,
                start_line,
                line_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn test_count_lines_with_and_without_trailing_newline() {
        assert_eq!(count_lines(Cursor::new("a\nb\n")).unwrap(), 2);
        assert_eq!(count_lines(Cursor::new("a\nb")).unwrap(), 2);
        assert_eq!(count_lines(Cursor::new("\n\n")).unwrap(), 2);
        assert_eq!(count_lines(Cursor::new("")).unwrap(), 0);
    }

    #[test]
    fn test_count_missing_file_is_setup_error() {
        let err = count_file_lines(Path::new("/nonexistent/corpus.txt")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::SETUP_INPUT_UNREADABLE);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_last_shard_takes_remainder() {
        let shards = plan_shards(10, 3);
        let ranges: Vec<_> = shards.iter().map(|s| (s.start_line, s.line_count)).collect();
        assert_eq!(ranges, vec![(0, 3), (3, 3), (6, 4)]);
        assert_eq!(shards[2].end_line(), Some(9));
    }

    #[test]
    fn test_more_splitters_than_lines() {
        let shards = plan_shards(2, 4);
        let counts: Vec<_> = shards.iter().map(|s| s.line_count).collect();
        assert_eq!(counts, vec![0, 0, 0, 2]);
        assert_eq!(shards[3].start_line, 0);
    }

    #[test]
    fn test_single_splitter_owns_everything() {
        assert_eq!(
            plan_shards(7, 1),
            vec![ShardAssignment {
                splitter_id: 0,
                start_line: 0,
                line_count: 7
            }]
        );
    }

    proptest! {
        #[test]
        fn prop_shards_cover_input_exactly_once(total in 0usize..5000, splitters in 1usize..64) {
            let shards = plan_shards(total, splitters);
            prop_assert_eq!(shards.len(), splitters);

            let mut next = 0;
            for (id, shard) in shards.iter().enumerate() {
                prop_assert_eq!(shard.splitter_id, id);
                if shard.line_count > 0 {
                    prop_assert_eq!(shard.start_line, next);
                    next += shard.line_count;
                }
            }
            prop_assert_eq!(next, total);
        }
    }
}
