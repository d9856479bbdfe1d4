//! Collection of builder results and the global top-K merge

use crate::channel::namespace::as_collect_error;
use crate::channel::{open_reader, ChannelNamespace, FanIn, FanInError};
use crate::error::{ErrorCode, LexanError, Result};
use crate::protocol::{parse_record, ProtocolError};
use crate::words::{top_k, WordCount};
use std::io::Read;
use std::os::fd::AsFd;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
enum CollectError {
    #[error(transparent)]
    FanIn(#[from] FanInError),

    #[error("builder {builder}: {error}")]
    Record {
        builder: usize,
        #[source]
        error: ProtocolError,
    },
}

impl From<CollectError> for LexanError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::FanIn(err) => LexanError::collect_with_code(
                ErrorCode::COLLECT_READ_FAILED,
                err.to_string(),
                None,
            )
            .with_source(err),
            CollectError::Record { builder, error } => {
                LexanError::from(error).with_context(format!("sent by builder {builder}"))
            }
        }
    }
}

/// Per-builder local top-K lists, indexed by builder id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub per_builder: Vec<Vec<WordCount>>,
}

impl Collected {
    pub fn records(&self) -> usize {
        self.per_builder.iter().map(Vec::len).sum()
    }

    /// Combine every local list in (builder id, local rank) order and rank it
    pub fn merge(self, k: usize) -> Vec<WordCount> {
        top_k(self.per_builder.into_iter().flatten().collect(), k)
    }
}

/// Read `word-count` records from every source until all are closed
///
/// `sources[b]` carries builder `b`'s results.
pub fn read_results<R>(sources: Vec<R>) -> Result<Collected>
where
    R: Read + AsFd,
{
    let mut collected = Collected {
        per_builder: vec![Vec::new(); sources.len()],
    };

    FanIn::new(sources).run(|builder, line| {
        let entry =
            parse_record(line).map_err(|error| CollectError::Record { builder, error })?;
        trace!("builder {} -> {}", builder, line);
        collected.per_builder[builder].push(entry);
        Ok::<(), CollectError>(())
    })?;

    Ok(collected)
}

/// Open every result channel in builder order and collect the local lists
///
/// Each open blocks until that builder starts sending.
pub fn collect_results(namespace: &ChannelNamespace, builders: usize) -> Result<Collected> {
    let sources = (0..builders)
        .map(|builder| {
            open_reader(&namespace.result_channel(builder))
                .map_err(|err| as_collect_error(err, builder))
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("Opened {} result channels", sources.len());

    let collected = read_results(sources)?;
    debug!("Collected {} records", collected.records());
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    fn channel(body: &str) -> UnixStream {
        let (mut writer, reader) = UnixStream::pair().unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        reader
    }

    #[test]
    fn test_results_grouped_by_builder() {
        let collected = read_results(vec![channel("the-3\nmat-1\n"), channel("cat-2\n")]).unwrap();
        assert_eq!(
            collected.per_builder,
            vec![
                vec![WordCount::new("the", 3), WordCount::new("mat", 1)],
                vec![WordCount::new("cat", 2)],
            ]
        );
        assert_eq!(collected.records(), 3);
    }

    #[test]
    fn test_merge_ranks_and_truncates() {
        let collected = read_results(vec![
            channel("the-3\nmat-1\nsat-1\n"),
            channel("cat-2\nran-1\n"),
        ])
        .unwrap();
        assert_eq!(
            collected.merge(3),
            vec![
                WordCount::new("the", 3),
                WordCount::new("cat", 2),
                WordCount::new("mat", 1),
            ]
        );
    }

    #[test]
    fn test_builder_with_no_results() {
        let collected = read_results(vec![channel(""), channel("solo-4\n")]).unwrap();
        assert!(collected.per_builder[0].is_empty());
        assert_eq!(collected.merge(10), vec![WordCount::new("solo", 4)]);
    }

    #[test]
    fn test_malformed_record_is_protocol_fatal() {
        let err = read_results(vec![channel("the-3\nbroken\n")]).unwrap_err();
        assert_eq!(err.code(), ErrorCode::COLLECT_MALFORMED_RECORD);
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("'broken'"));
        assert!(err.to_string().contains("sent by builder 0"));
    }

    #[test]
    fn test_missing_result_channel_fails_collection() {
        let dir = tempfile::tempdir().unwrap();
        let namespace = ChannelNamespace::new(dir.path());
        let err = collect_results(&namespace, 1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::COLLECT_OPEN_FAILED);
    }
}
