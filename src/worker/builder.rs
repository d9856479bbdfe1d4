//! Builder (reduce worker)
//!
//! Fans in the word streams of every splitter, counts words and sends its local
//! top-K to the orchestrator. Because routing is deterministic, the counts held
//! here are complete global counts for every word this builder owns.

use super::{send_completion, WorkerClock};
use crate::channel::{open_reader, open_writer, ChannelNamespace, FanIn, FanInError};
use crate::error::{ErrorCode, LexanError, Result};
use crate::protocol::{encode_record, Role};
use crate::words::{WordCount, WordTable};
use std::io::{BufWriter, Read, Write};
use std::os::fd::AsFd;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub id: usize,
    pub splitters: usize,
    pub top_k: usize,
    pub channel_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderStats {
    pub words_seen: u64,
    pub distinct_words: usize,
    pub records_sent: usize,
}

/// Count every word arriving on `sources` until all of them are closed
pub fn aggregate<R: Read + AsFd>(sources: Vec<R>) -> Result<WordTable> {
    let mut table = WordTable::new();
    FanIn::new(sources)
        .run(|_, line| {
            for word in line.split_ascii_whitespace() {
                table.record(word);
            }
            Ok::<(), FanInError>(())
        })
        .map_err(|err| {
            LexanError::worker_with_code(ErrorCode::WORKER_CHANNEL_READ, err.to_string())
                .with_source(err)
        })?;
    Ok(table)
}

/// Write `entries` as `word-count` records
pub fn emit_top_k<W: Write>(entries: &[WordCount], sink: W) -> std::io::Result<()> {
    let mut sink = BufWriter::new(sink);
    for entry in entries {
        sink.write_all(encode_record(entry).as_bytes())?;
    }
    sink.flush()
}

/// Run one builder to completion and report on `report`
pub fn run(
    config: &BuilderConfig,
    clock: &WorkerClock,
    report: &mut impl Write,
) -> Result<BuilderStats> {
    let namespace = ChannelNamespace::new(&config.channel_dir);
    let sources = (0..config.splitters)
        .map(|splitter| open_reader(&namespace.data_channel(splitter, config.id)))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        "Builder {} connected to {} splitters",
        config.id,
        sources.len()
    );

    let table = aggregate(sources)?;
    let words_seen = table.total();
    let distinct_words = table.len();
    let top = table.into_top_k(config.top_k);

    let result = open_writer(&namespace.result_channel(config.id))?;
    emit_top_k(&top, result).map_err(|err| {
        LexanError::worker_with_code(
            ErrorCode::WORKER_CHANNEL_WRITE,
            format!("cannot send results: {}", err),
        )
        .with_source(err)
    })?;

    info!(
        "Builder {} counted {} words ({} distinct), sent top {}",
        config.id,
        words_seen,
        distinct_words,
        top.len()
    );
    send_completion(report, Role::BuilderDone, config.id, clock)?;

    Ok(BuilderStats {
        words_seen,
        distinct_words,
        records_sent: top.len(),
    })
}
