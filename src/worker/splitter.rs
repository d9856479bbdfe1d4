//! Splitter (map worker)
//!
//! Reads its shard of the input, turns lines into cleaned words and routes each
//! word to the builder chosen by [`partition`]. Closing the outbound channels is
//! the end-of-stream signal builders wait for.

use super::{send_completion, WorkerClock};
use crate::channel::{open_writer, ChannelNamespace};
use crate::error::{ErrorCode, ErrorExt, LexanError, Result};
use crate::protocol::Role;
use crate::words::{partition, ExclusionSet, Tokenizer};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Contiguous range of input lines owned by one splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShardAssignment {
    pub splitter_id: usize,
    pub start_line: usize,
    pub line_count: usize,
}

impl ShardAssignment {
    /// Last line of the shard, inclusive; `None` for an empty shard
    pub fn end_line(&self) -> Option<usize> {
        if self.line_count == 0 {
            None
        } else {
            Some(self.start_line + self.line_count - 1)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitterConfig {
    pub id: usize,
    pub input: PathBuf,
    pub exclusion: PathBuf,
    pub builders: usize,
    pub shard: ShardAssignment,
    pub max_word_len: usize,
    pub channel_dir: PathBuf,
}

/// What one splitter did with its shard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitterStats {
    pub lines: usize,
    pub words_routed: u64,
}

/// Route every kept word of the shard to its builder's sink
///
/// `sinks[b]` receives the words for builder `b`, one per line.
pub fn route_shard<R, W>(
    input: R,
    shard: &ShardAssignment,
    tokenizer: &Tokenizer,
    sinks: &mut [W],
) -> Result<SplitterStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = SplitterStats::default();
    let lines = input
        .split(b'\n')
        .skip(shard.start_line)
        .take(shard.line_count);

    for line in lines {
        let line = line.to_worker_error(ErrorCode::WORKER_INPUT_READ, "cannot read input")?;
        stats.lines += 1;

        for word in tokenizer.words(&String::from_utf8_lossy(&line)) {
            let builder = partition(&word, sinks.len());
            let sink = &mut sinks[builder];
            sink.write_all(word.as_bytes())
                .and_then(|_| sink.write_all(b"\n"))
                .map_err(|e| write_error(builder, e))?;
            stats.words_routed += 1;
        }
    }

    Ok(stats)
}

fn write_error(builder: usize, err: std::io::Error) -> LexanError {
    LexanError::worker_with_code(
        ErrorCode::WORKER_CHANNEL_WRITE,
        format!("cannot write to builder {}: {}", builder, err),
    )
    .with_source(err)
}

/// Run one splitter to completion and report on `report`
pub fn run(
    config: &SplitterConfig,
    clock: &WorkerClock,
    report: &mut impl Write,
) -> Result<SplitterStats> {
    let exclusions = ExclusionSet::load(&config.exclusion, config.max_word_len).to_worker_error(
        ErrorCode::WORKER_EXCLUSION_LOAD,
        format!("cannot load exclusion list {}", config.exclusion.display()),
    )?;
    debug!(
        "Splitter {} loaded {} excluded words",
        config.id,
        exclusions.len()
    );
    let tokenizer = Tokenizer::new(exclusions, config.max_word_len);

    let namespace = ChannelNamespace::new(&config.channel_dir);
    let mut sinks = (0..config.builders)
        .map(|builder| {
            open_writer(&namespace.data_channel(config.id, builder)).map(BufWriter::new)
        })
        .collect::<Result<Vec<_>>>()?;
    debug!("Splitter {} connected to {} builders", config.id, sinks.len());

    let input = File::open(&config.input).to_worker_error(
        ErrorCode::WORKER_INPUT_READ,
        format!("cannot open input {}", config.input.display()),
    )?;
    let stats = route_shard(BufReader::new(input), &config.shard, &tokenizer, &mut sinks)?;

    for (builder, mut sink) in sinks.into_iter().enumerate() {
        sink.flush().map_err(|e| write_error(builder, e))?;
    }

    info!(
        "Splitter {} routed {} words from {} lines (shard starts at line {})",
        config.id, stats.words_routed, stats.lines, config.shard.start_line
    );
    send_completion(report, Role::SplitterDone, config.id, clock)?;
    Ok(stats)
}
