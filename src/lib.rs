//! # lexan
//!
//! Top-K word frequencies computed by a multi-process map-reduce pipeline.
//!
//! ## Usage
//!
//! ```bash
//! lexan run -i corpus.txt -o top.txt -e stopwords.txt -l 4 -m 2 -t 10
//! ```
//!
//! ## Modules
//!
//! - `channel` - Per-run FIFO namespace and the poll-driven fan-in reader
//! - `cli` - Argument parsing, logging setup and subcommand routing
//! - `config` - Layered configuration (defaults, TOML, environment, flags)
//! - `error` - Unified error type with numeric codes and exit codes
//! - `orchestrator` - Shard planning, worker spawning, barriers and the top-K merge
//! - `protocol` - Completion messages and `word-count` result records
//! - `words` - Token cleaning, partitioning and word counting
//! - `worker` - Splitter (map) and builder (reduce) processes
pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod protocol;
pub mod words;
pub mod worker;
