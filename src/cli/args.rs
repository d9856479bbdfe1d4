//! CLI argument structures
//!
//! `run` is the user-facing command. `splitter` and `builder` are hidden: the
//! orchestrator starts them as worker processes.

use crate::config::LexanConfig;
use crate::worker::{BuilderConfig, ShardAssignment, SplitterConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find the most frequent words of a corpus with a multi-process pipeline
#[derive(Parser, Debug)]
#[command(name = "lexan")]
#[command(about = "lexan - top-K word frequencies with splitter and builder processes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count words in a corpus and write the top-K table
    #[command(name = "run")]
    Run(RunArgs),

    /// Map worker: tokenize a shard and route words to builders
    #[command(name = "splitter", hide = true)]
    Splitter(SplitterArgs),

    /// Reduce worker: count routed words and send the local top-K
    #[command(name = "builder", hide = true)]
    Builder(BuilderArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Input corpus
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file for the ranked table
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Words to leave out of the ranking
    #[arg(short = 'e', long, value_name = "FILE")]
    pub exclusion: Option<PathBuf>,

    /// Number of splitter processes
    #[arg(short = 'l', long, value_name = "N")]
    pub splitters: Option<usize>,

    /// Number of builder processes
    #[arg(short = 'm', long, value_name = "N")]
    pub builders: Option<usize>,

    /// How many words to rank
    #[arg(short = 't', long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Configuration file (defaults to ./lexan.toml when present)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory in which the run's channel namespace is created
    #[arg(long, value_name = "DIR")]
    pub channel_root: Option<PathBuf>,

    /// Leave the channel namespace in place after the run
    #[arg(long)]
    pub keep_channels: bool,

    /// Print the run report as JSON instead of the summary
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Flags given on the command line override everything else
    pub fn apply_to(&self, config: &mut LexanConfig) {
        if let Some(input) = &self.input {
            config.pipeline.input = Some(input.clone());
        }
        if let Some(output) = &self.output {
            config.pipeline.output = Some(output.clone());
        }
        if let Some(exclusion) = &self.exclusion {
            config.pipeline.exclusion = Some(exclusion.clone());
        }
        if let Some(splitters) = self.splitters {
            config.pipeline.splitters = splitters;
        }
        if let Some(builders) = self.builders {
            config.pipeline.builders = builders;
        }
        if let Some(top_k) = self.top_k {
            config.pipeline.top_k = top_k;
        }
        if let Some(root) = &self.channel_root {
            config.channels.root = root.clone();
        }
        if self.keep_channels {
            config.channels.keep = true;
        }
    }
}

#[derive(Args, Debug)]
pub struct SplitterArgs {
    #[arg(long)]
    pub id: usize,
    #[arg(long)]
    pub input: PathBuf,
    #[arg(long)]
    pub exclusion: PathBuf,
    #[arg(long)]
    pub builders: usize,
    #[arg(long)]
    pub start_line: usize,
    #[arg(long)]
    pub line_count: usize,
    #[arg(long)]
    pub max_word_len: usize,
    #[arg(long)]
    pub channel_dir: PathBuf,
}

impl From<SplitterArgs> for SplitterConfig {
    fn from(args: SplitterArgs) -> Self {
        SplitterConfig {
            id: args.id,
            input: args.input,
            exclusion: args.exclusion,
            builders: args.builders,
            shard: ShardAssignment {
                splitter_id: args.id,
                start_line: args.start_line,
                line_count: args.line_count,
            },
            max_word_len: args.max_word_len,
            channel_dir: args.channel_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct BuilderArgs {
    #[arg(long)]
    pub id: usize,
    #[arg(long)]
    pub splitters: usize,
    #[arg(long)]
    pub top_k: usize,
    #[arg(long)]
    pub channel_dir: PathBuf,
}

impl From<BuilderArgs> for BuilderConfig {
    fn from(args: BuilderArgs) -> Self {
        BuilderConfig {
            id: args.id,
            splitters: args.splitters,
            top_k: args.top_k,
            channel_dir: args.channel_dir,
        }
    }
}
