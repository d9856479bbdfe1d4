//! Orchestrator (root process)
//!
//! Plans the shards, lays out the channel topology, starts every worker and
//! then moves through the two completion barriers and the result collection
//! in a fixed order before writing the ranked output.

pub mod barrier;
pub mod collect;
pub mod planning;
pub mod report;
pub mod spawn;

pub use barrier::{await_completions, BarrierOutcome};
pub use collect::{collect_results, Collected};
pub use planning::{count_file_lines, count_lines, plan_shards};
pub use report::{format_ranking, format_summary, write_output, RunReport};
pub use spawn::{WorkerCommand, WorkerCommandBuilder, WorkerProcess};

use crate::channel::{run_id, ChannelNamespace};
use crate::config::{LexanConfig, PipelinePaths};
use crate::error::helpers::setup_io_error;
use crate::error::{ErrorCode, Result};
use crate::protocol::Role;
use crate::worker::{BuilderConfig, ShardAssignment, SplitterConfig};
use std::fs::File;
use std::path::PathBuf;
use std::process::ChildStdout;
use tracing::{debug, info, warn};

pub struct Orchestrator {
    config: LexanConfig,
    paths: PipelinePaths,
    program: PathBuf,
    verbose: u8,
}

impl Orchestrator {
    /// Validate `config`; `verbose` is forwarded to every worker
    pub fn new(config: LexanConfig, verbose: u8) -> Result<Self> {
        let paths = config.validate()?;
        let program = spawn::resolve_worker_program(config.worker_program.as_deref())?;
        Ok(Self {
            config,
            paths,
            program,
            verbose,
        })
    }

    fn splitters(&self) -> usize {
        self.config.pipeline.splitters
    }

    fn builders(&self) -> usize {
        self.config.pipeline.builders
    }

    /// Run the whole pipeline once
    pub fn run(&self) -> Result<RunReport> {
        File::open(&self.paths.exclusion).map_err(|err| {
            setup_io_error(ErrorCode::SETUP_INPUT_UNREADABLE, &self.paths.exclusion, err)
        })?;
        let total_lines = count_file_lines(&self.paths.input)?;
        let shards = plan_shards(total_lines, self.splitters());
        info!(
            "Splitting {} lines of {} across {} splitters and {} builders",
            total_lines,
            self.paths.input.display(),
            self.splitters(),
            self.builders()
        );

        let run_id = run_id();
        let namespace = ChannelNamespace::for_run(&self.config.channels.root, &run_id);
        namespace.create_topology(self.splitters(), self.builders())?;

        let mut workers = self.spawn_workers(&namespace, &shards)?;
        let (builders, splitters) = workers.split_at_mut(self.builders());

        let splitter_outcome = await_completions(Role::SplitterDone, take_reports(splitters))?;
        log_barrier(&splitter_outcome);

        let collected = collect_results(&namespace, self.builders())?;
        let records_collected = collected.records();

        let builder_outcome = await_completions(Role::BuilderDone, take_reports(builders))?;
        log_barrier(&builder_outcome);

        let top_k = collected.merge(self.config.pipeline.top_k);
        write_output(&self.paths.output, &top_k)?;
        info!(
            "Wrote top {} words to {}",
            top_k.len(),
            self.paths.output.display()
        );

        let abnormal_exits = reap_all(&mut workers)?;

        let channel_dir = if self.config.channels.keep {
            info!("Keeping channels in {}", namespace.dir().display());
            Some(namespace.dir().to_path_buf())
        } else {
            if let Err(err) = namespace.remove() {
                warn!(
                    "Could not remove channel namespace {}: {}",
                    namespace.dir().display(),
                    err
                );
            }
            None
        };

        Ok(RunReport {
            run_id,
            input: self.paths.input.clone(),
            output: self.paths.output.clone(),
            total_lines,
            top_k,
            records_collected,
            splitters: splitter_outcome,
            builders: builder_outcome,
            abnormal_exits,
            channel_dir,
        })
    }

    /// Start every builder, then every splitter
    ///
    /// The returned list holds the builders first, in id order.
    fn spawn_workers(
        &self,
        namespace: &ChannelNamespace,
        shards: &[ShardAssignment],
    ) -> Result<Vec<WorkerProcess>> {
        let channel_dir = namespace.dir().to_path_buf();
        let builders = (0..self.builders()).map(|id| {
            spawn::builder_command(
                &self.program,
                &BuilderConfig {
                    id,
                    splitters: self.splitters(),
                    top_k: self.config.pipeline.top_k,
                    channel_dir: channel_dir.clone(),
                },
                self.verbose,
            )
        });
        let splitters = shards.iter().map(|shard| {
            spawn::splitter_command(
                &self.program,
                &SplitterConfig {
                    id: shard.splitter_id,
                    input: self.paths.input.clone(),
                    exclusion: self.paths.exclusion.clone(),
                    builders: self.builders(),
                    shard: *shard,
                    max_word_len: self.config.words.max_word_len,
                    channel_dir: channel_dir.clone(),
                },
                self.verbose,
            )
        });

        let mut workers = Vec::with_capacity(self.builders() + shards.len());
        for mut command in builders.chain(splitters) {
            if let Some(level) = &self.config.log_level {
                command = command.with_env("LEXAN_LOG", level);
            }
            match spawn::spawn(&command) {
                Ok(worker) => workers.push(worker),
                Err(err) => {
                    for worker in &mut workers {
                        worker.terminate();
                    }
                    return Err(err);
                }
            }
        }
        debug!("Spawned {} workers", workers.len());
        Ok(workers)
    }
}

fn log_barrier(outcome: &BarrierOutcome) {
    let kind = outcome.role.worker_kind();
    if outcome.is_complete() {
        info!("All {} {}s reported completion", outcome.expected, kind);
    } else {
        warn!(
            "Only {}/{} {}s reported completion",
            outcome.received, outcome.expected, kind
        );
    }
}

fn take_reports(workers: &mut [WorkerProcess]) -> Vec<ChildStdout> {
    workers
        .iter_mut()
        .filter_map(WorkerProcess::take_report)
        .collect()
}

/// Wait for every worker and describe the ones that did not exit cleanly
fn reap_all(workers: &mut [WorkerProcess]) -> Result<Vec<String>> {
    let mut abnormal = Vec::new();
    for worker in workers {
        let status = worker.reap()?;
        if status.success() {
            debug!("{} (pid {}) exited cleanly", worker.label(), worker.pid());
        } else {
            let message = format!("{}: {}", worker.label(), status);
            warn!("Worker failed: {}", message);
            abnormal.push(message);
        }
    }
    Ok(abnormal)
}
