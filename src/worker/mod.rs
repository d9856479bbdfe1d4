//! Map and reduce worker processes
//!
//! Workers are started by the orchestrator with hidden subcommands. Their
//! stdout is the private completion pipe; logs go to stderr.

pub mod builder;
pub mod splitter;

pub use builder::{BuilderConfig, BuilderStats};
pub use splitter::{ShardAssignment, SplitterConfig, SplitterStats};

use crate::error::{ErrorCode, ErrorExt, Result};
use crate::protocol::{CompletionMessage, Role, WorkerTiming};
use nix::sys::resource::{getrusage, UsageWho};
use nix::sys::time::TimeVal;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock start of a worker plus access to its CPU usage
#[derive(Debug, Clone, Copy)]
pub struct WorkerClock {
    started: Instant,
}

impl WorkerClock {
    /// Start measuring; call as early as possible in the worker's life
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Wall time since `start` and user+system CPU time of this process
    pub fn elapsed(&self) -> WorkerTiming {
        WorkerTiming {
            wall_secs: self.started.elapsed().as_secs_f64(),
            cpu_secs: process_cpu_time().as_secs_f64(),
        }
    }
}

fn process_cpu_time() -> Duration {
    match getrusage(UsageWho::RUSAGE_SELF) {
        Ok(usage) => timeval(usage.user_time()) + timeval(usage.system_time()),
        Err(errno) => {
            debug!("getrusage failed: {}", errno);
            Duration::ZERO
        }
    }
}

fn timeval(tv: TimeVal) -> Duration {
    let secs = u64::try_from(tv.tv_sec()).unwrap_or(0);
    let micros = u64::try_from(tv.tv_usec()).unwrap_or(0);
    Duration::from_secs(secs) + Duration::from_micros(micros)
}

/// Write the worker's one completion message; must be its final write
pub fn send_completion(
    report: &mut impl Write,
    role: Role,
    worker_id: usize,
    clock: &WorkerClock,
) -> Result<()> {
    let message = CompletionMessage::new(role, worker_id, clock.elapsed());
    report
        .write_all(message.encode().as_bytes())
        .and_then(|_| report.flush())
        .to_worker_error(ErrorCode::WORKER_REPORT, "cannot send completion message")?;
    debug!(
        "{} {} reported wall={:.6}s cpu={:.6}s",
        role.worker_kind(),
        worker_id,
        message.timing.wall_secs,
        message.timing.cpu_secs
    );
    Ok(())
}
