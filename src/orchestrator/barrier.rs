//! Completion barriers
//!
//! A barrier reads every worker's completion pipe of one role to end-of-stream
//! and tallies the well-formed messages. Anomalies are recorded as
//! discrepancies; none of them end the barrier early.

use crate::channel::{FanIn, FanInError};
use crate::error::{ErrorCode, LexanError, Result};
use crate::protocol::{CompletionMessage, Role, WorkerTiming};
use serde::Serialize;
use std::io::Read;
use std::os::fd::AsFd;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarrierOutcome {
    pub role: Role,
    pub expected: usize,
    pub received: usize,
    /// Reported timing per worker id, `None` when nothing valid arrived
    pub timings: Vec<Option<WorkerTiming>>,
    pub discrepancies: Vec<String>,
}

impl BarrierOutcome {
    fn new(role: Role, expected: usize) -> Self {
        Self {
            role,
            expected,
            received: 0,
            timings: vec![None; expected],
            discrepancies: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.received == self.expected
    }

    fn discrepancy(&mut self, message: String) {
        warn!("{}", message);
        self.discrepancies.push(message);
    }

    /// Account for one line read from worker `owner`'s pipe
    fn accept(&mut self, owner: usize, line: &str) {
        let kind = self.role.worker_kind();
        let message = match CompletionMessage::decode(line) {
            Ok(message) => message,
            Err(err) => {
                self.discrepancy(format!("{kind} {owner}: {err}"));
                return;
            }
        };

        if message.role != self.role {
            self.discrepancy(format!(
                "{kind} {owner} sent {} instead of {}",
                message.role, self.role
            ));
        } else if message.worker_id != owner {
            self.discrepancy(format!(
                "{kind} {owner} reported as worker {}",
                message.worker_id
            ));
        } else if self.timings[owner].is_some() {
            self.discrepancy(format!("{kind} {owner} reported more than once"));
        } else {
            debug!(
                "{} {} done: wall {:.6}s, cpu {:.6}s",
                kind, owner, message.timing.wall_secs, message.timing.cpu_secs
            );
            self.timings[owner] = Some(message.timing);
            self.received += 1;
        }
    }
}

/// Read completion pipes until every one of them is closed
///
/// `reports[i]` must belong to worker `i`.
pub fn await_completions<R>(role: Role, reports: Vec<R>) -> Result<BarrierOutcome>
where
    R: Read + AsFd,
{
    let mut outcome = BarrierOutcome::new(role, reports.len());
    let mut heard = vec![false; reports.len()];

    FanIn::new(reports)
        .run(|owner, line| {
            heard[owner] = true;
            outcome.accept(owner, line);
            Ok::<(), FanInError>(())
        })
        .map_err(|err| {
            LexanError::collect_with_code(
                ErrorCode::COLLECT_READ_FAILED,
                format!("reading {} completion pipes: {}", role.worker_kind(), err),
                None,
            )
            .with_source(err)
        })?;

    for (owner, _) in heard.iter().enumerate().filter(|(_, heard)| !**heard) {
        outcome.discrepancy(format!(
            "{} {} exited without reporting",
            role.worker_kind(),
            owner
        ));
    }

    debug!(
        "{} barrier: {}/{} received",
        role.worker_kind(),
        outcome.received,
        outcome.expected
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    fn pipe_with(body: &str) -> UnixStream {
        let (mut writer, reader) = UnixStream::pair().unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        reader
    }

    #[test]
    fn test_all_workers_report() {
        let reports = vec![
            pipe_with("SplitterDone-0-1.500000-0.250000\n"),
            pipe_with("SplitterDone-1-2.000000-0.500000\n"),
        ];
        let outcome = await_completions(Role::SplitterDone, reports).unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.received, 2);
        assert!(outcome.discrepancies.is_empty());
        assert_eq!(
            outcome.timings[1],
            Some(WorkerTiming {
                wall_secs: 2.0,
                cpu_secs: 0.5
            })
        );
    }

    #[test]
    fn test_silent_worker_is_a_discrepancy() {
        let reports = vec![pipe_with("BuilderDone-0-1.0-1.0\n"), pipe_with("")];
        let outcome = await_completions(Role::BuilderDone, reports).unwrap();

        assert_eq!(outcome.received, 1);
        assert!(!outcome.is_complete());
        assert_eq!(outcome.timings[1], None);
        assert_eq!(outcome.discrepancies, vec!["builder 1 exited without reporting"]);
    }

    #[test]
    fn test_wrong_role_and_wrong_id_are_not_counted() {
        let reports = vec![
            pipe_with("BuilderDone-0-1.0-1.0\n"),
            pipe_with("SplitterDone-7-1.0-1.0\n"),
            pipe_with("garbage\n"),
        ];
        let outcome = await_completions(Role::SplitterDone, reports).unwrap();

        assert_eq!(outcome.received, 0);
        assert_eq!(outcome.discrepancies.len(), 3);
        assert!(outcome.discrepancies[..]
            .iter()
            .any(|d| d == "splitter 1 reported as worker 7"));
    }

    #[test]
    fn test_duplicate_report_counts_once() {
        let reports = vec![pipe_with(
            "SplitterDone-0-1.0-1.0\nSplitterDone-0-1.0-1.0\n",
        )];
        let outcome = await_completions(Role::SplitterDone, reports).unwrap();
        assert_eq!(outcome.received, 1);
        assert_eq!(outcome.discrepancies.len(), 1);
    }

    #[test]
    fn test_nul_padded_message_is_accepted() {
        let outcome =
            await_completions(Role::BuilderDone, vec![pipe_with("BuilderDone-0-1.0-2.0\0\0")])
                .unwrap();
        assert!(outcome.is_complete());
    }
}
