//! Output file table, terminal summary and the serializable run report

use super::barrier::BarrierOutcome;
use crate::error::{ErrorCode, LexanError, Result};
use crate::words::WordCount;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Narrowest word column, the width of the "Word" heading
const MIN_WORD_WIDTH: usize = 4;
/// Spaces between the word column and the count
const COLUMN_GAP: usize = 5;

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub total_lines: usize,
    pub top_k: Vec<WordCount>,
    pub records_collected: usize,
    pub splitters: BarrierOutcome,
    pub builders: BarrierOutcome,
    /// Workers that exited unsuccessfully, as `label: status`
    pub abnormal_exits: Vec<String>,
    /// Present only when the channels were kept
    pub channel_dir: Option<PathBuf>,
}

impl RunReport {
    pub fn discrepancy_count(&self) -> usize {
        self.splitters.discrepancies.len()
            + self.builders.discrepancies.len()
            + self.abnormal_exits.len()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            LexanError::output_with_code(
                ErrorCode::OUTPUT_GENERIC,
                format!("cannot serialize run report: {}", err),
                None,
            )
            .with_source(err)
        })
    }
}

fn word_width(ranked: &[WordCount]) -> usize {
    ranked
        .iter()
        .map(|entry| entry.word.len())
        .max()
        .unwrap_or(0)
        .max(MIN_WORD_WIDTH)
}

/// Render the ranked words as the output file's table
pub fn format_ranking(ranked: &[WordCount]) -> String {
    let width = word_width(ranked);
    let separator = "-".repeat(width + 19);
    let mut table = String::new();

    let _ = writeln!(
        table,
        "     Word{}Frequency",
        " ".repeat(width - MIN_WORD_WIDTH + COLUMN_GAP)
    );
    let _ = writeln!(table, "{separator}");
    for (rank, entry) in ranked.iter().enumerate() {
        let pad = " ".repeat(width - entry.word.len() + COLUMN_GAP);
        let _ = writeln!(table, "{:>3}. {}{}{}", rank + 1, entry.word, pad, entry.count);
    }
    let _ = writeln!(table, "{separator}");
    table
}

pub fn write_output(path: &Path, ranked: &[WordCount]) -> Result<()> {
    std::fs::write(path, format_ranking(ranked)).map_err(|err| {
        LexanError::output_with_code(
            ErrorCode::OUTPUT_WRITE_FAILED,
            format!("cannot write {}: {}", path.display(), err),
            Some(path.to_path_buf()),
        )
        .with_source(err)
    })
}

fn format_timings(out: &mut String, outcome: &BarrierOutcome) {
    let kind = outcome.role.worker_kind();
    let _ = writeln!(
        out,
        "{}s: {}/{} completion messages received",
        kind, outcome.received, outcome.expected
    );
    for (id, timing) in outcome.timings.iter().enumerate() {
        match timing {
            Some(timing) => {
                let _ = writeln!(
                    out,
                    "  {} {:<3} wall {:>10.6}s  cpu {:>10.6}s",
                    kind, id, timing.wall_secs, timing.cpu_secs
                );
            }
            None => {
                let _ = writeln!(out, "  {} {:<3} no report", kind, id);
            }
        }
    }
}

/// Human-readable summary printed by `lexan run`
pub fn format_summary(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Top {} words of {} ({} lines):",
        report.top_k.len(),
        report.input.display(),
        report.total_lines
    );
    out.push_str(&format_ranking(&report.top_k));
    out.push('\n');

    format_timings(&mut out, &report.splitters);
    format_timings(&mut out, &report.builders);

    if report.discrepancy_count() > 0 {
        let _ = writeln!(out, "\nDiscrepancies:");
        for line in report
            .splitters
            .discrepancies
            .iter()
            .chain(&report.builders.discrepancies)
            .chain(&report.abnormal_exits)
        {
            let _ = writeln!(out, "  - {line}");
        }
    }

    let _ = writeln!(out, "\nResults written to {}", report.output.display());
    if let Some(dir) = &report.channel_dir {
        let _ = writeln!(out, "Channels kept in {}", dir.display());
    }
    out
}
