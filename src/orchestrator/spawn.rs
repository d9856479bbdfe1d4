//! Worker process launching
//!
//! Workers are the lexan binary itself started with a hidden subcommand. Each
//! child's stdout becomes the orchestrator's private completion pipe for that
//! worker; stderr is inherited so worker logs land next to ours.

use crate::error::{ErrorCode, LexanError, Result};
use crate::protocol::Role;
use crate::worker::{BuilderConfig, SplitterConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};
use tracing::debug;

/// A fully described worker invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
    pub role: Role,
    pub worker_id: usize,
}

impl WorkerCommand {
    /// `splitter 3`, `builder 0`, for logs and errors
    pub fn label(&self) -> String {
        format!("{} {}", self.role.worker_kind(), self.worker_id)
    }

    /// Set an environment variable for the worker
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }
}

pub struct WorkerCommandBuilder {
    command: WorkerCommand,
}

impl WorkerCommandBuilder {
    pub fn new(program: &Path, role: Role, worker_id: usize) -> Self {
        Self {
            command: WorkerCommand {
                program: program.to_path_buf(),
                args: Vec::new(),
                env: Vec::new(),
                role,
                worker_id,
            },
        }
    }

    /// Repeat `-v` so the worker logs at the orchestrator's level
    pub fn verbosity(mut self, verbose: u8) -> Self {
        if verbose > 0 {
            let flag = format!("-{}", "v".repeat(usize::from(verbose)));
            self.command.args.push(flag.into());
        }
        self
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.command.args.push(arg.into());
        self
    }

    /// Append `--name value`
    pub fn flag(self, name: &str, value: impl ToString) -> Self {
        self.arg(format!("--{name}")).arg(value.to_string())
    }

    pub fn path_flag(self, name: &str, value: &Path) -> Self {
        self.arg(format!("--{name}")).arg(value.as_os_str())
    }

    pub fn build(self) -> WorkerCommand {
        self.command
    }
}

pub fn splitter_command(program: &Path, config: &SplitterConfig, verbose: u8) -> WorkerCommand {
    WorkerCommandBuilder::new(program, Role::SplitterDone, config.id)
        .verbosity(verbose)
        .arg("splitter")
        .flag("id", config.id)
        .path_flag("input", &config.input)
        .path_flag("exclusion", &config.exclusion)
        .flag("builders", config.builders)
        .flag("start-line", config.shard.start_line)
        .flag("line-count", config.shard.line_count)
        .flag("max-word-len", config.max_word_len)
        .path_flag("channel-dir", &config.channel_dir)
        .build()
}

pub fn builder_command(program: &Path, config: &BuilderConfig, verbose: u8) -> WorkerCommand {
    WorkerCommandBuilder::new(program, Role::BuilderDone, config.id)
        .verbosity(verbose)
        .arg("builder")
        .flag("id", config.id)
        .flag("splitters", config.splitters)
        .flag("top-k", config.top_k)
        .path_flag("channel-dir", &config.channel_dir)
        .build()
}

/// A running worker and the read end of its completion pipe
#[derive(Debug)]
pub struct WorkerProcess {
    pub role: Role,
    pub worker_id: usize,
    child: Child,
    report: Option<ChildStdout>,
}

impl WorkerProcess {
    pub fn label(&self) -> String {
        format!("{} {}", self.role.worker_kind(), self.worker_id)
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Hand over the completion pipe; `None` once taken
    pub fn take_report(&mut self) -> Option<ChildStdout> {
        self.report.take()
    }

    /// Kill the process and wait for it, ignoring failures
    pub fn terminate(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    /// Wait for the process to exit
    pub fn reap(&mut self) -> Result<ExitStatus> {
        self.child.wait().map_err(|err| {
            LexanError::collect_with_code(
                ErrorCode::COLLECT_REAP_FAILED,
                format!("cannot wait for {}: {}", self.label(), err),
                None,
            )
            .with_source(err)
        })
    }
}

pub fn spawn(command: &WorkerCommand) -> Result<WorkerProcess> {
    let mut child = Command::new(&command.program)
        .args(&command.args)
        .envs(command.env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|err| {
            LexanError::spawn_with_code(
                ErrorCode::SPAWN_FAILED,
                format!(
                    "cannot start {} ({}): {}",
                    command.label(),
                    command.program.display(),
                    err
                ),
                Some(command.label()),
            )
            .with_source(err)
        })?;

    let Some(report) = child.stdout.take() else {
        // already running
        let _ = child.kill();
        let _ = child.wait();
        return Err(LexanError::spawn_with_code(
            ErrorCode::SPAWN_NO_STDOUT,
            format!("{} has no completion pipe", command.label()),
            Some(command.label()),
        ));
    };

    debug!("Spawned {} as pid {}", command.label(), child.id());
    Ok(WorkerProcess {
        role: command.role,
        worker_id: command.worker_id,
        child,
        report: Some(report),
    })
}

/// The program workers are started from
pub fn resolve_worker_program(configured: Option<&Path>) -> Result<PathBuf> {
    match configured {
        Some(path) => Ok(path.to_path_buf()),
        None => std::env::current_exe().map_err(|err| {
            LexanError::spawn_with_code(
                ErrorCode::SPAWN_WORKER_PROGRAM,
                format!("cannot locate the lexan executable: {}", err),
                None,
            )
            .with_source(err)
        }),
    }
}
