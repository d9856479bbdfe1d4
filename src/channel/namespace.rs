//! Filesystem-visible channel namespace
//!
//! Every run gets its own directory so two pipelines never share FIFO names.
//! Names inside the directory are fixed functions of worker ids, and every
//! role derives them the same way from the directory path alone.

use crate::error::helpers::{channel_open_error, setup_io_error};
use crate::error::{ErrorCode, LexanError, Result};
use nix::sys::stat::Mode;
use nix::unistd::mkfifo;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use uuid::Uuid;

/// Unique token for one pipeline run: process id plus a random suffix
pub fn run_id() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("{}-{}", std::process::id(), &token[..8])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelNamespace {
    dir: PathBuf,
}

impl ChannelNamespace {
    /// Refer to an existing namespace directory (worker side)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Namespace for a fresh run under `root`
    pub fn for_run(root: &Path, run_id: &str) -> Self {
        Self::new(root.join(format!("lexan-{run_id}")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Data channel carrying words from `splitter` to `builder`
    pub fn data_channel(&self, splitter: usize, builder: usize) -> PathBuf {
        self.dir
            .join(format!("splitter{splitter}-builder{builder}.fifo"))
    }

    /// Result channel carrying a builder's local top-K to the orchestrator
    pub fn result_channel(&self, builder: usize) -> PathBuf {
        self.dir.join(format!("builder{builder}-root.fifo"))
    }

    /// Create the namespace directory and every FIFO of the topology
    ///
    /// Fails if the directory already exists: a namespace is never reused.
    pub fn create_topology(&self, splitters: usize, builders: usize) -> Result<()> {
        fs::create_dir(&self.dir).map_err(|err| {
            let code = if err.kind() == std::io::ErrorKind::AlreadyExists {
                ErrorCode::SETUP_NAMESPACE_EXISTS
            } else {
                ErrorCode::SETUP_NAMESPACE_CREATE
            };
            setup_io_error(code, &self.dir, err)
        })?;
        debug!("Created channel namespace {}", self.dir.display());

        for splitter in 0..splitters {
            for builder in 0..builders {
                make_fifo(&self.data_channel(splitter, builder))?;
            }
        }
        for builder in 0..builders {
            make_fifo(&self.result_channel(builder))?;
        }

        debug!(
            "Created {} data and {} result channels",
            splitters * builders,
            builders
        );
        Ok(())
    }

    /// Remove the namespace directory and everything in it
    pub fn remove(&self) -> std::io::Result<()> {
        fs::remove_dir_all(&self.dir)
    }
}

fn make_fifo(path: &Path) -> Result<()> {
    mkfifo(path, Mode::S_IRUSR | Mode::S_IWUSR).map_err(|errno| {
        setup_io_error(
            ErrorCode::SETUP_FIFO_CREATE,
            path,
            std::io::Error::from(errno),
        )
    })?;
    trace!("mkfifo {}", path.display());
    Ok(())
}

/// Open a channel for writing; blocks until a reader opens the other end
pub fn open_writer(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|err| channel_open_error(path, err))
}

/// Open a channel for reading; blocks until a writer opens the other end
pub fn open_reader(path: &Path) -> Result<File> {
    File::open(path).map_err(|err| channel_open_error(path, err))
}

/// Map a worker-side open error onto the orchestrator's collection category
pub fn as_collect_error(err: LexanError, builder: usize) -> LexanError {
    LexanError::collect_with_code(ErrorCode::COLLECT_OPEN_FAILED, err.user_message(), Some(builder))
        .with_source(err)
}
