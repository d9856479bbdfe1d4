use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;
pub mod helpers;

pub use codes::{describe_error_code, ErrorCode};
pub use helpers::ErrorExt;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// The unified error type for every lexan role
#[derive(Error, Debug)]
pub enum LexanError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Setup error: {message}")]
    Setup {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Spawn error: {message}")]
    Spawn {
        code: u16,
        message: String,
        worker: Option<String>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Collection error: {message}")]
    Collect {
        code: u16,
        message: String,
        builder: Option<usize>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Output error: {message}")]
    Output {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<BoxedSource>,
    },

    #[error("[E{code:04}] Worker error: {message}")]
    Worker {
        code: u16,
        message: String,
        #[source]
        source: Option<BoxedSource>,
    },
}

impl LexanError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::config_with_code(ErrorCode::CONFIG_GENERIC, message)
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a setup error with specific code and path
    pub fn setup_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Setup {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a spawn error for a named worker
    pub fn spawn_with_code(code: u16, message: impl Into<String>, worker: Option<String>) -> Self {
        Self::Spawn {
            code,
            message: message.into(),
            worker,
            source: None,
        }
    }

    /// Create a collection error, optionally tied to a builder
    pub fn collect_with_code(code: u16, message: impl Into<String>, builder: Option<usize>) -> Self {
        Self::Collect {
            code,
            message: message.into(),
            builder,
            source: None,
        }
    }

    pub fn output_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Output {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a worker error with default code
    pub fn worker(message: impl Into<String>) -> Self {
        Self::worker_with_code(ErrorCode::WORKER_GENERIC, message)
    }

    pub fn worker_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Worker {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(mut self, source: impl Into<BoxedSource>) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Setup { source: src, .. }
            | Self::Spawn { source: src, .. }
            | Self::Collect { source: src, .. }
            | Self::Output { source: src, .. }
            | Self::Worker { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Setup { message, .. }
            | Self::Spawn { message, .. }
            | Self::Collect { message, .. }
            | Self::Output { message, .. }
            | Self::Worker { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Process exit code for this error category
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 1,
            Self::Setup { .. } | Self::Worker { .. } => 2,
            Self::Spawn { .. } => 3,
            Self::Collect { .. } => 4,
            Self::Output { .. } => 5,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Setup { code, .. }
            | Self::Spawn { code, .. }
            | Self::Collect { code, .. }
            | Self::Output { code, .. }
            | Self::Worker { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Setup { message, path, .. } => match path {
                Some(p) => format!("Setup failed at {}: {}", p.display(), message),
                None => format!("Setup failed: {}", message),
            },
            Self::Spawn {
                message, worker, ..
            } => match worker {
                Some(w) => format!("Could not start {}: {}", w, message),
                None => format!("Could not start worker: {}", message),
            },
            Self::Collect {
                message, builder, ..
            } => match builder {
                Some(b) => format!("Collecting results from builder {} failed: {}", b, message),
                None => format!("Collecting results failed: {}", message),
            },
            Self::Output { message, path, .. } => match path {
                Some(p) => format!("Writing {} failed: {}", p.display(), message),
                None => format!("Writing output failed: {}", message),
            },
            Self::Worker { message, .. } => message.clone(),
        }
    }
}

/// Type alias for Results using LexanError
pub type Result<T> = std::result::Result<T, LexanError>;
