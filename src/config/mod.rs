//! Pipeline configuration
//!
//! Values are layered: built-in defaults, then a TOML file, then `LEXAN_*`
//! environment variables, then command-line flags.

use crate::error::{ErrorCode, LexanError, Result};
use crate::words::{DEFAULT_MAX_WORD_LEN, MIN_WORD_LEN};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod loader;

pub use loader::{ConfigLoader, DEFAULT_CONFIG_FILE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct LexanConfig {
    pub pipeline: PipelineConfig,
    pub words: WordsConfig,
    pub channels: ChannelsConfig,
    pub log_level: Option<String>,
    /// Program started for workers; defaults to the running executable
    pub worker_program: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub splitters: usize,
    pub builders: usize,
    pub top_k: usize,
    pub input: Option<PathBuf>,
    pub exclusion: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordsConfig {
    pub max_word_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelsConfig {
    /// Directory under which each run creates its namespace
    pub root: PathBuf,
    /// Leave the namespace in place after a successful run
    pub keep: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            splitters: 4,
            builders: 2,
            top_k: 10,
            input: None,
            exclusion: None,
            output: None,
        }
    }
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir(),
            keep: false,
        }
    }
}

/// Paths of a validated configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub input: PathBuf,
    pub exclusion: PathBuf,
    pub output: PathBuf,
}

impl LexanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env(|key| std::env::var(key).ok())
    }

    /// Apply `LEXAN_*` overrides read through `lookup`
    pub fn merge_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("LEXAN_SPLITTERS") {
            self.pipeline.splitters = parse_count("LEXAN_SPLITTERS", &value)?;
        }
        if let Some(value) = lookup("LEXAN_BUILDERS") {
            self.pipeline.builders = parse_count("LEXAN_BUILDERS", &value)?;
        }
        if let Some(value) = lookup("LEXAN_TOP_K") {
            self.pipeline.top_k = parse_count("LEXAN_TOP_K", &value)?;
        }
        if let Some(root) = lookup("LEXAN_CHANNEL_ROOT") {
            self.channels.root = PathBuf::from(root);
        }
        if let Some(level) = lookup("LEXAN_LOG") {
            self.log_level = Some(level);
        }
        Ok(())
    }

    /// Check the configuration is runnable and return its paths
    pub fn validate(&self) -> Result<PipelinePaths> {
        let minimums = [
            ("splitters", self.pipeline.splitters, 1),
            ("builders", self.pipeline.builders, 1),
            ("top_k", self.pipeline.top_k, 1),
            ("max_word_len", self.words.max_word_len, MIN_WORD_LEN),
        ];
        for (name, value, minimum) in minimums {
            if value < minimum {
                return Err(LexanError::config_with_code(
                    ErrorCode::CONFIG_INVALID_VALUE,
                    format!("{name} must be at least {minimum}"),
                ));
            }
        }

        let required = |name: &str, path: &Option<PathBuf>| {
            path.clone().ok_or_else(|| {
                LexanError::config_with_code(
                    ErrorCode::CONFIG_MISSING_REQUIRED,
                    format!("no {name} file given"),
                )
            })
        };
        Ok(PipelinePaths {
            input: required("input", &self.pipeline.input)?,
            exclusion: required("exclusion", &self.pipeline.exclusion)?,
            output: required("output", &self.pipeline.output)?,
        })
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        LexanError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            format!("{key} must be a non-negative integer, got '{value}'"),
        )
    })
}
