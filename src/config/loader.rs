use super::LexanConfig;
use crate::error::{ErrorCode, ErrorExt, LexanError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Looked up in the working directory when no file is given explicitly
pub const DEFAULT_CONFIG_FILE: &str = "lexan.toml";

pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    search_dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(search_dir: impl Into<PathBuf>) -> Self {
        Self {
            explicit: None,
            search_dir: search_dir.into(),
        }
    }

    /// Use this file instead of searching; it must exist
    pub fn with_explicit_path(mut self, path: Option<&Path>) -> Self {
        self.explicit = path.map(Path::to_path_buf);
        self
    }

    /// The file that will be read, if any
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.explicit {
            Some(path) => Some(path.clone()),
            None => {
                let path = self.search_dir.join(DEFAULT_CONFIG_FILE);
                path.is_file().then_some(path)
            }
        }
    }

    /// Defaults overlaid with the file, without environment overrides
    pub fn load_file(&self) -> Result<LexanConfig> {
        let Some(path) = self.config_path() else {
            debug!("No configuration file, using defaults");
            return Ok(LexanConfig::default());
        };

        if !path.exists() {
            return Err(LexanError::config_with_code(
                ErrorCode::CONFIG_NOT_FOUND,
                format!("configuration file {} not found", path.display()),
            ));
        }

        let content = fs::read_to_string(&path).to_config_error(
            ErrorCode::CONFIG_GENERIC,
            format!("cannot read {}", path.display()),
        )?;
        let config = parse_config(&content)
            .map_err(|err| err.with_context(path.display()))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults, then the file, then `LEXAN_*` environment variables
    pub fn load(&self) -> Result<LexanConfig> {
        let mut config = self.load_file()?;
        config.merge_env_vars()?;
        Ok(config)
    }
}

pub fn parse_config(content: &str) -> Result<LexanConfig> {
    toml::from_str(content).to_config_error(ErrorCode::CONFIG_PARSE_ERROR, "invalid configuration")
}
