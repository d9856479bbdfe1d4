use super::{ErrorCode, LexanError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to a configuration error carrying the original as source
    fn to_config_error(self, code: u16, message: impl Into<String>) -> Result<T, LexanError>;

    /// Convert to a worker-fatal error carrying the original as source
    fn to_worker_error(self, code: u16, message: impl Into<String>) -> Result<T, LexanError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_config_error(self, code: u16, message: impl Into<String>) -> Result<T, LexanError> {
        self.map_err(|e| LexanError::config_with_code(code, message).with_source(e))
    }

    fn to_worker_error(self, code: u16, message: impl Into<String>) -> Result<T, LexanError> {
        self.map_err(|e| LexanError::worker_with_code(code, message).with_source(e))
    }
}

/// Setup error for a path that could not be created
pub fn setup_io_error(code: u16, path: &Path, err: std::io::Error) -> LexanError {
    LexanError::setup_with_code(
        code,
        format!("{} ({})", path.display(), err),
        Some(path.to_path_buf()),
    )
    .with_source(err)
}

/// Worker error for a channel that failed to open
pub fn channel_open_error(path: &Path, err: std::io::Error) -> LexanError {
    LexanError::worker_with_code(
        ErrorCode::WORKER_CHANNEL_OPEN,
        format!("cannot open {}: {}", path.display(), err),
    )
    .with_source(err)
}
