use crate::error::{ErrorCode, LexanError};

/// Decoding failures for the two text records exchanged by the pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    #[error("record '{0}' has no '-' delimiter")]
    MissingDelimiter(String),

    #[error("record '{record}' has an invalid count '{count}'")]
    InvalidCount { record: String, count: String },

    #[error("completion message is empty")]
    EmptyMessage,

    #[error("completion message '{0}' has an unknown role")]
    UnknownRole(String),

    #[error("completion message '{message}' has an invalid {field}")]
    InvalidField {
        message: String,
        field: &'static str,
    },

    #[error("completion message '{0}' has the wrong number of fields")]
    FieldCount(String),
}

/// A malformed result record is fatal to collection
impl From<ProtocolError> for LexanError {
    fn from(err: ProtocolError) -> Self {
        LexanError::collect_with_code(ErrorCode::COLLECT_MALFORMED_RECORD, err.to_string(), None)
            .with_source(err)
    }
}
