//! Text records exchanged between roles
//!
//! Builders send `word-count` records on their result channel; every worker
//! sends exactly one completion message on its private pipe.

pub mod completion;
pub mod error;
pub mod record;

pub use completion::{CompletionMessage, Role, WorkerTiming};
pub use error::ProtocolError;
pub use record::{encode_record, parse_record};
