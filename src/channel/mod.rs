//! Channel plumbing: the per-run FIFO namespace and the fan-in reader

pub mod fanin;
pub mod namespace;

pub use fanin::{FanIn, FanInError};
pub use namespace::{open_reader, open_writer, run_id, ChannelNamespace};
