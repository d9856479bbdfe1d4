//! Word-level building blocks shared by every role
//!
//! - `partition` - deterministic word → builder routing
//! - `clean` - token cleaning, exclusion list, line tokenizer
//! - `table` - insertion-ordered counting table and top-K ranking

pub mod clean;
pub mod partition;
pub mod table;

pub use clean::{clean_token, ExclusionSet, Tokenizer, DEFAULT_MAX_WORD_LEN, MIN_WORD_LEN};
pub use partition::{partition, word_hash};
pub use table::{rank_order, top_k, WordCount, WordTable};
