//! Flat-file persistence.
//!
//! - `users`: enumerator output, rewritten atomically on each checkpoint
//! - `tables`: generic CSV reading/writing for the decoder and matcher
//! - `encoding`: decoding ladder for rosters of unknown encoding

pub mod encoding;
pub mod tables;
pub mod users;

// Re-export for convenience
pub use tables::{read_rows, read_rows_with_fallback, read_table, write_table};
pub use users::UserCsvStore;
