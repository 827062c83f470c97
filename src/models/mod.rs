// src/models/mod.rs

//! Domain models shared by the enumerator, decoder and matcher.

mod config;
mod grades;
mod roster;
mod user;

// Re-export all public types
pub use config::{Config, DecoderConfig, EnumeratorConfig, MatcherConfig};
pub use grades::{GradeTable, as_hash, parse_hash_cell};
pub use roster::{Student, StudentEmailMap, UidEmailMap, looks_like_email};
pub use user::UserRecord;
