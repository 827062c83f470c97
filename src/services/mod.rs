//! Service layer.
//!
//! This module contains the business logic for:
//! - Profile enumeration (`UserEnumerator`) over a `ProfileSource`
//! - Profile field extraction (`ProfileParser`)
//! - Pair-hash grade decoding (`decoder`)
//! - Padded-ID roster matching (`matcher`)

pub mod decoder;
mod enumerator;
pub mod matcher;
mod profile;
mod source;
mod tracker;

pub use decoder::{DecodeReport, HashTable};
pub use enumerator::{EnumerationOutcome, EnumerationStats, UserEnumerator};
pub use matcher::MatchReport;
pub use profile::{ParsedProfile, ProfileParser};
pub use source::{FetchOutcome, HttpProfileSource, ProfileSource};
pub use tracker::NotFoundTracker;
