//! Pipeline entry points for the three tools.
//!
//! - `run_enumerator`: Walk profile UIDs and save the UID-email CSV
//! - `run_decoder`: Recover student IDs from pair-hashed grades
//! - `run_matcher`: Attach padded-ID-hashed grades to a roster

pub mod decode;
pub mod enumerate;
pub mod match_grades;

pub use decode::{DecodeInputs, run_decoder};
pub use enumerate::run_enumerator;
pub use match_grades::run_matcher;
