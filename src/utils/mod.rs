//! Utility functions and helpers.

pub mod http;
pub mod report;

use url::Url;

use crate::error::Result;

/// Build the profile URL for a UID under `base`.
///
/// `base` must end with `/` for the UID to be appended rather than
/// replacing the last path segment.
pub fn profile_url(base: &Url, uid: &str) -> Result<Url> {
    Ok(base.join(uid)?)
}

/// Rate in items per second, zero for an empty interval.
pub fn per_second(count: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        count as f64 / elapsed_secs
    } else {
        0.0
    }
}
