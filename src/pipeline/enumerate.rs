// src/pipeline/enumerate.rs

//! User enumeration pipeline.

use std::sync::Arc;

use chrono::Local;

use crate::error::Result;
use crate::models::EnumeratorConfig;
use crate::services::{EnumerationStats, HttpProfileSource, UserEnumerator};
use crate::utils::report;

/// Enumerate profiles over HTTP and write the UID-email CSV.
pub async fn run_enumerator(config: &EnumeratorConfig) -> Result<EnumerationStats> {
    report::header("User Enumeration");
    report::line(&format!("Started at {}", Local::now().format("%H:%M:%S")));
    report::sub_item(&format!("Base URL: {}", config.base_url));
    report::sub_item(&format!(
        "UID range: {} - {}",
        config.format_uid(config.start_uid),
        config.format_uid(config.max_uid)
    ));
    report::sub_item(&format!("Output: {}", config.output));

    let source = Arc::new(HttpProfileSource::new(config)?);
    let enumerator = UserEnumerator::new(config.clone(), source)?;
    let outcome = enumerator.run().await?;
    let stats = outcome.stats;

    if outcome.users.is_empty() {
        report::failure("No users found, nothing written");
    } else {
        report::success(&format!(
            "Saved {} users to {}",
            outcome.users.len(),
            enumerator.store().path().display()
        ));
    }

    report::summary(
        "Enumeration Summary",
        &[
            ("UIDs probed", stats.probed.to_string()),
            ("Accepted", stats.accepted.to_string()),
            ("Blocked", stats.blocked.to_string()),
            ("Not found", stats.not_found.to_string()),
            ("Errors", (stats.bad_status + stats.failed).to_string()),
            ("Stopped early", stats.stopped_early.to_string()),
            ("Elapsed", format!("{:.1}s", stats.elapsed.as_secs_f64())),
            ("Rate", format!("{:.2} UID/s", stats.rate())),
        ],
    );

    Ok(stats)
}
