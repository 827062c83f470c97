//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Profile enumeration settings
    #[serde(default)]
    pub enumerator: EnumeratorConfig,

    /// Pair-hash grade decoding settings
    #[serde(default)]
    pub decoder: DecoderConfig,

    /// Roster matching settings
    #[serde(default)]
    pub matcher: MatcherConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.enumerator.validate()?;
        self.decoder.validate()?;
        self.matcher.validate()?;
        Ok(())
    }
}

/// HTTP client and enumeration behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumeratorConfig {
    /// Profile URL prefix; the padded UID is joined onto it
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// First UID to probe (inclusive)
    #[serde(default = "defaults::start_uid")]
    pub start_uid: u32,

    /// Last UID to probe (inclusive)
    #[serde(default = "defaults::max_uid")]
    pub max_uid: u32,

    /// Digits the UID is zero-padded to in URLs and output
    #[serde(default = "defaults::uid_width")]
    pub uid_width: usize,

    /// Concurrent batches, also the session pool size
    #[serde(default = "defaults::workers")]
    pub workers: usize,

    /// UIDs per batch
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Consecutive 404s that stop the run
    #[serde(default = "defaults::not_found_threshold")]
    pub not_found_threshold: usize,

    /// Rewrite the output file every time this many more records arrive
    #[serde(default = "defaults::checkpoint_every")]
    pub checkpoint_every: usize,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header for HTTP requests
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Placeholder address the site shows for anonymous viewers
    #[serde(default = "defaults::guest_email")]
    pub guest_email: String,

    /// Usernames or nicknames containing this are spam accounts
    #[serde(default = "defaults::blocked_marker")]
    pub blocked_marker: String,

    /// Output CSV path
    #[serde(default = "defaults::enumerator_output")]
    pub output: String,
}

impl EnumeratorConfig {
    fn validate(&self) -> Result<()> {
        if self.user_agent.trim().is_empty() {
            return Err(AppError::validation("enumerator.user_agent is empty"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("enumerator.timeout_secs must be > 0"));
        }
        if self.workers == 0 {
            return Err(AppError::validation("enumerator.workers must be > 0"));
        }
        if self.batch_size == 0 {
            return Err(AppError::validation("enumerator.batch_size must be > 0"));
        }
        if self.not_found_threshold == 0 {
            return Err(AppError::validation(
                "enumerator.not_found_threshold must be > 0",
            ));
        }
        if self.checkpoint_every == 0 {
            return Err(AppError::validation(
                "enumerator.checkpoint_every must be > 0",
            ));
        }
        if self.start_uid > self.max_uid {
            return Err(AppError::validation(format!(
                "enumerator.start_uid ({}) is greater than max_uid ({})",
                self.start_uid, self.max_uid
            )));
        }
        if self.output.trim().is_empty() {
            return Err(AppError::validation("enumerator.output is empty"));
        }
        self.profile_base()?;
        Ok(())
    }

    /// Parsed base URL, normalized to end with `/` so joins append.
    pub fn profile_base(&self) -> Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base)?;
        if url.cannot_be_a_base() {
            return Err(AppError::config(format!(
                "enumerator.base_url '{}' cannot be used as a base",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Format a UID number the way the site expects it.
    pub fn format_uid(&self, uid: u32) -> String {
        format!("{uid:0width$}", width = self.uid_width)
    }
}

impl Default for EnumeratorConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            start_uid: defaults::start_uid(),
            max_uid: defaults::max_uid(),
            uid_width: defaults::uid_width(),
            workers: defaults::workers(),
            batch_size: defaults::batch_size(),
            not_found_threshold: defaults::not_found_threshold(),
            checkpoint_every: defaults::checkpoint_every(),
            timeout_secs: defaults::timeout(),
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            guest_email: defaults::guest_email(),
            blocked_marker: defaults::blocked_marker(),
            output: defaults::enumerator_output(),
        }
    }
}

/// Column layout for the pair-hash decoder inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Zero-based email column in the roster export
    #[serde(default = "defaults::roster_email_column")]
    pub roster_email_column: usize,

    /// Roster rows with fewer columns are skipped
    #[serde(default = "defaults::roster_min_columns")]
    pub roster_min_columns: usize,

    /// Zero-based UID column in the UID-email file
    #[serde(default = "defaults::uid_column")]
    pub uid_column: usize,

    /// Zero-based email column in the UID-email file
    #[serde(default = "defaults::uid_email_column")]
    pub uid_email_column: usize,

    /// Header of the prepended student ID column
    #[serde(default = "defaults::decoded_column")]
    pub decoded_column: String,

    /// Output rows shown after conversion
    #[serde(default = "defaults::preview_rows")]
    pub preview_rows: usize,
}

impl DecoderConfig {
    fn validate(&self) -> Result<()> {
        if self.roster_min_columns <= self.roster_email_column {
            return Err(AppError::validation(
                "decoder.roster_min_columns must exceed decoder.roster_email_column",
            ));
        }
        if self.decoded_column.trim().is_empty() {
            return Err(AppError::validation("decoder.decoded_column is empty"));
        }
        Ok(())
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            roster_email_column: defaults::roster_email_column(),
            roster_min_columns: defaults::roster_min_columns(),
            uid_column: defaults::uid_column(),
            uid_email_column: defaults::uid_email_column(),
            decoded_column: defaults::decoded_column(),
            preview_rows: defaults::preview_rows(),
        }
    }
}

/// Roster matcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Grade column holding the padded-ID hash
    #[serde(default = "defaults::hash_column")]
    pub hash_column: String,

    /// Width student IDs are zero-padded to before hashing
    #[serde(default = "defaults::id_width")]
    pub id_width: usize,

    /// Default output CSV path
    #[serde(default = "defaults::matcher_output")]
    pub output: String,

    /// Output rows shown after matching
    #[serde(default = "defaults::preview_rows")]
    pub preview_rows: usize,
}

impl MatcherConfig {
    fn validate(&self) -> Result<()> {
        if self.hash_column.trim().is_empty() {
            return Err(AppError::validation("matcher.hash_column is empty"));
        }
        if self.id_width == 0 {
            return Err(AppError::validation("matcher.id_width must be > 0"));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            hash_column: defaults::hash_column(),
            id_width: defaults::id_width(),
            output: defaults::matcher_output(),
            preview_rows: defaults::preview_rows(),
        }
    }
}

mod defaults {
    // Enumerator defaults
    pub fn base_url() -> String {
        "https://acm.shanghaitech.edu.cn/user/".into()
    }
    pub fn start_uid() -> u32 {
        1
    }
    pub fn max_uid() -> u32 {
        1800
    }
    pub fn uid_width() -> usize {
        4
    }
    pub fn workers() -> usize {
        15
    }
    pub fn batch_size() -> usize {
        30
    }
    pub fn not_found_threshold() -> usize {
        50
    }
    pub fn checkpoint_every() -> usize {
        50
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
            .into()
    }
    pub fn accept_language() -> String {
        "zh-CN,zh;q=0.8,en-US;q=0.5,en;q=0.3".into()
    }
    pub fn guest_email() -> String {
        "Guest@hydro.local".into()
    }
    pub fn blocked_marker() -> String {
        "发票".into()
    }
    pub fn enumerator_output() -> String {
        "uid_and_email.csv".into()
    }

    // Decoder defaults
    pub fn roster_email_column() -> usize {
        8
    }
    pub fn roster_min_columns() -> usize {
        18
    }
    pub fn uid_column() -> usize {
        0
    }
    pub fn uid_email_column() -> usize {
        3
    }
    pub fn decoded_column() -> String {
        "Student_ID".into()
    }
    pub fn preview_rows() -> usize {
        5
    }

    // Matcher defaults
    pub fn hash_column() -> String {
        "Hashed ID".into()
    }
    pub fn id_width() -> usize {
        crate::hashing::PADDED_ID_WIDTH
    }
    pub fn matcher_output() -> String {
        "results.csv".into()
    }
}
