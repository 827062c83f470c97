// src/services/enumerator.rs

//! Concurrent user-profile enumeration.
//!
//! The UID range is cut into fixed-size batches. Up to `workers` batches run
//! at once; each walks its UIDs in order and results are collected as
//! batches finish, not in submission order.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::{EnumeratorConfig, UserRecord};
use crate::services::profile::{ParsedProfile, ProfileParser};
use crate::services::source::{FetchOutcome, ProfileSource};
use crate::services::tracker::NotFoundTracker;
use crate::storage::UserCsvStore;
use crate::utils::per_second;

/// Counters for an enumeration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// UIDs actually requested
    pub probed: usize,
    pub accepted: usize,
    pub blocked: usize,
    pub not_found: usize,
    /// Non-200, non-404 responses
    pub bad_status: usize,
    /// Network or body-read failures
    pub failed: usize,
    /// Whether the consecutive-404 limit ended the run
    pub stopped_early: bool,
    pub elapsed: Duration,
}

impl EnumerationStats {
    /// UIDs probed per second.
    pub fn rate(&self) -> f64 {
        per_second(self.probed, self.elapsed.as_secs_f64())
    }

    fn absorb(&mut self, batch: &BatchResult) {
        self.probed += batch.probed;
        self.accepted += batch.records.len();
        self.blocked += batch.blocked;
        self.not_found += batch.not_found;
        self.bad_status += batch.bad_status;
        self.failed += batch.failed;
    }
}

/// Summary of an enumeration run.
#[derive(Debug, Default)]
pub struct EnumerationOutcome {
    pub users: Vec<UserRecord>,
    pub stats: EnumerationStats,
}

/// What happened to a single UID.
enum Probe {
    Accepted(UserRecord),
    Blocked,
    NotFound,
    BadStatus,
    Failed,
}

#[derive(Debug, Default)]
struct BatchResult {
    probed: usize,
    records: Vec<UserRecord>,
    blocked: usize,
    not_found: usize,
    bad_status: usize,
    failed: usize,
}

/// Walks a UID range and collects profiles.
pub struct UserEnumerator {
    config: EnumeratorConfig,
    source: Arc<dyn ProfileSource>,
    parser: ProfileParser,
    tracker: NotFoundTracker,
    store: UserCsvStore,
}

impl UserEnumerator {
    /// Create an enumerator reading pages from `source`.
    pub fn new(config: EnumeratorConfig, source: Arc<dyn ProfileSource>) -> Result<Self> {
        let parser = ProfileParser::new(&config)?;
        let tracker = NotFoundTracker::new(config.not_found_threshold);
        let store = UserCsvStore::new(&config.output);

        Ok(Self {
            config,
            source,
            parser,
            tracker,
            store,
        })
    }

    pub fn tracker(&self) -> &NotFoundTracker {
        &self.tracker
    }

    pub fn store(&self) -> &UserCsvStore {
        &self.store
    }

    /// Zero-padded UIDs of the configured range, in order.
    pub fn uids(&self) -> Vec<String> {
        (self.config.start_uid..=self.config.max_uid)
            .map(|uid| self.config.format_uid(uid))
            .collect()
    }

    /// Enumerate the whole range, checkpointing to the output file.
    pub async fn run(&self) -> Result<EnumerationOutcome> {
        let started = Instant::now();
        let batch_size = self.config.batch_size.max(1);
        let workers = self.config.workers.max(1);
        let checkpoint_every = self.config.checkpoint_every.max(1);

        let batches: Vec<Vec<String>> = self
            .uids()
            .chunks(batch_size)
            .map(<[String]>::to_vec)
            .collect();

        log::info!(
            "Enumerating UIDs {} - {} in {} batches",
            self.config.format_uid(self.config.start_uid),
            self.config.format_uid(self.config.max_uid),
            batches.len()
        );
        log::info!("Workers: {}, batch size: {}", workers, batch_size);

        let mut outcome = EnumerationOutcome::default();
        let mut batch_stream = stream::iter(batches)
            .map(|batch| self.process_batch(batch))
            .buffer_unordered(workers);

        // Drain everything: batches started after the stop flag return at once.
        while let Some(batch) = batch_stream.next().await {
            outcome.stats.absorb(&batch);

            let before = outcome.users.len();
            outcome.users.extend(batch.records);
            let after = outcome.users.len();

            if after / checkpoint_every > before / checkpoint_every {
                match self.store.save(&outcome.users).await {
                    Ok(()) => log::info!(
                        "Saved {} users, {:.2} UID/s",
                        after,
                        per_second(outcome.stats.probed, started.elapsed().as_secs_f64())
                    ),
                    Err(e) => log::warn!("Checkpoint failed, continuing: {}", e),
                }
            }
        }

        self.store.save(&outcome.users).await?;

        outcome.stats.stopped_early = self.tracker.should_stop();
        outcome.stats.elapsed = started.elapsed();
        Ok(outcome)
    }

    /// Probe each UID of a batch in order until the stop flag is raised.
    async fn process_batch(&self, uids: Vec<String>) -> BatchResult {
        let mut result = BatchResult::default();

        for uid in &uids {
            if self.tracker.should_stop() {
                break;
            }

            result.probed += 1;
            match self.probe(uid).await {
                Probe::Accepted(record) => result.records.push(record),
                Probe::Blocked => result.blocked += 1,
                Probe::NotFound => result.not_found += 1,
                Probe::BadStatus => result.bad_status += 1,
                Probe::Failed => result.failed += 1,
            }
        }
        result
    }

    async fn probe(&self, uid: &str) -> Probe {
        let body = match self.source.fetch(uid).await {
            Ok(FetchOutcome::Page(body)) => body,
            Ok(FetchOutcome::NotFound) => {
                self.tracker.record_not_found();
                return Probe::NotFound;
            }
            Ok(FetchOutcome::Status(code)) => {
                log::warn!("UID {}: HTTP {}", uid, code);
                return Probe::BadStatus;
            }
            Err(e) => {
                log::error!("Request for UID {} failed: {}", uid, e);
                return Probe::Failed;
            }
        };

        match self.parser.parse(uid, &body) {
            ParsedProfile::Accepted(record) => {
                self.tracker.record_success();
                log::info!("{}", record.format("Fetched user {uid}: {username}"));
                Probe::Accepted(record)
            }
            ParsedProfile::Blocked(record) => {
                log::info!("{}", record.format("Filtered spam user {uid}: {username}"));
                Probe::Blocked
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;

    /// In-memory site: listed UIDs have pages, everything else is 404.
    #[derive(Default)]
    struct ScriptedSource {
        pages: HashMap<String, FetchOutcome>,
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
        /// When this UID is fetched, count the records already on disk.
        watch: Option<(String, UserCsvStore)>,
        saved_at_watch: Mutex<Option<usize>>,
    }

    impl ScriptedSource {
        fn with_users(uids: &[&str]) -> Self {
            let pages = uids
                .iter()
                .map(|uid| {
                    let html = format!(
                        "<title>user{uid} - Hydro</title>\
                         <a href=\"mailto:user{uid}@example.edu\">mail</a>"
                    );
                    (uid.to_string(), FetchOutcome::Page(html))
                })
                .collect();
            Self {
                pages,
                ..Self::default()
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProfileSource for ScriptedSource {
        async fn fetch(&self, uid: &str) -> Result<FetchOutcome> {
            self.calls.lock().unwrap().push(uid.to_string());
            if let Some((watched, store)) = &self.watch {
                if watched == uid {
                    let saved = store.load().await.map(|users| users.len()).unwrap_or(0);
                    *self.saved_at_watch.lock().unwrap() = Some(saved);
                }
            }
            if self.failing.contains(uid) {
                return Err(AppError::fetch(uid, "connection reset"));
            }
            Ok(self.pages.get(uid).cloned().unwrap_or(FetchOutcome::NotFound))
        }
    }

    fn config(tmp: &TempDir, max_uid: u32, workers: usize, batch_size: usize) -> EnumeratorConfig {
        EnumeratorConfig {
            start_uid: 1,
            max_uid,
            workers,
            batch_size,
            output: tmp.path().join("users.csv").display().to_string(),
            ..EnumeratorConfig::default()
        }
    }

    fn enumerator(config: EnumeratorConfig, source: &Arc<ScriptedSource>) -> UserEnumerator {
        let source: Arc<dyn ProfileSource> = source.clone();
        UserEnumerator::new(config, source).unwrap()
    }

    #[tokio::test]
    async fn test_stops_after_consecutive_not_found() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(ScriptedSource::with_users(&["0001", "0002", "0003"]));
        let enumerator = enumerator(config(&tmp, 500, 1, 10), &source);

        let outcome = enumerator.run().await.unwrap();

        assert!(outcome.stats.stopped_early);
        assert_eq!(outcome.users.len(), 3);
        assert_eq!(outcome.stats.not_found, 50);
        // Three hits, then fifty misses; nothing after UID 0053.
        assert_eq!(source.call_count(), 53);
        assert_eq!(outcome.stats.probed, 53);
    }

    #[tokio::test]
    async fn test_success_resets_streak() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(ScriptedSource::with_users(&["0001", "0040", "0080"]));
        let enumerator = enumerator(config(&tmp, 100, 1, 7), &source);

        let outcome = enumerator.run().await.unwrap();

        assert!(!outcome.stats.stopped_early);
        assert_eq!(source.call_count(), 100);
        assert_eq!(outcome.users.len(), 3);
        assert_eq!(enumerator.tracker().consecutive(), 20);
    }

    #[tokio::test]
    async fn test_blocked_and_failed_uids_skipped() {
        let tmp = TempDir::new().unwrap();
        let mut source = ScriptedSource::with_users(&["0001", "0004"]);
        source.pages.insert(
            "0002".to_string(),
            FetchOutcome::Page("<title>开发票 - Hydro</title>".to_string()),
        );
        source
            .pages
            .insert("0003".to_string(), FetchOutcome::Status(500));
        source.failing.insert("0005".to_string());
        let source = Arc::new(source);

        let enumerator = enumerator(config(&tmp, 5, 2, 2), &source);
        let outcome = enumerator.run().await.unwrap();

        let uids: Vec<_> = {
            let mut uids: Vec<_> = outcome.users.iter().map(|u| u.uid.clone()).collect();
            uids.sort();
            uids
        };
        assert_eq!(uids, vec!["0001", "0004"]);
        assert_eq!(outcome.stats.blocked, 1);
        assert_eq!(outcome.stats.bad_status, 1);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.stats.probed, 5);
    }

    #[tokio::test]
    async fn test_concurrent_run_collects_everything() {
        let tmp = TempDir::new().unwrap();
        let uids: Vec<String> = (1..=40).map(|n| format!("{n:04}")).collect();
        let uid_refs: Vec<&str> = uids.iter().map(String::as_str).collect();
        let source = Arc::new(ScriptedSource::with_users(&uid_refs));

        let mut cfg = config(&tmp, 40, 4, 3);
        cfg.checkpoint_every = 7;
        let enumerator = enumerator(cfg, &source);
        let outcome = enumerator.run().await.unwrap();

        let mut found: Vec<_> = outcome.users.iter().map(|u| u.uid.clone()).collect();
        found.sort();
        assert_eq!(found, uids);
        assert_eq!(outcome.users[0].email, format!("user{}@example.edu", outcome.users[0].uid));

        let mut saved = enumerator.store().load().await.unwrap();
        saved.sort_by(|a, b| a.uid.cmp(&b.uid));
        assert_eq!(saved.len(), 40);
        assert_eq!(saved[0].username, "user0001");
    }

    #[tokio::test]
    async fn test_checkpoint_written_before_run_ends() {
        let tmp = TempDir::new().unwrap();
        let uids: Vec<String> = (1..=30).map(|n| format!("{n:04}")).collect();
        let uid_refs: Vec<&str> = uids.iter().map(String::as_str).collect();

        let mut cfg = config(&tmp, 30, 1, 5);
        cfg.checkpoint_every = 10;

        let mut source = ScriptedSource::with_users(&uid_refs);
        source.watch = Some(("0025".to_string(), UserCsvStore::new(&cfg.output)));
        let source = Arc::new(source);

        let enumerator = enumerator(cfg, &source);
        let outcome = enumerator.run().await.unwrap();
        assert_eq!(outcome.users.len(), 30);

        let saved = source.saved_at_watch.lock().unwrap().unwrap();
        assert!(saved >= 10, "only {saved} records on disk mid-run");
        assert!(saved < 30);
    }

    #[tokio::test]
    async fn test_nothing_found_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(ScriptedSource::default());
        let enumerator = enumerator(config(&tmp, 10, 2, 5), &source);

        let outcome = enumerator.run().await.unwrap();
        assert!(outcome.users.is_empty());
        assert!(!enumerator.store().path().exists());
    }

    #[test]
    fn test_uids_are_padded() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(ScriptedSource::default());
        let mut cfg = config(&tmp, 12, 1, 1);
        cfg.start_uid = 9;
        let enumerator = enumerator(cfg, &source);
        assert_eq!(enumerator.uids(), vec!["0009", "0010", "0011", "0012"]);
    }
}
