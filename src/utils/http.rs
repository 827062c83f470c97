// src/utils/http.rs

//! HTTP client utilities.

use std::ops::Deref;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{AppError, Result};
use crate::models::EnumeratorConfig;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &EnumeratorConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .map_err(|e| AppError::config(format!("invalid accept_language: {e}")))?,
    );
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// A fixed set of HTTP clients shared by the enumerator's workers.
///
/// Each client keeps its own connection pool, so a worker holding a session
/// reuses warm connections across the UIDs of its batch.
pub struct SessionPool {
    sessions: Mutex<Vec<Client>>,
    permits: Arc<Semaphore>,
}

impl SessionPool {
    /// Build `size` clients from `config`.
    pub fn new(config: &EnumeratorConfig, size: usize) -> Result<Self> {
        let sessions = (0..size.max(1))
            .map(|_| create_client(config))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_clients(sessions))
    }

    /// Wrap already-built clients.
    pub fn from_clients(sessions: Vec<Client>) -> Self {
        let permits = Arc::new(Semaphore::new(sessions.len()));
        Self {
            sessions: Mutex::new(sessions),
            permits,
        }
    }

    /// Number of sessions currently idle.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Wait for an idle session.
    pub async fn checkout(&self) -> Result<PooledSession<'_>> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| AppError::config(format!("session pool closed: {e}")))?;

        let client = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or_else(|| AppError::config("session pool is empty"))?;

        Ok(PooledSession {
            pool: self,
            client,
            _permit: permit,
        })
    }

    fn give_back(&self, client: Client) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(client);
    }
}

/// A checked-out session; returned to the pool on drop.
pub struct PooledSession<'a> {
    pool: &'a SessionPool,
    client: Client,
    // Dropped after the client is pushed back.
    _permit: OwnedSemaphorePermit,
}

impl Deref for PooledSession<'_> {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

impl Drop for PooledSession<'_> {
    fn drop(&mut self) {
        // Clients are handles onto shared state; the clone is the same session.
        self.pool.give_back(self.client.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_default_config() {
        assert!(create_client(&EnumeratorConfig::default()).is_ok());
    }

    #[test]
    fn test_create_client_rejects_bad_header() {
        let mut config = EnumeratorConfig::default();
        config.accept_language = "bad\nvalue".to_string();
        assert!(create_client(&config).is_err());
    }

    #[tokio::test]
    async fn test_checkout_returns_session_on_drop() {
        let pool = SessionPool::new(&EnumeratorConfig::default(), 2).unwrap();
        assert_eq!(pool.available(), 2);

        let first = pool.checkout().await.unwrap();
        let second = pool.checkout().await.unwrap();
        assert_eq!(pool.available(), 0);

        drop(first);
        assert_eq!(pool.available(), 1);
        drop(second);
        assert_eq!(pool.available(), 2);

        let _again = pool.checkout().await.unwrap();
        assert_eq!(pool.available(), 1);
    }
}
