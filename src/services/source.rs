// src/services/source.rs

//! Where profile pages come from.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::EnumeratorConfig;
use crate::utils::http::SessionPool;
use crate::utils::profile_url;

/// Result of requesting one profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 404: no account with this UID
    NotFound,
    /// Any other non-200 status
    Status(u16),
    /// HTTP 200 with the page body
    Page(String),
}

/// Trait for profile page backends.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetch the profile page for a zero-padded UID.
    async fn fetch(&self, uid: &str) -> Result<FetchOutcome>;
}

/// Fetches profile pages over HTTP using a pool of sessions.
pub struct HttpProfileSource {
    base: Url,
    pool: SessionPool,
}

impl HttpProfileSource {
    /// Create a source with one session per worker.
    pub fn new(config: &EnumeratorConfig) -> Result<Self> {
        Ok(Self {
            base: config.profile_base()?,
            pool: SessionPool::new(config, config.workers)?,
        })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self, uid: &str) -> Result<FetchOutcome> {
        let url = profile_url(&self.base, uid)?;
        let session = self.pool.checkout().await?;

        let response = session
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(uid, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(FetchOutcome::NotFound),
            StatusCode::OK => {
                let body = response.text().await.map_err(|e| AppError::fetch(uid, e))?;
                Ok(FetchOutcome::Page(body))
            }
            status => Ok(FetchOutcome::Status(status.as_u16())),
        }
    }
}
