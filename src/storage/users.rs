//! Enumerator output file.
//!
//! The whole buffer is rewritten on every save. Writes go to `<path>.tmp`
//! first and are renamed over the target, so an interrupted save never
//! leaves a truncated CSV behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::UserRecord;

/// CSV header written to every users file.
pub const USER_HEADER: [&str; 4] = ["uid", "username", "nickname", "email"];

/// CSV-backed store for [`UserRecord`]s.
#[derive(Debug, Clone)]
pub struct UserCsvStore {
    path: PathBuf,
}

impl UserCsvStore {
    /// Create a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while a save is in progress.
    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Replace the file contents with `users`. An empty slice is a no-op.
    pub async fn save(&self, users: &[UserRecord]) -> Result<()> {
        if users.is_empty() {
            return Ok(());
        }

        let bytes = encode_users(users)?;
        let tmp = self.temp_path();

        if let Err(e) = self.write_atomic(&tmp, &bytes).await {
            log::error!("Failed to save {}: {}", self.path.display(), e);
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }

    async fn write_atomic(&self, tmp: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(tmp, &self.path).await?;
        Ok(())
    }

    /// Read every record back from the file.
    pub async fn load(&self) -> Result<Vec<UserRecord>> {
        let bytes = tokio::fs::read(&self.path).await?;
        decode_users(&bytes)
    }
}

/// Serialize records with the standard header.
fn encode_users(users: &[UserRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for user in users {
        writer.serialize(user)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

fn decode_users(bytes: &[u8]) -> Result<Vec<UserRecord>> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers = reader.headers()?.clone();
    if headers.iter().ne(USER_HEADER) {
        return Err(AppError::validation(format!(
            "unexpected users header: {:?}",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    reader
        .deserialize()
        .map(|record| record.map_err(AppError::from))
        .collect()
}
