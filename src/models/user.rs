//! User profile record produced by the enumerator.

use serde::{Deserialize, Serialize};

/// A profile scraped from one `/user/<uid>` page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserRecord {
    /// Zero-padded site UID
    pub uid: String,

    /// Account name (page title or first heading)
    pub username: String,

    /// Display nickname, empty if the profile has none
    pub nickname: String,

    /// Contact email, empty if none could be recovered
    pub email: String,
}

impl UserRecord {
    /// Whether the username or nickname contains `marker`.
    ///
    /// An empty marker never matches.
    pub fn is_blocked(&self, marker: &str) -> bool {
        !marker.is_empty() && (self.username.contains(marker) || self.nickname.contains(marker))
    }

    /// Format the record for display using a template.
    ///
    /// Supported placeholders: `{uid}`, `{username}`, `{nickname}`, `{email}`.
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{uid}", &self.uid)
            .replace("{username}", &self.username)
            .replace("{nickname}", &self.nickname)
            .replace("{email}", &self.email)
    }
}
