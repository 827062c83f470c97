//! Roster-side data: students and the email join maps.

use std::collections::{BTreeMap, HashMap};

/// `student_id → email`, loaded from the institution's roster export.
///
/// Ordered by student ID so hash-table construction is deterministic.
pub type StudentEmailMap = BTreeMap<String, String>;

/// `email → uid`, loaded from the enumerator's output.
pub type UidEmailMap = HashMap<String, String>;

/// One roster entry for the padded-ID matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    pub student_id: String,
    pub phone: String,
}

impl Student {
    /// Build a student from a CSV row (`name, student_id, phone, ...`).
    ///
    /// Returns `None` for rows with fewer than three columns.
    pub fn from_row(row: &[String]) -> Option<Self> {
        match row {
            [name, student_id, phone, ..] => Some(Self {
                name: name.clone(),
                student_id: student_id.clone(),
                phone: phone.clone(),
            }),
            _ => None,
        }
    }
}

/// Whether a cell plausibly holds an email address.
pub fn looks_like_email(value: &str) -> bool {
    value.contains('@')
}
