// src/services/decoder.rs

//! Pair-hash grade decoding.
//!
//! A grade export identifies students by `pair_hash(student_id, uid)`. The
//! roster links student IDs to emails and the enumerator output links emails
//! to UIDs; joining the two on email recovers every hash that can be
//! recovered.

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;
use crate::hashing::pair_hash;
use crate::models::{
    DecoderConfig, GradeTable, StudentEmailMap, UidEmailMap, as_hash, looks_like_email,
    parse_hash_cell,
};
use crate::storage::read_rows;

/// Load `student_id → email` from a roster export.
///
/// The first row is a header. The email sits at a fixed column and the
/// student ID in the last column; short rows and rows without a usable
/// email are skipped.
pub fn read_student_emails(path: &Path, config: &DecoderConfig) -> Result<StudentEmailMap> {
    let rows = read_rows(path)?;
    Ok(student_emails_from_rows(&rows, config))
}

fn student_emails_from_rows(rows: &[Vec<String>], config: &DecoderConfig) -> StudentEmailMap {
    rows.iter()
        .skip(1)
        .filter(|row| row.len() >= config.roster_min_columns)
        .filter_map(|row| {
            let student_id = row.last()?.trim();
            let email = row.get(config.roster_email_column)?.trim();
            (!student_id.is_empty() && looks_like_email(email))
                .then(|| (student_id.to_string(), email.to_string()))
        })
        .collect()
}

/// Load `email → uid` from a UID-email file such as the enumerator's output.
pub fn read_uid_emails(path: &Path, config: &DecoderConfig) -> Result<UidEmailMap> {
    let rows = read_rows(path)?;
    Ok(uid_emails_from_rows(&rows, config))
}

fn uid_emails_from_rows(rows: &[Vec<String>], config: &DecoderConfig) -> UidEmailMap {
    rows.iter()
        .skip(1)
        .filter_map(|row| {
            let uid = row.get(config.uid_column)?.trim();
            let email = row.get(config.uid_email_column)?.trim();
            (!uid.is_empty() && looks_like_email(email))
                .then(|| (email.to_string(), uid.to_string()))
        })
        .collect()
}

/// `pair_hash → student_id` lookup.
///
/// Collisions are not resolved: a later student overwrites an earlier one
/// with the same hash. They are counted so the operator can see them.
#[derive(Debug, Default)]
pub struct HashTable {
    entries: HashMap<u32, String>,
    collisions: usize,
}

impl HashTable {
    /// Join students and UIDs on email and hash every pair found.
    ///
    /// Students are visited in ascending student-ID order, not roster-file
    /// order, so on a collision the higher student ID wins.
    pub fn build(students: &StudentEmailMap, uids: &UidEmailMap) -> Self {
        let mut table = Self::default();

        for (student_id, email) in students {
            let Some(uid) = uids.get(email) else {
                continue;
            };

            let hash = pair_hash(student_id, uid);
            log::info!(
                "Student {}, UID {}, key {}{}, hash {}",
                student_id,
                uid,
                student_id,
                uid,
                hash
            );
            table.insert(hash, student_id.clone());
        }

        table
    }

    fn insert(&mut self, hash: u32, student_id: String) {
        if let Some(previous) = self.entries.insert(hash, student_id) {
            if self.entries.get(&hash) != Some(&previous) {
                self.collisions += 1;
                log::warn!(
                    "Hash {} collides: student {} replaced by {}",
                    hash,
                    previous,
                    self.entries[&hash]
                );
            }
        }
    }

    pub fn get(&self, hash: u32) -> Option<&str> {
        self.entries.get(&hash).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries overwritten by a different student.
    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Converted grade table plus conversion counters.
#[derive(Debug, Default)]
pub struct DecodeReport {
    pub table: GradeTable,
    pub converted: usize,
    pub unknown: usize,
    pub invalid: usize,
}

impl DecodeReport {
    pub fn total(&self) -> usize {
        self.converted + self.unknown + self.invalid
    }
}

/// Replace the hash in each grade row's first column with a student ID.
///
/// The ID goes into a new first column named `decoded_column`; every
/// original column follows unchanged. Unknown hashes become
/// `UNKNOWN_<cell>` and unparseable cells `INVALID_<cell>`, so the row
/// count always matches the input.
pub fn decode_grades(
    grades: &GradeTable,
    hashes: &HashTable,
    decoded_column: &str,
) -> DecodeReport {
    let mut report = DecodeReport::default();

    let mut headers = Vec::with_capacity(grades.headers.len() + 1);
    headers.push(decoded_column.to_string());
    headers.extend(grades.headers.iter().cloned());

    let rows = grades
        .rows
        .iter()
        .map(|row| {
            let cell = row.first().map(String::as_str).unwrap_or("");
            let decoded = match parse_hash_cell(cell) {
                Some(value) => match as_hash(value).and_then(|hash| hashes.get(hash)) {
                    Some(student_id) => {
                        report.converted += 1;
                        student_id.to_string()
                    }
                    None => {
                        report.unknown += 1;
                        format!("UNKNOWN_{cell}")
                    }
                },
                None => {
                    report.invalid += 1;
                    format!("INVALID_{cell}")
                }
            };

            let mut out = Vec::with_capacity(row.len() + 1);
            out.push(decoded);
            out.extend(row.iter().cloned());
            out
        })
        .collect();

    report.table = GradeTable::new(headers, rows);
    report
}
