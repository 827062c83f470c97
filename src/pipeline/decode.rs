// src/pipeline/decode.rs

//! Grade decoding pipeline.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::DecoderConfig;
use crate::services::DecodeReport;
use crate::services::decoder::{self, HashTable};
use crate::storage::{read_table, write_table};
use crate::utils::report;

/// Input files for a decoding run.
#[derive(Debug, Clone, Copy)]
pub struct DecodeInputs<'a> {
    pub grades: &'a Path,
    pub roster: &'a Path,
    pub uid_emails: &'a Path,
}

impl DecodeInputs<'_> {
    /// Fail on the first input that does not exist.
    pub fn check(&self) -> Result<()> {
        for (role, path) in [
            ("grade", self.grades),
            ("roster", self.roster),
            ("uid-email", self.uid_emails),
        ] {
            if !path.exists() {
                return Err(AppError::missing_input(role, path));
            }
        }
        Ok(())
    }
}

/// Decode hashed grades into student IDs and write the result to `output`.
pub fn run_decoder(
    inputs: DecodeInputs<'_>,
    output: &Path,
    config: &DecoderConfig,
) -> Result<DecodeReport> {
    inputs.check()?;
    report::header("Grade Decoding");

    let students = decoder::read_student_emails(inputs.roster, config)?;
    if students.is_empty() {
        return Err(AppError::mapping(format!(
            "no student emails found in {}",
            inputs.roster.display()
        )));
    }
    report::sub_item(&format!("Students with email: {}", students.len()));

    let uids = decoder::read_uid_emails(inputs.uid_emails, config)?;
    if uids.is_empty() {
        return Err(AppError::mapping(format!(
            "no UID emails found in {}",
            inputs.uid_emails.display()
        )));
    }
    report::sub_item(&format!("Users with email: {}", uids.len()));

    let hashes = HashTable::build(&students, &uids);
    if hashes.is_empty() {
        return Err(AppError::mapping(
            "no student email matches any UID email",
        ));
    }
    report::sub_item(&format!("Hash mappings: {}", hashes.len()));
    if hashes.collisions() > 0 {
        log::warn!("{} hash collisions, later students won", hashes.collisions());
    }

    let grades = read_table(inputs.grades)?;
    let result = decoder::decode_grades(&grades, &hashes, &config.decoded_column);

    write_table(output, &result.table.headers, &result.table.rows, true)?;
    report::success(&format!("Decoded grades written to {}", output.display()));

    report::summary(
        "Decoding Summary",
        &[
            ("Rows", result.total().to_string()),
            ("Converted", result.converted.to_string()),
            ("Unknown", result.unknown.to_string()),
            ("Invalid", result.invalid.to_string()),
            ("Hash collisions", hashes.collisions().to_string()),
            ("Success rate", report::percent(result.converted, result.total())),
        ],
    );
    report::preview(
        "Preview",
        &result.table.headers,
        &result.table.rows,
        config.preview_rows,
    );

    Ok(result)
}
