// src/pipeline/match_grades.rs

//! Roster/grade matching pipeline.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::MatcherConfig;
use crate::services::MatchReport;
use crate::services::matcher;
use crate::storage::{read_table, write_table};
use crate::utils::report;

/// Match a student roster against hashed grades and write the merged rows.
///
/// Nothing is written when no student matches.
pub fn run_matcher(
    students_path: &Path,
    grades_path: &Path,
    output: &Path,
    config: &MatcherConfig,
) -> Result<MatchReport> {
    for (role, path) in [("student", students_path), ("grades", grades_path)] {
        if !path.exists() {
            return Err(AppError::missing_input(role, path));
        }
    }

    report::header("Grade Matching");

    let students = matcher::read_students(students_path)?;
    report::sub_item(&format!("Students: {}", students.len()));

    let grades = read_table(grades_path)?;
    report::sub_item(&format!("Grade rows: {}", grades.len()));

    let result = matcher::match_students(&students, &grades, config)?;
    if result.matched == 0 {
        report::failure("No student matched any grade row");
        return Err(AppError::NoMatches);
    }

    write_table(output, &result.headers, &result.rows, true)?;
    report::success(&format!("Matched rows written to {}", output.display()));

    report::summary(
        "Matching Summary",
        &[
            ("Students", result.total.to_string()),
            ("Matched", result.matched.to_string()),
            ("Unmatched", result.unmatched().to_string()),
            ("Match rate", report::percent(result.matched, result.total)),
        ],
    );
    report::preview("Preview", &result.headers, &result.rows, config.preview_rows);

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::padded_id_hash;
    use crate::storage::read_rows;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_end_to_end_gbk_roster() {
        report::set_quiet(true);
        let dir = TempDir::new().unwrap();
        let students = dir.path().join("students.csv");
        let grades = dir.path().join("grades.csv");
        let output = dir.path().join("results.csv");

        let (roster, _, _) =
            encoding_rs::GBK.encode("姓名,学号,电话\n李,0000000042,123\n王,43,456\n");
        fs::write(&students, roster).unwrap();
        fs::write(
            &grades,
            format!("Hashed ID,Score\n{},95\n", padded_id_hash("0000000042")),
        )
        .unwrap();

        let result = run_matcher(&students, &grades, &output, &MatcherConfig::default()).unwrap();
        assert_eq!(result.matched, 1);
        assert_eq!(result.total, 2);

        let rows = read_rows(&output).unwrap();
        assert_eq!(rows[0], vec!["姓名", "学号", "电话", "Score"]);
        assert_eq!(rows[1], vec!["李", "0000000042", "123", "95"]);
    }

    #[test]
    fn test_zero_matches_writes_nothing() {
        report::set_quiet(true);
        let dir = TempDir::new().unwrap();
        let students = dir.path().join("students.csv");
        let grades = dir.path().join("grades.csv");
        let output = dir.path().join("results.csv");

        fs::write(&students, "name,id,phone\nLi,1,123\n").unwrap();
        fs::write(&grades, "Hashed ID,Score\n5,95\n").unwrap();

        let err = run_matcher(&students, &grades, &output, &MatcherConfig::default()).unwrap_err();
        assert!(matches!(err, AppError::NoMatches));
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_grades_file() {
        let dir = TempDir::new().unwrap();
        let students = dir.path().join("students.csv");
        fs::write(&students, "name,id,phone\n").unwrap();

        let err = run_matcher(
            &students,
            &dir.path().join("grades.csv"),
            &dir.path().join("out.csv"),
            &MatcherConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::MissingInput { ref role, .. } if role == "grades"));
    }
}
