// src/services/matcher.rs

//! Padded-ID roster matching.
//!
//! Unlike the decoder, no UID join is involved: each student's own ID is
//! zero-padded and hashed, then looked up in the grade export's hash column.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{AppError, Result};
use crate::hashing::padded_id_hash_with_width;
use crate::models::{GradeTable, MatcherConfig, Student, as_hash, parse_hash_cell};
use crate::storage::read_rows_with_fallback;

/// Leading output columns: name, student ID, phone.
pub const ROSTER_HEADERS: [&str; 3] = ["姓名", "学号", "电话"];

/// Load students from a roster of unknown encoding, skipping the header.
pub fn read_students(path: &Path) -> Result<Vec<Student>> {
    let rows = read_rows_with_fallback(path)?;
    Ok(rows.iter().skip(1).filter_map(|row| Student::from_row(row)).collect())
}

/// Matched rows plus counters.
#[derive(Debug, Default)]
pub struct MatchReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub matched: usize,
    pub total: usize,
}

impl MatchReport {
    pub fn unmatched(&self) -> usize {
        self.total - self.matched
    }
}

/// Attach each student's grade row, dropping students without one.
///
/// Fails if the grade table has no `hash_column`.
pub fn match_students(
    students: &[Student],
    grades: &GradeTable,
    config: &MatcherConfig,
) -> Result<MatchReport> {
    let hash_index = grades.column_index(&config.hash_column).ok_or_else(|| {
        AppError::validation(format!(
            "grades file has no '{}' column",
            config.hash_column
        ))
    })?;

    let grade_columns: Vec<usize> = grades
        .headers
        .iter()
        .enumerate()
        .filter(|(_, header)| **header != config.hash_column)
        .map(|(i, _)| i)
        .collect();

    // First row wins for duplicate hashes.
    let mut by_hash: HashMap<u32, usize> = HashMap::new();
    for row in 0..grades.len() {
        if let Some(hash) = parse_hash_cell(grades.cell(row, hash_index)).and_then(as_hash) {
            by_hash.entry(hash).or_insert(row);
        }
    }

    let mut report = MatchReport {
        headers: ROSTER_HEADERS
            .iter()
            .map(|h| h.to_string())
            .chain(grade_columns.iter().map(|&i| grades.headers[i].clone()))
            .collect(),
        total: students.len(),
        ..MatchReport::default()
    };

    for student in students {
        let hash = padded_id_hash_with_width(&student.student_id, config.id_width);

        let Some(&row) = by_hash.get(&hash) else {
            log::info!(
                "No match: {} ({}) -> hash {}",
                student.name,
                student.student_id,
                hash
            );
            continue;
        };

        log::info!(
            "Matched: {} ({}) -> hash {}",
            student.name,
            student.student_id,
            hash
        );
        report.matched += 1;

        let mut out = vec![
            student.name.clone(),
            student.student_id.clone(),
            student.phone.clone(),
        ];
        out.extend(grade_columns.iter().map(|&i| grades.cell(row, i).to_string()));
        report.rows.push(out);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::padded_id_hash;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn student(name: &str, id: &str, phone: &str) -> Student {
        Student {
            name: name.to_string(),
            student_id: id.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let hash = padded_id_hash("0000000042").to_string();
        let grades = GradeTable::new(
            strings(&["Hashed ID", "Score"]),
            vec![strings(&[hash.as_str(), "95"])],
        );

        let report = match_students(
            &[student("Li", "0000000042", "123")],
            &grades,
            &MatcherConfig::default(),
        )
        .unwrap();

        assert_eq!(report.headers, strings(&["姓名", "学号", "电话", "Score"]));
        assert_eq!(report.rows, vec![strings(&["Li", "0000000042", "123", "95"])]);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched(), 0);
    }

    #[test]
    fn test_short_ids_are_padded() {
        let hash = padded_id_hash("42").to_string();
        let grades = GradeTable::new(
            strings(&["Score", "Hashed ID", "Rank"]),
            vec![strings(&["88", hash.as_str(), "3"])],
        );

        let report = match_students(
            &[student("Li", "42", "123"), student("Wang", "43", "456")],
            &grades,
            &MatcherConfig::default(),
        )
        .unwrap();

        assert_eq!(report.headers, strings(&["姓名", "学号", "电话", "Score", "Rank"]));
        assert_eq!(report.rows, vec![strings(&["Li", "42", "123", "88", "3"])]);
        assert_eq!(report.matched, 1);
        assert_eq!(report.unmatched(), 1);
    }

    #[test]
    fn test_first_duplicate_row_wins() {
        let hash = padded_id_hash("7").to_string();
        let grades = GradeTable::new(
            strings(&["Hashed ID", "Score"]),
            vec![
                strings(&["junk", "0"]),
                strings(&[hash.as_str(), "60"]),
                strings(&[hash.as_str(), "99"]),
            ],
        );

        let report =
            match_students(&[student("Zhao", "7", "")], &grades, &MatcherConfig::default())
                .unwrap();
        assert_eq!(report.rows[0][3], "60");
    }

    #[test]
    fn test_missing_hash_column() {
        let grades = GradeTable::new(strings(&["hash", "Score"]), vec![]);
        let result = match_students(&[], &grades, &MatcherConfig::default());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
