//! Tabular grade export data.

/// A CSV table held as strings: one header row plus data rows.
///
/// Rows are not required to match the header length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl GradeTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `(row, column)`, or `""` when the row is short.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse a hash cell the way spreadsheet exports write integers.
///
/// Accepts surrounding whitespace, a leading `+`, and floats with no
/// fractional part (`"123.0"`). Returns the integer value, which may lie
/// outside the `u32` range.
pub fn parse_hash_cell(cell: &str) -> Option<i64> {
    let trimmed = cell.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if let Ok(value) = unsigned.parse::<i64>() {
        return Some(value);
    }

    let float: f64 = unsigned.parse().ok()?;
    if float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        Some(float as i64)
    } else {
        None
    }
}

/// Narrow a parsed hash cell to a 32-bit hash, if it can be one.
pub fn as_hash(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hash_cell() {
        assert_eq!(parse_hash_cell("3296099619"), Some(3_296_099_619));
        assert_eq!(parse_hash_cell("  17 "), Some(17));
        assert_eq!(parse_hash_cell("+17"), Some(17));
        assert_eq!(parse_hash_cell("-5"), Some(-5));
        assert_eq!(parse_hash_cell("123.0"), Some(123));
        assert_eq!(parse_hash_cell("123.5"), None);
        assert_eq!(parse_hash_cell("abc"), None);
        assert_eq!(parse_hash_cell(""), None);
        assert_eq!(parse_hash_cell("nan"), None);
    }

    #[test]
    fn test_as_hash() {
        assert_eq!(as_hash(17), Some(17));
        assert_eq!(as_hash(-1), None);
        assert_eq!(as_hash(1 << 40), None);
    }

    #[test]
    fn test_table_lookup() {
        let table = GradeTable::new(
            vec!["Hashed ID".into(), "Score".into()],
            vec![vec!["1".into(), "95".into()], vec!["2".into()]],
        );
        assert_eq!(table.column_index("Score"), Some(1));
        assert_eq!(table.column_index("Missing"), None);
        assert_eq!(table.cell(0, 1), "95");
        assert_eq!(table.cell(1, 1), "");
        assert_eq!(table.len(), 2);
    }
}
