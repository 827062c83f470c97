// src/utils/report.rs

//! Operator-facing console output with server-style formatting.
//!
//! Diagnostics go through the `log` facade; this module prints the
//! run banners, summaries and table previews an operator reads to verify a
//! conversion.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use unicode_segmentation::UnicodeSegmentation;

/// Suppresses all report output when set.
static QUIET: AtomicBool = AtomicBool::new(false);

/// Widest a preview cell may get, in grapheme clusters.
const PREVIEW_CELL_WIDTH: usize = 16;

/// Enable or disable report output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn enabled() -> bool {
    !QUIET.load(Ordering::Relaxed)
}

/// Format a line with timestamp and tag.
fn format_line(tag: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, tag, message)
}

fn emit(tag: &str, message: &str) {
    if enabled() {
        println!("{}", format_line(tag, message));
    }
}

/// Print a plain informational line.
pub fn line(message: &str) {
    emit("INFO", message);
}

/// Print a success line.
pub fn success(message: &str) {
    emit("INFO", &format!("✓ {}", message));
}

/// Print a failure line.
pub fn failure(message: &str) {
    emit("ERROR", &format!("✗ {}", message));
}

/// Print a banner.
pub fn header(title: &str) {
    let border = "═".repeat(60);
    emit("INFO", &border);
    emit("INFO", &format!("  {}", title));
    emit("INFO", &border);
}

/// Print an indented sub-item.
pub fn sub_item(message: &str) {
    emit("INFO", &format!("    {}", message));
}

/// Print a summary section.
pub fn summary(title: &str, items: &[(&str, String)]) {
    if !enabled() {
        return;
    }
    println!();
    emit("SUMMARY", title);
    for (key, value) in items {
        emit("SUMMARY", &format!("    {}: {}", key, value));
    }
}

/// Print the first `limit` rows of a table.
pub fn preview(title: &str, headers: &[String], rows: &[Vec<String>], limit: usize) {
    if !enabled() || limit == 0 {
        return;
    }
    emit("PREVIEW", title);
    for line in preview_lines(headers, rows, limit) {
        emit("PREVIEW", &line);
    }
}

/// Render preview lines: the header followed by up to `limit` rows.
pub fn preview_lines(headers: &[String], rows: &[Vec<String>], limit: usize) -> Vec<String> {
    std::iter::once(headers)
        .chain(rows.iter().take(limit).map(Vec::as_slice))
        .map(|cells| {
            cells
                .iter()
                .map(|cell| truncate(cell, PREVIEW_CELL_WIDTH))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .collect()
}

/// Percentage of `part` in `whole` with one decimal, `"0.0%"` for an empty whole.
pub fn percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

/// Cut `text` to at most `max` grapheme clusters, marking the cut with `…`.
fn truncate(text: &str, max: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max {
        return text.to_string();
    }
    let mut out: String = graphemes[..max.saturating_sub(1)].concat();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), "33.3%");
        assert_eq!(percent(2, 2), "100.0%");
        assert_eq!(percent(0, 0), "0.0%");
    }

    #[test]
    fn test_truncate_counts_graphemes() {
        assert_eq!(truncate("学号", 16), "学号");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("一二三四五", 3), "一二…");
    }

    #[test]
    fn test_preview_lines_limits_rows() {
        let headers = strings(&["Student_ID", "Score"]);
        let rows = vec![
            strings(&["0000000042", "95"]),
            strings(&["0000000043", "88"]),
            strings(&["0000000044", "70"]),
        ];

        let lines = preview_lines(&headers, &rows, 2);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Student_ID | Score");
        assert_eq!(lines[2], "0000000043 | 88");
    }

    #[test]
    fn test_format_line_shape() {
        let line = format_line("INFO", "hello");
        assert!(line.starts_with('['));
        assert!(line.ends_with("[INFO] hello"));
    }
}
