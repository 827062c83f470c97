//! Generic CSV table reading and writing for the batch tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::GradeTable;
use crate::storage::encoding::{decode_utf8, decode_with_fallback};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV text into rows of string cells. Row lengths may differ.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(AppError::from)
        })
        .collect()
}

/// Read a strict UTF-8 CSV file into rows.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path)?;
    let text = decode_utf8(&bytes).ok_or_else(|| AppError::encoding(path))?;
    parse_rows(&text)
}

/// Read a CSV file of unknown encoding into rows.
pub fn read_rows_with_fallback(path: &Path) -> Result<Vec<Vec<String>>> {
    let bytes = std::fs::read(path)?;
    let (text, label) = decode_with_fallback(&bytes).ok_or_else(|| AppError::encoding(path))?;
    log::debug!("Decoded {} as {}", path.display(), label);
    parse_rows(&text)
}

/// Read a UTF-8 CSV file whose first row is the header.
pub fn read_table(path: &Path) -> Result<GradeTable> {
    let mut rows = read_rows(path)?.into_iter();
    let headers = rows
        .next()
        .ok_or_else(|| AppError::validation(format!("{} is empty", path.display())))?;
    Ok(GradeTable::new(headers, rows.collect()))
}

/// Write a header and rows to `path`.
///
/// With `bom` set, the file starts with a UTF-8 byte order mark so that
/// spreadsheet software picks the right encoding.
pub fn write_table(
    path: &Path,
    headers: &[String],
    rows: &[Vec<String>],
    bom: bool,
) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    if bom {
        file.write_all(UTF8_BOM)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
