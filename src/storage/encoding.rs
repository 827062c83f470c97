//! Text decoding for roster exports of unknown encoding.
//!
//! Rosters exported from Chinese-locale spreadsheets are often GBK rather
//! than UTF-8. Decoding walks a fixed ladder of encodings and keeps the
//! first one that decodes the whole file without error.

use encoding_rs::{Encoding, UTF_8};

/// Encodings tried in order.
pub const FALLBACK_LABELS: [&str; 4] = ["utf-8", "gbk", "gb2312", "utf-8-sig"];

const BOM: &str = "\u{feff}";

/// Decode `bytes` with the first encoding in [`FALLBACK_LABELS`] that fits.
///
/// Returns the text (without any leading BOM) and the label that worked.
pub fn decode_with_fallback(bytes: &[u8]) -> Option<(String, &'static str)> {
    FALLBACK_LABELS
        .iter()
        .find_map(|&label| decode_as(bytes, label).map(|text| (text, label)))
}

/// Decode `bytes` strictly as the encoding named by `label`.
pub fn decode_as(bytes: &[u8], label: &str) -> Option<String> {
    if label == "utf-8-sig" {
        let body = bytes.strip_prefix(BOM.as_bytes()).unwrap_or(bytes);
        return decode_strict(UTF_8, body);
    }

    // encoding_rs maps "gb2312" onto its GBK decoder, a superset.
    let encoding = Encoding::for_label(label.as_bytes())?;
    decode_strict(encoding, bytes).map(strip_bom)
}

/// Decode strict UTF-8, dropping a leading BOM if present.
pub fn decode_utf8(bytes: &[u8]) -> Option<String> {
    decode_strict(UTF_8, bytes).map(strip_bom)
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::GBK;

    const ROSTER: &str = "姓名,学号,电话\n李雷,0000000042,123\n";

    #[test]
    fn test_utf8_first() {
        let (text, label) = decode_with_fallback(ROSTER.as_bytes()).unwrap();
        assert_eq!(text, ROSTER);
        assert_eq!(label, "utf-8");
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = format!("{BOM}{ROSTER}");
        let (text, label) = decode_with_fallback(bytes.as_bytes()).unwrap();
        assert_eq!(text, ROSTER);
        assert_eq!(label, "utf-8");
    }

    #[test]
    fn test_gbk_fallback() {
        let (encoded, _, had_errors) = GBK.encode(ROSTER);
        assert!(!had_errors);
        assert!(std::str::from_utf8(&encoded).is_err());

        let (text, label) = decode_with_fallback(&encoded).unwrap();
        assert_eq!(text, ROSTER);
        assert_eq!(label, "gbk");
    }

    #[test]
    fn test_decode_utf8_rejects_gbk() {
        let (encoded, _, _) = GBK.encode(ROSTER);
        assert!(decode_utf8(&encoded).is_none());
    }

    #[test]
    fn test_gb2312_label_resolves() {
        let (encoded, _, _) = GBK.encode("学号");
        assert_eq!(decode_as(&encoded, "gb2312").as_deref(), Some("学号"));
    }
}
