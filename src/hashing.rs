// src/hashing.rs

//! FNV-1a (32-bit) hashing and the two student keying schemes built on it.
//!
//! Grade exports replace student identifiers with one of two hashes:
//!
//! - [`pair_hash`]: the student ID concatenated with the judge-site UID.
//! - [`padded_id_hash`]: the student ID alone, zero-padded to ten characters.
//!
//! Both share the FNV constants but are not interchangeable.

/// FNV-1a 32-bit offset basis.
pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
pub const FNV_PRIME: u32 = 16_777_619;

/// Width the roster matcher pads student IDs to.
pub const PADDED_ID_WIDTH: usize = 10;

/// Textbook FNV-1a over a byte slice.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Hash of `student_id` immediately followed by `uid`, no separator.
pub fn pair_hash(student_id: &str, uid: &str) -> u32 {
    let mut key = String::with_capacity(student_id.len() + uid.len());
    key.push_str(student_id);
    key.push_str(uid);
    fnv1a_32(key.as_bytes())
}

/// Hash of `student_id` left-padded with `'0'` to ten characters.
///
/// Characters past the tenth are ignored.
pub fn padded_id_hash(student_id: &str) -> u32 {
    padded_id_hash_with_width(student_id, PADDED_ID_WIDTH)
}

/// [`padded_id_hash`] with an explicit key width.
pub fn padded_id_hash_with_width(student_id: &str, width: usize) -> u32 {
    let padded = format!("{student_id:0>width$}");
    let key: String = padded
        .chars()
        .chain(std::iter::repeat('0'))
        .take(width)
        .collect();
    fnv1a_32(key.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_vectors() {
        assert_eq!(fnv1a_32(b""), 2_166_136_261);
        assert_eq!(fnv1a_32(b"a"), 0xe40c_292c);
        assert_eq!(fnv1a_32(b"a"), 3_826_002_220);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9c_f968);
    }

    #[test]
    fn test_pair_hash_is_plain_concatenation() {
        assert_eq!(
            pair_hash("2023533001", "0042"),
            fnv1a_32(b"20235330010042")
        );
        assert_eq!(pair_hash("", ""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_pair_hash_deterministic() {
        assert_eq!(pair_hash("2023533001", "17"), pair_hash("2023533001", "17"));
    }

    #[test]
    fn test_pair_hash_order_matters() {
        assert_ne!(pair_hash("2023533001", "0042"), pair_hash("0042", "2023533001"));
        assert_ne!(pair_hash("ab", "c"), pair_hash("c", "ab"));
    }

    #[test]
    fn test_padded_id_hash_ignores_original_length() {
        assert_eq!(padded_id_hash("7"), padded_id_hash("0000000007"));
        assert_eq!(padded_id_hash("42"), padded_id_hash("0000000042"));
        assert_eq!(padded_id_hash("0000000042"), fnv1a_32(b"0000000042"));
    }

    #[test]
    fn test_padded_id_hash_truncates_long_ids() {
        assert_eq!(padded_id_hash("12345678901234"), fnv1a_32(b"1234567890"));
    }

    #[test]
    fn test_padded_id_hash_counts_characters_not_bytes() {
        // Ten characters, eleven bytes.
        assert_ne!(padded_id_hash("20235330é1"), padded_id_hash("20235330é2"));
        assert_eq!(padded_id_hash("20235330é1"), fnv1a_32("20235330é1".as_bytes()));
        assert_eq!(padded_id_hash("é"), fnv1a_32("000000000é".as_bytes()));
        assert_eq!(padded_id_hash("20235330é1xyz"), fnv1a_32("20235330é1".as_bytes()));
    }

    #[test]
    fn test_padded_id_hash_empty() {
        assert_eq!(padded_id_hash(""), fnv1a_32(b"0000000000"));
    }

    #[test]
    fn test_schemes_differ() {
        assert_ne!(padded_id_hash("2023533001"), pair_hash("2023533001", "0042"));
    }

    #[test]
    fn test_custom_width() {
        assert_eq!(padded_id_hash_with_width("7", 4), fnv1a_32(b"0007"));
    }
}
