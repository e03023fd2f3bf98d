//! Relation list codec.
//!
//! A question's attached answers (and an answer's nested replies) are kept
//! as an ordered list of ids packed into a single text column, e.g.
//! `"4, 9, 12"`. Order is attachment order. The codec never deduplicates;
//! callers that want set semantics check [`contains`] first.

use crate::types::DbId;

/// Separator written between ids.
pub const SEPARATOR: &str = ", ";

/// Encode ids in order. An empty slice encodes to the empty string.
pub fn encode(ids: &[DbId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Decode a stored list.
///
/// Splits on `,` and trims surrounding whitespace, so both `"1, 2"` and
/// `"1,2"` decode the same way. Blank input yields an empty vector.
/// Pieces that are not integers are dropped.
pub fn decode(raw: &str) -> Vec<DbId> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter_map(|piece| piece.parse::<DbId>().ok())
        .collect()
}

/// Append `id` to the end of the list.
pub fn append(raw: &str, id: DbId) -> String {
    let mut ids = decode(raw);
    ids.push(id);
    encode(&ids)
}

/// Remove the first occurrence of `id`.
///
/// Returns the re-encoded list and whether anything was removed, so a
/// caller can tell "not present" apart from "removed, list now empty".
pub fn remove(raw: &str, id: DbId) -> (String, bool) {
    let mut ids = decode(raw);
    match ids.iter().position(|&existing| existing == id) {
        Some(index) => {
            ids.remove(index);
            (encode(&ids), true)
        }
        None => (encode(&ids), false),
    }
}

/// Drop every occurrence of every id in `ids`.
pub fn remove_all(raw: &str, ids: &[DbId]) -> String {
    let kept: Vec<DbId> = decode(raw)
        .into_iter()
        .filter(|id| !ids.contains(id))
        .collect();
    encode(&kept)
}

/// Whether `id` appears anywhere in the list.
pub fn contains(raw: &str, id: DbId) -> bool {
    decode(raw).contains(&id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_joins_with_separator() {
        assert_eq!(encode(&[4, 9, 12]), "4, 9, 12");
    }

    #[test]
    fn encode_empty_is_empty_string() {
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn decode_blank_is_empty() {
        assert!(decode("").is_empty());
        assert!(decode("   ").is_empty());
    }

    #[test]
    fn decode_preserves_order() {
        assert_eq!(decode("3, 1, 2"), vec![3, 1, 2]);
    }

    #[test]
    fn decode_accepts_missing_spaces() {
        assert_eq!(decode("3,1 ,  2"), vec![3, 1, 2]);
    }

    #[test]
    fn decode_skips_garbage_pieces() {
        assert_eq!(decode("1, x, , 2"), vec![1, 2]);
    }

    #[test]
    fn round_trip_keeps_order_and_duplicates() {
        let cases: [&[DbId]; 4] = [&[], &[0], &[7, 7, 3], &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]];
        for ids in cases {
            assert_eq!(decode(&encode(ids)), ids.to_vec());
        }
    }

    #[test]
    fn append_does_not_deduplicate() {
        let raw = append("5", 5);
        assert_eq!(raw, "5, 5");
    }

    #[test]
    fn append_to_empty() {
        assert_eq!(append("", 42), "42");
    }

    #[test]
    fn remove_undoes_append() {
        let original = encode(&[1, 2, 3]);
        let appended = append(&original, 99);
        assert_eq!(remove(&appended, 99), (original, true));
    }

    #[test]
    fn remove_only_first_match() {
        assert_eq!(remove("4, 8, 4", 4), ("8, 4".to_string(), true));
    }

    #[test]
    fn remove_missing_reports_not_found() {
        assert_eq!(remove("1, 2", 3), ("1, 2".to_string(), false));
    }

    #[test]
    fn remove_last_leaves_empty_but_found() {
        assert_eq!(remove("7", 7), (String::new(), true));
    }

    #[test]
    fn remove_all_drops_every_occurrence() {
        assert_eq!(remove_all("4, 8, 4, 2, 9", &[4, 9]), "8, 2");
        assert_eq!(remove_all("1, 2", &[]), "1, 2");
        assert_eq!(remove_all("3", &[3]), "");
    }

    #[test]
    fn contains_checks_membership() {
        assert!(contains("1, 22, 3", 22));
        assert!(!contains("1, 22, 3", 2));
        assert!(!contains("", 1));
    }
}
