//! Word-set text index for duplicate and topic-overlap detection.
//!
//! Text is reduced to an order-independent set of lower-cased ASCII
//! alphanumeric words. Sets are compared by overlap; there is no ranking
//! beyond the Jaccard ratio.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::DbId;

/// Default minimum Jaccard similarity for a question to count as similar.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Normalized token set. `BTreeSet` keeps serialization order stable.
pub type TokenSet = BTreeSet<String>;

/// Tokenize free text.
///
/// Every character that is not an ASCII letter, digit, or whitespace is
/// dropped (so `"don't"` becomes `"dont"`), the rest is lower-cased and
/// split on runs of whitespace.
pub fn tokenize(text: &str) -> TokenSet {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();

    cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Token set of a question: title and body together.
pub fn question_tokens(title: &str, body: &str) -> TokenSet {
    let mut tokens = tokenize(title);
    tokens.extend(tokenize(body));
    tokens
}

/// Number of tokens present in both sets.
pub fn overlap(a: &TokenSet, b: &TokenSet) -> usize {
    a.intersection(b).count()
}

/// Whether every token of `needle` is present in `haystack`.
pub fn contains_all(haystack: &TokenSet, needle: &TokenSet) -> bool {
    needle.is_subset(haystack)
}

/// Jaccard similarity `|a ∩ b| / |a ∪ b|` in `[0.0, 1.0]`.
///
/// Two empty sets score `0.0`: empty text carries no topic.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    overlap(a, b) as f64 / union as f64
}

/// A candidate whose token set overlaps the draft enough to be reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMatch {
    pub id: DbId,
    pub similarity: f64,
    pub shared_tokens: usize,
    /// Every draft token already appears in the candidate.
    pub covers_draft: bool,
}

/// Rank `candidates` by similarity to `draft`, keeping those at or above
/// `threshold`. Highest similarity first; ties keep candidate order.
pub fn find_similar(
    draft: &TokenSet,
    candidates: &[(DbId, TokenSet)],
    threshold: f64,
) -> Vec<SimilarMatch> {
    let mut matches: Vec<SimilarMatch> = candidates
        .iter()
        .filter_map(|(id, tokens)| {
            let similarity = jaccard(draft, tokens);
            (similarity > 0.0 && similarity >= threshold).then(|| SimilarMatch {
                id: *id,
                similarity,
                shared_tokens: overlap(draft, tokens),
                covers_draft: contains_all(tokens, draft),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    matches
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
