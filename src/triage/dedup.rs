//! Near-duplicate detection over token sets.
//!
//! Reports about the same incident tend to be re-sent with small wording
//! changes ("we r at" / "we are at").  Token *presence* is compared, not
//! frequency or order.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Jaccard similarity at or above which a report counts as a duplicate.
pub const DUPLICATE_THRESHOLD: f64 = 0.65;

/// Tokens this short carry no signal ("we", "at", "12").
const MIN_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateVerdict {
    pub is_duplicate: bool,
    /// Rounded percent, `0` when not a duplicate.
    pub similarity: u8,
    pub match_id: Option<u64>,
}

impl DuplicateVerdict {
    pub fn novel() -> Self {
        Self {
            is_duplicate: false,
            similarity: 0,
            match_id: None,
        }
    }
}

/// Lowercase, keep ASCII alphanumerics and whitespace, split, drop short
/// tokens.
pub fn tokenize(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| t.len() >= MIN_TOKEN_LEN)
        .map(str::to_owned)
        .collect()
}

/// `|A ∩ B| / |A ∪ B|`, defined as `0.0` when both sets are empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Compare `candidate` against `corpus` in the given order and report the
/// first entry at or above [`DUPLICATE_THRESHOLD`].
///
/// First match, not best match: with a reordered corpus a different
/// `match_id` may come back.
pub fn check_duplicate<'a, I>(candidate: &str, corpus: I) -> DuplicateVerdict
where
    I: IntoIterator<Item = (u64, &'a str)>,
{
    let candidate_tokens = tokenize(candidate);

    for (id, text) in corpus {
        let similarity = jaccard(&candidate_tokens, &tokenize(text));
        if similarity >= DUPLICATE_THRESHOLD {
            debug!("Dedup: matches #{id} at {similarity:.2}");
            return DuplicateVerdict {
                is_duplicate: true,
                similarity: (similarity * 100.0).round() as u8,
                match_id: Some(id),
            };
        }
    }

    DuplicateVerdict::novel()
}
