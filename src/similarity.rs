//! Fuzzy string similarity on a 0-100 scale.
//!
//! Built on normalized Levenshtein distance from `strsim`. The token-set
//! ratio is order-insensitive and treats one string's tokens being a subset
//! of the other's as a perfect match; the partial ratio slides the shorter
//! string across the longer one and keeps the best window score.

use std::collections::BTreeSet;

/// Plain similarity ratio between two strings, 0-100.
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Order-insensitive token-set ratio, 0-100.
///
/// Tokens are whitespace-separated. When the intersection covers one side
/// entirely the score is 100; otherwise the best of comparing the sorted
/// intersection against each side's full sorted token string.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 100.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    if !intersection.is_empty()
        && (intersection.len() == tokens_a.len() || intersection.len() == tokens_b.len())
    {
        return 100.0;
    }

    let joined = |set: &BTreeSet<&str>| set.iter().copied().collect::<Vec<_>>().join(" ");
    let sect = intersection.join(" ");
    let full_a = joined(&tokens_a);
    let full_b = joined(&tokens_b);

    let mut best = ratio(&full_a, &full_b);
    if !sect.is_empty() {
        best = best.max(ratio(&sect, &full_a));
        best = best.max(ratio(&sect, &full_b));
    }
    best
}

/// Best similarity of the shorter string against any equal-length window of
/// the longer one, 0-100.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let chars_a: Vec<char> = a.chars().collect();
    let chars_b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if chars_a.len() <= chars_b.len() {
        (&chars_a, &chars_b)
    } else {
        (&chars_b, &chars_a)
    };

    let needle: String = shorter.iter().collect();
    let window = shorter.len();
    let mut best: f64 = 0.0;
    for start in 0..=(longer.len() - window) {
        let hay: String = longer[start..start + window].iter().collect();
        best = best.max(ratio(&needle, &hay));
        if best >= 100.0 {
            break;
        }
    }
    best
}
