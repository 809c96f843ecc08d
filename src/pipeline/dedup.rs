//! Fuzzy deduplication of inventory rows.
//!
//! Two rows describe the same wine when their normalized names agree on a
//! token-set ratio of at least 90, their wineries (when both present) on at
//! least 88, and their vintages do not conflict. Matching rows merge:
//! quantities add up, everything else reconciles by confidence.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::{Scalar, WineRow};
use crate::pipeline::reconcile::reconcile_rows;
use crate::similarity::token_set_ratio;

const NAME_THRESHOLD: f64 = 90.0;
const WINERY_THRESHOLD: f64 = 88.0;

static QUALIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(docg?|igt|aoc|d\.?o\.?c\.?)\b").unwrap());

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Match-token normalization: lowercase, fold diacritics, drop denomination
/// qualifiers, non-alphanumerics to spaces, collapse.
pub fn normalize_match_token(value: &str) -> String {
    let folded: String = value.to_lowercase().chars().map(fold_diacritic).collect();
    let without_qualifiers = QUALIFIER_RE.replace_all(&folded, "");
    let spaced: String = without_qualifiers
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn vintage_compatible(a: &WineRow, b: &WineRow) -> bool {
    match (a.vintage.value.as_ref(), b.vintage.value.as_ref()) {
        (Some(va), Some(vb)) => va.as_int() == vb.as_int(),
        _ => true,
    }
}

/// Whether two rows describe the same wine.
pub fn same_wine(first: &WineRow, second: &WineRow) -> bool {
    let (name_a, name_b) = match (first.name.text(), second.name.text()) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => (a, b),
        _ => return false,
    };

    let name_score = token_set_ratio(
        &normalize_match_token(name_a),
        &normalize_match_token(name_b),
    );
    if name_score < NAME_THRESHOLD {
        return false;
    }

    if let (Some(wa), Some(wb)) = (first.winery.text(), second.winery.text()) {
        if !wa.is_empty() && !wb.is_empty() {
            let winery_score =
                token_set_ratio(&normalize_match_token(wa), &normalize_match_token(wb));
            if winery_score < WINERY_THRESHOLD {
                return false;
            }
        }
    }

    vintage_compatible(first, second)
}

/// Folds duplicates together, preserving first-occurrence order. Quantities
/// of merged rows are summed; all other fields reconcile by confidence.
/// Running the result through again changes nothing.
pub fn deduplicate(rows: Vec<WineRow>) -> Vec<WineRow> {
    let mut deduped: Vec<WineRow> = Vec::with_capacity(rows.len());

    'next_row: for row in rows {
        for existing in deduped.iter_mut() {
            if same_wine(existing, &row) {
                let summed_qty = match (
                    existing.qty.value.as_ref().and_then(Scalar::as_int),
                    row.qty.value.as_ref().and_then(Scalar::as_int),
                ) {
                    (Some(a), Some(b)) => Some(a + b),
                    _ => None,
                };
                debug!(
                    name = ?existing.name.text(),
                    merged_qty = ?summed_qty,
                    "merging duplicate row"
                );
                let mut merged = reconcile_rows(existing.clone(), &row);
                if let Some(total) = summed_qty {
                    merged.qty.value = Some(Scalar::Int(total));
                }
                *existing = merged;
                continue 'next_row;
            }
        }
        deduped.push(row);
    }

    deduped
}
