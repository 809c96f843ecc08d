//! Structural noise filtering: drops section banners, totals and other
//! non-inventory rows before they reach validation.

use tracing::debug;

use crate::domain::{Scalar, WineRow};

/// Tokens that mark a row as table furniture rather than inventory.
const STRUCTURAL_KEYWORDS: &[&str] = &[
    "id",
    "indice",
    "index",
    "total",
    "totale",
    "tot",
    "category",
    "categoria",
    "sezione",
    "section",
];

fn alphabetic_len(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

fn is_structural_text(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    alphabetic_len(&lowered) <= 3 || STRUCTURAL_KEYWORDS.contains(&lowered.as_str())
}

/// A row is noise when it has no name and no substance, or when every
/// populated text field looks structural. Short legitimate wine names can be
/// caught by the second clause; that trade-off is accepted.
pub fn is_noise_row(row: &WineRow) -> bool {
    let name_blank = row.name.is_unset();
    let no_substance = row.winery.is_unset()
        && row.qty.is_unset()
        && row.price.is_unset()
        && row.vintage.is_unset();
    if name_blank && no_substance {
        return true;
    }

    let populated_texts: Vec<&str> = [
        &row.name,
        &row.winery,
        &row.supplier,
        &row.wine_type,
        &row.grape_variety,
        &row.region,
        &row.country,
        &row.classification,
        &row.description,
        &row.notes,
    ]
    .into_iter()
    .filter_map(|fv| fv.value.as_ref().and_then(Scalar::as_text))
    .filter(|t| !t.trim().is_empty())
    .collect();

    !populated_texts.is_empty() && populated_texts.iter().all(|t| is_structural_text(t))
}

/// Splits rows into kept and filtered-out counts.
pub fn filter_rows(rows: Vec<WineRow>) -> (Vec<WineRow>, usize) {
    let total = rows.len();
    let kept: Vec<WineRow> = rows
        .into_iter()
        .filter(|row| {
            let noise = is_noise_row(row);
            if noise {
                debug!(row = ?row.source_row, name = ?row.name.text(), "filtered structural row");
            }
            !noise
        })
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
