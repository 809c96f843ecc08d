//! Value normalization: extracted text into typed canonical values.
//!
//! Coercion failures are soft: the offending value becomes null (or the
//! field's documented default), never an error. Normalization is idempotent
//! on already-canonical values.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::{Scalar, WineRow, WineType};

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\.?\d*").unwrap());

const PLACEHOLDER_TOKENS: &[&str] = &["-", "--", "nan", "none", "null", "n/a", "na", "undefined"];

fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || PLACEHOLDER_TOKENS.contains(&trimmed.to_lowercase().as_str())
}

/// Four-digit year anywhere in the text, else a direct numeric parse;
/// outside [1900, 2099] yields null.
pub fn normalize_vintage(value: &Scalar) -> Option<i64> {
    let year = match value {
        Scalar::Int(n) => Some(*n),
        Scalar::Float(f) => Some(*f as i64),
        Scalar::Text(text) => {
            if is_placeholder(text) {
                return None;
            }
            match YEAR_RE.find(text) {
                Some(m) => m.as_str().parse::<i64>().ok(),
                None => text.trim().parse::<i64>().ok(),
            }
        }
    };
    year.filter(|y| (1900..=2099).contains(y))
}

/// First digit run in text, numeric floored at 0; default 0.
pub fn normalize_qty(value: &Scalar) -> i64 {
    match value {
        Scalar::Int(n) => (*n).max(0),
        Scalar::Float(f) => (*f as i64).max(0),
        Scalar::Text(text) => {
            if is_placeholder(text) {
                return 0;
            }
            DIGIT_RUN_RE
                .find(text)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .unwrap_or(0)
        }
    }
}

/// Strips currency symbols, converts decimal comma, extracts the first
/// numeric token. Negative or unparseable yields null.
pub fn normalize_price(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Int(n) => Some((*n as f64).max(0.0)),
        Scalar::Float(f) => Some(f.max(0.0)),
        Scalar::Text(text) => {
            if is_placeholder(text) {
                return None;
            }
            let stripped: String = text
                .chars()
                .filter(|c| !matches!(c, '€' | '$' | '£'))
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            NUMBER_RE
                .find(&stripped)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .filter(|p| *p >= 0.0)
        }
    }
}

/// Percentage in [0, 100]; `%` and whitespace stripped, decimal comma
/// converted. Out of range yields null.
pub fn normalize_alcohol(value: &Scalar) -> Option<f64> {
    let parsed = match value {
        Scalar::Int(n) => Some(*n as f64),
        Scalar::Float(f) => Some(*f),
        Scalar::Text(text) => {
            if is_placeholder(text) {
                return None;
            }
            let stripped: String = text
                .chars()
                .filter(|c| *c != '%' && !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            NUMBER_RE.find(&stripped).and_then(|m| m.as_str().parse::<f64>().ok())
        }
    };
    parsed.filter(|a| (0.0..=100.0).contains(a))
}

/// Fixed-precedence multilingual keyword scan: red beats white beats rosé
/// beats sparkling. Grape-variety cues count as type evidence. Anything
/// unrecognized is `Other`.
pub fn classify_wine_type(text: &str) -> WineType {
    let lowered = text.to_lowercase();
    let contains_any =
        |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if contains_any(&[
        "rosso",
        "red",
        "nero",
        "black",
        "sangiovese",
        "barbera",
        "nebbiolo",
        "cabernet",
        "merlot",
        "pinot noir",
        "syrah",
        "shiraz",
    ]) {
        WineType::Red
    } else if contains_any(&[
        "bianco",
        "white",
        "chardonnay",
        "pinot grigio",
        "sauvignon",
        "riesling",
        "gewürztraminer",
        "moscato",
    ]) {
        WineType::White
    } else if contains_any(&["rosato", "rosé", "rose", "pink"]) {
        WineType::Rose
    } else if contains_any(&[
        "spumante",
        "champagne",
        "prosecco",
        "frizzante",
        "sparkling",
        "cava",
        "crémant",
    ]) {
        WineType::Sparkling
    } else {
        WineType::Other
    }
}

fn normalize_string(value: &Scalar) -> Option<String> {
    match value {
        Scalar::Text(text) => {
            if is_placeholder(text) {
                None
            } else {
                Some(text.trim().to_string())
            }
        }
        Scalar::Int(n) => Some(n.to_string()),
        Scalar::Float(f) => Some(f.to_string()),
    }
}

/// Normalizes all fields of a row in place. Confidence, source and lineage
/// are untouched; only values change shape.
pub fn normalize_row(row: &mut WineRow) {
    // Name: trimmed text, empty/placeholder nulled.
    row.name.value = match row.name.value.take() {
        Some(scalar) => normalize_string(&scalar).filter(|s| !s.is_empty()).map(Scalar::Text),
        None => None,
    };

    // Winery: trimmed; an all-digits value is an upstream ID, not a producer.
    row.winery.value = match row.winery.value.take() {
        Some(scalar) => {
            let normalized = normalize_string(&scalar).filter(|s| !s.is_empty());
            match normalized {
                Some(text) if text.chars().all(|c| c.is_ascii_digit()) => {
                    debug!(winery = %text, "dropping numeric winery value");
                    None
                }
                other => other.map(Scalar::Text),
            }
        }
        None => None,
    };

    row.vintage.value = match row.vintage.value.take() {
        Some(scalar) => normalize_vintage(&scalar).map(Scalar::Int),
        None => None,
    };

    row.qty.value = Some(Scalar::Int(match row.qty.value.take() {
        Some(scalar) => normalize_qty(&scalar),
        None => 0,
    }));

    row.price.value = match row.price.value.take() {
        Some(scalar) => normalize_price(&scalar).map(Scalar::Float),
        None => None,
    };

    row.cost_price.value = match row.cost_price.value.take() {
        Some(scalar) => normalize_price(&scalar).map(Scalar::Float),
        None => None,
    };

    row.alcohol_content.value = match row.alcohol_content.value.take() {
        Some(scalar) => normalize_alcohol(&scalar).map(Scalar::Float),
        None => None,
    };

    row.wine_type.value = match row.wine_type.value.take() {
        Some(scalar) => normalize_string(&scalar)
            .filter(|s| !s.is_empty())
            .map(|text| Scalar::Text(classify_wine_type(&text).as_str().to_string())),
        None => None,
    };

    for field_value in [
        &mut row.supplier,
        &mut row.grape_variety,
        &mut row.region,
        &mut row.country,
        &mut row.classification,
        &mut row.description,
        &mut row.notes,
    ] {
        field_value.value = match field_value.value.take() {
            Some(scalar) => normalize_string(&scalar).filter(|s| !s.is_empty()).map(Scalar::Text),
            None => None,
        };
    }
}
