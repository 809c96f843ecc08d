//! Row validation: only true constraint violations reject a row.
//!
//! Range problems were already coerced by the normalizer (out-of-range
//! vintage nulled, negative quantity floored, negative price nulled), so the
//! only rejection categories left are a missing name and a purely numeric
//! name.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::{Scalar, WineRow, WineType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionCategory {
    MissingName,
    NumericName,
}

/// A rejected row keeps its full payload for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub row: WineRow,
    pub category: RejectionCategory,
}

/// Flat canonical payload of a row that survived validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidRecord {
    pub name: String,
    pub winery: Option<String>,
    pub supplier: Option<String>,
    pub vintage: Option<i64>,
    pub qty: i64,
    pub price: Option<f64>,
    pub wine_type: Option<String>,
    pub grape_variety: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub classification: Option<String>,
    pub cost_price: Option<f64>,
    pub alcohol_content: Option<f64>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub source_file: Option<String>,
    pub source_row: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub by_category: HashMap<RejectionCategory, usize>,
}

fn text_of(value: &Option<Scalar>) -> Option<String> {
    match value {
        Some(Scalar::Text(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn float_of(value: &Option<Scalar>) -> Option<f64> {
    value.as_ref().and_then(Scalar::as_float)
}

fn check(row: &WineRow) -> Option<RejectionCategory> {
    let name = match row.name.text() {
        Some(n) if !n.trim().is_empty() => n.trim(),
        _ => return Some(RejectionCategory::MissingName),
    };
    if name.chars().all(|c| c.is_ascii_digit()) {
        return Some(RejectionCategory::NumericName);
    }
    None
}

fn to_record(row: &WineRow) -> ValidRecord {
    ValidRecord {
        name: row.name.text().map(str::trim).unwrap_or_default().to_string(),
        winery: text_of(&row.winery.value),
        supplier: text_of(&row.supplier.value),
        // Last-line coercions mirror the normalizer's guarantees.
        vintage: row
            .vintage
            .value
            .as_ref()
            .and_then(Scalar::as_int)
            .filter(|v| (1900..=2099).contains(v)),
        qty: row
            .qty
            .value
            .as_ref()
            .and_then(Scalar::as_int)
            .unwrap_or(0)
            .max(0),
        price: float_of(&row.price.value).filter(|p| *p >= 0.0),
        // Only the closed wine-type vocabulary passes through.
        wine_type: text_of(&row.wine_type.value)
            .and_then(|t| WineType::from_str_opt(&t))
            .map(|w| w.as_str().to_string()),
        grape_variety: text_of(&row.grape_variety.value),
        region: text_of(&row.region.value),
        country: text_of(&row.country.value),
        classification: text_of(&row.classification.value),
        cost_price: float_of(&row.cost_price.value).filter(|p| *p >= 0.0),
        alcohol_content: float_of(&row.alcohol_content.value)
            .filter(|a| (0.0..=100.0).contains(a)),
        description: text_of(&row.description.value),
        notes: text_of(&row.notes.value),
        source_file: row.source_file.clone(),
        source_row: row.source_row,
    }
}

/// Splits rows into accepted records and rejected rows with stats.
pub fn validate_rows(rows: Vec<WineRow>) -> (Vec<ValidRecord>, Vec<RejectedRow>, ValidationStats) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();
    let mut stats = ValidationStats {
        total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        match check(&row) {
            None => {
                records.push(to_record(&row));
                stats.accepted += 1;
            }
            Some(category) => {
                debug!(row = ?row.source_row, category = ?category, "row rejected");
                *stats.by_category.entry(category).or_insert(0) += 1;
                stats.rejected += 1;
                rejected.push(RejectedRow { row, category });
            }
        }
    }

    (records, rejected, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldValue, Source};
    use std::collections::HashMap as Map;

    fn fv(value: Option<Scalar>) -> FieldValue {
        FieldValue::new(value, 0.9, Source::Stage1, Map::new())
    }

    fn row(name: Option<&str>) -> WineRow {
        let empty = || fv(None);
        WineRow {
            name: fv(name.map(|n| Scalar::Text(n.to_string()))),
            winery: empty(),
            supplier: empty(),
            vintage: empty(),
            qty: fv(Some(Scalar::Int(0))),
            price: empty(),
            wine_type: empty(),
            grape_variety: empty(),
            region: empty(),
            country: empty(),
            classification: empty(),
            cost_price: empty(),
            alcohol_content: empty(),
            description: empty(),
            notes: empty(),
            raw_name: None,
            raw_winery: None,
            raw_supplier: None,
            source_file: Some("inventory.csv".to_string()),
            source_row: Some(3),
        }
    }

    #[test]
    fn test_missing_name_rejected() {
        let (records, rejected, stats) = validate_rows(vec![row(None), row(Some("   "))]);
        assert!(records.is_empty());
        assert_eq!(rejected.len(), 2);
        assert_eq!(stats.by_category[&RejectionCategory::MissingName], 2);
    }

    #[test]
    fn test_numeric_name_rejected_with_payload() {
        let (_, rejected, _) = validate_rows(vec![row(Some("12345"))]);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].category, RejectionCategory::NumericName);
        assert_eq!(rejected[0].row.source_row, Some(3));
    }

    #[test]
    fn test_valid_row_accepted_as_flat_record() {
        let mut r = row(Some("Barolo Brunate"));
        r.vintage = fv(Some(Scalar::Int(2019)));
        r.qty = fv(Some(Scalar::Int(6)));
        r.price = fv(Some(Scalar::Float(42.0)));
        let (records, rejected, stats) = validate_rows(vec![r]);
        assert!(rejected.is_empty());
        assert_eq!(stats.accepted, 1);
        assert_eq!(records[0].name, "Barolo Brunate");
        assert_eq!(records[0].vintage, Some(2019));
        assert_eq!(records[0].qty, 6);
        assert_eq!(records[0].price, Some(42.0));
        assert_eq!(records[0].source_file.as_deref(), Some("inventory.csv"));
    }

    #[test]
    fn test_wine_type_outside_vocabulary_is_nulled() {
        let mut r = row(Some("Barolo"));
        r.wine_type = fv(Some(Scalar::Text("viola".to_string())));
        let (records, _, _) = validate_rows(vec![r]);
        assert_eq!(records[0].wine_type, None);

        let mut r = row(Some("Barolo"));
        r.wine_type = fv(Some(Scalar::Text("red".to_string())));
        let (records, _, _) = validate_rows(vec![r]);
        assert_eq!(records[0].wine_type.as_deref(), Some("red"));
    }

    #[test]
    fn test_out_of_range_values_coerced_not_rejected() {
        let mut r = row(Some("Barolo"));
        r.vintage = fv(Some(Scalar::Int(1850)));
        r.qty = fv(Some(Scalar::Int(-4)));
        r.price = fv(Some(Scalar::Float(-1.0)));
        let (records, rejected, _) = validate_rows(vec![r]);
        assert!(rejected.is_empty());
        assert_eq!(records[0].vintage, None);
        assert_eq!(records[0].qty, 0);
        assert_eq!(records[0].price, None);
    }
}
