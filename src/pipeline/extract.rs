//! Field extraction: raw string cells into `WineRow`s with provenance.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::debug;

use crate::domain::{CanonicalField, FieldValue, Scalar, Source, TabularFile, WineRow};
use crate::pipeline::header_map::HeaderMapping;

/// Tokens an upstream export uses to mean "no value".
const PLACEHOLDER_TOKENS: &[&str] = &["-", "--", "nan", "none", "null", "n/a", "na", "undefined"];

/// Confidence attached to values recovered via literal fallback synonyms.
const FALLBACK_CONFIDENCE: f64 = 0.4;

/// Trims, strips one symmetric quote layer, un-escapes doubled quotes, and
/// maps placeholder tokens to the empty string.
pub fn clean_cell(raw: &str) -> String {
    let mut text = raw.trim();
    if text.len() >= 2 {
        let bytes = text.as_bytes();
        if (bytes[0] == b'"' && bytes[text.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[text.len() - 1] == b'\'')
        {
            text = text[1..text.len() - 1].trim();
        }
    }
    let unescaped = if text.contains("\"\"") {
        text.replace("\"\"", "\"")
    } else {
        text.to_string()
    };
    if PLACEHOLDER_TOKENS.contains(&unescaped.to_lowercase().as_str()) {
        return String::new();
    }
    unescaped
}

fn lineage(row_idx: usize, file: &str, column: Option<&str>) -> HashMap<String, Value> {
    let mut map = HashMap::new();
    map.insert("row".to_string(), json!(row_idx));
    map.insert("file".to_string(), json!(file));
    map.insert(
        "column".to_string(),
        column.map(|c| json!(c)).unwrap_or(Value::Null),
    );
    map
}

fn extract_field(
    field: CanonicalField,
    row_idx: usize,
    cells: &[String],
    file: &TabularFile,
    mapping: &HeaderMapping,
) -> FieldValue {
    // Mapped column first, at the mapping's own confidence.
    if let Some(cm) = mapping.column_for(field) {
        if let Some(raw) = cells.get(cm.column_index) {
            let cleaned = clean_cell(raw);
            if !cleaned.is_empty() {
                return FieldValue::new(
                    Some(Scalar::Text(cleaned)),
                    cm.score,
                    Source::Stage1,
                    lineage(row_idx, &file.file_name, Some(&cm.column)),
                );
            }
        }
    }

    // Literal fallback probe over unmapped columns, at fixed low confidence.
    for col_idx in mapping.fallback_columns(field) {
        if let Some(raw) = cells.get(col_idx) {
            let cleaned = clean_cell(raw);
            if !cleaned.is_empty() {
                debug!(field = %field, column = col_idx, row = row_idx, "fallback extraction");
                return FieldValue::new(
                    Some(Scalar::Text(cleaned)),
                    FALLBACK_CONFIDENCE,
                    Source::Stage05,
                    lineage(row_idx, &file.file_name, file.columns.get(col_idx).map(|s| s.as_str())),
                );
            }
        }
    }

    FieldValue::empty(Source::Stage1, lineage(row_idx, &file.file_name, None))
}

/// Builds one `WineRow` per input row, with raw snapshots of the party and
/// name fields kept for later reclassification audits.
pub fn extract_rows(file: &TabularFile, mapping: &HeaderMapping) -> Vec<WineRow> {
    file.rows
        .iter()
        .enumerate()
        .map(|(row_idx, cells)| {
            let get = |field| extract_field(field, row_idx, cells, file, mapping);
            let name = get(CanonicalField::Name);
            let winery = get(CanonicalField::Winery);
            let supplier = get(CanonicalField::Supplier);

            let raw_name = name.text().map(str::to_string);
            let raw_winery = winery.text().map(str::to_string);
            let raw_supplier = supplier.text().map(str::to_string);

            WineRow {
                name,
                winery,
                supplier,
                vintage: get(CanonicalField::Vintage),
                qty: get(CanonicalField::Qty),
                price: get(CanonicalField::Price),
                wine_type: get(CanonicalField::WineType),
                grape_variety: get(CanonicalField::GrapeVariety),
                region: get(CanonicalField::Region),
                country: get(CanonicalField::Country),
                classification: get(CanonicalField::Classification),
                cost_price: get(CanonicalField::CostPrice),
                alcohol_content: get(CanonicalField::AlcoholContent),
                description: get(CanonicalField::Description),
                notes: get(CanonicalField::Notes),
                raw_name,
                raw_winery,
                raw_supplier,
                source_file: Some(file.file_name.clone()),
                source_row: Some(row_idx),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DetectionInfo;
    use crate::pipeline::header_map::map_headers;

    fn test_file(columns: &[&str], rows: &[&[&str]]) -> TabularFile {
        TabularFile {
            file_name: "inventory.csv".to_string(),
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            detection: DetectionInfo::default(),
        }
    }

    #[test]
    fn test_clean_cell_strips_quotes_and_placeholders() {
        assert_eq!(clean_cell("  \"Barolo\"  "), "Barolo");
        assert_eq!(clean_cell("'Barolo'"), "Barolo");
        assert_eq!(clean_cell("\"said \"\"ciao\"\"\""), "said \"ciao\"");
        assert_eq!(clean_cell("n/a"), "");
        assert_eq!(clean_cell("--"), "");
        assert_eq!(clean_cell("NaN"), "");
    }

    #[test]
    fn test_mapped_column_carries_mapping_confidence() {
        let file = test_file(&["Vino", "Annata"], &[&["Barolo", "2019"]]);
        let mapping = map_headers(&file.columns, 0.75);
        let rows = extract_rows(&file, &mapping);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.text(), Some("Barolo"));
        assert_eq!(rows[0].name.source, Source::Stage1);
        assert!(rows[0].name.confidence >= 0.75);
        assert_eq!(rows[0].vintage.text(), Some("2019"));
    }

    #[test]
    fn test_unmapped_field_is_empty_with_zero_confidence() {
        let file = test_file(&["Vino"], &[&["Barolo"]]);
        let mapping = map_headers(&file.columns, 0.75);
        let rows = extract_rows(&file, &mapping);
        assert!(rows[0].price.value.is_none());
        assert_eq!(rows[0].price.confidence, 0.0);
    }

    #[test]
    fn test_lineage_records_row_file_and_column() {
        let file = test_file(&["Vino"], &[&["Barolo"]]);
        let mapping = map_headers(&file.columns, 0.75);
        let rows = extract_rows(&file, &mapping);
        let lineage = &rows[0].name.lineage;
        assert_eq!(lineage["row"], serde_json::json!(0));
        assert_eq!(lineage["file"], serde_json::json!("inventory.csv"));
        assert_eq!(lineage["column"], serde_json::json!("Vino"));
    }

    #[test]
    fn test_raw_snapshots_captured() {
        let file = test_file(
            &["Vino", "Cantina", "Fornitore"],
            &[&["Barolo", "Vietti", "Rossi SRL"]],
        );
        let mapping = map_headers(&file.columns, 0.75);
        let rows = extract_rows(&file, &mapping);
        assert_eq!(rows[0].raw_name.as_deref(), Some("Barolo"));
        assert_eq!(rows[0].raw_winery.as_deref(), Some("Vietti"));
        assert_eq!(rows[0].raw_supplier.as_deref(), Some("Rossi SRL"));
        assert_eq!(rows[0].source_row, Some(0));
    }

    #[test]
    fn test_short_row_missing_cells_is_tolerated() {
        let file = test_file(&["Vino", "Annata"], &[&["Barolo"]]);
        let mapping = map_headers(&file.columns, 0.75);
        let rows = extract_rows(&file, &mapping);
        assert_eq!(rows[0].name.text(), Some("Barolo"));
        assert!(rows[0].vintage.value.is_none());
    }
}
