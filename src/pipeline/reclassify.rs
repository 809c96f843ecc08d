//! Party reclassification: winery text that is really a supplier (or the
//! other way around) gets moved to the right field, with an audit trail.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::ProcessorConfig;
use crate::domain::{CanonicalField, FieldValue, Scalar, WineRow};
use crate::gazetteer::Gazetteer;
use crate::pipeline::reconcile::can_override;

/// Legal-entity and distribution suffixes that mark a name as a supplier.
pub const SUPPLIER_HINTS: &[&str] = &[
    "srl",
    "spa",
    "sas",
    "distrib",
    "distribuzioni",
    "bevande",
    "import",
    "importazioni",
    "wholesale",
    "trading",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Supplier,
    Winery,
    Unknown,
}

/// Before/after record of a reclassification write.
#[derive(Debug, Clone, Serialize)]
pub struct FieldOverride {
    pub field: CanonicalField,
    pub before: FieldValue,
    pub after: FieldValue,
    pub at: DateTime<Utc>,
}

impl FieldOverride {
    fn capture(field: CanonicalField, before: FieldValue, after: &FieldValue) -> Self {
        info!(
            field = %field,
            before = ?before.text(),
            after = ?after.text(),
            "party reclassification override"
        );
        Self {
            field,
            before,
            after: after.clone(),
            at: Utc::now(),
        }
    }
}

/// Classifies a party name: gazetteer suppliers first, then gazetteer
/// wineries, then supplier suffix hints.
pub fn classify_party(text: Option<&str>, gazetteer: &Gazetteer) -> Party {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Party::Unknown,
    };
    let lowered = text.to_lowercase();

    if gazetteer.is_known_supplier(&lowered) {
        return Party::Supplier;
    }
    if gazetteer.is_known_winery(&lowered) {
        return Party::Winery;
    }
    if SUPPLIER_HINTS.iter().any(|hint| lowered.contains(hint)) {
        return Party::Supplier;
    }
    Party::Unknown
}

/// Reclassifies a row's party fields in place, returning the audit events
/// for every field that changed.
pub fn reclassify_row(
    row: &mut WineRow,
    gazetteer: &Gazetteer,
    config: &ProcessorConfig,
) -> Vec<FieldOverride> {
    let mut audits = Vec::new();

    // Winery text that names a supplier moves over, subject to the override
    // policy; the raw winery snapshot is restored when it still adds signal.
    if classify_party(row.winery.text(), gazetteer) == Party::Supplier
        && can_override(
            &row.supplier,
            row.winery.confidence,
            config.override_policy,
            config.override_delta,
        )
    {
        let supplier_before = row.supplier.clone();
        let winery_before = row.winery.clone();

        row.supplier.value = row.winery.value.clone();
        row.supplier.confidence = row.supplier.confidence.max(row.winery.confidence);

        let restored = row
            .raw_winery
            .as_deref()
            .filter(|raw| Some(*raw) != row.supplier.text());
        row.winery.value = restored.map(|raw| Scalar::Text(raw.to_string()));
        row.winery.confidence = row.winery.confidence.min(0.2);

        audits.push(FieldOverride::capture(
            CanonicalField::Supplier,
            supplier_before,
            &row.supplier,
        ));
        audits.push(FieldOverride::capture(
            CanonicalField::Winery,
            winery_before,
            &row.winery,
        ));
    }

    // An empty winery backfills from supplier text that names a winery; the
    // supplier field keeps its value.
    if row.winery.is_unset()
        && classify_party(row.supplier.text(), gazetteer) == Party::Winery
    {
        let winery_before = row.winery.clone();
        row.winery.value = row.supplier.value.clone();
        row.winery.confidence = row
            .winery
            .confidence
            .max(row.supplier.confidence - 0.1);
        audits.push(FieldOverride::capture(
            CanonicalField::Winery,
            winery_before,
            &row.winery,
        ));
    }

    audits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Source;
    use std::collections::HashMap;

    fn fv(value: Option<&str>, confidence: f64) -> FieldValue {
        FieldValue::new(
            value.map(|v| Scalar::Text(v.to_string())),
            confidence,
            Source::Stage1,
            HashMap::new(),
        )
    }

    fn row_with_parties(winery: Option<&str>, supplier: Option<&str>) -> WineRow {
        let empty = || fv(None, 0.0);
        WineRow {
            name: fv(Some("Barolo"), 0.9),
            winery: match winery {
                Some(w) => fv(Some(w), 0.8),
                None => empty(),
            },
            supplier: match supplier {
                Some(s) => fv(Some(s), 0.8),
                None => empty(),
            },
            vintage: empty(),
            qty: empty(),
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
            raw_name: Some("Barolo".to_string()),
            raw_winery: winery.map(str::to_string),
            raw_supplier: supplier.map(str::to_string),
            source_file: None,
            source_row: None,
        }
    }

    #[test]
    fn test_classify_party_gazetteer_first() {
        let gazetteer = Gazetteer::new(&["Rossi Bevande"], &["Vietti"]);
        assert_eq!(
            classify_party(Some("Rossi Bevande"), &gazetteer),
            Party::Supplier
        );
        assert_eq!(classify_party(Some("Vietti"), &gazetteer), Party::Winery);
        assert_eq!(classify_party(Some("Qualcosa"), &gazetteer), Party::Unknown);
        assert_eq!(classify_party(None, &gazetteer), Party::Unknown);
    }

    #[test]
    fn test_suffix_hints_classify_as_supplier() {
        let gazetteer = Gazetteer::empty();
        assert_eq!(
            classify_party(Some("Bianchi Distribuzioni SRL"), &gazetteer),
            Party::Supplier
        );
        assert_eq!(
            classify_party(Some("Enoteca Trading"), &gazetteer),
            Party::Supplier
        );
    }

    #[test]
    fn test_supplier_text_in_winery_moves_over() {
        let gazetteer = Gazetteer::empty();
        let config = ProcessorConfig::default();
        let mut row = row_with_parties(Some("Rossi Bevande SRL"), None);

        let audits = reclassify_row(&mut row, &gazetteer, &config);

        assert_eq!(row.supplier.text(), Some("Rossi Bevande SRL"));
        assert!(row.winery.confidence <= 0.2);
        // Raw winery equals the moved value, so the winery field is cleared.
        assert!(row.winery.value.is_none());
        assert_eq!(audits.len(), 2);
        assert_eq!(audits[0].field, CanonicalField::Supplier);
        assert!(audits[0].before.value.is_none());
    }

    #[test]
    fn test_occupied_supplier_respects_override_policy() {
        let gazetteer = Gazetteer::empty();
        let config = ProcessorConfig::default();
        // Supplier present at equal confidence; conservative policy demands
        // a delta the winery value cannot offer.
        let mut row = row_with_parties(Some("Rossi Bevande SRL"), Some("Fornitore Storico"));

        let audits = reclassify_row(&mut row, &gazetteer, &config);

        assert_eq!(row.supplier.text(), Some("Fornitore Storico"));
        assert!(audits.is_empty());
    }

    #[test]
    fn test_winery_backfilled_from_supplier() {
        let gazetteer = Gazetteer::new(&[], &["Vietti"]);
        let config = ProcessorConfig::default();
        let mut row = row_with_parties(None, Some("Vietti"));

        let audits = reclassify_row(&mut row, &gazetteer, &config);

        assert_eq!(row.winery.text(), Some("Vietti"));
        assert_eq!(row.supplier.text(), Some("Vietti"));
        assert!((row.winery.confidence - 0.7).abs() < 1e-9);
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].field, CanonicalField::Winery);
    }
}
