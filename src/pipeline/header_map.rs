//! Header mapping: raw column names to canonical schema fields.
//!
//! Scores every column against every canonical field with fuzzy synonym
//! matching, then solves the resulting matrix as a minimum-cost assignment
//! so the mapping is a global optimum rather than a greedy scan. A fixed,
//! ordered list of named fix-ups runs after the solve.

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::CanonicalField;
use crate::pipeline::assignment::minimum_cost_assignment;
use crate::pipeline::synonyms::{
    fallback_synonyms, synonyms, LITERAL_OVERRIDES, QTY_QUALIFIER_TOKENS,
};
use crate::similarity::token_set_ratio;

/// One input column and its (possible) canonical assignment.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnMapping {
    pub column_index: usize,
    pub column: String,
    pub field: Option<CanonicalField>,
    pub score: f64,
}

/// The full mapping: every input column appears exactly once, and each
/// canonical field is assigned to at most one column.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderMapping {
    pub columns: Vec<ColumnMapping>,
}

impl HeaderMapping {
    pub fn column_for(&self, field: CanonicalField) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.field == Some(field))
    }

    pub fn is_mapped(&self, field: CanonicalField) -> bool {
        self.column_for(field).is_some()
    }

    pub fn mapped_count(&self) -> usize {
        self.columns.iter().filter(|c| c.field.is_some()).count()
    }

    pub fn unmapped_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.field.is_none())
            .map(|c| c.column.clone())
            .collect()
    }

    /// Unmapped columns matching the field's literal fallback synonyms, in
    /// synonym order. The extractor probes these when the field is unmapped.
    pub fn fallback_columns(&self, field: CanonicalField) -> Vec<usize> {
        let mut indices = Vec::new();
        for synonym in fallback_synonyms(field) {
            let wanted = normalize_column_name(synonym);
            for candidate in &self.columns {
                if candidate.field.is_none()
                    && normalize_column_name(&candidate.column) == wanted
                    && !indices.contains(&candidate.column_index)
                {
                    indices.push(candidate.column_index);
                }
            }
        }
        indices
    }
}

/// Lowercases, trims, drops symbols (keeping alphanumerics, whitespace,
/// `-` and `_`), and collapses runs of whitespace.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity score in [0,1] between a raw column name and a canonical field.
pub fn score(column: &str, field: CanonicalField) -> f64 {
    let normalized = normalize_column_name(column);
    if normalized.is_empty() {
        return 0.0;
    }

    for (literal, override_field) in LITERAL_OVERRIDES {
        if *override_field == field && normalized == *literal {
            return 1.0;
        }
    }

    let separator_free = normalized
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut best = token_set_ratio(&normalized, field.display_name());
    best = best.max(token_set_ratio(&separator_free, field.display_name()));
    for synonym in synonyms(field) {
        let candidate = normalize_column_name(synonym);
        best = best.max(token_set_ratio(&normalized, &candidate));
        if best >= 100.0 {
            break;
        }
    }

    let mut scaled = (best / 100.0).min(1.0);

    // A column led by a bare quantity token scores half toward anything else.
    if field != CanonicalField::Qty {
        if let Some(first) = normalized.split_whitespace().next() {
            if QTY_QUALIFIER_TOKENS.contains(&first) {
                scaled *= 0.5;
            }
        }
    }

    scaled
}

/// Named post-solve mapping heuristics, applied in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFixup {
    /// An unmapped canonical field claims a column bearing its literal
    /// override name, displacing any fuzzy assignment that column held.
    ForceLiteral,
}

pub const FIXUP_ORDER: [MappingFixup; 1] = [MappingFixup::ForceLiteral];

impl MappingFixup {
    pub fn apply(&self, mapping: &mut HeaderMapping) {
        match self {
            MappingFixup::ForceLiteral => apply_force_literal(mapping),
        }
    }
}

fn apply_force_literal(mapping: &mut HeaderMapping) {
    for (literal, field) in LITERAL_OVERRIDES {
        if mapping.is_mapped(*field) {
            continue;
        }
        let candidate = mapping
            .columns
            .iter()
            .position(|c| normalize_column_name(&c.column) == *literal);
        if let Some(idx) = candidate {
            let displaced = mapping.columns[idx].field;
            mapping.columns[idx].field = Some(*field);
            mapping.columns[idx].score = 1.0;
            if let Some(old) = displaced {
                debug!(
                    column = %mapping.columns[idx].column,
                    displaced = %old,
                    forced = %field,
                    "force-literal fixup displaced a fuzzy assignment"
                );
            }
        }
    }
}

/// Maps input columns to canonical fields. Never fails: unmatchable columns
/// come back with `field: None`, and an empty input yields an empty mapping.
pub fn map_headers(columns: &[String], threshold: f64) -> HeaderMapping {
    if columns.is_empty() {
        return HeaderMapping::default();
    }

    let matrix: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| {
            CanonicalField::ALL
                .iter()
                .map(|field| 1.0 - score(col, *field))
                .collect()
        })
        .collect();

    let assignment = minimum_cost_assignment(&matrix);

    let mut mapping = HeaderMapping::default();
    for (idx, column) in columns.iter().enumerate() {
        let (field, col_score) = match assignment[idx] {
            Some(j) => {
                let field = CanonicalField::ALL[j];
                let s = 1.0 - matrix[idx][j];
                if s >= threshold {
                    (Some(field), s)
                } else {
                    (None, s)
                }
            }
            None => (None, 0.0),
        };
        debug!(column = %column, field = ?field, score = col_score, "header candidate");
        mapping.columns.push(ColumnMapping {
            column_index: idx,
            column: column.clone(),
            field,
            score: col_score,
        });
    }

    for fixup in FIXUP_ORDER {
        fixup.apply(&mut mapping);
    }

    info!(
        mapped = mapping.mapped_count(),
        total = columns.len(),
        threshold,
        "header mapping complete"
    );
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  Prezzo (€) "), "prezzo");
        assert_eq!(normalize_column_name("Q.tà"), "qtà");
        assert_eq!(normalize_column_name("P.U."), "pu");
        assert_eq!(normalize_column_name("nome_vino"), "nome_vino");
        assert_eq!(normalize_column_name("Nome   Vino"), "nome vino");
    }

    #[test]
    fn test_literal_override_scores_full() {
        assert_eq!(score("Cantina", CanonicalField::Winery), 1.0);
        assert_eq!(score("ANNATA", CanonicalField::Vintage), 1.0);
    }

    #[test]
    fn test_qty_qualifier_penalty() {
        let toward_qty = score("q.tà", CanonicalField::Qty);
        let toward_name = score("q.tà", CanonicalField::Name);
        assert!(toward_qty > 0.9);
        assert!(toward_name <= 0.5);
    }

    #[test]
    fn test_abbreviated_headers_map_at_default_threshold() {
        let mapping = map_headers(&cols(&["Label", "Produttore", "P.U.", "Q.tà"]), 0.75);
        assert_eq!(
            mapping.column_for(CanonicalField::Name).map(|c| c.column_index),
            Some(0)
        );
        assert_eq!(
            mapping
                .column_for(CanonicalField::Winery)
                .map(|c| c.column_index),
            Some(1)
        );
        assert_eq!(
            mapping
                .column_for(CanonicalField::Price)
                .map(|c| c.column_index),
            Some(2)
        );
        assert_eq!(
            mapping.column_for(CanonicalField::Qty).map(|c| c.column_index),
            Some(3)
        );
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        let mapping = map_headers(&[], 0.75);
        assert!(mapping.columns.is_empty());
    }

    #[test]
    fn test_every_column_appears_once() {
        let columns = cols(&["Vino", "Annata", "Qualcosa", "Altro campo"]);
        let mapping = map_headers(&columns, 0.75);
        assert_eq!(mapping.columns.len(), columns.len());
        for (idx, cm) in mapping.columns.iter().enumerate() {
            assert_eq!(cm.column_index, idx);
        }
    }

    #[test]
    fn test_field_assigned_at_most_once() {
        // Two columns that both resemble "name"; only one may claim it.
        let mapping = map_headers(&cols(&["Nome", "Nome vino"]), 0.75);
        let name_count = mapping
            .columns
            .iter()
            .filter(|c| c.field == Some(CanonicalField::Name))
            .count();
        assert_eq!(name_count, 1);
    }

    #[test]
    fn test_unrelated_column_stays_unmapped() {
        let mapping = map_headers(&cols(&["Codice a barre"]), 0.75);
        assert!(mapping.columns[0].field.is_none());
    }

    #[test]
    fn test_force_literal_fixup_claims_column() {
        let mut mapping = HeaderMapping {
            columns: vec![ColumnMapping {
                column_index: 0,
                column: "Etichetta".into(),
                field: Some(CanonicalField::Description),
                score: 0.8,
            }],
        };
        MappingFixup::ForceLiteral.apply(&mut mapping);
        assert_eq!(mapping.columns[0].field, Some(CanonicalField::Name));
        assert_eq!(mapping.columns[0].score, 1.0);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let columns = cols(&["Vino", "Produttore", "Qta", "Prezzo", "Tipologia"]);
        let loose = map_headers(&columns, 0.6);
        let strict = map_headers(&columns, 0.9);
        assert!(strict.mapped_count() <= loose.mapped_count());
        for field in CanonicalField::ALL {
            if strict.is_mapped(field) {
                assert!(loose.is_mapped(field), "{field} mapped strictly but not loosely");
            }
        }
    }
}
