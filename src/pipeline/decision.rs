//! Decision gate: accept a file's extraction or escalate it for human
//! review, with enough diagnostics to act on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ProcessorConfig;
use crate::domain::{CanonicalField, TabularFile};
use crate::pipeline::header_map::HeaderMapping;
use crate::pipeline::validate::{RejectionCategory, ValidationStats};

/// Core target fields the schema score is computed over.
pub const CORE_TARGET_FIELDS: [CanonicalField; 6] = [
    CanonicalField::Name,
    CanonicalField::Winery,
    CanonicalField::Vintage,
    CanonicalField::Qty,
    CanonicalField::Price,
    CanonicalField::WineType,
];

/// Fields a usable inventory cannot do without.
pub const REQUIRED_FIELDS: [CanonicalField; 2] = [CanonicalField::Name, CanonicalField::Qty];

const SAMPLES_PER_COLUMN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Escalate,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub decision: Decision,
    pub schema_score: f64,
    pub valid_rows_ratio: f64,
    pub header_mapping: HeaderMapping,
    pub missing_required: Vec<CanonicalField>,
    pub unmapped_columns: Vec<String>,
    pub column_samples: HashMap<String, Vec<String>>,
    pub rejections: HashMap<RejectionCategory, usize>,
    pub rows_total: usize,
    pub rows_filtered: usize,
    pub rows_accepted: usize,
    pub elapsed_ms: u64,
    pub decided_at: DateTime<Utc>,
}

/// Fraction of the core target set the mapping covered.
pub fn schema_score(mapping: &HeaderMapping) -> f64 {
    let mapped = CORE_TARGET_FIELDS
        .iter()
        .filter(|f| mapping.is_mapped(**f))
        .count();
    mapped as f64 / CORE_TARGET_FIELDS.len() as f64
}

fn column_samples(file: &TabularFile) -> HashMap<String, Vec<String>> {
    let mut samples: HashMap<String, Vec<String>> = HashMap::new();
    for (idx, column) in file.columns.iter().enumerate() {
        let values: Vec<String> = file
            .rows
            .iter()
            .filter_map(|row| row.get(idx))
            .filter(|cell| !cell.trim().is_empty())
            .take(SAMPLES_PER_COLUMN)
            .cloned()
            .collect();
        samples.insert(column.clone(), values);
    }
    samples
}

/// Applies both gate thresholds and assembles the report.
///
/// `substantive_rows` is the pre-dedup row count net of structural
/// filtering: duplicates that merged away still count against the file, so
/// a duplicate-heavy file cannot inflate its ratio by shrinking the
/// denominator along with the numerator.
pub fn decide(
    config: &ProcessorConfig,
    file: &TabularFile,
    mapping: HeaderMapping,
    stats: &ValidationStats,
    substantive_rows: usize,
    rows_filtered: usize,
    elapsed_ms: u64,
) -> DecisionReport {
    let score = schema_score(&mapping);
    // Structurally filtered rows are not held against the file.
    let valid_rows_ratio = stats.accepted as f64 / substantive_rows.max(1) as f64;

    let decision = if score >= config.schema_score_threshold
        && valid_rows_ratio >= config.min_valid_rows
    {
        Decision::Accept
    } else {
        Decision::Escalate
    };

    let missing_required: Vec<CanonicalField> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|f| !mapping.is_mapped(*f))
        .collect();

    match decision {
        Decision::Accept => info!(
            file = %file.file_name,
            schema_score = score,
            valid_rows = valid_rows_ratio,
            "file accepted"
        ),
        Decision::Escalate => warn!(
            file = %file.file_name,
            schema_score = score,
            valid_rows = valid_rows_ratio,
            missing = ?missing_required,
            "file escalated for review"
        ),
    }

    DecisionReport {
        decision,
        schema_score: score,
        valid_rows_ratio,
        unmapped_columns: mapping.unmapped_columns(),
        missing_required,
        column_samples: column_samples(file),
        rejections: stats.by_category.clone(),
        rows_total: substantive_rows,
        rows_filtered,
        rows_accepted: stats.accepted,
        elapsed_ms,
        decided_at: Utc::now(),
        header_mapping: mapping,
    }
}
