//! Injectable counter metrics for the ingestion pipeline.
//!
//! A `CounterSink` is passed into the pipeline by handle instead of living
//! as process-global state, so concurrent pipelines and tests each observe
//! their own counts. Dropping the sink (or ignoring it) never changes
//! pipeline output.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    // File-level
    FilesProcessed,
    FilesAccepted,
    FilesEscalated,
    SectionsProcessed,
    SectionsFailed,

    // Header mapping
    ColumnsMapped,
    ColumnsUnmapped,

    // Row stages
    RowsExtracted,
    RowsFiltered,
    RowsDeduplicated,
    RowsAccepted,
    RowsRejected,
    PartiesReclassified,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::FilesProcessed => "vino_files_processed_total",
            Metric::FilesAccepted => "vino_files_accepted_total",
            Metric::FilesEscalated => "vino_files_escalated_total",
            Metric::SectionsProcessed => "vino_sections_processed_total",
            Metric::SectionsFailed => "vino_sections_failed_total",
            Metric::ColumnsMapped => "vino_columns_mapped_total",
            Metric::ColumnsUnmapped => "vino_columns_unmapped_total",
            Metric::RowsExtracted => "vino_rows_extracted_total",
            Metric::RowsFiltered => "vino_rows_filtered_total",
            Metric::RowsDeduplicated => "vino_rows_deduplicated_total",
            Metric::RowsAccepted => "vino_rows_accepted_total",
            Metric::RowsRejected => "vino_rows_rejected_total",
            Metric::PartiesReclassified => "vino_parties_reclassified_total",
        };
        write!(f, "{}", name)
    }
}

/// Concurrency-safe counter map.
#[derive(Debug, Default)]
pub struct CounterSink {
    counters: Mutex<HashMap<String, u64>>,
}

impl CounterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, metric: Metric) {
        self.add(metric, 1);
    }

    pub fn add(&self, metric: Metric, amount: u64) {
        if amount == 0 {
            return;
        }
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());
        *counters.entry(metric.to_string()).or_insert(0) += amount;
    }

    pub fn snapshot(&self) -> HashMap<String, u64> {
        self.counters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn reset(&self) {
        self.counters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}
