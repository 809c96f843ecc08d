//! The ingestion pipeline: header mapping through decision gate.

pub mod assignment;
pub mod decision;
pub mod dedup;
pub mod extract;
pub mod filter;
pub mod header_map;
pub mod normalize;
pub mod reclassify;
pub mod reconcile;
pub mod synonyms;
pub mod validate;

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::config::ProcessorConfig;
use crate::domain::{TabularFile, WineRow};
use crate::error::{ProcessorError, Result};
use crate::gazetteer::Gazetteer;
use crate::observability::{CounterSink, Metric};

use decision::{decide, schema_score, DecisionReport};
use header_map::{map_headers, HeaderMapping};
use validate::{RejectedRow, ValidRecord};

/// Everything a caller gets back for one processed file.
#[derive(Debug)]
pub struct FileOutcome {
    pub records: Vec<ValidRecord>,
    pub rejected: Vec<RejectedRow>,
    pub report: DecisionReport,
}

/// Synchronous, in-memory ingestion pipeline. Shares only the gazetteer and
/// metric sink handles, so independent files can be processed concurrently
/// from separate instances or clones of the handles.
pub struct Pipeline {
    config: ProcessorConfig,
    gazetteer: Arc<Gazetteer>,
    metrics: Arc<CounterSink>,
}

struct SectionRows {
    mapping: HeaderMapping,
    rows: Vec<WineRow>,
    filtered: usize,
}

impl Pipeline {
    pub fn new(
        config: ProcessorConfig,
        gazetteer: Arc<Gazetteer>,
        metrics: Arc<CounterSink>,
    ) -> Self {
        Self {
            config,
            gazetteer,
            metrics,
        }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Maps, extracts, normalizes, filters and reclassifies one section.
    fn run_section(&self, file: &TabularFile) -> SectionRows {
        let mapping = map_headers(&file.columns, self.config.header_confidence_threshold);
        self.metrics
            .add(Metric::ColumnsMapped, mapping.mapped_count() as u64);
        self.metrics.add(
            Metric::ColumnsUnmapped,
            (file.columns.len() - mapping.mapped_count()) as u64,
        );

        let mut rows = extract::extract_rows(file, &mapping);
        self.metrics.add(Metric::RowsExtracted, rows.len() as u64);

        for row in rows.iter_mut() {
            normalize::normalize_row(row);
        }

        let (mut rows, filtered) = filter::filter_rows(rows);
        self.metrics.add(Metric::RowsFiltered, filtered as u64);

        for row in rows.iter_mut() {
            let audits = reclassify::reclassify_row(row, &self.gazetteer, &self.config);
            self.metrics
                .add(Metric::PartiesReclassified, audits.len() as u64);
        }

        SectionRows {
            mapping,
            rows,
            filtered,
        }
    }

    fn finish(
        &self,
        file: &TabularFile,
        mapping: HeaderMapping,
        rows: Vec<WineRow>,
        filtered: usize,
        started: Instant,
    ) -> FileOutcome {
        let before_dedup = rows.len();
        let rows = dedup::deduplicate(rows);
        self.metrics
            .add(Metric::RowsDeduplicated, (before_dedup - rows.len()) as u64);

        let (records, rejected, stats) = validate::validate_rows(rows);
        self.metrics.add(Metric::RowsAccepted, stats.accepted as u64);
        self.metrics.add(Metric::RowsRejected, stats.rejected as u64);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let report = decide(
            &self.config,
            file,
            mapping,
            &stats,
            before_dedup,
            filtered,
            elapsed_ms,
        );

        self.metrics.increment(Metric::FilesProcessed);
        match report.decision {
            decision::Decision::Accept => self.metrics.increment(Metric::FilesAccepted),
            decision::Decision::Escalate => self.metrics.increment(Metric::FilesEscalated),
        }

        FileOutcome {
            records,
            rejected,
            report,
        }
    }

    /// Processes a single-section file end to end.
    pub fn process(&self, file: &TabularFile) -> FileOutcome {
        let started = Instant::now();
        info!(file = %file.file_name, rows = file.rows.len(), "processing file");
        let section = self.run_section(file);
        self.metrics.increment(Metric::SectionsProcessed);
        self.finish(file, section.mapping, section.rows, section.filtered, started)
    }

    /// Processes a multi-section file: one `TabularFile` per detected header.
    ///
    /// A section without columns or rows is logged, counted and skipped; the
    /// surviving sections pool their rows before deduplication so duplicates
    /// merge across sections. Every section failing, or an empty section
    /// list, is the one top-level error.
    pub fn process_sections(&self, sections: &[TabularFile]) -> Result<FileOutcome> {
        let started = Instant::now();
        if sections.is_empty() {
            return Err(ProcessorError::NoProcessableSections(
                "empty section list".to_string(),
            ));
        }

        let mut pooled: Vec<WineRow> = Vec::new();
        let mut filtered = 0usize;
        let mut best: Option<(usize, HeaderMapping, f64)> = None;

        for (idx, section) in sections.iter().enumerate() {
            if section.columns.is_empty() || section.rows.is_empty() {
                warn!(
                    file = %section.file_name,
                    section = idx,
                    "skipping empty section"
                );
                self.metrics.increment(Metric::SectionsFailed);
                continue;
            }

            let result = self.run_section(section);
            self.metrics.increment(Metric::SectionsProcessed);

            let score = schema_score(&result.mapping);
            if best.as_ref().map(|(_, _, s)| score > *s).unwrap_or(true) {
                best = Some((idx, result.mapping, score));
            }
            filtered += result.filtered;
            pooled.extend(result.rows);
        }

        let (best_idx, mapping, _) = best.ok_or_else(|| {
            ProcessorError::NoProcessableSections("all sections empty".to_string())
        })?;

        Ok(self.finish(&sections[best_idx], mapping, pooled, filtered, started))
    }
}
