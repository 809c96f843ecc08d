//! vino-ingest: schema mapping, confidence-weighted reconciliation and
//! fuzzy deduplication for semi-structured wine-inventory tables.
//!
//! The crate consumes decoded tabular sections (encoding and delimiter
//! detection happen upstream) and turns inconsistently-labeled,
//! multilingual inventory exports into validated canonical records, with a
//! decision gate that escalates files it cannot confidently process.

pub mod config;
pub mod domain;
pub mod error;
pub mod gazetteer;
pub mod logging;
pub mod observability;
pub mod pipeline;
pub mod similarity;

pub use config::{OverridePolicy, ProcessorConfig};
pub use domain::{
    CanonicalField, DetectionInfo, FieldValue, Scalar, Source, TabularFile, WineRow, WineType,
};
pub use error::{ProcessorError, Result};
pub use gazetteer::Gazetteer;
pub use observability::{CounterSink, Metric};
pub use pipeline::decision::{Decision, DecisionReport};
pub use pipeline::header_map::HeaderMapping;
pub use pipeline::validate::{RejectedRow, RejectionCategory, ValidRecord};
pub use pipeline::{FileOutcome, Pipeline};
