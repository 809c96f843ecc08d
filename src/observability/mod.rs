// Observability: counters and logging for the ingestion pipeline.

pub mod metrics;

pub use metrics::{CounterSink, Metric};
