//! Known-party gazetteer: supplier and winery name lists.
//!
//! Built once at startup from TOML and passed around by handle; lookups are
//! fuzzy partial-ratio matches over aggressively normalized names.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::similarity::partial_ratio;

const MATCH_THRESHOLD: f64 = 90.0;

#[derive(Debug, Default, Deserialize)]
struct GazetteerFile {
    #[serde(default)]
    suppliers: Vec<String>,
    #[serde(default)]
    wineries: Vec<String>,
}

/// Immutable lookup lists of known suppliers and wineries.
#[derive(Debug, Default)]
pub struct Gazetteer {
    suppliers: Vec<String>,
    wineries: Vec<String>,
}

/// Lowercase and drop everything but ASCII alphanumerics.
fn normalize_entry(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

impl Gazetteer {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(suppliers: &[&str], wineries: &[&str]) -> Self {
        Self {
            suppliers: suppliers.iter().map(|s| normalize_entry(s)).collect(),
            wineries: wineries.iter().map(|s| normalize_entry(s)).collect(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: GazetteerFile = toml::from_str(content)?;
        Ok(Self {
            suppliers: file.suppliers.iter().map(|s| normalize_entry(s)).collect(),
            wineries: file.wineries.iter().map(|s| normalize_entry(s)).collect(),
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn is_known_supplier(&self, value: &str) -> bool {
        let normalized = normalize_entry(value);
        if normalized.is_empty() {
            return false;
        }
        self.suppliers
            .iter()
            .any(|s| partial_ratio(&normalized, s) >= MATCH_THRESHOLD)
    }

    pub fn is_known_winery(&self, value: &str) -> bool {
        let normalized = normalize_entry(value);
        if normalized.is_empty() {
            return false;
        }
        self.wineries
            .iter()
            .any(|w| partial_ratio(&normalized, w) >= MATCH_THRESHOLD)
    }
}
