//! Domain data shapes shared across pipeline stages.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed set of canonical schema attributes a raw column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Name,
    Winery,
    Supplier,
    Vintage,
    Qty,
    Price,
    WineType,
    GrapeVariety,
    Region,
    Country,
    Classification,
    CostPrice,
    AlcoholContent,
    Description,
    Notes,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::Name,
        CanonicalField::Winery,
        CanonicalField::Supplier,
        CanonicalField::Vintage,
        CanonicalField::Qty,
        CanonicalField::Price,
        CanonicalField::WineType,
        CanonicalField::GrapeVariety,
        CanonicalField::Region,
        CanonicalField::Country,
        CanonicalField::Classification,
        CanonicalField::CostPrice,
        CanonicalField::AlcoholContent,
        CanonicalField::Description,
        CanonicalField::Notes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Winery => "winery",
            CanonicalField::Supplier => "supplier",
            CanonicalField::Vintage => "vintage",
            CanonicalField::Qty => "qty",
            CanonicalField::Price => "price",
            CanonicalField::WineType => "wine_type",
            CanonicalField::GrapeVariety => "grape_variety",
            CanonicalField::Region => "region",
            CanonicalField::Country => "country",
            CanonicalField::Classification => "classification",
            CanonicalField::CostPrice => "cost_price",
            CanonicalField::AlcoholContent => "alcohol_content",
            CanonicalField::Description => "description",
            CanonicalField::Notes => "notes",
        }
    }

    /// Display name used for direct fuzzy matching against raw column names.
    pub fn display_name(&self) -> &'static str {
        match self {
            CanonicalField::WineType => "wine type",
            CanonicalField::GrapeVariety => "grape variety",
            CanonicalField::CostPrice => "cost price",
            CanonicalField::AlcoholContent => "alcohol content",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage that produced a field value, ordered most-structured first.
/// The discriminant order is the tie-break precedence used by the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Stage1,
    Stage05,
    Stage2,
    Ocr,
    Stage3,
    Post,
}

impl Source {
    /// Lower rank wins on an exact confidence tie.
    pub fn precedence(&self) -> u8 {
        match self {
            Source::Stage1 => 0,
            Source::Stage05 => 1,
            Source::Stage2 => 2,
            Source::Ocr => 3,
            Source::Stage3 => 4,
            Source::Post => 5,
        }
    }
}

/// A nullable scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Float(f) => Some(*f as i64),
            Scalar::Text(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Text(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Scalar::Int(_) | Scalar::Float(_))
    }

    /// Empty text, zero, or 0.0: the values the override rule treats as unset.
    pub fn is_empty_or_zero(&self) -> bool {
        match self {
            Scalar::Text(s) => s.trim().is_empty(),
            Scalar::Int(n) => *n == 0,
            Scalar::Float(f) => *f == 0.0,
        }
    }
}

/// A single extracted field: value plus trust score and provenance.
///
/// Confidence 0 conventionally pairs with an absent value, but this is not
/// enforced anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Option<Scalar>,
    pub confidence: f64,
    pub source: Source,
    pub lineage: HashMap<String, serde_json::Value>,
}

impl FieldValue {
    pub fn new(
        value: Option<Scalar>,
        confidence: f64,
        source: Source,
        lineage: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            value,
            confidence,
            source,
            lineage,
        }
    }

    /// An absent value at confidence 0.
    pub fn empty(source: Source, lineage: HashMap<String, serde_json::Value>) -> Self {
        Self::new(None, 0.0, source, lineage)
    }

    pub fn text(&self) -> Option<&str> {
        self.value.as_ref().and_then(Scalar::as_text)
    }

    pub fn is_unset(&self) -> bool {
        match &self.value {
            None => true,
            Some(scalar) => scalar.is_empty_or_zero(),
        }
    }
}

/// One inventory row with per-field confidence and provenance.
///
/// Created by the field extractor, mutated in place by the normalizer,
/// reclassifier and reconciler, and discarded on validation rejection or
/// absorption into a dedup target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WineRow {
    pub name: FieldValue,
    pub winery: FieldValue,
    pub supplier: FieldValue,
    pub vintage: FieldValue,
    pub qty: FieldValue,
    pub price: FieldValue,
    pub wine_type: FieldValue,
    pub grape_variety: FieldValue,
    pub region: FieldValue,
    pub country: FieldValue,
    pub classification: FieldValue,
    pub cost_price: FieldValue,
    pub alcohol_content: FieldValue,
    pub description: FieldValue,
    pub notes: FieldValue,
    /// Unmapped snapshots of the raw inputs, kept for reclassification audits.
    pub raw_name: Option<String>,
    pub raw_winery: Option<String>,
    pub raw_supplier: Option<String>,
    pub source_file: Option<String>,
    pub source_row: Option<usize>,
}

impl WineRow {
    pub fn field(&self, field: CanonicalField) -> &FieldValue {
        match field {
            CanonicalField::Name => &self.name,
            CanonicalField::Winery => &self.winery,
            CanonicalField::Supplier => &self.supplier,
            CanonicalField::Vintage => &self.vintage,
            CanonicalField::Qty => &self.qty,
            CanonicalField::Price => &self.price,
            CanonicalField::WineType => &self.wine_type,
            CanonicalField::GrapeVariety => &self.grape_variety,
            CanonicalField::Region => &self.region,
            CanonicalField::Country => &self.country,
            CanonicalField::Classification => &self.classification,
            CanonicalField::CostPrice => &self.cost_price,
            CanonicalField::AlcoholContent => &self.alcohol_content,
            CanonicalField::Description => &self.description,
            CanonicalField::Notes => &self.notes,
        }
    }

    pub fn field_mut(&mut self, field: CanonicalField) -> &mut FieldValue {
        match field {
            CanonicalField::Name => &mut self.name,
            CanonicalField::Winery => &mut self.winery,
            CanonicalField::Supplier => &mut self.supplier,
            CanonicalField::Vintage => &mut self.vintage,
            CanonicalField::Qty => &mut self.qty,
            CanonicalField::Price => &mut self.price,
            CanonicalField::WineType => &mut self.wine_type,
            CanonicalField::GrapeVariety => &mut self.grape_variety,
            CanonicalField::Region => &mut self.region,
            CanonicalField::Country => &mut self.country,
            CanonicalField::Classification => &mut self.classification,
            CanonicalField::CostPrice => &mut self.cost_price,
            CanonicalField::AlcoholContent => &mut self.alcohol_content,
            CanonicalField::Description => &mut self.description,
            CanonicalField::Notes => &mut self.notes,
        }
    }
}

/// Closed wine-type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WineType {
    Red,
    White,
    Rose,
    Sparkling,
    Other,
}

impl WineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WineType::Red => "red",
            WineType::White => "white",
            WineType::Rose => "rose",
            WineType::Sparkling => "sparkling",
            WineType::Other => "other",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<WineType> {
        match value {
            "red" => Some(WineType::Red),
            "white" => Some(WineType::White),
            "rose" => Some(WineType::Rose),
            "sparkling" => Some(WineType::Sparkling),
            "other" => Some(WineType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for WineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pass-through detection metadata from the upstream tabular reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionInfo {
    pub encoding: String,
    pub encoding_confidence: f64,
    pub separator: Option<String>,
    pub sheet: Option<String>,
}

/// Input contract from the tabular reader: one section of decoded cells.
///
/// Encoding and delimiter resolution happen upstream; this core only sees
/// ordered column names and string cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularFile {
    pub file_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub detection: DetectionInfo,
}
