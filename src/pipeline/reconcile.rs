//! Confidence-weighted reconciliation of field values and rows.

use crate::config::OverridePolicy;
use crate::domain::{CanonicalField, FieldValue, WineRow};

/// Picks the more trustworthy of two field values: strictly higher
/// confidence wins; on an exact tie the earlier source in the fixed
/// precedence order wins; `a` wins a full tie.
pub fn pick_better(a: &FieldValue, b: &FieldValue) -> FieldValue {
    if b.confidence > a.confidence {
        return b.clone();
    }
    if b.confidence < a.confidence {
        return a.clone();
    }
    if a.source.precedence() <= b.source.precedence() {
        a.clone()
    } else {
        b.clone()
    }
}

/// Merges `secondary` into `primary` field by field via `pick_better`. Raw
/// snapshots and the source locator keep the primary's value when present.
pub fn reconcile_rows(mut primary: WineRow, secondary: &WineRow) -> WineRow {
    for field in CanonicalField::ALL {
        let best = pick_better(primary.field(field), secondary.field(field));
        *primary.field_mut(field) = best;
    }

    if primary.raw_name.is_none() {
        primary.raw_name = secondary.raw_name.clone();
    }
    if primary.raw_winery.is_none() {
        primary.raw_winery = secondary.raw_winery.clone();
    }
    if primary.raw_supplier.is_none() {
        primary.raw_supplier = secondary.raw_supplier.clone();
    }
    if primary.source_file.is_none() {
        primary.source_file = secondary.source_file.clone();
    }
    if primary.source_row.is_none() {
        primary.source_row = secondary.source_row;
    }

    primary
}

/// Whether a new value at `new_conf` may replace `old` under the configured
/// policy. An unset value at confidence 0 is always replaceable.
pub fn can_override(
    old: &FieldValue,
    new_conf: f64,
    policy: OverridePolicy,
    delta: f64,
) -> bool {
    if old.is_unset() && old.confidence == 0.0 {
        return true;
    }
    match policy {
        OverridePolicy::Conservative => new_conf >= old.confidence + delta,
        OverridePolicy::Permissive => new_conf >= old.confidence,
    }
}
