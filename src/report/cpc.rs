//! Derived cost-per-click column for Google Analytics rows.

use serde_json::Value;

use super::Record;

/// Column name for the derived metric, part of the report wire format.
pub const CPC_FIELD: &str = "Custo por Clique";

const GOOGLE_ANALYTICS: &str = "google analytics";

/// Add `Custo por Clique` = spend / clicks to rows owned by Google Analytics
/// (matched case-insensitively). A missing `spend` or `clicks` reads as zero;
/// a value that is present but not a number makes the division fail, pinning
/// the cell to integer 0, as does zero clicks. Rows from any other platform
/// are left untouched.
///
/// Only the cross-platform report flows call this; the per-platform flows
/// never add the column, matching the external report contract.
pub fn apply_cost_per_click(platform: &str, row: &mut Record) {
    if !platform.eq_ignore_ascii_case(GOOGLE_ANALYTICS) {
        return;
    }

    let (Some(spend), Some(clicks)) = (numeric(row.get("spend")), numeric(row.get("clicks")))
    else {
        row.insert(CPC_FIELD.to_string(), Value::from(0));
        return;
    };

    if clicks == 0.0 {
        row.insert(CPC_FIELD.to_string(), Value::from(0));
        return;
    }

    let cpc = spend / clicks;
    let cell = if cpc.is_finite() { Value::from(cpc) } else { Value::from(0) };
    row.insert(CPC_FIELD.to_string(), cell);
}

/// Absent reads as zero; present-but-non-numeric is a failure.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        None => Some(0.0),
        Some(value) => value.as_f64(),
    }
}
