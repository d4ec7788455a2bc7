//! Report core: flat record assembly, aggregation and CSV output.
//!
//! Reports are built from heterogeneous upstream metric objects, so rows are
//! ordered JSON maps rather than fixed structs. Column order follows the
//! upstream field order of the first row (serde_json `preserve_order`).

pub mod aggregate;
pub mod cpc;
pub mod render;

pub use aggregate::aggregate;
pub use cpc::apply_cost_per_click;
pub use render::{to_csv, RenderError};

use serde_json::Value;

/// One report row: field name to string/number value, insertion-ordered.
pub type Record = serde_json::Map<String, Value>;

/// Column name for the owning platform. The upstream report contract is
/// Portuguese; these names are part of the wire format.
pub const PLATFORM_FIELD: &str = "Plataforma";
/// Column name for the owning account.
pub const ACCOUNT_FIELD: &str = "Conta";

/// Merge context columns with one upstream metric object into a flat row.
///
/// Context columns come first (platform before account); metric fields are
/// overlaid afterwards and win on a name collision.
pub fn flatten(platform: Option<&str>, account: Option<&str>, metric: &Record) -> Record {
    let mut row = Record::new();
    if let Some(platform) = platform {
        row.insert(PLATFORM_FIELD.to_string(), Value::String(platform.to_string()));
    }
    if let Some(account) = account {
        row.insert(ACCOUNT_FIELD.to_string(), Value::String(account.to_string()));
    }
    for (field, value) in metric {
        row.insert(field.clone(), value.clone());
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn context_columns_come_first_in_fixed_order() {
        let metric = rec(json!({"spend": 50, "clicks": 10}));
        let row = flatten(Some("Facebook"), Some("acc1"), &metric);

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["Plataforma", "Conta", "spend", "clicks"]);
        assert_eq!(row["Plataforma"], json!("Facebook"));
        assert_eq!(row["Conta"], json!("acc1"));
    }

    #[test]
    fn account_only_context_omits_platform() {
        let metric = rec(json!({"impressions": 3}));
        let row = flatten(None, Some("acc1"), &metric);

        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["Conta", "impressions"]);
    }

    #[test]
    fn metric_fields_override_context_on_collision() {
        let metric = rec(json!({"Conta": "from-upstream", "spend": 1}));
        let row = flatten(Some("Facebook"), Some("acc1"), &metric);

        assert_eq!(row["Conta"], json!("from-upstream"));
        // Position stays where the context put it.
        let columns: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["Plataforma", "Conta", "spend"]);
    }
}
