//! Grouping and summing of report rows.

use std::collections::HashMap;

use serde_json::{Number, Value};

use super::Record;

/// Group rows by the value of `group_key`, in first-occurrence order.
///
/// The first row of each group is copied whole. Every later row merges field
/// by field (the group key itself is skipped): numeric values are added onto
/// the accumulator, treating an absent accumulator field as zero; any
/// non-numeric value blanks the field to `""`, even when it matches the value
/// already there. Booleans count as non-numeric. Rows without the group key,
/// or with a null value there, contribute to no group and are dropped.
pub fn aggregate(records: &[Record], group_key: &str) -> Vec<Record> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Record> = Vec::new();

    for record in records {
        let key_value = match record.get(group_key) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };
        // JSON rendering keeps string keys distinct from numeric ones.
        let key = key_value.to_string();

        match index.get(&key) {
            None => {
                index.insert(key, groups.len());
                groups.push(record.clone());
            }
            Some(&slot) => {
                let accumulator = &mut groups[slot];
                for (field, value) in record {
                    if field == group_key {
                        continue;
                    }
                    let merged = match value {
                        Value::Number(incoming) => add(accumulator.get(field), incoming),
                        _ => Value::String(String::new()),
                    };
                    accumulator.insert(field.clone(), merged);
                }
            }
        }
    }

    groups
}

/// Add an incoming number onto the accumulator's current value. Integer sums
/// stay integers until a float contributes or the sum leaves the i64 range;
/// anything non-numeric in the accumulator reads as zero.
fn add(current: Option<&Value>, incoming: &Number) -> Value {
    let current = current.and_then(Value::as_number);

    if let (Some(a), Some(b)) = (current.and_then(Number::as_i64), incoming.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return Value::from(sum);
        }
    }

    let a = current.and_then(Number::as_f64).unwrap_or(0.0);
    let b = incoming.as_f64().unwrap_or(0.0);
    Number::from_f64(a + b).map(Value::Number).unwrap_or_else(|| Value::from(0))
}
