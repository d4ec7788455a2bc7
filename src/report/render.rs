//! CSV serialization of report rows.

use csv::{Terminator, WriterBuilder};
use serde_json::Value;
use thiserror::Error;

use super::Record;

/// Failure while writing the CSV body. The only error the report pipeline can
/// surface; everything upstream of rendering degrades to defaults instead.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("csv write failed: {0}")]
    Write(#[from] csv::Error),
    #[error("csv flush failed: {0}")]
    Flush(#[from] std::io::Error),
    #[error("csv output was not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Render rows as CSV text with CRLF line endings.
///
/// The header is the first row's columns, in order. Later rows align to that
/// header: missing fields render as empty cells, fields the header does not
/// know are dropped. No rows means an empty string, not a lone header.
pub fn to_csv(records: &[Record]) -> Result<String, RenderError> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let header: Vec<&String> = records[0].keys().collect();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(header.iter())?;

    for record in records {
        let row = header
            .iter()
            .map(|column| record.get(*column).map(cell_text).unwrap_or_default());
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Natural text form of a cell value: strings verbatim, numbers via their
/// JSON rendering, null as empty.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
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
    fn no_rows_renders_as_empty_string() {
        assert_eq!(to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn header_follows_first_row_column_order() {
        let rows = [rec(json!({"Plataforma": "fb", "spend": 50, "clicks": 10}))];
        let body = to_csv(&rows).unwrap();
        assert_eq!(body, "Plataforma,spend,clicks\r\nfb,50,10\r\n");
    }

    #[test]
    fn missing_fields_render_as_blank_cells() {
        let rows = [
            rec(json!({"Conta": "acc1", "spend": 50})),
            rec(json!({"Conta": "acc2"})),
        ];
        let body = to_csv(&rows).unwrap();
        assert_eq!(body, "Conta,spend\r\nacc1,50\r\nacc2,\r\n");
    }

    #[test]
    fn fields_unknown_to_the_header_are_dropped() {
        let rows = [
            rec(json!({"Conta": "acc1"})),
            rec(json!({"Conta": "acc2", "surprise": 7})),
        ];
        let body = to_csv(&rows).unwrap();
        assert_eq!(body, "Conta\r\nacc1\r\nacc2\r\n");
    }

    #[test]
    fn values_needing_quotes_are_quoted_and_escaped() {
        let rows = [rec(json!({"Conta": "ads, \"premium\"", "spend": 1}))];
        let body = to_csv(&rows).unwrap();
        assert_eq!(body, "Conta,spend\r\n\"ads, \"\"premium\"\"\",1\r\n");
    }

    #[test]
    fn numbers_render_in_natural_text_form() {
        let rows = [rec(json!({"spend": 80, "cpc": 4.0, "rate": 0.5}))];
        let body = to_csv(&rows).unwrap();
        assert_eq!(body, "spend,cpc,rate\r\n80,4.0,0.5\r\n");
    }
}
