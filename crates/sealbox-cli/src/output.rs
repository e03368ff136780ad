//! Output formatting for account records.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde_json::{json, Value};

use sealbox_core::{AccountId, VaultIndex};

use crate::errors::CliError;

/// Output format for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Plain,
}

pub fn parse_output_format(value: Option<&str>) -> Result<OutputFormat, CliError> {
    match value {
        None | Some("table") => Ok(OutputFormat::Table),
        Some("plain") => Ok(OutputFormat::Plain),
        Some(other) => Err(CliError::invalid_input(format!(
            "Unsupported format: {} (use table or plain)",
            other
        ))),
    }
}

fn text_field<'a>(record: &'a Value, key: &str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn account_json(id: &AccountId, record: &Value) -> Value {
    json!({ "id": id, "record": record })
}

pub fn accounts_json(index: &VaultIndex) -> Value {
    Value::Array(
        index
            .iter()
            .map(|(id, record)| account_json(id, record))
            .collect(),
    )
}

pub fn print_account_list(index: &VaultIndex, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "USERNAME", "URL"]);
            for (id, record) in index {
                table.add_row(vec![
                    id.to_string(),
                    text_field(record, "name").to_string(),
                    text_field(record, "username").to_string(),
                    text_field(record, "url").to_string(),
                ]);
            }
            println!("{}", table);
        }
        OutputFormat::Plain => {
            for (id, record) in index {
                println!("{}\t{}", id, text_field(record, "name"));
            }
        }
    }
}

pub fn print_account(id: &AccountId, record: &Value) {
    println!("ID: {}", id);
    match record.as_object() {
        Some(fields) => {
            for (key, value) in fields {
                match value {
                    Value::String(text) => println!("{}: {}", key, text),
                    other => println!("{}: {}", key, other),
                }
            }
        }
        None => println!("{}", record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format(None).unwrap(), OutputFormat::Table);
        assert_eq!(parse_output_format(Some("plain")).unwrap(), OutputFormat::Plain);
        assert!(parse_output_format(Some("csv")).is_err());
    }

    #[test]
    fn test_text_field_ignores_non_strings() {
        let record = json!({ "name": "github", "port": 22 });
        assert_eq!(text_field(&record, "name"), "github");
        assert_eq!(text_field(&record, "port"), "");
        assert_eq!(text_field(&record, "missing"), "");
    }

    #[test]
    fn test_account_json_shape() {
        let id: AccountId = "abcd1234".parse().unwrap();
        let value = account_json(&id, &json!({ "name": "github" }));
        assert_eq!(value["id"], "abcd1234");
        assert_eq!(value["record"]["name"], "github");
    }
}
