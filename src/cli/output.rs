// Output formatting for CLI

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON, one document per line
    Json,
    /// Sorted `key: value` lines
    KeyValue,
    /// Aligned table
    Table,
}

/// Format and output data
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Serialize `value` and write it in the configured format
    pub fn output<T: Serialize>(&self, value: &T, writer: &mut impl Write) -> Result<()> {
        let value = serde_json::to_value(value)?;
        match self.format {
            OutputFormat::Pretty => writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?,
            OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string(&value)?)?,
            OutputFormat::KeyValue => self.output_key_value(&value, writer)?,
            OutputFormat::Table => self.output_table(&value, writer)?,
        }
        Ok(())
    }

    /// Output as key-value pairs, nested objects flattened with dotted keys
    fn output_key_value(&self, value: &Value, writer: &mut impl Write) -> Result<()> {
        let mut items = Vec::new();
        flatten("", value, &mut items);
        items.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, value) in items {
            writeln!(writer, "{}: {}", key, value)?;
        }
        Ok(())
    }

    /// Output as table
    fn output_table(&self, value: &Value, writer: &mut impl Write) -> Result<()> {
        let mut items = Vec::new();
        flatten("", value, &mut items);
        let max_key_len = items.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        for (key, value) in items {
            writeln!(writer, "{:<width$} {}", format!("{}:", key), value, width = max_key_len + 1)?;
        }
        writeln!(writer, "{}", "=".repeat(max_key_len + 30))?;
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let key = |name: &str| if prefix.is_empty() { name.to_string() } else { format!("{}.{}", prefix, name) };
    match value {
        Value::Object(obj) if !obj.is_empty() => {
            for (name, value) in obj {
                flatten(&key(name), value, out);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (index, value) in arr.iter().enumerate() {
                flatten(&key(&index.to_string()), value, out);
            }
        }
        _ => out.push((prefix.to_string(), format_value(value))),
    }
}

/// Format a JSON value for display
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "(null)".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(format: OutputFormat, value: &Value) -> String {
        let mut out = Vec::new();
        OutputFormatter::new(format, false).output(value, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_key_value_flattens_and_sorts() {
        let value = json!({"version": "2.3", "fields": {"TITLE": "Song", "ARTIST": "Band"}, "ids": ["TIT2"]});
        assert_eq!(
            render(OutputFormat::KeyValue, &value),
            "fields.ARTIST: Band\nfields.TITLE: Song\nids.0: TIT2\nversion: 2.3\n"
        );
    }

    #[test]
    fn test_json_is_single_line() {
        let value = json!({"covers": 0, "diagnostics": null});
        assert_eq!(render(OutputFormat::Json, &value), "{\"covers\":0,\"diagnostics\":null}\n");
    }

    #[test]
    fn test_table_aligns_keys() {
        let value = json!({"a": 1, "long_key": true});
        let table = render(OutputFormat::Table, &value);
        assert!(table.contains("a:        1\n"));
        assert!(table.contains("long_key: true\n"));
    }
}
