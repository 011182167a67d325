//! JSON output format.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use sophist_types::{Row, SeriesTable};
use std::io::Write;

use crate::{DATE_FORMAT, FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
///
/// Each row becomes one record keyed by `T` and the column codes, in
/// column order. Missing observations are `null`.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }
}

struct Record<'a>(Row<'a>);

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let row = self.0;
        let mut map = serializer.serialize_map(Some(row.cells().len() + 1))?;
        map.serialize_entry(
            sophist_types::INDEX_NAME,
            &row.date().format(DATE_FORMAT).to_string(),
        )?;
        for (code, value) in row.entries() {
            map.serialize_entry(code, &value)?;
        }
        map.end()
    }
}

struct Records<'a>(&'a SeriesTable);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0.iter() {
            seq.serialize_element(&Record(row))?;
        }
        seq.end()
    }
}

impl Formatter for JsonFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &SeriesTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, &Records(table))?;
                } else {
                    serde_json::to_writer(&mut writer, &Records(table))?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for row in table.iter() {
                    serde_json::to_writer(&mut writer, &Record(row))?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_table() -> SeriesTable {
        SeriesTable::new(
            vec!["HHI_M_DIRI".to_string(), "HHI_M".to_string()],
            vec![
                NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2010, 2, 1).unwrap(),
            ],
            vec![vec![Some(80.1), Some(102.3)], vec![Some(82.7), None]],
        )
        .unwrap()
    }

    fn render(formatter: &JsonFormatter) -> String {
        let mut output = Vec::new();
        formatter
            .write_table(&create_test_table(), &mut output)
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_json_array() {
        let result = render(&JsonFormatter::new());
        assert_eq!(
            result,
            "[{\"T\":\"2010-01-01\",\"HHI_M_DIRI\":80.1,\"HHI_M\":102.3},\
             {\"T\":\"2010-02-01\",\"HHI_M_DIRI\":82.7,\"HHI_M\":null}]\n"
        );
    }

    #[test]
    fn test_ndjson() {
        let formatter = JsonFormatter::ndjson();
        let result = render(&formatter);
        let lines: Vec<_> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with("\"HHI_M\":null}"));
        assert_eq!(formatter.extension(), "ndjson");
    }

    #[test]
    fn test_pretty_json() {
        let result = render(&JsonFormatter::new().with_pretty(true));
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed[0]["HHI_M_DIRI"], 80.1);
        assert!(result.contains("  "));
    }
}
