//! CSV output format.

use sophist_types::SeriesTable;
use std::io::Write;

use crate::{FormatError, Formatter};

/// Date format of the time axis column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// CSV formatter.
///
/// Values are written in their shortest round-trip form and missing
/// observations as empty fields, so the output reads back losslessly.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }

    /// Returns the field delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    fn write_field<W: Write>(&self, writer: &mut W, field: &str) -> std::io::Result<()> {
        if field.contains([self.delimiter, '"', '\n', '\r']) {
            write!(writer, "\"{}\"", field.replace('"', "\"\""))
        } else {
            writer.write_all(field.as_bytes())
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_table<W: Write + Send>(
        &self,
        table: &SeriesTable,
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            write!(writer, "{}", table.index_name())?;
            for code in table.columns() {
                write!(writer, "{d}")?;
                self.write_field(&mut writer, code)?;
            }
            writeln!(writer)?;
        }

        for row in table.iter() {
            write!(writer, "{}", row.date().format(DATE_FORMAT))?;
            for cell in row.cells() {
                match cell {
                    Some(value) => write!(writer, "{d}{value}")?,
                    None => write!(writer, "{d}")?,
                }
            }
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_test_table() -> SeriesTable {
        SeriesTable::new(
            vec!["HHI_Q_DIRI".to_string(), "HHI_Q".to_string()],
            vec![
                NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2005, 4, 1).unwrap(),
            ],
            vec![vec![Some(98.4), None], vec![Some(112.6), Some(1234.5)]],
        )
        .unwrap()
    }

    fn render(formatter: &CsvFormatter, table: &SeriesTable) -> String {
        let mut output = Vec::new();
        formatter.write_table(table, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_csv_table() {
        let result = render(&CsvFormatter::new(), &create_test_table());
        assert_eq!(
            result,
            "T,HHI_Q_DIRI,HHI_Q\n2005-01-01,98.4,\n2005-04-01,112.6,1234.5\n"
        );
    }

    #[test]
    fn test_csv_no_header() {
        let result = render(&CsvFormatter::new().with_header(false), &create_test_table());
        assert!(result.starts_with("2005-01-01"));
    }

    #[test]
    fn test_tsv() {
        let formatter = CsvFormatter::tsv();
        let result = render(&formatter, &create_test_table());
        assert!(result.starts_with("T\tHHI_Q_DIRI\tHHI_Q\n"));
        assert_eq!(formatter.extension(), "tsv");
    }

    #[test]
    fn test_whole_numbers_stay_short() {
        let table = SeriesTable::new(
            vec!["A_Y".to_string()],
            vec![NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()],
            vec![vec![Some(100.0)]],
        )
        .unwrap();
        assert_eq!(render(&CsvFormatter::new(), &table), "T,A_Y\n2020-01-01,100\n");
    }

    #[test]
    fn test_field_quoting() {
        let table = SeriesTable::new(vec!["A,B".to_string()], vec![], vec![]).unwrap();
        assert_eq!(render(&CsvFormatter::new(), &table), "T,\"A,B\"\n");
    }
}
