//! CSV encoding of cached tables.
//!
//! The header is `T` followed by the column codes. Each record holds the
//! period start as `YYYY-MM-DD` and one field per column, empty when the
//! observation is missing.

use chrono::NaiveDate;
use csv_async::AsyncReaderBuilder;
use futures::StreamExt;
use sophist_format::{CsvFormatter, DATE_FORMAT, FormatError, Formatter};
use sophist_types::{INDEX_NAME, ParseError, SeriesTable};
use thiserror::Error;
use tokio::io::AsyncRead;

/// Errors raised while decoding a cached table.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Malformed CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    /// The first header field is not the time axis.
    #[error("expected time axis 'T' as first column, found {0:?}")]
    MissingIndex(String),

    /// A date field failed to parse.
    #[error("row {row}: invalid date {value:?}")]
    Date {
        /// Zero-based record position.
        row: usize,
        /// The raw field.
        value: String,
    },

    /// A value field failed to parse.
    #[error("row {row}, column {column}: invalid value {value:?}")]
    Value {
        /// Zero-based record position.
        row: usize,
        /// Column code.
        column: String,
        /// The raw field.
        value: String,
    },

    /// The decoded rows do not form a valid table.
    #[error(transparent)]
    Shape(#[from] ParseError),
}

/// Encodes a table into its cached CSV form.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn encode_table(table: &SeriesTable) -> Result<Vec<u8>, FormatError> {
    let mut buf = Vec::new();
    CsvFormatter::new().write_table(table, &mut buf)?;
    Ok(buf)
}

/// Decodes a table from its cached CSV form.
///
/// # Errors
///
/// Returns [`CodecError`] for malformed CSV, a missing time axis column,
/// unparsable fields or a table that violates its shape invariants.
pub async fn decode_table<R>(reader: R) -> Result<SeriesTable, CodecError>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv = AsyncReaderBuilder::new()
        .has_headers(true)
        .create_reader(reader);

    let headers = csv.headers().await?.clone();
    let mut fields = headers.iter();
    match fields.next() {
        Some(INDEX_NAME) => {}
        other => return Err(CodecError::MissingIndex(other.unwrap_or_default().to_string())),
    }
    let columns: Vec<String> = fields.map(str::to_string).collect();

    let mut index = Vec::new();
    let mut rows = Vec::new();
    let mut records = csv.records();
    while let Some(record) = records.next().await {
        let record = record?;
        let row = index.len();

        let date_field = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_field, DATE_FORMAT).map_err(|_| {
            CodecError::Date {
                row,
                value: date_field.to_string(),
            }
        })?;

        let cells = record
            .iter()
            .skip(1)
            .zip(&columns)
            .map(|(field, column)| {
                if field.is_empty() {
                    return Ok(None);
                }
                field.parse::<f64>().map(Some).map_err(|_| CodecError::Value {
                    row,
                    column: column.clone(),
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        index.push(date);
        rows.push(cells);
    }

    Ok(SeriesTable::new(columns, index, rows)?)
}
