//! Series page assembly: extraction, time axis and value coercion.

use sophist_types::{Granularity, ParseError, SeriesTable};

use crate::{ColumnHeader, RawTable, build_time_axis, extract_table, normalize_cell};

/// Fully parsed series page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    /// The typed table.
    pub table: SeriesTable,
    /// Header columns, including descriptive labels.
    pub headers: Vec<ColumnHeader>,
    /// Granularity of the time axis.
    pub granularity: Granularity,
}

/// Parses a decoded series page into a typed table.
///
/// # Errors
///
/// Returns the first [`ParseError`] met while extracting the table,
/// building its time axis or converting its cells. No partial table is
/// returned.
pub fn parse_series_page(html: &str) -> Result<ParsedPage, ParseError> {
    build_table(extract_table(html)?)
}

/// Converts raw rows into a typed table.
///
/// # Errors
///
/// Returns [`ParseError::UnrecognizedPeriod`] or
/// [`ParseError::NonMonotonicTime`] for a bad time axis and
/// [`ParseError::MalformedCell`] for a cell that is neither a number nor a
/// missing marker.
pub fn build_table(raw: RawTable) -> Result<ParsedPage, ParseError> {
    let axis = build_time_axis(
        raw.rows.iter().map(|r| r.period.as_str()),
        raw.granularity_hint(),
    )?;

    let mut rows = Vec::with_capacity(raw.rows.len());
    for (row, raw_row) in raw.rows.iter().enumerate() {
        let cells = raw_row
            .cells
            .iter()
            .zip(&raw.headers)
            .map(|(token, header)| {
                normalize_cell(token).map_err(|e| ParseError::MalformedCell {
                    row,
                    column: header.code.clone(),
                    token: e.token,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    let table = SeriesTable::new(raw.codes(), axis.dates, rows)?;
    Ok(ParsedPage {
        table,
        headers: raw.headers,
        granularity: axis.granularity,
    })
}
