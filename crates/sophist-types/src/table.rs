//! Parsed series table.

use chrono::NaiveDate;

use crate::ParseError;

/// Name of the time axis of every [`SeriesTable`].
pub const INDEX_NAME: &str = "T";

/// A time-indexed statistical table.
///
/// Column codes keep the source column order. Every row holds exactly one
/// cell per column, with `None` marking a missing observation, and the time
/// axis is strictly increasing. Both invariants are checked by
/// [`SeriesTable::new`], so every value of this type satisfies them.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTable {
    columns: Vec<String>,
    index: Vec<NaiveDate>,
    rows: Vec<Vec<Option<f64>>>,
}

impl SeriesTable {
    /// Creates a table, validating its shape and time axis.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::ColumnMismatch`] if the number of rows differs
    /// from the axis length or a row is wider or narrower than the column
    /// list, and [`ParseError::NonMonotonicTime`] if the axis is not strictly
    /// increasing.
    pub fn new(
        columns: Vec<String>,
        index: Vec<NaiveDate>,
        rows: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, ParseError> {
        if rows.len() != index.len() {
            return Err(ParseError::ColumnMismatch {
                row: rows.len().min(index.len()),
                expected: index.len(),
                found: rows.len(),
            });
        }

        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != columns.len())
        {
            return Err(ParseError::ColumnMismatch {
                row,
                expected: columns.len(),
                found: cells.len(),
            });
        }

        for (row, pair) in index.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ParseError::NonMonotonicTime {
                    row: row + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }

        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Returns the name of the time axis, always [`INDEX_NAME`].
    #[must_use]
    pub const fn index_name(&self) -> &'static str {
        INDEX_NAME
    }

    /// Returns the column codes in source order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the time axis.
    #[must_use]
    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Returns the raw row storage.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<f64>>] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns the position of a column code.
    #[must_use]
    pub fn column_position(&self, code: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == code)
    }

    /// Returns all values of one column, in time order.
    #[must_use]
    pub fn column(&self, code: &str) -> Option<Vec<Option<f64>>> {
        let pos = self.column_position(code)?;
        Some(self.rows.iter().map(|cells| cells[pos]).collect())
    }

    /// Returns the value at a row position and column code.
    ///
    /// The outer `Option` is `None` when the position or code does not
    /// exist, the inner one when the observation is missing.
    #[must_use]
    pub fn value(&self, row: usize, code: &str) -> Option<Option<f64>> {
        let pos = self.column_position(code)?;
        self.rows.get(row).map(|cells| cells[pos])
    }

    /// Returns the row at a position.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<Row<'_>> {
        Some(Row {
            date: *self.index.get(row)?,
            columns: &self.columns,
            cells: self.rows.get(row)?,
        })
    }

    /// Returns the row for a period start date.
    #[must_use]
    pub fn row_at(&self, date: NaiveDate) -> Option<Row<'_>> {
        let row = self.index.binary_search(&date).ok()?;
        self.row(row)
    }

    /// Iterates over rows in time order.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.index
            .iter()
            .zip(&self.rows)
            .map(|(date, cells)| Row {
                date: *date,
                columns: &self.columns,
                cells,
            })
    }

    /// Returns the first and last period of the table.
    #[must_use]
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.index.first()?, *self.index.last()?))
    }

    /// Returns the number of missing observations.
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.rows.iter().flatten().filter(|v| v.is_none()).count()
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    date: NaiveDate,
    columns: &'a [String],
    cells: &'a [Option<f64>],
}

impl<'a> Row<'a> {
    /// Returns the period start of this row.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the cells in column order.
    #[must_use]
    pub const fn cells(&self) -> &'a [Option<f64>] {
        self.cells
    }

    /// Returns the value of one column.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Option<f64>> {
        let pos = self.columns.iter().position(|c| c == code)?;
        Some(self.cells[pos])
    }

    /// Iterates over `(code, value)` pairs in column order.
    pub fn entries(self) -> impl Iterator<Item = (&'a str, Option<f64>)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn create_test_table() -> SeriesTable {
        SeriesTable::new(
            vec!["HHI_Q_DIRI".to_string(), "HHI_Q".to_string()],
            vec![date(2020, 1), date(2020, 4), date(2020, 7)],
            vec![
                vec![Some(82.1), Some(101.0)],
                vec![Some(85.4), None],
                vec![None, Some(99.5)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let table = create_test_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.width(), 2);
        assert_eq!(table.index_name(), "T");
        assert_eq!(table.missing_count(), 2);
        assert_eq!(table.date_span(), Some((date(2020, 1), date(2020, 7))));
    }

    #[test]
    fn test_value_lookup() {
        let table = create_test_table();
        assert_relative_eq!(table.value(1, "HHI_Q_DIRI").unwrap().unwrap(), 85.4);
        assert_eq!(table.value(1, "HHI_Q"), Some(None));
        assert_eq!(table.value(1, "UNKNOWN"), None);
        assert_eq!(table.value(9, "HHI_Q"), None);
        assert_eq!(
            table.column("HHI_Q"),
            Some(vec![Some(101.0), None, Some(99.5)])
        );
    }

    #[test]
    fn test_row_views() {
        let table = create_test_table();
        let row = table.row_at(date(2020, 7)).unwrap();
        assert_eq!(row.date(), date(2020, 7));
        assert_eq!(row.get("HHI_Q_DIRI"), Some(None));
        let entries: Vec<_> = row.entries().collect();
        assert_eq!(entries, vec![("HHI_Q_DIRI", None), ("HHI_Q", Some(99.5))]);
        assert_eq!(table.iter().count(), 3);
        assert!(table.row_at(date(2021, 1)).is_none());
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let result = SeriesTable::new(
            vec!["A_M".to_string(), "B_M".to_string()],
            vec![date(2020, 1), date(2020, 2)],
            vec![vec![Some(1.0), Some(2.0)], vec![Some(3.0)]],
        );
        assert!(matches!(
            result,
            Err(ParseError::ColumnMismatch {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_rejects_row_count_mismatch() {
        let result = SeriesTable::new(
            vec!["A_M".to_string()],
            vec![date(2020, 1), date(2020, 2)],
            vec![vec![Some(1.0)]],
        );
        assert!(matches!(result, Err(ParseError::ColumnMismatch { .. })));
    }

    #[test]
    fn test_rejects_non_monotonic_axis() {
        let result = SeriesTable::new(
            vec!["A_Y".to_string()],
            vec![date(2020, 1), date(2020, 1)],
            vec![vec![Some(1.0)], vec![Some(2.0)]],
        );
        assert!(matches!(
            result,
            Err(ParseError::NonMonotonicTime { row: 1, .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = SeriesTable::new(vec!["A_Y".to_string()], vec![], vec![]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.date_span(), None);
    }
}
