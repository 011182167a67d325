//! Series page table extraction.
//!
//! A series page holds one HTML table: one or more header rows carrying the
//! series codes and their descriptions, then one row per period, then an
//! optional footnote block. Rows are classified by shape and fed to a small
//! state machine that merges the header rows and collects the data rows.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use sophist_types::{Granularity, ParseError};
use std::sync::LazyLock;

use crate::detect_granularity;

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));

static ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));

static CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));

/// Series codes carry at least one `_` segment, so all-caps labels such as
/// `GDP` stay labels.
static SERIES_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)+$").expect("valid code regex"));

/// Upper bound for `colspan`, guarding against absurd attribute values.
const MAX_COLSPAN: usize = 256;

/// One merged header column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Series code, e.g. `HHI_Q_DIRI`.
    pub code: String,
    /// Descriptive label, if the header carries one.
    pub label: Option<String>,
    /// Granularity hinted by the code.
    pub granularity: Option<Granularity>,
}

impl ColumnHeader {
    fn new(code: String, label: Option<String>) -> Self {
        let granularity = Granularity::from_code(&code);
        Self {
            code,
            label,
            granularity,
        }
    }
}

/// One unparsed data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Period label from the first column.
    pub period: String,
    /// Raw cell tokens, one per header column.
    pub cells: Vec<String>,
}

/// Header and data rows of a series page, before type coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    /// Merged header columns in source order.
    pub headers: Vec<ColumnHeader>,
    /// Data rows in source order.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Returns the column codes in source order.
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.headers.iter().map(|h| h.code.clone()).collect()
    }

    /// Returns the granularity hinted by the first column code that carries one.
    #[must_use]
    pub fn granularity_hint(&self) -> Option<Granularity> {
        self.headers.iter().find_map(|h| h.granularity)
    }
}

/// Extracts the header and raw data rows from a series page.
///
/// The first `<table>` holding at least one row that starts with a period
/// label is used. Header rows are merged column by column: the first
/// non-empty series code seen top-to-bottom wins, and the first other
/// non-empty text becomes the column label. Data rows end at the table end
/// or at the first non-period row after them (the footnote block). A period
/// row after the footnote block means the table is split by a note and is
/// rejected rather than cut short.
///
/// # Errors
///
/// Returns [`ParseError::NoTableFound`] when the page has no such table, no
/// header, a header column without a code, or data rows after the footnote
/// block, and
/// [`ParseError::ColumnMismatch`] when a data row is wider or narrower than
/// the header.
pub fn extract_table(html: &str) -> Result<RawTable, ParseError> {
    let document = Html::parse_document(html);

    let grid = document
        .select(&TABLE)
        .map(table_grid)
        .find(|rows| rows.iter().any(|cells| RowShape::of(cells) == RowShape::Period))
        .ok_or_else(|| ParseError::NoTableFound("no table with period rows".to_string()))?;

    let mut scanner = TableScanner::default();
    for cells in grid {
        scanner.feed(cells)?;
    }
    scanner.finish()
}

/// Reads a table into rows of whitespace-normalized cell text, expanding `colspan`.
fn table_grid(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .select(&ROW)
        .map(|row| {
            let mut cells = Vec::new();
            for cell in row.select(&CELL) {
                let span = cell
                    .value()
                    .attr("colspan")
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, MAX_COLSPAN);
                cells.push(cell_text(cell));
                cells.extend(std::iter::repeat_n(String::new(), span - 1));
            }
            cells
        })
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let text: String = cell.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Row classification driving the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowShape {
    /// Every cell is empty.
    Blank,
    /// First cell is a period label.
    Period,
    /// Anything else: header text or footnotes.
    Other,
}

impl RowShape {
    fn of(cells: &[String]) -> Self {
        if cells.iter().all(String::is_empty) {
            Self::Blank
        } else if cells
            .first()
            .is_some_and(|first| detect_granularity(first).is_some())
        {
            Self::Period
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ScanState {
    #[default]
    AwaitingHeader,
    MergingHeaderRow,
    InDataRows,
    Done,
}

#[derive(Debug, Default)]
struct TableScanner {
    state: ScanState,
    header: HeaderMerger,
    rows: Vec<Vec<String>>,
}

impl TableScanner {
    fn feed(&mut self, cells: Vec<String>) -> Result<(), ParseError> {
        let shape = RowShape::of(&cells);
        self.state = match (self.state, shape) {
            (state, RowShape::Blank) | (state @ ScanState::Done, RowShape::Other) => state,
            (ScanState::Done, RowShape::Period) => {
                return Err(ParseError::NoTableFound(
                    "data rows after footnote block".to_string(),
                ));
            }
            (ScanState::AwaitingHeader, RowShape::Period) => {
                return Err(ParseError::NoTableFound(
                    "data rows precede the header".to_string(),
                ));
            }
            (ScanState::AwaitingHeader | ScanState::MergingHeaderRow, RowShape::Other) => {
                self.header.merge(&cells);
                ScanState::MergingHeaderRow
            }
            (ScanState::MergingHeaderRow | ScanState::InDataRows, RowShape::Period) => {
                self.rows.push(cells);
                ScanState::InDataRows
            }
            (ScanState::InDataRows, RowShape::Other) => ScanState::Done,
        };
        Ok(())
    }

    fn finish(self) -> Result<RawTable, ParseError> {
        if self.rows.is_empty() {
            return Err(ParseError::NoTableFound("table has no data rows".to_string()));
        }

        let headers = self.header.finish()?;
        let width = headers.len();

        let rows = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(row, mut cells)| {
                let mut values = cells.split_off(1);
                while values.len() > width && values.last().is_some_and(String::is_empty) {
                    values.pop();
                }
                if values.len() != width {
                    return Err(ParseError::ColumnMismatch {
                        row,
                        expected: width,
                        found: values.len(),
                    });
                }
                Ok(RawRow {
                    period: cells.swap_remove(0),
                    cells: values,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawTable { headers, rows })
    }
}

/// Accumulates header rows; position 0 is the period column and is skipped.
#[derive(Debug, Default)]
struct HeaderMerger {
    codes: Vec<Option<String>>,
    labels: Vec<Option<String>>,
}

impl HeaderMerger {
    fn merge(&mut self, cells: &[String]) {
        let width = cells.len().saturating_sub(1);
        if self.codes.len() < width {
            self.codes.resize(width, None);
            self.labels.resize(width, None);
        }

        for (pos, text) in cells.iter().skip(1).enumerate() {
            if text.is_empty() {
                continue;
            }
            let slot = if SERIES_CODE.is_match(text) {
                &mut self.codes[pos]
            } else {
                &mut self.labels[pos]
            };
            if slot.is_none() {
                *slot = Some(text.clone());
            }
        }
    }

    fn finish(self) -> Result<Vec<ColumnHeader>, ParseError> {
        let width = self
            .codes
            .iter()
            .zip(&self.labels)
            .rposition(|(code, label)| code.is_some() || label.is_some())
            .map_or(0, |last| last + 1);

        if width == 0 {
            return Err(ParseError::NoTableFound(
                "header has no series codes".to_string(),
            ));
        }

        self.codes
            .into_iter()
            .zip(self.labels)
            .take(width)
            .enumerate()
            .map(|(pos, (code, label))| {
                code.map(|code| ColumnHeader::new(code, label)).ok_or_else(|| {
                    ParseError::NoTableFound(format!(
                        "header column {} has no series code",
                        pos + 1
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTHLY_PAGE: &str = include_str!("../../../fixtures/HHI_M_I.htm");
    const QUARTERLY_PAGE: &str = include_str!("../../../fixtures/HHI_Q_I.htm");

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_monthly_fixture() {
        let table = extract_table(MONTHLY_PAGE).unwrap();
        assert_eq!(table.codes(), vec!["HHI_M_DIRI", "HHI_M_DIRI_SA", "HHI_M"]);
        assert_eq!(table.granularity_hint(), Some(Granularity::Monthly));
        assert_eq!(table.rows[1].period, "2010 2");
        assert_eq!(table.rows[1].cells[1], "85,4");
        assert!(table.headers[0].label.is_some());
        // footnote rows are not data
        assert!(table.rows.iter().all(|r| detect_granularity(&r.period).is_some()));
    }

    #[test]
    fn test_quarterly_fixture_split_header() {
        let table = extract_table(QUARTERLY_PAGE).unwrap();
        assert_eq!(table.codes(), vec!["HHI_Q_DIRI", "HHI_Q_DIRI_SA", "HHI_Q"]);
        assert_eq!(table.rows[0].period, "2005 I");
    }

    #[test]
    fn test_first_code_wins() {
        let mut merger = HeaderMerger::default();
        merger.merge(&cells(&["T", "A_Q", ""]));
        merger.merge(&cells(&["", "B_Q", "C_Q"]));
        merger.merge(&cells(&["", "Описание A", "Описание C"]));
        let headers = merger.finish().unwrap();

        assert_eq!(headers[0].code, "A_Q");
        assert_eq!(headers[0].label.as_deref(), Some("Описание A"));
        assert_eq!(headers[1].code, "C_Q");
        assert_eq!(headers[1].granularity, Some(Granularity::Quarterly));
    }

    #[test]
    fn test_all_caps_label_is_not_a_code() {
        let mut merger = HeaderMerger::default();
        merger.merge(&cells(&["", "GDP", "CPI"]));
        merger.merge(&cells(&["T", "GDP_Q_R", "CPI_M"]));
        let headers = merger.finish().unwrap();

        assert_eq!(headers[0].code, "GDP_Q_R");
        assert_eq!(headers[0].label.as_deref(), Some("GDP"));
        assert_eq!(headers[1].code, "CPI_M");
        assert_eq!(headers[1].label.as_deref(), Some("CPI"));
    }

    #[test]
    fn test_header_column_without_code() {
        let mut merger = HeaderMerger::default();
        merger.merge(&cells(&["T", "A_Y", "только текст"]));
        assert!(matches!(merger.finish(), Err(ParseError::NoTableFound(_))));
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut scanner = TableScanner::default();
        scanner.feed(cells(&["", ""])).unwrap();
        assert_eq!(scanner.state, ScanState::AwaitingHeader);
        scanner.feed(cells(&["T", "A_Y"])).unwrap();
        assert_eq!(scanner.state, ScanState::MergingHeaderRow);
        scanner.feed(cells(&["2001", "1,5"])).unwrap();
        assert_eq!(scanner.state, ScanState::InDataRows);
        scanner.feed(cells(&["", ""])).unwrap();
        assert_eq!(scanner.state, ScanState::InDataRows);
        scanner.feed(cells(&["2002", "2,5"])).unwrap();
        scanner.feed(cells(&["Примечание", ""])).unwrap();
        assert_eq!(scanner.state, ScanState::Done);
        scanner.feed(cells(&["Источник: Росстат", ""])).unwrap();
        scanner.feed(cells(&["", ""])).unwrap();
        assert_eq!(scanner.state, ScanState::Done);

        let table = scanner.finish().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].cells, vec!["2,5"]);
    }

    #[test]
    fn test_period_row_after_footnote() {
        let mut scanner = TableScanner::default();
        scanner.feed(cells(&["T", "A_Y"])).unwrap();
        scanner.feed(cells(&["2001", "1,5"])).unwrap();
        scanner.feed(cells(&["Примечание", ""])).unwrap();
        let result = scanner.feed(cells(&["2002", "2,5"]));
        assert!(matches!(result, Err(ParseError::NoTableFound(_))));
    }

    #[test]
    fn test_note_inside_data_rows_is_rejected() {
        let html = r#"<table>
            <tr><td>T</td><td>A_Y</td></tr>
            <tr><td>2001</td><td>1,0</td></tr>
            <tr><td>2002</td><td>2,0</td></tr>
            <tr><td>в постоянных ценах</td><td></td></tr>
            <tr><td>2003</td><td>3,0</td></tr>
            <tr><td>2004</td><td>4,0</td></tr>
        </table>"#;
        assert_eq!(
            extract_table(html),
            Err(ParseError::NoTableFound(
                "data rows after footnote block".to_string()
            ))
        );
    }

    #[test]
    fn test_data_before_header() {
        let mut scanner = TableScanner::default();
        let result = scanner.feed(cells(&["2001", "1,5"]));
        assert!(matches!(result, Err(ParseError::NoTableFound(_))));
    }

    #[test]
    fn test_column_mismatch() {
        let html = r#"<table>
            <tr><td>T</td><td>A_Y</td><td>B_Y</td></tr>
            <tr><td>2001</td><td>1,0</td><td>2,0</td></tr>
            <tr><td>2002</td><td>1,0</td></tr>
        </table>"#;
        assert_eq!(
            extract_table(html),
            Err(ParseError::ColumnMismatch {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_trailing_blank_cells_are_ignored() {
        let html = r#"<table>
            <tr><td>T</td><td>A_Y</td></tr>
            <tr><td>2001</td><td>1,0</td><td></td><td>&nbsp;</td></tr>
        </table>"#;
        let table = extract_table(html).unwrap();
        assert_eq!(table.rows[0].cells, vec!["1,0"]);
    }

    #[test]
    fn test_colspan_expands_cells() {
        let html = r#"<table>
            <tr><td colspan="3">Индексы</td></tr>
            <tr><td>T</td><td>A_Y</td><td>B_Y</td></tr>
            <tr><td>2001</td><td colspan="2">&mdash;</td></tr>
        </table>"#;
        let table = extract_table(html).unwrap();
        assert_eq!(table.codes(), vec!["A_Y", "B_Y"]);
        assert_eq!(table.rows[0].cells, vec!["\u{2014}", ""]);
    }

    #[test]
    fn test_layout_table_is_skipped() {
        let html = r#"<table><tr><td>menu</td></tr></table>
            <table>
            <tr><td>T</td><td>A_Y</td></tr>
            <tr><td>2001</td><td>1</td></tr>
            </table>"#;
        let table = extract_table(html).unwrap();
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_no_table() {
        let result = extract_table("<html><body><p>Страница не найдена</p></body></html>");
        assert!(matches!(result, Err(ParseError::NoTableFound(_))));
    }
}
