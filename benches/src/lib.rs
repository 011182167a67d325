//! Synthetic inputs for sophist benchmarks.

use chrono::{Datelike, NaiveDate};
use sophist_lib::Granularity;
use std::fmt::Write;

const QUARTERS: [&str; 4] = ["I", "II", "III", "IV"];

/// Returns the row label the catalog uses for the period starting at `start`.
pub fn period_label(granularity: Granularity, start: NaiveDate) -> String {
    match granularity {
        Granularity::Annual => start.year().to_string(),
        Granularity::Quarterly => {
            let quarter = QUARTERS[(start.month0() / 3) as usize];
            format!("{} {quarter}", start.year())
        }
        Granularity::Monthly => format!("{} {}", start.year(), start.month()),
    }
}

fn code_suffix(granularity: Granularity) -> char {
    match granularity {
        Granularity::Annual => 'Y',
        Granularity::Quarterly => 'Q',
        Granularity::Monthly => 'M',
    }
}

/// Builds a series page with `rows` periods from January 1995 and
/// `columns` value columns.
///
/// Every seventh cell is blank and every eleventh uses a thousands
/// separator, so the number normalizer sees realistic input.
pub fn series_page(granularity: Granularity, rows: usize, columns: usize) -> String {
    let suffix = code_suffix(granularity);
    let mut html = String::from("<html><body><table border=\"1\">\n<tr><td>T</td>");
    for col in 0..columns {
        let _ = write!(html, "<td>BENCH{col}_{suffix}</td>");
    }
    html.push_str("</tr>\n<tr><td></td>");
    for col in 0..columns {
        let _ = write!(html, "<td>Показатель {col}</td>");
    }
    html.push_str("</tr>\n");

    let mut start = NaiveDate::from_ymd_opt(1995, 1, 1);
    for row in 0..rows {
        let Some(date) = start else { break };
        let _ = write!(html, "<tr><td>{}</td>", period_label(granularity, date));
        for col in 0..columns {
            let n = row * columns + col;
            if n % 7 == 0 {
                html.push_str("<td></td>");
            } else if n % 11 == 0 {
                let _ = write!(html, "<td>1&nbsp;{:03},{}</td>", n % 1000, n % 10);
            } else {
                let _ = write!(html, "<td>{},{}</td>", 50 + n % 100, n % 10);
            }
        }
        html.push_str("</tr>\n");
        start = granularity.next_period(date);
    }

    html.push_str("</table></body></html>\n");
    html
}

/// Builds a catalog index listing `entries` series pages.
pub fn catalog_page(entries: usize) -> String {
    let mut html = String::from("<html><body><pre><A HREF=\"/hse/1/\">[To Parent Directory]</A><br><br>");
    for i in 0..entries {
        let day = i % 28 + 1;
        let hour = i % 12 + 1;
        let meridiem = if i % 2 == 0 { "AM" } else { "PM" };
        let _ = write!(
            html,
            " 3/{day}/2024 {hour}:05 {meridiem} {size} <A HREF=\"/hse/1/tables/S{i}_M.htm\">S{i}_M.htm</A><br>",
            size = 10_000 + i * 37,
        );
    }
    html.push_str("</pre></body></html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_labels() {
        let date = NaiveDate::from_ymd_opt(2010, 7, 1).unwrap();
        assert_eq!(period_label(Granularity::Monthly, date), "2010 7");
        assert_eq!(period_label(Granularity::Quarterly, date), "2010 III");
        assert_eq!(period_label(Granularity::Annual, date), "2010");
    }

    #[test]
    fn test_series_page_parses() {
        for granularity in Granularity::all().iter().copied() {
            let page = sophist_lib::parse_series_page(&series_page(granularity, 40, 3)).unwrap();
            assert_eq!(page.granularity, granularity);
            assert_eq!(page.table.len(), 40);
            assert_eq!(page.table.width(), 3);
        }
    }

    #[test]
    fn test_catalog_page_parses() {
        let entries = sophist_lib::parse_catalog(&catalog_page(25));
        assert_eq!(entries.len(), 25);
        assert_eq!(entries[3].name, "S3_M");
    }
}
