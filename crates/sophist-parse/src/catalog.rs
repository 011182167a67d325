//! Catalog index parsing.
//!
//! The catalog is an IIS-style directory listing where every entry sits on
//! its own `<br>`-separated line:
//!
//! ```text
//!  2/12/2024  3:15 PM        45873 <A HREF="/hse/1/tables/HHI_Q_I.htm">HHI_Q_I.htm</A><br>
//! ```

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Captures, Regex};
use sophist_types::CatalogEntry;
use std::sync::LazyLock;

/// File extensions of series pages, compared case-insensitively.
pub const PAGE_EXTENSIONS: &[&str] = &[".htm", ".html"];

static LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid break regex"));

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?P<month>\d{1,2})/(?P<day>\d{1,2})/(?P<year>\d{4})\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})\s+(?P<meridiem>[AP]M)\s+(?P<size>\d+)\s+<a\b[^>]*>(?P<name>[^<]+)</a>",
    )
    .expect("valid entry regex")
});

/// Parses a catalog listing into entries, in source order.
///
/// Lines that do not match the listing format, directory lines, entries
/// with impossible timestamps and files that are not series pages are
/// skipped. The page extension is removed from the returned names.
/// Duplicate names are kept as listed.
#[must_use]
pub fn parse_catalog(html: &str) -> Vec<CatalogEntry> {
    LINE_BREAK
        .split(html)
        .filter_map(|line| ENTRY.captures(line))
        .filter_map(|caps| parse_entry(&caps))
        .collect()
}

fn parse_entry(caps: &Captures<'_>) -> Option<CatalogEntry> {
    let name = strip_page_extension(caps["name"].trim())?;
    if name.is_empty() {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        caps["year"].parse().ok()?,
        caps["month"].parse().ok()?,
        caps["day"].parse().ok()?,
    )?;

    let hour12: u32 = caps["hour"].parse().ok()?;
    if !(1..=12).contains(&hour12) {
        return None;
    }
    let pm = caps["meridiem"].eq_ignore_ascii_case("PM");
    let hour = match (hour12, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    let time = NaiveTime::from_hms_opt(hour, caps["minute"].parse().ok()?, 0)?;

    let size = caps["size"].parse().ok()?;
    Some(CatalogEntry::new(
        NaiveDateTime::new(date, time),
        name.to_string(),
        size,
    ))
}

fn strip_page_extension(file: &str) -> Option<&str> {
    let lower = file.to_ascii_lowercase();
    PAGE_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file[..file.len() - ext.len()])
}
