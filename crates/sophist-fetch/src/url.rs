//! Catalog URL construction.

/// Default catalog location.
pub const TABLES_URL: &str = "http://sophist.hse.ru/hse/1/tables/";

/// Extension of series pages on the catalog server.
pub const PAGE_EXTENSION: &str = ".htm";

/// Builds the URL of one series page.
///
/// URL format: `{tables_url}{name}.htm`. A missing trailing slash on
/// `tables_url` is added.
///
/// # Example
///
/// ```
/// use sophist_fetch::url::{TABLES_URL, series_url};
///
/// assert_eq!(
///     series_url(TABLES_URL, "HHI_Q_I"),
///     "http://sophist.hse.ru/hse/1/tables/HHI_Q_I.htm"
/// );
/// ```
#[must_use]
pub fn series_url(tables_url: &str, name: &str) -> String {
    if tables_url.ends_with('/') {
        format!("{tables_url}{name}{PAGE_EXTENSION}")
    } else {
        format!("{tables_url}/{name}{PAGE_EXTENSION}")
    }
}
