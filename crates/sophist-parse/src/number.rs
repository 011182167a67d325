//! Numeric cell normalization.
//!
//! Catalog pages format numbers the Russian way: a comma decimal separator
//! and spaces (often no-break spaces) as thousands markers.

use thiserror::Error;

/// Tokens that denote a missing observation.
pub const MISSING_SENTINELS: &[&str] = &[
    "-", "\u{2013}", "\u{2014}", "...", "\u{2026}", "x", "X", "н/д", "нд", "NA", "N/A", "n/a",
    "NaN",
];

/// Characters used as thousands markers.
const THOUSANDS_MARKERS: &[char] = &[' ', '\u{a0}', '\u{202f}', '\u{2009}', '\''];

/// Error for a token that is neither numeric nor a missing sentinel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed numeric cell {token:?}")]
pub struct MalformedCell {
    /// The raw token.
    pub token: String,
}

/// Converts a raw cell token into a value or an explicit missing marker.
///
/// Returns `Ok(None)` for empty tokens and [`MISSING_SENTINELS`].
///
/// # Errors
///
/// Returns [`MalformedCell`] for any other token that does not parse as a
/// finite number.
///
/// # Example
///
/// ```
/// use sophist_parse::normalize_cell;
///
/// assert_eq!(normalize_cell("85,4"), Ok(Some(85.4)));
/// assert_eq!(normalize_cell("12 345,6"), Ok(Some(12345.6)));
/// assert_eq!(normalize_cell(""), Ok(None));
/// assert!(normalize_cell("n.a.").is_err());
/// ```
pub fn normalize_cell(token: &str) -> Result<Option<f64>, MalformedCell> {
    let trimmed = token.trim();
    if trimmed.is_empty() || MISSING_SENTINELS.contains(&trimmed) {
        return Ok(None);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !THOUSANDS_MARKERS.contains(c))
        .map(|c| match c {
            ',' => '.',
            '\u{2212}' => '-',
            other => other,
        })
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(MalformedCell {
            token: token.to_string(),
        }),
    }
}
