//! Error types for sophist.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for sophist operations.
pub type Result<T> = std::result::Result<T, SophistError>;

/// Stable classification of a [`SophistError`].
///
/// Callers match on the kind instead of the message text, e.g. to tell an
/// unknown series apart from a page whose layout changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The remote catalog has no page for the requested series.
    SeriesNotFound,
    /// The series name is empty or contains characters unusable in a URL or file name.
    InvalidSeriesName,
    /// The page was fetched but holds no parseable table.
    NoTableFound,
    /// A data row does not have one cell per header column.
    ColumnMismatch,
    /// A cell is neither a number nor a missing-value sentinel.
    MalformedCell,
    /// A period label matches none of the known grammars.
    UnrecognizedPeriod,
    /// Period labels are not strictly increasing.
    NonMonotonicTime,
    /// Network, disk or cache I/O failure.
    Transport,
    /// Export formatting failure.
    Format,
}

impl ErrorKind {
    /// Returns the kind as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SeriesNotFound => "series_not_found",
            Self::InvalidSeriesName => "invalid_series_name",
            Self::NoTableFound => "no_table_found",
            Self::ColumnMismatch => "column_mismatch",
            Self::MalformedCell => "malformed_cell",
            Self::UnrecognizedPeriod => "unrecognized_period",
            Self::NonMonotonicTime => "non_monotonic_time",
            Self::Transport => "transport",
            Self::Format => "format",
        }
    }

    /// Returns true for errors raised while parsing a fetched page.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::NoTableFound
                | Self::ColumnMismatch
                | Self::MalformedCell
                | Self::UnrecognizedPeriod
                | Self::NonMonotonicTime
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while turning a series page into a [`SeriesTable`](crate::SeriesTable).
///
/// Row numbers are zero-based positions among the data rows of the table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// No tabular structure with a header and data rows was found.
    #[error("No table found: {0}")]
    NoTableFound(String),

    /// Row width differs from the header width.
    #[error("Column mismatch in row {row}: expected {expected} cells, found {found}")]
    ColumnMismatch {
        /// Data row index.
        row: usize,
        /// Number of header columns.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },

    /// Cell token is not numeric and not a missing-value sentinel.
    #[error("Malformed cell in row {row}, column {column}: {token:?}")]
    MalformedCell {
        /// Data row index.
        row: usize,
        /// Column code of the cell.
        column: String,
        /// The raw token.
        token: String,
    },

    /// Period label does not match the table's granularity grammar.
    #[error("Unrecognized period label in row {row}: {label:?}")]
    UnrecognizedPeriod {
        /// Data row index.
        row: usize,
        /// The raw label.
        label: String,
    },

    /// Period timestamps are not strictly increasing.
    #[error("Non-monotonic time axis at row {row}: {current} follows {previous}")]
    NonMonotonicTime {
        /// Data row index of the offending period.
        row: usize,
        /// Timestamp of the preceding row.
        previous: NaiveDate,
        /// Timestamp of the offending row.
        current: NaiveDate,
    },
}

impl ParseError {
    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NoTableFound(_) => ErrorKind::NoTableFound,
            Self::ColumnMismatch { .. } => ErrorKind::ColumnMismatch,
            Self::MalformedCell { .. } => ErrorKind::MalformedCell,
            Self::UnrecognizedPeriod { .. } => ErrorKind::UnrecognizedPeriod,
            Self::NonMonotonicTime { .. } => ErrorKind::NonMonotonicTime,
        }
    }
}

/// Errors that can occur while listing, fetching or caching series.
#[derive(Error, Debug)]
pub enum SophistError {
    /// The remote catalog has no page for this series.
    #[error("Series not found: {0}")]
    SeriesNotFound(String),

    /// Series name cannot be used to build a URL or cache slot.
    #[error("Invalid series name: {0:?}")]
    InvalidSeriesName(String),

    /// Page parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// HTTP request failed.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Cache directory could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),
}

impl SophistError {
    /// Returns the stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SeriesNotFound(_) => ErrorKind::SeriesNotFound,
            Self::InvalidSeriesName(_) => ErrorKind::InvalidSeriesName,
            Self::Parse(e) => e.kind(),
            Self::Transport(_) | Self::Storage(_) | Self::Io(_) => ErrorKind::Transport,
            Self::Format(_) => ErrorKind::Format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_kind_passes_through() {
        let err: SophistError = ParseError::ColumnMismatch {
            row: 3,
            expected: 2,
            found: 4,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::ColumnMismatch);
        assert!(err.kind().is_parse());
    }

    #[test]
    fn test_transport_kinds() {
        let io = SophistError::Io(std::io::Error::other("disk full"));
        assert_eq!(io.kind(), ErrorKind::Transport);
        assert_eq!(
            SophistError::Storage("x".to_string()).kind(),
            ErrorKind::Transport
        );
        assert!(!ErrorKind::Transport.is_parse());
    }

    #[test]
    fn test_not_found_message() {
        let err = SophistError::SeriesNotFound("GDP_Q_I".to_string());
        assert_eq!(err.kind(), ErrorKind::SeriesNotFound);
        assert_eq!(err.to_string(), "Series not found: GDP_Q_I");
    }
}
