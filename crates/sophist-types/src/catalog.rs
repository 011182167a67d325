//! Catalog entry representation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One series listed on the catalog index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Last modification time shown by the listing (server local time).
    #[serde(rename = "date")]
    pub last_modified: NaiveDateTime,
    /// Series name, without the page extension.
    pub name: String,
    /// Page size in bytes.
    pub size: u64,
}

impl CatalogEntry {
    /// Creates a new catalog entry.
    #[must_use]
    pub const fn new(last_modified: NaiveDateTime, name: String, size: u64) -> Self {
        Self {
            last_modified,
            name,
            size,
        }
    }

    /// Returns the granularity hinted by the series name, if any.
    #[must_use]
    pub fn granularity_hint(&self) -> Option<crate::Granularity> {
        crate::Granularity::from_code(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Granularity;
    use chrono::NaiveDate;

    #[test]
    fn test_serializes_as_date_and_name() {
        let modified = NaiveDate::from_ymd_opt(2024, 2, 12)
            .unwrap()
            .and_hms_opt(15, 15, 0)
            .unwrap();
        let entry = CatalogEntry::new(modified, "HHI_Q_I".to_string(), 45873);

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-02-12T15:15:00","name":"HHI_Q_I","size":45873}"#
        );
        assert_eq!(entry.granularity_hint(), Some(Granularity::Quarterly));
    }
}
