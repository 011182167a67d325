//! Period granularity of a series.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Time resolution of the periods in a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Four periods per year.
    Quarterly,
    /// Twelve periods per year.
    Monthly,
    /// One period per year.
    Annual,
}

impl Granularity {
    /// Returns the number of periods in one year.
    #[must_use]
    pub const fn periods_per_year(&self) -> u32 {
        match self {
            Self::Quarterly => 4,
            Self::Monthly => 12,
            Self::Annual => 1,
        }
    }

    /// Returns the length of one period in months.
    #[must_use]
    pub const fn months(&self) -> u32 {
        12 / self.periods_per_year()
    }

    /// Returns the granularity as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    /// Returns all granularities.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Quarterly, Self::Monthly, Self::Annual]
    }

    /// Derives a granularity hint from a series code.
    ///
    /// Catalog codes carry the resolution as an underscore-separated
    /// segment: `HHI_Q_DIRI` is quarterly, `HHI_M` monthly, `HHI_C_Y` annual.
    /// The first matching segment wins.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        code.split('_').skip(1).find_map(|segment| match segment {
            "Q" => Some(Self::Quarterly),
            "M" => Some(Self::Monthly),
            "Y" => Some(Self::Annual),
            _ => None,
        })
    }

    /// Returns the start of the period following the one starting at `start`.
    #[must_use]
    pub fn next_period(&self, start: NaiveDate) -> Option<NaiveDate> {
        start.checked_add_months(Months::new(self.months()))
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = GranularityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "q" | "quarter" | "quarterly" => Ok(Self::Quarterly),
            "m" | "month" | "monthly" => Ok(Self::Monthly),
            "y" | "a" | "year" | "annual" | "yearly" => Ok(Self::Annual),
            _ => Err(GranularityParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid granularity string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GranularityParseError(String);

impl std::fmt::Display for GranularityParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid granularity '{}', expected one of: quarterly, monthly, annual",
            self.0
        )
    }
}

impl std::error::Error for GranularityParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Granularity::from_code("HHI_Q_DIRI"), Some(Granularity::Quarterly));
        assert_eq!(Granularity::from_code("HHI_M"), Some(Granularity::Monthly));
        assert_eq!(Granularity::from_code("HHI_C_Y"), Some(Granularity::Annual));
        assert_eq!(Granularity::from_code("GDP_DIRI"), None);
        // the leading segment is the indicator name, never a resolution
        assert_eq!(Granularity::from_code("M_DIRI"), None);
    }

    #[test]
    fn test_next_period() {
        let start = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
        assert_eq!(
            Granularity::Quarterly.next_period(start),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn test_granularity_parse() {
        assert_eq!("Q".parse::<Granularity>().unwrap(), Granularity::Quarterly);
        assert_eq!("monthly".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!("year".parse::<Granularity>().unwrap(), Granularity::Annual);
        assert!("weekly".parse::<Granularity>().is_err());
    }
}
