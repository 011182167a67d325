//! Period label parsing.
//!
//! A label names one period of a series and is mapped to the first day of
//! that period. Supported label shapes:
//!
//! | granularity | examples                                        |
//! |-------------|-------------------------------------------------|
//! | annual      | `2010`, `2010 г.`, `2010 год`                   |
//! | quarterly   | `2010 I`, `2010 IV кв.`, `2010 Q3`, `II кв. 2010` |
//! | monthly     | `2010 1`, `2010-01`, `01.2010`, `январь 2010`, `2010 янв.` |

use chrono::NaiveDate;
use regex::{Captures, Regex};
use sophist_types::{Granularity, ParseError};
use std::sync::LazyLock;

static ANNUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?:\s*(?:г\.?|год))?$").expect("valid annual regex")
});

static QUARTER_ROMAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})\s*-?\s*(?P<roman>IV|I{1,3})(?:\s*кв\.?)?$")
        .expect("valid quarter regex")
});

static QUARTER_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})\s*-?\s*[QqКк](?P<quarter>[1-4])$").expect("valid quarter regex")
});

static QUARTER_LEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<roman>IV|I{1,3})\s*кв\.?\s*(?P<year>\d{4})(?:\s*г\.?)?$")
        .expect("valid quarter regex")
});

static MONTH_NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})\s*[-./ ]\s*(?P<month>\d{1,2})$").expect("valid month regex")
});

static MONTH_YEAR_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<month>\d{1,2})\.(?P<year>\d{4})$").expect("valid month regex")
});

static MONTH_NAME_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})\s*(?P<name>\p{L}{3,})\.?$").expect("valid month regex")
});

static MONTH_NAME_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\p{L}{3,})\.?\s*(?P<year>\d{4})(?:\s*г\.?)?$")
        .expect("valid month regex")
});

/// Month name prefixes, Russian and English.
const MONTH_PREFIXES: &[(&str, u32)] = &[
    ("янв", 1),
    ("фев", 2),
    ("мар", 3),
    ("апр", 4),
    ("май", 5),
    ("мая", 5),
    ("июн", 6),
    ("июл", 7),
    ("авг", 8),
    ("сен", 9),
    ("окт", 10),
    ("ноя", 11),
    ("дек", 12),
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

/// Canonical time axis of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeAxis {
    /// Granularity shared by every label.
    pub granularity: Granularity,
    /// Period start dates, strictly increasing.
    pub dates: Vec<NaiveDate>,
}

/// Parses a period label under a known granularity.
///
/// Returns the first day of the period, or `None` if the label does not
/// match that granularity's grammar.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use sophist_parse::parse_period;
/// use sophist_types::Granularity;
///
/// assert_eq!(
///     parse_period("2010 III", Granularity::Quarterly),
///     NaiveDate::from_ymd_opt(2010, 7, 1)
/// );
/// assert_eq!(parse_period("2010 III", Granularity::Monthly), None);
/// ```
#[must_use]
pub fn parse_period(label: &str, granularity: Granularity) -> Option<NaiveDate> {
    parse_normalized(&normalize_label(label), granularity)
}

/// Infers the granularity from the shape of a single label.
#[must_use]
pub fn detect_granularity(label: &str) -> Option<Granularity> {
    let label = normalize_label(label);
    Granularity::all()
        .iter()
        .copied()
        .find(|g| parse_normalized(&label, *g).is_some())
}

/// Builds the time axis for the labels of one table, in source order.
///
/// The granularity comes from `hint` when the first label parses under it,
/// otherwise from the shape of the first label. Every label must then parse
/// under that granularity.
///
/// # Errors
///
/// Returns [`ParseError::UnrecognizedPeriod`] for a label that does not
/// match, [`ParseError::NonMonotonicTime`] if a period does not come strictly
/// after the previous one, and [`ParseError::NoTableFound`] if there are no
/// labels at all.
pub fn build_time_axis<I, S>(labels: I, hint: Option<Granularity>) -> Result<TimeAxis, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let labels: Vec<S> = labels.into_iter().collect();
    let first = labels
        .first()
        .ok_or_else(|| ParseError::NoTableFound("table has no data rows".to_string()))?;

    let first_label = normalize_label(first.as_ref());
    let granularity = hint
        .filter(|g| parse_normalized(&first_label, *g).is_some())
        .or_else(|| detect_granularity(&first_label))
        .ok_or_else(|| ParseError::UnrecognizedPeriod {
            row: 0,
            label: first.as_ref().to_string(),
        })?;

    let mut dates: Vec<NaiveDate> = Vec::with_capacity(labels.len());
    for (row, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        let current =
            parse_period(label, granularity).ok_or_else(|| ParseError::UnrecognizedPeriod {
                row,
                label: label.to_string(),
            })?;

        if let Some(&previous) = dates.last() {
            if current <= previous {
                return Err(ParseError::NonMonotonicTime {
                    row,
                    previous,
                    current,
                });
            }
        }
        dates.push(current);
    }

    Ok(TimeAxis { granularity, dates })
}

/// Collapses whitespace and drops trailing footnote markers.
fn normalize_label(label: &str) -> String {
    let collapsed = label.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches('*').trim_end().to_string()
}

fn parse_normalized(label: &str, granularity: Granularity) -> Option<NaiveDate> {
    let (year, month) = match granularity {
        Granularity::Annual => (year(&ANNUAL.captures(label)?)?, 1),
        Granularity::Quarterly => {
            let (year, quarter) = quarter(label)?;
            (year, 3 * (quarter - 1) + 1)
        }
        Granularity::Monthly => month(label)?,
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn quarter(label: &str) -> Option<(i32, u32)> {
    for re in [&*QUARTER_ROMAN, &*QUARTER_LEADING] {
        if let Some(caps) = re.captures(label) {
            return Some((year(&caps)?, roman_quarter(&caps["roman"])?));
        }
    }
    let caps = QUARTER_NUMERIC.captures(label)?;
    Some((year(&caps)?, caps["quarter"].parse().ok()?))
}

fn month(label: &str) -> Option<(i32, u32)> {
    for re in [&*MONTH_NUMERIC, &*MONTH_YEAR_LAST] {
        if let Some(caps) = re.captures(label) {
            let month: u32 = caps["month"].parse().ok()?;
            return (1..=12).contains(&month).then_some((year(&caps)?, month));
        }
    }
    for re in [&*MONTH_NAME_AFTER, &*MONTH_NAME_BEFORE] {
        if let Some(caps) = re.captures(label) {
            return Some((year(&caps)?, month_by_name(&caps["name"])?));
        }
    }
    None
}

fn year(caps: &Captures<'_>) -> Option<i32> {
    caps["year"].parse().ok()
}

fn roman_quarter(roman: &str) -> Option<u32> {
    match roman {
        "I" => Some(1),
        "II" => Some(2),
        "III" => Some(3),
        "IV" => Some(4),
        _ => None,
    }
}

fn month_by_name(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    MONTH_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, month)| *month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_annual_labels() {
        assert_eq!(parse_period("2010", Granularity::Annual), Some(date(2010, 1)));
        assert_eq!(parse_period("2010 г.", Granularity::Annual), Some(date(2010, 1)));
        assert_eq!(parse_period(" 2010* ", Granularity::Annual), Some(date(2010, 1)));
        assert_eq!(parse_period("2010 I", Granularity::Annual), None);
    }

    #[test]
    fn test_quarterly_labels() {
        assert_eq!(parse_period("2010 I", Granularity::Quarterly), Some(date(2010, 1)));
        assert_eq!(parse_period("2010 II", Granularity::Quarterly), Some(date(2010, 4)));
        assert_eq!(parse_period("2010\u{a0}IV", Granularity::Quarterly), Some(date(2010, 10)));
        assert_eq!(parse_period("2010 III кв.", Granularity::Quarterly), Some(date(2010, 7)));
        assert_eq!(parse_period("2010-Q2", Granularity::Quarterly), Some(date(2010, 4)));
        assert_eq!(parse_period("2010 К3", Granularity::Quarterly), Some(date(2010, 7)));
        assert_eq!(parse_period("IV кв. 2010", Granularity::Quarterly), Some(date(2010, 10)));
        assert_eq!(parse_period("2010 V", Granularity::Quarterly), None);
        assert_eq!(parse_period("2010 Q5", Granularity::Quarterly), None);
    }

    #[test]
    fn test_monthly_labels() {
        assert_eq!(parse_period("2010 1", Granularity::Monthly), Some(date(2010, 1)));
        assert_eq!(parse_period("2010 12", Granularity::Monthly), Some(date(2010, 12)));
        assert_eq!(parse_period("2010-03", Granularity::Monthly), Some(date(2010, 3)));
        assert_eq!(parse_period("07.2010", Granularity::Monthly), Some(date(2010, 7)));
        assert_eq!(parse_period("январь 2010", Granularity::Monthly), Some(date(2010, 1)));
        assert_eq!(parse_period("2010 мая", Granularity::Monthly), Some(date(2010, 5)));
        assert_eq!(parse_period("Sep 2010", Granularity::Monthly), Some(date(2010, 9)));
        assert_eq!(parse_period("2010 13", Granularity::Monthly), None);
        assert_eq!(parse_period("2010 0", Granularity::Monthly), None);
        assert_eq!(parse_period("2010 II", Granularity::Monthly), None);
    }

    #[test]
    fn test_detect_granularity() {
        assert_eq!(detect_granularity("1995 III"), Some(Granularity::Quarterly));
        assert_eq!(detect_granularity("1995 3"), Some(Granularity::Monthly));
        assert_eq!(detect_granularity("1995"), Some(Granularity::Annual));
        assert_eq!(detect_granularity("T"), None);
        assert_eq!(detect_granularity("Источник: Росстат"), None);
    }

    #[test]
    fn test_build_time_axis() {
        let axis = build_time_axis(["2009 IV", "2010 I", "2010 II"], None).unwrap();
        assert_eq!(axis.granularity, Granularity::Quarterly);
        assert_eq!(axis.dates, vec![date(2009, 10), date(2010, 1), date(2010, 4)]);
    }

    #[test]
    fn test_hint_is_ignored_when_labels_disagree() {
        let axis = build_time_axis(["2010", "2011"], Some(Granularity::Monthly)).unwrap();
        assert_eq!(axis.granularity, Granularity::Annual);
    }

    #[test]
    fn test_mixed_granularity_is_unrecognized() {
        let result = build_time_axis(["2010 1", "2010 II"], None);
        assert_eq!(
            result,
            Err(ParseError::UnrecognizedPeriod {
                row: 1,
                label: "2010 II".to_string()
            })
        );
    }

    #[test]
    fn test_non_monotonic_axis() {
        let result = build_time_axis(["2010 2", "2010 3", "2010 3"], None);
        assert_eq!(
            result,
            Err(ParseError::NonMonotonicTime {
                row: 2,
                previous: date(2010, 3),
                current: date(2010, 3)
            })
        );
    }

    #[test]
    fn test_empty_labels() {
        let labels: [&str; 0] = [];
        assert!(matches!(
            build_time_axis(labels, None),
            Err(ParseError::NoTableFound(_))
        ));
    }
}
