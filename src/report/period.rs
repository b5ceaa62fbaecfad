//! Date filters for a report and the label printed under its title.

use chrono::{Datelike, NaiveDate};

use super::format::{format_date, month_name};
use crate::error::{ReportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    #[default]
    All,
    /// Both ends inclusive.
    Range { start: NaiveDate, end: NaiveDate },
    Month { year: i32, month: u32 },
    Year(i32),
}

impl ReportPeriod {
    /// Build a period from optional query parts. An explicit range wins over
    /// a month, which wins over a bare year.
    pub fn from_parts(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Self> {
        match (start, end, month, year) {
            (Some(start), Some(end), _, _) => {
                if start > end {
                    return Err(ReportError::InvalidPeriod(format!(
                        "start date {start} is after end date {end}"
                    )));
                }
                Ok(Self::Range { start, end })
            }
            (Some(_), None, _, _) | (None, Some(_), _, _) => Err(ReportError::InvalidPeriod(
                "a date range needs both a start and an end date".to_string(),
            )),
            (None, None, Some(month), Some(year)) => {
                if !(1..=12).contains(&month) {
                    return Err(ReportError::InvalidPeriod(format!(
                        "month {month} is not between 1 and 12"
                    )));
                }
                Ok(Self::Month { year, month })
            }
            (None, None, Some(_), None) => Err(ReportError::InvalidPeriod(
                "a month filter needs a year".to_string(),
            )),
            (None, None, None, Some(year)) => Ok(Self::Year(year)),
            (None, None, None, None) => Ok(Self::All),
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        match *self {
            Self::All => true,
            Self::Range { start, end } => start <= *date && *date <= end,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year(year) => date.year() == year,
        }
    }

    /// The period as printed under a report title. Without a filter the
    /// label spans the dates actually present; with no dates it is empty.
    pub fn label<'a, I>(&self, dates: I) -> String
    where
        I: IntoIterator<Item = &'a NaiveDate>,
    {
        match *self {
            Self::Range { start, end } => {
                format!("{} - {}", format_date(&start), format_date(&end))
            }
            Self::Month { year, month } => format!("{} {year}", month_name(month)),
            Self::Year(year) => format!("Year {year}"),
            Self::All => {
                let mut dates = dates.into_iter();
                let Some(first) = dates.next() else {
                    return String::new();
                };
                let (min, max) = dates.fold((first, first), |(min, max), d| {
                    (min.min(d), max.max(d))
                });
                format!("{} - {}", format_date(min), format_date(max))
            }
        }
    }
}
