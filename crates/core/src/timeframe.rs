//! Reporting timeframes and date ranges.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Inclusive UTC time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Covers every instant of the calendar days `first..=last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Result<Self> {
        let next = last
            .checked_add_days(Days::new(1))
            .ok_or_else(|| Error::date_out_of_range(format!("day after {last}")))?;
        let end = start_of_day(next) - chrono::Duration::nanoseconds(1);
        Ok(Self {
            start: start_of_day(first),
            end,
        })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether any part of `date` falls inside the range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.date_naive() <= date && date <= self.end.date_naive()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Dashboard timeframe selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    #[default]
    AllTime,
    Today,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllTime => "all_time",
            Self::Today => "today",
            Self::ThisWeek => "this_week",
            Self::LastWeek => "last_week",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
        }
    }

    /// Range covered by this timeframe at `now`. `None` means all time.
    ///
    /// Weeks start on Monday; days are UTC.
    pub fn range(&self, now: DateTime<Utc>) -> Result<Option<DateRange>> {
        let today = now.date_naive();
        match self {
            Self::AllTime => Ok(None),
            Self::Today => days_back(today, 0).map(Some),
            Self::ThisWeek => weeks_back(today, 0).map(Some),
            Self::LastWeek => weeks_back(today, 1).map(Some),
            Self::ThisMonth => months_back(today, 0).map(Some),
            Self::LastMonth => months_back(today, 1).map(Some),
        }
    }

    /// The period this timeframe is compared against: the day, week, or
    /// month immediately before `range(now)`.
    pub fn previous_range(&self, now: DateTime<Utc>) -> Result<Option<DateRange>> {
        let today = now.date_naive();
        match self {
            Self::AllTime => Ok(None),
            Self::Today => days_back(today, 1).map(Some),
            Self::ThisWeek => weeks_back(today, 1).map(Some),
            Self::LastWeek => weeks_back(today, 2).map(Some),
            Self::ThisMonth => months_back(today, 1).map(Some),
            Self::LastMonth => months_back(today, 2).map(Some),
        }
    }
}

fn days_back(today: NaiveDate, n: u64) -> Result<DateRange> {
    let day = today
        .checked_sub_days(Days::new(n))
        .ok_or_else(|| Error::date_out_of_range(format!("{n} days before {today}")))?;
    DateRange::days(day, day)
}

fn weeks_back(today: NaiveDate, n: u64) -> Result<DateRange> {
    let offset = u64::from(today.weekday().num_days_from_monday()) + 7 * n;
    let monday = today
        .checked_sub_days(Days::new(offset))
        .ok_or_else(|| Error::date_out_of_range(format!("{n} weeks before {today}")))?;
    let sunday = monday
        .checked_add_days(Days::new(6))
        .ok_or_else(|| Error::date_out_of_range(format!("week of {monday}")))?;
    DateRange::days(monday, sunday)
}

fn months_back(today: NaiveDate, n: u32) -> Result<DateRange> {
    let out_of_range = || Error::date_out_of_range(format!("{n} months before {today}"));
    let first = today
        .with_day(1)
        .and_then(|d| d.checked_sub_months(Months::new(n)))
        .ok_or_else(out_of_range)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(out_of_range)?;
    DateRange::days(first, last)
}
