//! Date ranges for dashboard filters
//!
//! Dashboards filter sales, production and stock movements by a period the
//! user picks from a preset list or enters by hand. This module resolves a
//! preset against "today" in the business timezone, and splits the resulting
//! range into chart buckets whose size depends on the span:
//!
//! | Span          | Bucket |
//! |---------------|--------|
//! | up to 31 days | day    |
//! | up to 92 days | week (Monday to Sunday) |
//! | longer        | calendar month |
//!
//! Buckets are clipped to the range, never overlap and cover it exactly.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use std::str::FromStr;

/// Timezone wrapper for the business location
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Returns the current calendar date in this timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.0).date_naive()
    }

    /// Gets the start of day (00:00:00) in this timezone as UTC
    ///
    /// Returns `None` when local midnight does not exist (DST gap).
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        date.and_hms_opt(0, 0, 0)?
            .and_local_timezone(self.0)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }

    /// Gets the end of day (23:59:59.999999999) in this timezone as UTC
    pub fn end_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        date.and_hms_nano_opt(23, 59, 59, 999_999_999)?
            .and_local_timezone(self.0)
            .latest()
            .map(|local| local.with_timezone(&Utc))
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::America::Sao_Paulo)
    }
}

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid range: start {start} must not be after end {end}")]
    InvalidRange {
        start: String,
        end: String,
    },

    #[error("Date out of supported range")]
    OutOfRange,
}

/// Size of each chart bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// An inclusive range of calendar dates, never inverted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = TemporalError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Creates a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// A range covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Number of days in the range, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Checks if a date falls within the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Picks the bucket size for charting this range
    pub fn granularity(&self) -> Granularity {
        match self.days() {
            d if d <= 31 => Granularity::Day,
            d if d <= 92 => Granularity::Week,
            _ => Granularity::Month,
        }
    }

    /// Splits the range into consecutive buckets at its granularity
    pub fn buckets(&self) -> Vec<DateRange> {
        let granularity = self.granularity();
        let mut buckets = Vec::new();
        let mut cursor = self.start;

        loop {
            let natural_end = match granularity {
                Granularity::Day => cursor,
                Granularity::Week => {
                    let to_sunday = 6 - cursor.weekday().num_days_from_monday();
                    cursor
                        .checked_add_days(Days::new(to_sunday as u64))
                        .unwrap_or(self.end)
                }
                Granularity::Month => end_of_month(cursor),
            };
            let bucket_end = natural_end.min(self.end);
            buckets.push(DateRange { start: cursor, end: bucket_end });

            if bucket_end >= self.end {
                break;
            }
            match bucket_end.succ_opt() {
                Some(next) => cursor = next,
                None => break,
            }
        }

        buckets
    }

    /// Converts the range to UTC instants bounding it in the given timezone
    pub fn to_utc_bounds(&self, tz: &Timezone) -> Result<(DateTime<Utc>, DateTime<Utc>), TemporalError> {
        let start = tz.start_of_day(self.start).ok_or(TemporalError::OutOfRange)?;
        let end = tz.end_of_day(self.end).ok_or(TemporalError::OutOfRange)?;
        Ok((start, end))
    }
}

/// Period choices offered by dashboard filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "snake_case")]
pub enum DateRangePreset {
    Today,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    ThisMonth,
    LastMonth,
    ThisYear,
    Custom {
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl DateRangePreset {
    /// Resolves the preset to a concrete range relative to `today`
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange, TemporalError> {
        match *self {
            DateRangePreset::Today => Ok(DateRange::single_day(today)),
            DateRangePreset::Last7Days => DateRange::new(days_before(today, 6)?, today),
            DateRangePreset::Last30Days => DateRange::new(days_before(today, 29)?, today),
            DateRangePreset::ThisMonth => DateRange::new(start_of_month(today), today),
            DateRangePreset::LastMonth => {
                let previous = start_of_month(today).pred_opt().ok_or(TemporalError::OutOfRange)?;
                DateRange::new(start_of_month(previous), previous)
            }
            DateRangePreset::ThisYear => {
                let jan_first = NaiveDate::from_ymd_opt(today.year(), 1, 1)
                    .ok_or(TemporalError::OutOfRange)?;
                DateRange::new(jan_first, today)
            }
            DateRangePreset::Custom { start, end } => DateRange::new(start, end),
        }
    }
}

fn days_before(date: NaiveDate, days: u64) -> Result<NaiveDate, TemporalError> {
    date.checked_sub_days(Days::new(days)).ok_or(TemporalError::OutOfRange)
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}
