//! Calendar utilities
//!
//! Every temporal computation in the tracker keys off a [`DateKey`], a local
//! calendar date encoded as `YYYY-MM-DD`. Time of day is discarded, so day
//! arithmetic is DST-agnostic. Weeks always run Monday to Sunday.

use crate::errors::ParseError;
use crate::validation::is_valid_date_key;
use chrono::{
    DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes in one calendar day
pub const MINUTES_PER_DAY: u32 = 24 * 60;

// ============================================================================
// DateKey
// ============================================================================

/// Canonical calendar date in the user's local calendar
///
/// Ordering of keys is chronological, which is also the lexicographic
/// ordering of their `YYYY-MM-DD` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's key from the local wall clock
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Shift by `days` (negative moves backwards); saturates at the calendar bounds
    pub fn add_days(self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }

    /// Weekday index with 0 = Sunday .. 6 = Saturday
    pub fn weekday_index(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// The Monday starting the week that contains this key
    pub fn monday(self) -> Self {
        match self.weekday_index() {
            0 => self.add_days(-6),
            weekday => self.add_days(-(i64::from(weekday) - 1)),
        }
    }

    /// First day of this key's month
    pub fn month_start(self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    /// `YYYY-MM` prefix of the canonical encoding
    pub fn month_prefix(&self) -> String {
        format!("{:04}-{:02}", self.0.year(), self.0.month())
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Keys from `self` up to (excluding) `end`, in order
    pub fn range_until(self, end: DateKey) -> impl Iterator<Item = DateKey> {
        let mut current = self;
        std::iter::from_fn(move || {
            if current >= end {
                return None;
            }
            let key = current;
            current = current.add_days(1);
            Some(key)
        })
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_date_key(s) {
            return Err(ParseError::DateKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ParseError::DateKey(s.to_string()))
    }
}

impl TryFrom<String> for DateKey {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.to_string()
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<NaiveDateTime> for DateKey {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.date())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateKey {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self(datetime.date_naive())
    }
}

// ============================================================================
// TimeOfDay
// ============================================================================

/// Local wall-clock time of day encoded as `HH:MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Build from minutes past midnight, wrapping into a single day
    pub fn from_minutes(minutes: u32) -> Self {
        let minutes = minutes % MINUTES_PER_DAY;
        Self(NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default())
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minutes_from_midnight(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for TimeOfDay {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|_| ParseError::TimeOfDay(s.to_string()))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(time: TimeOfDay) -> Self {
        time.to_string()
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Normalize any date-like value to its local-midnight key
pub fn date_key(date: impl Into<DateKey>) -> DateKey {
    date.into()
}

pub fn add_days(key: DateKey, days: i64) -> DateKey {
    key.add_days(days)
}

pub fn monday_of(key: DateKey) -> DateKey {
    key.monday()
}

/// The seven consecutive keys starting at `monday`
pub fn week_days(monday: DateKey) -> [DateKey; 7] {
    std::array::from_fn(|i| monday.add_days(i as i64))
}

/// Whole days from `from` to `to` (negative when `to` is earlier)
pub fn days_between(from: DateKey, to: DateKey) -> i64 {
    (to.0 - from.0).num_days()
}

/// Shift a month start by `months` (negative moves backwards)
pub fn add_months(month_start: DateKey, months: i32) -> DateKey {
    let date = month_start.0;
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    DateKey(shifted.unwrap_or(date))
}

/// Month owning the majority of a Monday-aligned week, as its first day
///
/// Four of seven days always share the Thursday's month.
pub fn month_of_week(monday: DateKey) -> DateKey {
    monday.add_days(3).month_start()
}

/// Display string such as `17 October 2026`
pub fn format_date(key: DateKey) -> String {
    key.0.format("%-d %B %Y").to_string()
}

/// Short weekday name such as `Mon`
pub fn day_name(key: DateKey) -> String {
    key.0.format("%a").to_string()
}

/// Display string such as `October 2026`
pub fn format_month(key: DateKey) -> String {
    key.0.format("%B %Y").to_string()
}

/// Week label: `2–8 January`, or `29 January – 4 February` across months
pub fn format_week_period(monday: DateKey) -> String {
    let sunday = monday.add_days(6);
    let start_month = monday.0.format("%B");
    if monday.month() == sunday.month() {
        format!("{}–{} {}", monday.day(), sunday.day(), start_month)
    } else {
        format!(
            "{} {} – {} {}",
            monday.day(),
            start_month,
            sunday.day(),
            sunday.0.format("%B")
        )
    }
}
