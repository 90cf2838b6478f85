//! Sleep calculations
//!
//! Durations are whole minutes. A bed time between 00:00 and 05:59 belongs to
//! the night that started the previous evening, so for ordering and averaging
//! it is shifted one day forward.

use crate::calendar::{TimeOfDay, MINUTES_PER_DAY};
use crate::errors::ParseError;
use crate::models::{DailyEntry, History};
use crate::types::SleepStats;
use serde::{Deserialize, Serialize};

/// Below this many minutes a night is insufficient (6h)
pub const SLEEP_NORMAL_MIN: u32 = 6 * 60;

/// Above this many minutes a night is excessive (8h)
pub const SLEEP_NORMAL_MAX: u32 = 8 * 60;

/// Bed times before this hour count as "after midnight"
const LATE_NIGHT_END_HOUR: u32 = 6;

/// Minutes slept between `bed_time` and `wake_time`, 0 when either is absent
///
/// A wake time at or before the bed time falls on the next day.
pub fn calculate_sleep_duration(bed_time: Option<TimeOfDay>, wake_time: Option<TimeOfDay>) -> u32 {
    let (Some(bed), Some(wake)) = (bed_time, wake_time) else {
        return 0;
    };
    let bed = bed.minutes_from_midnight();
    let mut wake = wake.minutes_from_midnight();
    if wake <= bed {
        wake += MINUTES_PER_DAY;
    }
    wake - bed
}

/// [`calculate_sleep_duration`] over `HH:MM` text; blank input counts as absent
pub fn sleep_duration_from_str(bed_time: &str, wake_time: &str) -> Result<u32, ParseError> {
    let parse = |text: &str| -> Result<Option<TimeOfDay>, ParseError> {
        let text = text.trim();
        if text.is_empty() {
            Ok(None)
        } else {
            text.parse().map(Some)
        }
    };
    Ok(calculate_sleep_duration(parse(bed_time)?, parse(wake_time)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepCategory {
    Insufficient,
    Normal,
    Excess,
}

/// Quality band of one night with its display attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepQuality {
    pub category: SleepCategory,
    pub display_color: &'static str,
    pub text: &'static str,
}

/// Classify a duration: `<6h` insufficient, `6h..=8h` normal, `>8h` excess
pub fn sleep_quality(minutes: u32) -> SleepQuality {
    if minutes < SLEEP_NORMAL_MIN {
        SleepQuality {
            category: SleepCategory::Insufficient,
            display_color: "#ef4444",
            text: "Too little",
        }
    } else if minutes <= SLEEP_NORMAL_MAX {
        SleepQuality {
            category: SleepCategory::Normal,
            display_color: "#10b981",
            text: "Normal",
        }
    } else {
        SleepQuality {
            category: SleepCategory::Excess,
            display_color: "#3b82f6",
            text: "Too much",
        }
    }
}

/// `7h 30m`, `8h`, or `—` for no sleep
pub fn format_sleep_duration(minutes: u32) -> String {
    if minutes == 0 {
        return "—".to_string();
    }
    let (hours, mins) = (minutes / 60, minutes % 60);
    if mins == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {mins}m")
    }
}

/// Hours with one decimal
pub fn minutes_to_hours(minutes: u32) -> f64 {
    (f64::from(minutes) / 60.0 * 10.0).round() / 10.0
}

/// Bed time as minutes on a continuous night axis (00:00..05:59 after 23:59)
pub fn bed_time_chart_minutes(bed_time: TimeOfDay) -> u32 {
    let minutes = bed_time.minutes_from_midnight();
    if bed_time.hour() < LATE_NIGHT_END_HOUR {
        minutes + MINUTES_PER_DAY
    } else {
        minutes
    }
}

/// Typical bed time: median on the night axis, folded back into one day
pub fn median_bed_time(bed_times: &[TimeOfDay]) -> Option<TimeOfDay> {
    let mut minutes: Vec<u32> = bed_times.iter().copied().map(bed_time_chart_minutes).collect();
    if minutes.is_empty() {
        return None;
    }
    minutes.sort_unstable();

    let mid = minutes.len() / 2;
    let median = if minutes.len() % 2 == 1 {
        minutes[mid]
    } else {
        (minutes[mid - 1] + minutes[mid] + 1) / 2
    };
    Some(TimeOfDay::from_minutes(median % MINUTES_PER_DAY))
}

/// Arithmetic mean of wake times, rounded to the minute
pub fn mean_wake_time(wake_times: &[TimeOfDay]) -> Option<TimeOfDay> {
    if wake_times.is_empty() {
        return None;
    }
    let total: u64 = wake_times
        .iter()
        .map(|t| u64::from(t.minutes_from_midnight()))
        .sum();
    let mean = (total as f64 / wake_times.len() as f64).round() as u32;
    Some(TimeOfDay::from_minutes(mean))
}

/// Stored duration, or the one derived from the entry's times
pub fn entry_sleep_minutes(entry: &DailyEntry) -> u32 {
    entry
        .sleep_duration
        .unwrap_or_else(|| calculate_sleep_duration(entry.bed_time, entry.wake_time))
}

/// Sleep statistics over entries that record both bed and wake time
pub fn sleep_stats(history: &History) -> SleepStats {
    let entries: Vec<&DailyEntry> = history.values().filter(|e| e.has_sleep_times()).collect();
    if entries.is_empty() {
        return SleepStats::default();
    }

    let durations: Vec<u32> = entries.iter().map(|e| entry_sleep_minutes(e)).collect();
    let total: u64 = durations.iter().copied().map(u64::from).sum();
    let bed_times: Vec<TimeOfDay> = entries.iter().filter_map(|e| e.bed_time).collect();
    let wake_times: Vec<TimeOfDay> = entries.iter().filter_map(|e| e.wake_time).collect();

    SleepStats {
        total_days: entries.len(),
        avg_duration: (total as f64 / entries.len() as f64).round() as u32,
        min_duration: durations.iter().copied().min().unwrap_or(0),
        max_duration: durations.iter().copied().max().unwrap_or(0),
        avg_bed_time: median_bed_time(&bed_times),
        avg_wake_time: mean_wake_time(&wake_times),
    }
}
