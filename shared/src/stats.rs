//! Aggregation over a user's history
//!
//! Every function is a pure computation over a borrowed snapshot. `today` is
//! passed in explicitly so results never depend on the wall clock. Weekly
//! buckets are Monday-aligned and the current week stops at `today`.
//!
//! Weekly and monthly functions return exactly the requested number of
//! buckets, oldest first. An empty bucket reports `count == 0` with no
//! average, or a 0% completion for binary metrics.

use crate::calendar::{
    add_months, format_month, format_week_period, month_of_week, week_days, DateKey,
};
use crate::measurements::{current_weight, start_weight};
use crate::models::{
    BinaryMetric, DailyEntry, History, Measurements, Metric, NutritionLevel, UserProfile,
    WaterLevel,
};
use crate::sleep::sleep_stats;
use crate::types::{
    AbsoluteStats, AllTimeStats, BinaryBucket, NumericBucket, NutritionAverage, NutritionBucket,
    NutritionDistribution, PeriodStats, SeriesPoint, WaterAverage, WaterBucket,
};

/// Tie-break order for the dominant nutrition level
pub const NUTRITION_PRIORITY: [NutritionLevel; 5] = [
    NutritionLevel::MildUndereating,
    NutritionLevel::OnPlan,
    NutritionLevel::MildOvereating,
    NutritionLevel::SevereUndereating,
    NutritionLevel::SevereOvereating,
];

/// Round half towards positive infinity
/// Most weekly buckets a report may ask for
pub const MAX_WEEKS: usize = 52;

/// Most monthly buckets a report may ask for
pub const MAX_MONTHS: usize = 24;

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// Windows
// ============================================================================

/// Mondays of the last `weeks_count` weeks ending with the week of `today`
fn week_starts(weeks_count: usize, today: DateKey) -> impl Iterator<Item = DateKey> {
    let current = today.monday();
    (0..weeks_count)
        .rev()
        .map(move |w| current.add_days(-7 * w as i64))
}

/// The days of a week that are not after `today`
fn elapsed_days(monday: DateKey, today: DateKey) -> impl Iterator<Item = DateKey> {
    week_days(monday).into_iter().filter(move |day| *day <= today)
}

/// First days of the last `months_count` months ending with the month of `today`
fn month_starts(months_count: usize, today: DateKey) -> impl Iterator<Item = DateKey> {
    let current = today.month_start();
    (0..months_count)
        .rev()
        .map(move |m| add_months(current, -(m as i32)))
}

/// Running min/max/sum over integer values
#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: i64,
    count: u32,
    min: Option<i64>,
    max: Option<i64>,
}

impl Accumulator {
    fn push(&mut self, value: i64) {
        self.sum += value;
        self.count += 1;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / f64::from(self.count))
    }

    fn avg(&self) -> Option<i64> {
        self.mean().map(round_half_up)
    }

    fn into_bucket(self, period: String, start: DateKey) -> NumericBucket {
        NumericBucket {
            period,
            start,
            avg: self.avg(),
            min: self.min,
            max: self.max,
            count: self.count,
        }
    }
}

fn accumulate(
    history: &History,
    days: impl Iterator<Item = DateKey>,
    metric: Metric,
) -> Accumulator {
    let mut acc = Accumulator::default();
    for value in days.filter_map(|day| history.get(&day).and_then(|e| e.value(metric))) {
        acc.push(value);
    }
    acc
}

fn binary_counts(
    history: &History,
    days: impl Iterator<Item = DateKey>,
    metric: BinaryMetric,
) -> (u32, u32) {
    days.filter_map(|day| history.get(&day).and_then(|e| e.flag(metric)))
        .fold((0, 0), |(done, total), flag| {
            (done + u32::from(flag.is_done()), total + 1)
        })
}

// ============================================================================
// Series
// ============================================================================

/// Recorded values of the seven days ending `today`, oldest first
///
/// Days without an entry are omitted. An entry that lacks the metric
/// reports 0.
pub fn last_7_days(history: &History, metric: Metric, today: DateKey) -> Vec<SeriesPoint> {
    today
        .add_days(-6)
        .range_until(today.add_days(1))
        .filter_map(|date| {
            history.get(&date).map(|entry| SeriesPoint {
                date,
                value: entry.value(metric).unwrap_or(0),
            })
        })
        .collect()
}

// ============================================================================
// Weekly buckets
// ============================================================================

/// Done/total of a flag per week, counting entries that carry the flag
pub fn weekly_binary_stats(
    history: &History,
    metric: BinaryMetric,
    weeks_count: usize,
    today: DateKey,
) -> Vec<BinaryBucket> {
    week_starts(weeks_count, today)
        .map(|monday| {
            let (done, total) = binary_counts(history, elapsed_days(monday, today), metric);
            BinaryBucket {
                period: format_week_period(monday),
                start: monday,
                stats: PeriodStats::from_counts(done, total),
            }
        })
        .collect()
}

pub fn weekly_numeric_stats(
    history: &History,
    metric: Metric,
    weeks_count: usize,
    today: DateKey,
) -> Vec<NumericBucket> {
    week_starts(weeks_count, today)
        .map(|monday| {
            accumulate(history, elapsed_days(monday, today), metric)
                .into_bucket(format_week_period(monday), monday)
        })
        .collect()
}

/// Weekly water levels with labels for avg, min and max
pub fn weekly_water_stats(
    history: &History,
    weeks_count: usize,
    today: DateKey,
) -> Vec<WaterBucket> {
    let label = |level: Option<i64>| {
        level
            .and_then(WaterLevel::label_for)
            .map(str::to_string)
    };
    weekly_numeric_stats(history, Metric::Water, weeks_count, today)
        .into_iter()
        .map(|stats| WaterBucket {
            avg_label: label(stats.avg),
            min_label: label(stats.min),
            max_label: label(stats.max),
            stats,
        })
        .collect()
}

/// Most frequent level, ties broken by [`NUTRITION_PRIORITY`]
pub fn dominant_nutrition(distribution: &NutritionDistribution) -> Option<NutritionLevel> {
    let mut best: Option<(NutritionLevel, u32)> = None;
    for level in NUTRITION_PRIORITY {
        let count = distribution.count(level);
        if count == 0 {
            continue;
        }
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((level, count));
        }
    }
    best.map(|(level, _)| level)
}

fn nutrition_distribution<'a>(
    entries: impl Iterator<Item = &'a DailyEntry>,
) -> NutritionDistribution {
    let mut distribution = NutritionDistribution::default();
    for level in entries.filter_map(|e| e.nutrition) {
        distribution.record(level);
    }
    distribution
}

/// Weekly nutrition as a distribution with its dominant level
pub fn weekly_nutrition_stats(
    history: &History,
    weeks_count: usize,
    today: DateKey,
) -> Vec<NutritionBucket> {
    week_starts(weeks_count, today)
        .map(|monday| {
            let distribution =
                nutrition_distribution(elapsed_days(monday, today).filter_map(|d| history.get(&d)));
            let dominant = dominant_nutrition(&distribution);
            NutritionBucket {
                period: format_week_period(monday),
                start: monday,
                count: distribution.total(),
                distribution,
                dominant,
                dominant_label: dominant.map(|level| level.label().to_string()),
            }
        })
        .collect()
}

// ============================================================================
// Monthly buckets
// ============================================================================

/// Numeric metric per calendar month, the current month stopping at `today`
pub fn monthly_stats(
    history: &History,
    metric: Metric,
    months_count: usize,
    today: DateKey,
) -> Vec<NumericBucket> {
    let tomorrow = today.add_days(1);
    month_starts(months_count, today)
        .map(|start| {
            let end = add_months(start, 1).min(tomorrow);
            let mut acc = Accumulator::default();
            for value in history
                .range(start..end)
                .filter_map(|(_, entry)| entry.value(metric))
            {
                acc.push(value);
            }
            acc.into_bucket(format_month(start), start)
        })
        .collect()
}

/// Flag completion per month, each week counted wholly in its majority month
pub fn monthly_binary_stats(
    history: &History,
    metric: BinaryMetric,
    months_count: usize,
    today: DateKey,
) -> Vec<BinaryBucket> {
    let starts: Vec<DateKey> = month_starts(months_count, today).collect();
    let mut counts = vec![(0u32, 0u32); starts.len()];

    if let Some(first) = starts.first() {
        let last_monday = today.monday();
        let mut monday = first.monday();
        while monday <= last_monday {
            let owner = month_of_week(monday);
            if let Some(slot) = starts.iter().position(|s| *s == owner) {
                let (done, total) = binary_counts(history, elapsed_days(monday, today), metric);
                counts[slot].0 += done;
                counts[slot].1 += total;
            }
            monday = monday.add_days(7);
        }
    }

    starts
        .into_iter()
        .zip(counts)
        .map(|(start, (done, total))| BinaryBucket {
            period: format_month(start),
            start,
            stats: PeriodStats::from_counts(done, total),
        })
        .collect()
}

// ============================================================================
// All time
// ============================================================================

/// Min/max/avg over every entry carrying `metric`; zeros when there are none
pub fn absolute_stats(history: &History, metric: Metric) -> AbsoluteStats {
    let mut acc = Accumulator::default();
    for value in history.values().filter_map(|e| e.value(metric)) {
        acc.push(value);
    }
    AbsoluteStats {
        min: acc.min.unwrap_or(0),
        max: acc.max.unwrap_or(0),
        avg: acc.avg().unwrap_or(0),
        total: acc.count,
    }
}

/// Water average rounded to one decimal, labelled by the nearest level
pub fn water_average(history: &History) -> WaterAverage {
    let mut acc = Accumulator::default();
    for value in history.values().filter_map(|e| e.value(Metric::Water)) {
        acc.push(value);
    }
    let mean = acc.mean();
    WaterAverage {
        avg: mean.map(round_one_decimal),
        label: mean
            .and_then(|m| WaterLevel::label_for(round_half_up(m)))
            .map(str::to_string),
    }
}

/// Nutrition average rounded to one decimal with the all-time dominant level
pub fn nutrition_average(history: &History) -> NutritionAverage {
    let mut acc = Accumulator::default();
    for value in history.values().filter_map(|e| e.value(Metric::Nutrition)) {
        acc.push(value);
    }
    let dominant = dominant_nutrition(&nutrition_distribution(history.values()));
    NutritionAverage {
        avg: acc.mean().map(round_one_decimal),
        dominant,
        label: dominant.map(|level| level.label().to_string()),
    }
}

/// Composite summary of everything a user has recorded
///
/// Flag percentages use the number of recorded days as denominator.
pub fn all_time_stats(
    history: &History,
    profile: &UserProfile,
    measurements: &Measurements,
) -> AllTimeStats {
    let total_days = u32::try_from(history.len()).unwrap_or(u32::MAX);
    let steps = absolute_stats(history, Metric::TotalSteps);
    let total_steps: u64 = history.values().map(|e| u64::from(e.total_steps)).sum();
    let flag = |metric: BinaryMetric| {
        let done = history.values().filter(|e| e.is_done(metric)).count();
        PeriodStats::from_counts(u32::try_from(done).unwrap_or(u32::MAX), total_days)
    };

    AllTimeStats {
        total_days,
        total_steps,
        avg_steps: steps.avg,
        min_steps: steps.min,
        max_steps: steps.max,
        treadmill: absolute_stats(history, Metric::TreadmillSteps),
        morning_exercise: flag(BinaryMetric::MorningExercise),
        workout: flag(BinaryMetric::Workout),
        abs: flag(BinaryMetric::Abs),
        water: water_average(history),
        nutrition: nutrition_average(history),
        sleep: sleep_stats(history),
        start_weight: start_weight(measurements),
        current_weight: current_weight(measurements),
        target_weight: profile.target_weight,
    }
}
