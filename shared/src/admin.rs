//! Per-user roll-ups for the admin overview
//!
//! Unlike the weekly statistics in [`crate::stats`], these use calendar days
//! as the denominator: a day without an entry counts as not done.

use crate::calendar::{day_name, format_week_period, week_days, DateKey};
use crate::goals::{get_current_goal, goal_progress, StepStatus};
use crate::measurements::{current_weight, latest, newest_first};
use crate::models::{
    BinaryMetric, DailyEntry, History, Measurements, UserProfile, DEFAULT_BASE_STEPS,
};
use crate::stats::all_time_stats;
use crate::types::{
    CurrentWeekState, DayDynamics, MeasurementsState, PeriodStats, TodayState, UserDetail,
    UserOverview, WeekDynamics, YesterdayState,
};

/// Number of measurement entries shown on an admin card
pub const RECENT_MEASUREMENTS: usize = 7;

/// One user's data as loaded from the stores
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub user_id: String,
    pub profile: UserProfile,
    pub history: History,
    pub measurements: Measurements,
}

/// Flag and step totals over a run of calendar days
#[derive(Debug, Default)]
struct DayTally {
    total_days: u32,
    days_with_data: u32,
    steps_sum: u64,
    morning_exercise: u32,
    workout: u32,
    abs: u32,
}

impl DayTally {
    fn over(history: &History, days: impl Iterator<Item = DateKey>) -> Self {
        let mut tally = DayTally::default();
        for day in days {
            tally.total_days += 1;
            if let Some(entry) = history.get(&day) {
                tally.days_with_data += 1;
                tally.steps_sum += u64::from(entry.total_steps);
                tally.morning_exercise += u32::from(entry.is_done(BinaryMetric::MorningExercise));
                tally.workout += u32::from(entry.is_done(BinaryMetric::Workout));
                tally.abs += u32::from(entry.is_done(BinaryMetric::Abs));
            }
        }
        tally
    }

    fn avg_steps(&self) -> i64 {
        if self.days_with_data == 0 {
            return 0;
        }
        (self.steps_sum as f64 / f64::from(self.days_with_data)).round() as i64
    }

    fn flag(&self, done: u32) -> PeriodStats {
        PeriodStats::from_counts(done, self.total_days)
    }
}

fn flags(entry: Option<&DailyEntry>) -> (bool, bool, bool) {
    entry.map_or((false, false, false), |e| {
        (
            e.is_done(BinaryMetric::MorningExercise),
            e.is_done(BinaryMetric::Workout),
            e.is_done(BinaryMetric::Abs),
        )
    })
}

pub fn today_state(profile: &UserProfile, history: &History, today: DateKey) -> TodayState {
    let goal = get_current_goal(profile, history);
    let entry = history.get(&today);
    let steps = entry.map_or(0, |e| e.total_steps);
    let (morning_exercise, workout, abs) = flags(entry);
    let water = entry.and_then(|e| e.water);
    let nutrition = entry.and_then(|e| e.nutrition);

    TodayState {
        has_data: entry.is_some(),
        goal,
        steps,
        progress: goal_progress(steps, goal),
        status: StepStatus::classify(steps, goal),
        morning_exercise,
        workout,
        abs,
        water,
        water_label: water.map(|w| w.label().to_string()),
        nutrition,
        nutrition_label: nutrition.map(|n| n.label().to_string()),
    }
}

/// Yesterday measured against the goal stored on that day
pub fn yesterday_state(history: &History, today: DateKey) -> YesterdayState {
    let date = today.add_days(-1);
    let entry = history.get(&date);
    let steps = entry.map_or(0, |e| e.total_steps);
    let goal = entry.map_or(DEFAULT_BASE_STEPS, |e| e.goal_or(DEFAULT_BASE_STEPS));
    let (morning_exercise, workout, abs) = flags(entry);

    YesterdayState {
        has_data: entry.is_some(),
        date,
        steps,
        goal,
        progress: if entry.is_some() {
            goal_progress(steps, goal)
        } else {
            0
        },
        morning_exercise,
        workout,
        abs,
    }
}

pub fn current_week_state(history: &History, today: DateKey) -> CurrentWeekState {
    let monday = today.monday();
    let tally = DayTally::over(history, monday.range_until(today.add_days(1)));

    CurrentWeekState {
        week_start: monday,
        total_days: tally.total_days,
        days_with_data: tally.days_with_data,
        avg_steps: tally.avg_steps(),
        morning_exercise: tally.flag(tally.morning_exercise),
        workout: tally.flag(tally.workout),
        abs: tally.flag(tally.abs),
    }
}

/// Dense series of the seven days ending `today`
pub fn last_7_days_dynamics(history: &History, today: DateKey) -> Vec<DayDynamics> {
    today
        .add_days(-6)
        .range_until(today.add_days(1))
        .map(|date| {
            let entry = history.get(&date);
            let steps = entry.map_or(0, |e| e.total_steps);
            let goal = entry.map_or(DEFAULT_BASE_STEPS, |e| e.goal_or(DEFAULT_BASE_STEPS));
            let (morning_exercise, workout, abs) = flags(entry);
            DayDynamics {
                date,
                day_name: day_name(date),
                has_data: entry.is_some(),
                steps,
                goal,
                status: entry.map(|_| StepStatus::classify(steps, goal)),
                morning_exercise,
                workout,
                abs,
            }
        })
        .collect()
}

/// Last `weeks_count` Monday-aligned weeks, the current one stopping at `today`
pub fn last_weeks_dynamics(
    history: &History,
    weeks_count: usize,
    today: DateKey,
) -> Vec<WeekDynamics> {
    let current = today.monday();
    (0..weeks_count)
        .rev()
        .map(|w| {
            let monday = current.add_days(-7 * w as i64);
            let days = week_days(monday).into_iter().filter(|day| *day <= today);
            let tally = DayTally::over(history, days);
            WeekDynamics {
                period: format_week_period(monday),
                week_start: monday,
                total_days: tally.total_days,
                days_with_data: tally.days_with_data,
                avg_steps: tally.avg_steps(),
                morning_exercise: tally.flag(tally.morning_exercise),
                workout: tally.flag(tally.workout),
                abs: tally.flag(tally.abs),
            }
        })
        .collect()
}

pub fn measurements_state(
    profile: &UserProfile,
    measurements: &Measurements,
) -> MeasurementsState {
    MeasurementsState {
        has_data: !measurements.is_empty(),
        latest: latest(measurements).cloned(),
        current_weight: current_weight(measurements),
        target_weight: profile.target_weight,
        recent: newest_first(measurements, RECENT_MEASUREMENTS),
    }
}

/// Admin card for one user
pub fn user_overview(snapshot: &UserSnapshot, today: DateKey) -> UserOverview {
    UserOverview {
        user_id: snapshot.user_id.clone(),
        name: snapshot.profile.name.clone(),
        today: today_state(&snapshot.profile, &snapshot.history, today),
        yesterday: yesterday_state(&snapshot.history, today),
        current_week: current_week_state(&snapshot.history, today),
        measurements: measurements_state(&snapshot.profile, &snapshot.measurements),
    }
}

/// Admin drill-down: the card plus daily and weekly dynamics and all-time stats
pub fn user_detail(snapshot: &UserSnapshot, weeks_count: usize, today: DateKey) -> UserDetail {
    UserDetail {
        overview: user_overview(snapshot, today),
        last_7_days: last_7_days_dynamics(&snapshot.history, today),
        last_weeks: last_weeks_dynamics(&snapshot.history, weeks_count, today),
        all_time: all_time_stats(&snapshot.history, &snapshot.profile, &snapshot.measurements),
    }
}
