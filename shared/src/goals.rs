//! Adaptive daily step goal
//!
//! The step target is a bounded controller driven by yesterday's outcome:
//! beat the goal and it rises by 200, land within 85% and it holds, fall
//! short and it eases by 100 or 300. The result is always clamped to
//! `[base_steps, GOAL_CEILING]`.
//!
//! A goal is computed once, at save time, and frozen into the day's
//! [`DailyEntry::goal`]. Reports read the stored value back.

use crate::calendar::{DateKey, TimeOfDay};
use crate::errors::ParseError;
use crate::models::{DailyEntry, Flag, History, NutritionLevel, UserProfile, WaterLevel};
use crate::sleep::calculate_sleep_duration;
use crate::types::{ChecklistItem, DayInput};
use serde::{Deserialize, Serialize};

/// Hard upper bound for any daily goal
pub const GOAL_CEILING: u32 = 10_000;

const RAISE_STEP: u32 = 200;
const EASE_STEP: u32 = 100;
const EASE_FAR_STEP: u32 = 300;

/// Water level that counts as enough for the checklist ("750ml-1l")
pub const CHECKLIST_MIN_WATER: u8 = 3;

/// Next day's goal from the last entry's outcome
pub fn calculate_new_goal(last_entry: &DailyEntry, base_steps: u32) -> u32 {
    let current_goal = last_entry.goal_or(base_steps);
    if current_goal == 0 {
        return base_steps.min(GOAL_CEILING);
    }

    let percentage = f64::from(last_entry.total_steps) / f64::from(current_goal) * 100.0;
    let new_goal = if percentage >= 100.0 {
        current_goal.saturating_add(RAISE_STEP)
    } else if percentage >= 85.0 {
        current_goal
    } else if percentage >= 60.0 {
        current_goal.saturating_sub(EASE_STEP)
    } else {
        current_goal.saturating_sub(EASE_FAR_STEP)
    };

    new_goal.max(base_steps).min(GOAL_CEILING)
}

/// Goal in force right now: the stored goal of the most recent entry
pub fn get_current_goal(profile: &UserProfile, history: &History) -> u32 {
    let base_steps = profile.effective_base_steps();
    history
        .values()
        .next_back()
        .map_or(base_steps, |entry| entry.goal_or(base_steps))
}

/// Goal to stamp on `date` when saving it
///
/// Today uses the current goal. A backfilled past day is computed from the
/// preceding day only, as that day exists at backfill time.
pub fn assign_goal_for_day(
    date: DateKey,
    profile: &UserProfile,
    history: &History,
    today: DateKey,
) -> u32 {
    if date == today {
        return get_current_goal(profile, history);
    }
    let base_steps = profile.effective_base_steps();
    history
        .get(&date.add_days(-1))
        .map_or(base_steps, |previous| calculate_new_goal(previous, base_steps))
}

/// Days from `start` up to (excluding) `today` with no entry, oldest first
pub fn find_missing_days(history: &History, start: DateKey, today: DateKey) -> Vec<DateKey> {
    start
        .range_until(today)
        .filter(|day| !history.contains_key(day))
        .collect()
}

// ============================================================================
// Progress
// ============================================================================

/// Colour band for a day's steps relative to its goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Warning,
    Danger,
}

impl StepStatus {
    pub fn classify(steps: u32, goal: u32) -> Self {
        if goal == 0 {
            return StepStatus::Success;
        }
        let ratio = f64::from(steps) / f64::from(goal);
        if ratio >= 1.0 {
            StepStatus::Success
        } else if ratio >= 0.85 {
            StepStatus::Warning
        } else {
            StepStatus::Danger
        }
    }
}

/// Rounded percentage of `goal` reached, uncapped
pub fn goal_progress(steps: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 0;
    }
    (f64::from(steps) / f64::from(goal) * 100.0).round() as u32
}

// ============================================================================
// Write path
// ============================================================================

/// Build the entry to persist for `date` from raw input
///
/// Stamps the day's goal, the profile's treadmill goal and the derived
/// sleep duration.
pub fn build_entry(
    date: DateKey,
    input: &DayInput,
    profile: &UserProfile,
    history: &History,
    today: DateKey,
) -> Result<DailyEntry, ParseError> {
    let nutrition = NutritionLevel::try_from(input.nutrition.unwrap_or(0))?;
    let water = WaterLevel::try_from(input.water.unwrap_or(0))?;
    let bed_time = parse_optional_time(input.bed_time.as_deref())?;
    let wake_time = parse_optional_time(input.wake_time.as_deref())?;
    let sleep_duration = match (bed_time, wake_time) {
        (Some(bed), Some(wake)) => Some(calculate_sleep_duration(Some(bed), Some(wake))),
        _ => None,
    };

    Ok(DailyEntry {
        date: Some(date),
        total_steps: clamp_steps(input.total_steps),
        treadmill_steps: clamp_steps(input.treadmill_steps),
        goal: Some(assign_goal_for_day(date, profile, history, today)),
        treadmill_goal: Some(profile.treadmill_goal),
        morning_exercise: Some(Flag::from(input.morning_exercise)),
        workout: Some(Flag::from(input.workout)),
        abs: Some(Flag::from(input.abs)),
        nutrition: Some(nutrition),
        water: Some(water),
        bed_time,
        wake_time,
        sleep_duration,
    })
}

fn clamp_steps(steps: i64) -> u32 {
    u32::try_from(steps.max(0)).unwrap_or(u32::MAX)
}

fn parse_optional_time(value: Option<&str>) -> Result<Option<TimeOfDay>, ParseError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

/// The seven "today" checklist items for an entry
pub fn daily_checklist(entry: Option<&DailyEntry>) -> Vec<ChecklistItem> {
    let check = |f: fn(&DailyEntry) -> bool| entry.is_some_and(f);
    vec![
        ChecklistItem::new("steps", "Steps", check(|e| e.total_steps > 0)),
        ChecklistItem::new("treadmill", "Treadmill", check(|e| e.treadmill_steps > 0)),
        ChecklistItem::new(
            "morningExercise",
            "Morning exercise",
            check(|e| e.morning_exercise == Some(Flag::Done)),
        ),
        ChecklistItem::new("workout", "Workout", check(|e| e.workout == Some(Flag::Done))),
        ChecklistItem::new("abs", "Abs", check(|e| e.abs == Some(Flag::Done))),
        ChecklistItem::new(
            "water",
            "Water",
            check(|e| e.water.is_some_and(|w| w.value() >= CHECKLIST_MIN_WATER)),
        ),
        ChecklistItem::new(
            "nutrition",
            "Nutrition",
            check(|e| e.nutrition == Some(NutritionLevel::OnPlan)),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn entry(total_steps: u32, goal: Option<u32>) -> DailyEntry {
        DailyEntry {
            total_steps,
            goal,
            ..Default::default()
        }
    }

    fn profile(base_steps: u32) -> UserProfile {
        UserProfile {
            base_steps,
            ..UserProfile::new("Test")
        }
    }

    #[rstest]
    #[case(6000, 5000, 5200)] // 120%
    #[case(5000, 5000, 5200)] // exactly 100%
    #[case(4250, 5000, 5000)] // 85% holds
    #[case(3000, 6000, 5900)] // 50%
    #[case(4000, 6000, 5900)] // 66%
    #[case(5200, 6000, 6000)] // 86%
    #[case(2000, 5200, 5000)] // 38% clamps at the floor
    #[case(20000, 10000, 10000)] // ceiling
    fn test_calculate_new_goal(#[case] steps: u32, #[case] goal: u32, #[case] expected: u32) {
        assert_eq!(calculate_new_goal(&entry(steps, Some(goal)), 5000), expected);
    }

    #[test]
    fn test_missing_goal_uses_base() {
        assert_eq!(calculate_new_goal(&entry(5000, None), 5000), 5200);
        assert_eq!(calculate_new_goal(&entry(0, None), 5000), 5000);
    }

    #[test]
    fn test_current_goal_reads_latest_entry() {
        let p = profile(5000);
        let mut history = History::new();
        assert_eq!(get_current_goal(&p, &history), 5000);

        history.insert(key("2024-01-02"), entry(1000, Some(6400)));
        history.insert(key("2024-01-01"), entry(1000, Some(7000)));
        assert_eq!(get_current_goal(&p, &history), 6400);

        history.insert(key("2024-01-03"), entry(1000, None));
        assert_eq!(get_current_goal(&p, &history), 5000);
    }

    #[rstest]
    #[case(None, 5000)]
    #[case(Some(0), 5000)]
    #[case(Some(6400), 6400)]
    fn test_current_goal_treats_zero_as_unset(#[case] stored: Option<u32>, #[case] expected: u32) {
        let mut history = History::new();
        history.insert(key("2024-01-01"), entry(1, stored));
        assert_eq!(get_current_goal(&profile(5000), &history), expected);
    }

    #[test]
    fn test_goal_scenario_raise_then_ease() {
        let p = profile(5000);
        let mut history = History::new();
        history.insert(key("2024-01-01"), entry(6000, Some(5000)));

        let day2 = assign_goal_for_day(key("2024-01-02"), &p, &history, key("2024-01-10"));
        assert_eq!(day2, 5200);

        history.insert(key("2024-01-02"), entry(2000, Some(day2)));
        let day3 = assign_goal_for_day(key("2024-01-03"), &p, &history, key("2024-01-10"));
        // 5200 - 300 lands under the floor
        assert_eq!(day3, 5000);
    }

    #[test]
    fn test_backfill_without_previous_day_uses_base() {
        let p = profile(5500);
        let mut history = History::new();
        history.insert(key("2024-01-01"), entry(9000, Some(8000)));
        let goal = assign_goal_for_day(key("2024-01-05"), &p, &history, key("2024-01-10"));
        assert_eq!(goal, 5500);
    }

    #[test]
    fn test_today_uses_current_goal() {
        let p = profile(5000);
        let mut history = History::new();
        history.insert(key("2024-01-09"), entry(0, Some(7300)));
        let today = key("2024-01-10");
        assert_eq!(assign_goal_for_day(today, &p, &history, today), 7300);
    }

    #[test]
    fn test_find_missing_days() {
        let mut history = History::new();
        history.insert(key("2024-02-28"), entry(1, Some(5000)));
        let missing = find_missing_days(&history, key("2024-02-27"), key("2024-03-02"));
        assert_eq!(
            missing,
            vec![key("2024-02-27"), key("2024-02-29"), key("2024-03-01")]
        );
        assert!(find_missing_days(&history, key("2024-03-02"), key("2024-03-02")).is_empty());
    }

    #[rstest]
    #[case(5000, 5000, StepStatus::Success)]
    #[case(4300, 5000, StepStatus::Warning)]
    #[case(4000, 5000, StepStatus::Danger)]
    fn test_step_status(#[case] steps: u32, #[case] goal: u32, #[case] status: StepStatus) {
        assert_eq!(StepStatus::classify(steps, goal), status);
    }

    #[test]
    fn test_goal_progress() {
        assert_eq!(goal_progress(2600, 5200), 50);
        assert_eq!(goal_progress(7500, 5000), 150);
        assert_eq!(goal_progress(100, 0), 0);
    }

    #[test]
    fn test_build_entry_stamps_derived_fields() {
        let p = profile(5000);
        let mut history = History::new();
        history.insert(key("2024-01-01"), entry(6000, Some(5000)));
        let input = DayInput {
            total_steps: 7000,
            treadmill_steps: 1500,
            morning_exercise: true,
            workout: false,
            abs: true,
            nutrition: Some(-1),
            water: Some(4),
            bed_time: Some("23:30".to_string()),
            wake_time: Some("07:00".to_string()),
        };
        let built = build_entry(key("2024-01-02"), &input, &p, &history, key("2024-01-05")).unwrap();
        assert_eq!(built.goal, Some(5200));
        assert_eq!(built.treadmill_goal, Some(3000));
        assert_eq!(built.sleep_duration, Some(450));
        assert_eq!(built.workout, Some(Flag::NotDone));
        assert_eq!(built.nutrition, Some(NutritionLevel::MildUndereating));
    }

    #[test]
    fn test_build_entry_rejects_bad_time() {
        let input = DayInput {
            bed_time: Some("late".to_string()),
            ..Default::default()
        };
        let today = key("2024-01-05");
        let result = build_entry(today, &input, &profile(5000), &History::new(), today);
        assert!(matches!(result, Err(ParseError::TimeOfDay(_))));
    }

    #[test]
    fn test_daily_checklist() {
        assert!(daily_checklist(None).iter().all(|item| !item.done));

        let e = DailyEntry {
            total_steps: 100,
            water: WaterLevel::new(3),
            nutrition: Some(NutritionLevel::MildOvereating),
            abs: Some(Flag::Done),
            ..Default::default()
        };
        let done: Vec<_> = daily_checklist(Some(&e))
            .into_iter()
            .filter(|item| item.done)
            .map(|item| item.key)
            .collect();
        assert_eq!(done, vec!["steps", "abs", "water"]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_goal_within_bounds(
            base in 1u32..=GOAL_CEILING,
            goal in proptest::option::of(1u32..20_000),
            steps in 0u32..60_000,
        ) {
            let next = calculate_new_goal(&entry(steps, goal), base);
            prop_assert!(next >= base);
            prop_assert!(next <= GOAL_CEILING);
        }

        #[test]
        fn prop_goal_deterministic(base in 1u32..=GOAL_CEILING, goal in 1u32..20_000, steps in 0u32..60_000) {
            let e = entry(steps, Some(goal));
            prop_assert_eq!(calculate_new_goal(&e, base), calculate_new_goal(&e, base));
        }

        #[test]
        fn prop_chain_stays_bounded(base in 1000u32..=GOAL_CEILING, days in proptest::collection::vec(0u32..15_000, 1..30)) {
            let p = profile(base);
            let mut history = History::new();
            let start = key("2024-01-01");
            let today = start.add_days(days.len() as i64 + 1);
            for (i, steps) in days.iter().enumerate() {
                let date = start.add_days(i as i64);
                let goal = assign_goal_for_day(date, &p, &history, today);
                prop_assert!(goal >= base && goal <= GOAL_CEILING);
                history.insert(date, entry(*steps, Some(goal)));
            }
        }
    }
}
