//! Habit Tracker WASM Module
//!
//! This crate provides WebAssembly bindings for the calculations the
//! browser runs while a form is being filled in, before anything is saved.

use habit_tracker_shared::calendar;
use habit_tracker_shared::goals;
use habit_tracker_shared::sleep;
use habit_tracker_shared::stats;
use habit_tracker_shared::{BinaryMetric, DailyEntry, DateKey, History, NutritionLevel, WaterLevel};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Next day's goal after a day with `total_steps` against `goal`
#[wasm_bindgen]
pub fn calculate_new_goal(total_steps: u32, goal: u32, base_steps: u32) -> u32 {
    let entry = DailyEntry {
        total_steps,
        goal: Some(goal),
        ..Default::default()
    };
    goals::calculate_new_goal(&entry, base_steps)
}

/// Minutes between two `HH:MM` times; blank input gives 0
#[wasm_bindgen]
pub fn sleep_duration(bed_time: &str, wake_time: &str) -> Result<u32, JsValue> {
    sleep::sleep_duration_from_str(bed_time, wake_time).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// `insufficient`, `normal` or `excess`
#[wasm_bindgen]
pub fn sleep_category(minutes: u32) -> String {
    let quality = sleep::sleep_quality(minutes);
    serde_json::to_value(quality.category)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

#[wasm_bindgen]
pub fn sleep_quality_text(minutes: u32) -> String {
    sleep::sleep_quality(minutes).text.to_string()
}

#[wasm_bindgen]
pub fn sleep_quality_color(minutes: u32) -> String {
    sleep::sleep_quality(minutes).display_color.to_string()
}

#[wasm_bindgen]
pub fn format_sleep_duration(minutes: u32) -> String {
    sleep::format_sleep_duration(minutes)
}

/// Hours with one decimal, for chart axes
#[wasm_bindgen]
pub fn sleep_hours(minutes: u32) -> f64 {
    sleep::minutes_to_hours(minutes)
}

/// Whole days from `from` to `to`, negative when `to` is earlier
#[wasm_bindgen]
pub fn days_between(from: &str, to: &str) -> Result<i32, JsValue> {
    days_between_keys(from, to).map_err(|e| JsValue::from_str(&e))
}

fn days_between_keys(from: &str, to: &str) -> Result<i32, String> {
    let from: DateKey = from.parse().map_err(|e| format!("{e}"))?;
    let to: DateKey = to.parse().map_err(|e| format!("{e}"))?;
    i32::try_from(calendar::days_between(from, to)).map_err(|e| e.to_string())
}

#[wasm_bindgen]
pub fn water_label(level: i32) -> Option<String> {
    WaterLevel::label_for(i64::from(level)).map(str::to_string)
}

#[wasm_bindgen]
pub fn nutrition_label(level: i32) -> Option<String> {
    NutritionLevel::try_from(i64::from(level))
        .ok()
        .map(|l| l.label().to_string())
}

/// Weekly done/total buckets of a flag over a JSON history, as JSON
///
/// `weeks` is clamped to `1..=52`.
#[wasm_bindgen]
pub fn weekly_binary_stats(
    history_json: &str,
    metric: &str,
    weeks: usize,
    today: &str,
) -> Result<String, JsValue> {
    weekly_binary_json(history_json, metric, weeks, today).map_err(|e| JsValue::from_str(&e))
}

fn weekly_binary_json(
    history_json: &str,
    metric: &str,
    weeks: usize,
    today: &str,
) -> Result<String, String> {
    let history: History = serde_json::from_str(history_json).map_err(|e| e.to_string())?;
    let metric: BinaryMetric = metric.parse().map_err(|e| format!("{e}"))?;
    let today: DateKey = today.parse().map_err(|e| format!("{e}"))?;
    let weeks = weeks.clamp(1, stats::MAX_WEEKS);
    to_json(&stats::weekly_binary_stats(&history, metric, weeks, today))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_step() {
        assert_eq!(calculate_new_goal(6000, 5000, 5000), 5200);
        assert_eq!(calculate_new_goal(2000, 5200, 5000), 5000);
        assert_eq!(calculate_new_goal(9990, 9900, 5000), 10000);
    }

    #[test]
    fn test_sleep_helpers() {
        assert_eq!(sleep_duration("23:30", "07:00").unwrap(), 450);
        assert_eq!(sleep_category(450), "normal");
        assert_eq!(sleep_category(300), "insufficient");
        assert_eq!(format_sleep_duration(450), "7h 30m");
    }

    #[test]
    fn test_labels() {
        assert_eq!(water_label(3).as_deref(), Some("750ml-1l"));
        assert_eq!(water_label(7), None);
        assert_eq!(nutrition_label(-2).as_deref(), Some("severe undereating"));
        assert_eq!(nutrition_label(3), None);
    }

    #[test]
    fn test_weekly_binary_json() {
        let history = r#"{
            "2024-05-06": {"totalSteps": 100, "workout": 0},
            "2024-05-07": {"totalSteps": 100, "workout": 1},
            "2024-05-08": {"totalSteps": 100, "workout": 0}
        }"#;
        let json = weekly_binary_json(history, "workout", 1, "2024-05-08").unwrap();
        let buckets: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(buckets[0]["done"], 1);
        assert_eq!(buckets[0]["total"], 3);
        assert_eq!(buckets[0]["percentage"], 33);

        assert!(weekly_binary_json("{}", "calories", 1, "2024-05-08").is_err());
    }

    #[test]
    fn test_weekly_binary_json_clamps_weeks() {
        let count = |weeks| {
            let json = weekly_binary_json("{}", "abs", weeks, "2024-05-08").unwrap();
            let buckets: serde_json::Value = serde_json::from_str(&json).unwrap();
            buckets.as_array().unwrap().len()
        };
        assert_eq!(count(usize::MAX), 52);
        assert_eq!(count(0), 1);
        assert_eq!(count(3), 3);
    }

    #[test]
    fn test_hours_and_day_spans() {
        assert_eq!(sleep_hours(450), 7.5);
        assert_eq!(days_between_keys("2024-02-27", "2024-03-01").unwrap(), 3);
        assert_eq!(days_between_keys("2024-03-01", "2024-02-27").unwrap(), -3);
        assert!(days_between_keys("2024-3-1", "2024-03-01").is_err());
    }
}
