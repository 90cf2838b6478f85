//! API request and response types
//!
//! Everything here except the request types is a derived view: recomputed on
//! demand from a user's history and measurements, never persisted.

use crate::calendar::{DateKey, TimeOfDay};
use crate::goals::StepStatus;
use crate::models::{DailyEntry, MeasurementEntry, NutritionLevel, UserProfile, WaterLevel};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Requests
// ============================================================================

/// Raw payload for saving one day
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DayInput {
    #[serde(default)]
    #[validate(range(min = 0, max = 200_000, message = "Steps must be between 0 and 200000"))]
    pub total_steps: i64,
    #[serde(default)]
    #[validate(range(min = 0, max = 200_000, message = "Steps must be between 0 and 200000"))]
    pub treadmill_steps: i64,
    #[serde(default)]
    pub morning_exercise: bool,
    #[serde(default)]
    pub workout: bool,
    #[serde(default)]
    pub abs: bool,
    #[validate(range(min = -2, max = 2, message = "Nutrition level must be between -2 and 2"))]
    pub nutrition: Option<i64>,
    #[validate(range(min = 0, max = 6, message = "Water level must be between 0 and 6"))]
    pub water: Option<i64>,
    pub bed_time: Option<String>,
    pub wake_time: Option<String>,
}

/// Create a user profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 10_000, message = "Base steps must be between 1 and 10000"))]
    pub base_steps: Option<u32>,
    #[validate(range(min = 1, max = 200_000, message = "Treadmill goal must be positive"))]
    pub treadmill_goal: Option<u32>,
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be 50-300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 1, max = 150, message = "Age must be 1-150"))]
    pub age: Option<u32>,
    #[validate(range(min = 20.0, max = 500.0, message = "Target weight must be 20-500 kg"))]
    pub target_weight: Option<f64>,
}

/// One-time profile fields; `base_steps` and `treadmill_goal` are not editable
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be 50-300 cm"))]
    pub height: Option<f64>,
    #[validate(range(min = 1, max = 150, message = "Age must be 1-150"))]
    pub age: Option<u32>,
    #[validate(range(min = 20.0, max = 500.0, message = "Target weight must be 20-500 kg"))]
    pub target_weight: Option<f64>,
}

/// Profile together with its storage id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

// ============================================================================
// Series and buckets
// ============================================================================

/// One recorded value on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: DateKey,
    pub value: i64,
}

/// Done/total/percentage of a binary metric over a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodStats {
    pub done: u32,
    pub total: u32,
    pub percentage: u32,
}

impl PeriodStats {
    /// Percentage is rounded and 0 when nothing was counted
    pub fn from_counts(done: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(done) / f64::from(total) * 100.0).round() as u32
        };
        Self {
            done,
            total,
            percentage,
        }
    }
}

/// Binary metric over one week or month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryBucket {
    pub period: String,
    pub start: DateKey,
    #[serde(flatten)]
    pub stats: PeriodStats,
}

/// Numeric metric over one week or month; `None` when nothing was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericBucket {
    pub period: String,
    pub start: DateKey,
    pub avg: Option<i64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub count: u32,
}

/// Water week with the aggregated levels mapped back to labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterBucket {
    #[serde(flatten)]
    pub stats: NumericBucket,
    pub avg_label: Option<String>,
    pub min_label: Option<String>,
    pub max_label: Option<String>,
}

/// Count of days per nutrition level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionDistribution {
    pub severe_undereating: u32,
    pub mild_undereating: u32,
    pub on_plan: u32,
    pub mild_overeating: u32,
    pub severe_overeating: u32,
}

impl NutritionDistribution {
    pub fn count(&self, level: NutritionLevel) -> u32 {
        match level {
            NutritionLevel::SevereUndereating => self.severe_undereating,
            NutritionLevel::MildUndereating => self.mild_undereating,
            NutritionLevel::OnPlan => self.on_plan,
            NutritionLevel::MildOvereating => self.mild_overeating,
            NutritionLevel::SevereOvereating => self.severe_overeating,
        }
    }

    pub fn record(&mut self, level: NutritionLevel) {
        let slot = match level {
            NutritionLevel::SevereUndereating => &mut self.severe_undereating,
            NutritionLevel::MildUndereating => &mut self.mild_undereating,
            NutritionLevel::OnPlan => &mut self.on_plan,
            NutritionLevel::MildOvereating => &mut self.mild_overeating,
            NutritionLevel::SevereOvereating => &mut self.severe_overeating,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        NutritionLevel::ALL.iter().map(|l| self.count(*l)).sum()
    }
}

/// Nutrition week summarized by distribution and dominant level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionBucket {
    pub period: String,
    pub start: DateKey,
    pub count: u32,
    pub distribution: NutritionDistribution,
    pub dominant: Option<NutritionLevel>,
    pub dominant_label: Option<String>,
}

/// All-time min/max/avg and number of entries carrying the metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbsoluteStats {
    pub min: i64,
    pub max: i64,
    pub avg: i64,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStats {
    pub total_days: usize,
    pub avg_duration: u32,
    pub min_duration: u32,
    pub max_duration: u32,
    /// Median bed time, see [`crate::sleep::median_bed_time`]
    pub avg_bed_time: Option<TimeOfDay>,
    pub avg_wake_time: Option<TimeOfDay>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WaterAverage {
    pub avg: Option<f64>,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionAverage {
    pub avg: Option<f64>,
    pub dominant: Option<NutritionLevel>,
    pub label: Option<String>,
}

/// Everything recorded, folded into one summary
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTimeStats {
    pub total_days: u32,
    pub total_steps: u64,
    pub avg_steps: i64,
    pub min_steps: i64,
    pub max_steps: i64,
    pub treadmill: AbsoluteStats,
    pub morning_exercise: PeriodStats,
    pub workout: PeriodStats,
    pub abs: PeriodStats,
    pub water: WaterAverage,
    pub nutrition: NutritionAverage,
    pub sleep: SleepStats,
    pub start_weight: Option<f64>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
}

// ============================================================================
// Today
// ============================================================================

/// One "today" checklist item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub key: &'static str,
    pub label: &'static str,
    pub done: bool,
}

impl ChecklistItem {
    pub fn new(key: &'static str, label: &'static str, done: bool) -> Self {
        Self { key, label, done }
    }
}

/// The user's landing view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub today: DateKey,
    pub date_label: String,
    pub current_goal: u32,
    pub entry: Option<DailyEntry>,
    pub progress: u32,
    pub status: StepStatus,
    pub checklist: Vec<ChecklistItem>,
    pub missing_days: Vec<DateKey>,
}

// ============================================================================
// Admin roll-ups
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayState {
    pub has_data: bool,
    pub goal: u32,
    pub steps: u32,
    pub progress: u32,
    pub status: StepStatus,
    pub morning_exercise: bool,
    pub workout: bool,
    pub abs: bool,
    pub water: Option<WaterLevel>,
    pub water_label: Option<String>,
    pub nutrition: Option<NutritionLevel>,
    pub nutrition_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YesterdayState {
    pub has_data: bool,
    pub date: DateKey,
    pub steps: u32,
    pub goal: u32,
    pub progress: u32,
    pub morning_exercise: bool,
    pub workout: bool,
    pub abs: bool,
}

/// Monday..today, with calendar days as the flag denominator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeekState {
    pub week_start: DateKey,
    pub total_days: u32,
    pub days_with_data: u32,
    pub avg_steps: i64,
    pub morning_exercise: PeriodStats,
    pub workout: PeriodStats,
    pub abs: PeriodStats,
}

/// One calendar day in a dense series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDynamics {
    pub date: DateKey,
    pub day_name: String,
    pub has_data: bool,
    pub steps: u32,
    pub goal: u32,
    pub status: Option<StepStatus>,
    pub morning_exercise: bool,
    pub workout: bool,
    pub abs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDynamics {
    pub period: String,
    pub week_start: DateKey,
    pub total_days: u32,
    pub days_with_data: u32,
    pub avg_steps: i64,
    pub morning_exercise: PeriodStats,
    pub workout: PeriodStats,
    pub abs: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsState {
    pub has_data: bool,
    pub latest: Option<MeasurementEntry>,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    /// Newest first, at most seven
    pub recent: Vec<MeasurementEntry>,
}

/// Admin card for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOverview {
    pub user_id: String,
    pub name: String,
    pub today: TodayState,
    pub yesterday: YesterdayState,
    pub current_week: CurrentWeekState,
    pub measurements: MeasurementsState,
}

/// Admin drill-down for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub overview: UserOverview,
    pub last_7_days: Vec<DayDynamics>,
    pub last_weeks: Vec<WeekDynamics>,
    pub all_time: AllTimeStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 3, 33)]
    #[case(2, 3, 67)]
    #[case(0, 0, 0)]
    #[case(7, 7, 100)]
    fn test_period_stats_percentage(#[case] done: u32, #[case] total: u32, #[case] pct: u32) {
        assert_eq!(PeriodStats::from_counts(done, total).percentage, pct);
    }

    #[test]
    fn test_day_input_validation() {
        let ok = DayInput {
            total_steps: 8000,
            water: Some(6),
            nutrition: Some(-2),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = DayInput {
            total_steps: -5,
            water: Some(7),
            ..Default::default()
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("total_steps"));
        assert!(fields.contains_key("water"));
    }

    #[test]
    fn test_day_input_reads_camel_case() {
        let input: DayInput = serde_json::from_str(
            r#"{"totalSteps": 5400, "morningExercise": true, "bedTime": "23:10"}"#,
        )
        .unwrap();
        assert_eq!(input.total_steps, 5400);
        assert!(input.morning_exercise);
        assert!(!input.workout);
        assert_eq!(input.bed_time.as_deref(), Some("23:10"));
    }

    #[test]
    fn test_update_profile_validation() {
        let req = UpdateProfileRequest {
            target_weight: Some(10.0),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }

    #[test]
    fn test_nutrition_distribution() {
        let mut dist = NutritionDistribution::default();
        dist.record(NutritionLevel::OnPlan);
        dist.record(NutritionLevel::OnPlan);
        dist.record(NutritionLevel::SevereOvereating);
        assert_eq!(dist.count(NutritionLevel::OnPlan), 2);
        assert_eq!(dist.total(), 3);
    }

    #[test]
    fn test_binary_bucket_flattens_stats() {
        let bucket = BinaryBucket {
            period: "1–7 January".to_string(),
            start: "2024-01-01".parse().unwrap(),
            stats: PeriodStats::from_counts(1, 3),
        };
        let value = serde_json::to_value(&bucket).unwrap();
        assert_eq!(value["done"], 1);
        assert_eq!(value["percentage"], 33);
        assert_eq!(value["start"], "2024-01-01");
    }
}
