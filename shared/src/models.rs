//! Data models for the Habit Tracker
//!
//! Field names and ordinal encodings match the stored documents
//! (`totalSteps`, flags as integer `0`/`1`, water `0..=6`, nutrition `-2..=2`).

use crate::calendar::{DateKey, TimeOfDay};
use crate::errors::ParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Step floor used when a profile does not declare one
pub const DEFAULT_BASE_STEPS: u32 = 5000;

/// Treadmill target used when a profile does not declare one
pub const DEFAULT_TREADMILL_GOAL: u32 = 3000;

/// Daily entries of one user keyed by date
pub type History = BTreeMap<DateKey, DailyEntry>;

/// Body measurements of one user keyed by date
pub type Measurements = BTreeMap<DateKey, MeasurementEntry>;

// ============================================================================
// Ordinal encodings
// ============================================================================

/// Binary metric value, stored as integer `0` or `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Flag {
    NotDone,
    Done,
}

impl Flag {
    pub fn is_done(self) -> bool {
        self == Flag::Done
    }
}

impl From<bool> for Flag {
    fn from(done: bool) -> Self {
        if done {
            Flag::Done
        } else {
            Flag::NotDone
        }
    }
}

impl From<Flag> for i64 {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::NotDone => 0,
            Flag::Done => 1,
        }
    }
}

impl TryFrom<i64> for Flag {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Flag::NotDone),
            1 => Ok(Flag::Done),
            other => Err(ParseError::Flag(other)),
        }
    }
}

/// Water intake labels indexed by level
pub const WATER_LABELS: [&str; 7] = [
    "<250ml",
    "250-500ml",
    "500-750ml",
    "750ml-1l",
    "1-1.5l",
    "1.5-2l",
    ">2l",
];

/// Ordinal water bucket (0..=6), not a volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct WaterLevel(u8);

impl WaterLevel {
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        WATER_LABELS[usize::from(self.0)]
    }

    /// Label for an aggregated (possibly out of range) level
    pub fn label_for(level: i64) -> Option<&'static str> {
        usize::try_from(level)
            .ok()
            .and_then(|index| WATER_LABELS.get(index).copied())
    }
}

impl From<WaterLevel> for i64 {
    fn from(level: WaterLevel) -> Self {
        i64::from(level.0)
    }
}

impl TryFrom<i64> for WaterLevel {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(WaterLevel::new)
            .ok_or(ParseError::WaterLevel(value))
    }
}

/// Eating relative to plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum NutritionLevel {
    SevereUndereating = -2,
    MildUndereating = -1,
    OnPlan = 0,
    MildOvereating = 1,
    SevereOvereating = 2,
}

impl NutritionLevel {
    /// All levels in code order
    pub const ALL: [NutritionLevel; 5] = [
        NutritionLevel::SevereUndereating,
        NutritionLevel::MildUndereating,
        NutritionLevel::OnPlan,
        NutritionLevel::MildOvereating,
        NutritionLevel::SevereOvereating,
    ];

    pub fn code(self) -> i8 {
        self as i8
    }

    pub fn label(self) -> &'static str {
        match self {
            NutritionLevel::SevereUndereating => "severe undereating",
            NutritionLevel::MildUndereating => "mild undereating",
            NutritionLevel::OnPlan => "on plan",
            NutritionLevel::MildOvereating => "mild overeating",
            NutritionLevel::SevereOvereating => "severe overeating",
        }
    }
}

impl From<NutritionLevel> for i64 {
    fn from(level: NutritionLevel) -> Self {
        i64::from(level.code())
    }
}

impl TryFrom<i64> for NutritionLevel {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        NutritionLevel::ALL
            .into_iter()
            .find(|level| i64::from(level.code()) == value)
            .ok_or(ParseError::NutritionLevel(value))
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Numeric metrics recorded on a daily entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    TotalSteps,
    TreadmillSteps,
    Goal,
    MorningExercise,
    Workout,
    Abs,
    Nutrition,
    Water,
    SleepDuration,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::TotalSteps => "totalSteps",
            Metric::TreadmillSteps => "treadmillSteps",
            Metric::Goal => "goal",
            Metric::MorningExercise => "morningExercise",
            Metric::Workout => "workout",
            Metric::Abs => "abs",
            Metric::Nutrition => "nutrition",
            Metric::Water => "water",
            Metric::SleepDuration => "sleepDuration",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "totalSteps" | "total_steps" | "steps" => Ok(Metric::TotalSteps),
            "treadmillSteps" | "treadmill_steps" | "treadmill" => Ok(Metric::TreadmillSteps),
            "goal" => Ok(Metric::Goal),
            "morningExercise" | "morning_exercise" => Ok(Metric::MorningExercise),
            "workout" => Ok(Metric::Workout),
            "abs" => Ok(Metric::Abs),
            "nutrition" => Ok(Metric::Nutrition),
            "water" => Ok(Metric::Water),
            "sleepDuration" | "sleep_duration" | "sleep" => Ok(Metric::SleepDuration),
            other => Err(ParseError::Metric(other.to_string())),
        }
    }
}

/// Daily yes/no habits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryMetric {
    MorningExercise,
    Workout,
    Abs,
}

impl BinaryMetric {
    pub const ALL: [BinaryMetric; 3] = [
        BinaryMetric::MorningExercise,
        BinaryMetric::Workout,
        BinaryMetric::Abs,
    ];
}

impl From<BinaryMetric> for Metric {
    fn from(metric: BinaryMetric) -> Self {
        match metric {
            BinaryMetric::MorningExercise => Metric::MorningExercise,
            BinaryMetric::Workout => Metric::Workout,
            BinaryMetric::Abs => Metric::Abs,
        }
    }
}

impl FromStr for BinaryMetric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Metric>()? {
            Metric::MorningExercise => Ok(BinaryMetric::MorningExercise),
            Metric::Workout => Ok(BinaryMetric::Workout),
            Metric::Abs => Ok(BinaryMetric::Abs),
            _ => Err(ParseError::Metric(s.to_string())),
        }
    }
}

// ============================================================================
// Daily entry
// ============================================================================

/// One user's record for one date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateKey>,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub treadmill_steps: u32,
    /// Step target frozen at save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treadmill_goal: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_exercise: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workout: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abs: Option<Flag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<NutritionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water: Option<WaterLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bed_time: Option<TimeOfDay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<TimeOfDay>,
    /// Minutes, derived from bed and wake time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_duration: Option<u32>,
}

impl DailyEntry {
    /// Stored goal, or `base_steps` when the entry predates goal stamping
    ///
    /// A stored zero counts as no goal.
    pub fn goal_or(&self, base_steps: u32) -> u32 {
        self.goal.filter(|goal| *goal > 0).unwrap_or(base_steps)
    }

    pub fn flag(&self, metric: BinaryMetric) -> Option<Flag> {
        match metric {
            BinaryMetric::MorningExercise => self.morning_exercise,
            BinaryMetric::Workout => self.workout,
            BinaryMetric::Abs => self.abs,
        }
    }

    /// True only when the flag is present and set
    pub fn is_done(&self, metric: BinaryMetric) -> bool {
        self.flag(metric).is_some_and(Flag::is_done)
    }

    /// Numeric value of `metric`, `None` when not tracked that day
    pub fn value(&self, metric: Metric) -> Option<i64> {
        match metric {
            Metric::TotalSteps => Some(i64::from(self.total_steps)),
            Metric::TreadmillSteps => Some(i64::from(self.treadmill_steps)),
            Metric::Goal => self.goal.map(i64::from),
            Metric::MorningExercise => self.morning_exercise.map(i64::from),
            Metric::Workout => self.workout.map(i64::from),
            Metric::Abs => self.abs.map(i64::from),
            Metric::Nutrition => self.nutrition.map(i64::from),
            Metric::Water => self.water.map(i64::from),
            Metric::SleepDuration => self.sleep_duration.map(i64::from),
        }
    }

    pub fn has_sleep_times(&self) -> bool {
        self.bed_time.is_some() && self.wake_time.is_some()
    }
}

// ============================================================================
// Measurements
// ============================================================================

/// Cleaned body measurement values; absent fields are omitted
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CleanMeasurement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belly: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Persisted measurement record, at most one per date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    pub date: DateKey,
    #[serde(flatten)]
    pub values: CleanMeasurement,
}

// ============================================================================
// Profile
// ============================================================================

fn default_base_steps() -> u32 {
    DEFAULT_BASE_STEPS
}

fn default_treadmill_goal() -> u32 {
    DEFAULT_TREADMILL_GOAL
}

/// User profile; `base_steps` and `treadmill_goal` are fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    #[serde(default = "default_base_steps")]
    pub base_steps: u32,
    #[serde(default = "default_treadmill_goal")]
    pub treadmill_goal: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    /// First tracked day; missing-day detection starts here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateKey>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_steps: DEFAULT_BASE_STEPS,
            treadmill_goal: DEFAULT_TREADMILL_GOAL,
            height: None,
            age: None,
            target_weight: None,
            created_at: None,
        }
    }

    /// Base steps with a zero floor treated as the default
    pub fn effective_base_steps(&self) -> u32 {
        if self.base_steps == 0 {
            DEFAULT_BASE_STEPS
        } else {
            self.base_steps
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_entry_reads_stored_document() {
        let doc = json!({
            "date": "2024-03-04",
            "totalSteps": 6400,
            "treadmillSteps": 1200,
            "goal": 5200,
            "treadmillGoal": 3000,
            "morningExercise": 1,
            "workout": 0,
            "nutrition": -1,
            "water": 4,
            "bedTime": "23:30",
            "wakeTime": "07:00",
            "sleepDuration": 450
        });
        let entry: DailyEntry = serde_json::from_value(doc).unwrap();
        assert_eq!(entry.total_steps, 6400);
        assert_eq!(entry.morning_exercise, Some(Flag::Done));
        assert_eq!(entry.abs, None);
        assert_eq!(entry.nutrition, Some(NutritionLevel::MildUndereating));
        assert_eq!(entry.water.map(WaterLevel::label), Some("1-1.5l"));
        assert_eq!(entry.value(Metric::Abs), None);
        assert_eq!(entry.value(Metric::Workout), Some(0));
    }

    #[test]
    fn test_flags_serialize_as_integers() {
        let entry = DailyEntry {
            total_steps: 10,
            workout: Some(Flag::Done),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["workout"], json!(1));
        assert!(value.get("abs").is_none());
    }

    #[rstest]
    #[case(json!({"totalSteps": 1, "water": 7}))]
    #[case(json!({"totalSteps": 1, "nutrition": 3}))]
    #[case(json!({"totalSteps": 1, "abs": 2}))]
    #[case(json!({"totalSteps": 1, "bedTime": "24:10"}))]
    fn test_out_of_range_codes_rejected(#[case] doc: serde_json::Value) {
        assert!(serde_json::from_value::<DailyEntry>(doc).is_err());
    }

    #[test]
    fn test_nutrition_labels() {
        assert_eq!(NutritionLevel::try_from(-2).unwrap().label(), "severe undereating");
        assert_eq!(NutritionLevel::try_from(0).unwrap().label(), "on plan");
        assert_eq!(NutritionLevel::try_from(2).unwrap().label(), "severe overeating");
    }

    #[test]
    fn test_water_label_lookup() {
        assert_eq!(WaterLevel::label_for(0), Some("<250ml"));
        assert_eq!(WaterLevel::label_for(6), Some(">2l"));
        assert_eq!(WaterLevel::label_for(7), None);
        assert_eq!(WaterLevel::label_for(-1), None);
    }

    #[rstest]
    #[case("totalSteps", Metric::TotalSteps)]
    #[case("morning_exercise", Metric::MorningExercise)]
    #[case("sleep", Metric::SleepDuration)]
    fn test_metric_names(#[case] name: &str, #[case] metric: Metric) {
        assert_eq!(name.parse::<Metric>().unwrap(), metric);
    }

    #[test]
    fn test_binary_metric_rejects_numeric() {
        assert!("workout".parse::<BinaryMetric>().is_ok());
        assert!("water".parse::<BinaryMetric>().is_err());
    }

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_value(json!({"name": "Anna"})).unwrap();
        assert_eq!(profile.base_steps, DEFAULT_BASE_STEPS);
        assert_eq!(profile.treadmill_goal, DEFAULT_TREADMILL_GOAL);
        assert!(profile.target_weight.is_none());
    }

    #[test]
    fn test_measurement_entry_flattens_values() {
        let entry = MeasurementEntry {
            date: "2024-05-01".parse().unwrap(),
            values: CleanMeasurement {
                weight: Some(71.2),
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value, json!({"date": "2024-05-01", "weight": 71.2}));
    }
}
