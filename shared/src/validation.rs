//! Input validation functions
//!
//! Request bodies use `validator` derives (see [`crate::types`]); the checks
//! here cover values that arrive outside a request body.

use crate::goals::GOAL_CEILING;
use once_cell::sync::Lazy;
use regex_lite::Regex;

static DATE_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date key pattern is valid"));

/// Check the `YYYY-MM-DD` shape (not calendar validity)
pub fn is_valid_date_key(value: &str) -> bool {
    DATE_KEY_PATTERN.is_match(value)
}

/// Validate the user's step floor
///
/// The floor must be positive and may not exceed the goal ceiling.
pub fn validate_base_steps(base_steps: u32) -> Result<(), String> {
    if base_steps == 0 {
        return Err("Base steps must be greater than 0".to_string());
    }
    if base_steps > GOAL_CEILING {
        return Err(format!("Base steps cannot exceed {}", GOAL_CEILING));
    }
    Ok(())
}

/// Validate the treadmill step target
pub fn validate_treadmill_goal(goal: u32) -> Result<(), String> {
    if goal == 0 {
        return Err("Treadmill goal must be greater than 0".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "totalSteps" | "total_steps" => "Steps",
        "treadmillSteps" | "treadmill_steps" => "Treadmill",
        "morningExercise" | "morning_exercise" => "Morning Exercise",
        "workout" => "Workout",
        "abs" => "Abs",
        "water" => "Water",
        "nutrition" => "Nutrition",
        "bedTime" | "bed_time" => "Bed Time",
        "wakeTime" | "wake_time" => "Wake Time",
        "baseSteps" | "base_steps" => "Base Steps",
        "treadmillGoal" | "treadmill_goal" => "Treadmill Goal",
        "targetWeight" | "target_weight" => "Target Weight",
        "weight" => "Weight",
        "height" => "Height",
        "age" => "Age",
        "date" => "Date",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}
