//! Error types for the Habit Tracker core

use thiserror::Error;

/// Failures while parsing the canonical string encodings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid date key '{0}': expected YYYY-MM-DD")]
    DateKey(String),

    #[error("Invalid time of day '{0}': expected HH:MM")]
    TimeOfDay(String),

    #[error("Water level {0} is outside 0..=6")]
    WaterLevel(i64),

    #[error("Nutrition level {0} is outside -2..=2")]
    NutritionLevel(i64),

    #[error("Flag value {0} must be 0 or 1")]
    Flag(i64),

    #[error("Unknown metric '{0}'")]
    Metric(String),
}

/// Structured rejection of a measurement save
///
/// The display text is the reason shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeasurementRejection {
    #[error("Invalid measurement date")]
    InvalidDate,

    #[error("Cannot edit or add measurements for past dates")]
    PastDate,

    #[error("Enter at least one measurement or a comment")]
    Empty,
}

impl MeasurementRejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            MeasurementRejection::InvalidDate => "invalid_date",
            MeasurementRejection::PastDate => "past_date",
            MeasurementRejection::Empty => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            MeasurementRejection::PastDate.to_string(),
            "Cannot edit or add measurements for past dates"
        );
        assert_eq!(MeasurementRejection::Empty.code(), "empty");
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::DateKey("2024-13-01".to_string());
        assert!(err.to_string().contains("2024-13-01"));
    }
}
