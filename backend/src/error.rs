//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting internal errors to appropriate HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use habit_tracker_shared::validation::ValidationError;
use habit_tracker_shared::{ErrorDetail, ErrorResponse, MeasurementRejection, ParseError};
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Measurement rejected: {0}")]
    Rejected(#[from] MeasurementRejection),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: None,
        }
    }

    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    /// Report the first failing field with its display label
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, failures)| (field.to_string(), failures))
            .collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, failures)) = fields.into_iter().next() else {
            return ApiError::validation("Invalid request");
        };
        let reason = failures
            .first()
            .and_then(|f| f.message.as_ref())
            .map(|m| m.to_string())
            .unwrap_or_else(|| "is invalid".to_string());
        let detail = ValidationError::new(&field, &reason);
        ApiError::Validation {
            message: detail.user_message(),
            field: Some(detail.field),
        }
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        let field = match err {
            ParseError::DateKey(_) => Some("date"),
            ParseError::WaterLevel(_) => Some("water"),
            ParseError::NutritionLevel(_) => Some("nutrition"),
            ParseError::TimeOfDay(_) | ParseError::Flag(_) | ParseError::Metric(_) => None,
        };
        ApiError::Validation {
            message: err.to_string(),
            field: field.map(str::to_string),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { message, field } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            ApiError::Rejected(reason) => {
                let field = matches!(
                    reason,
                    MeasurementRejection::InvalidDate | MeasurementRejection::PastDate
                )
                .then(|| "date".to_string());
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "MEASUREMENT_REJECTED",
                    reason.to_string(),
                    field,
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use habit_tracker_shared::DayInput;
    use validator::Validate;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::validation("Invalid input");
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_status() {
        let error = ApiError::NotFound("User not found".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_rejection_status() {
        let response = ApiError::from(MeasurementRejection::PastDate).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_internal_error_status() {
        let response = ApiError::from(anyhow::anyhow!("store offline")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_validator_errors_use_display_label() {
        let input = DayInput {
            water: Some(9),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        match ApiError::from(errors) {
            ApiError::Validation { message, field } => {
                assert_eq!(field.as_deref(), Some("water"));
                assert!(message.starts_with("Water: "));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_maps_to_field() {
        match ApiError::from(ParseError::NutritionLevel(4)) {
            ApiError::Validation { field, .. } => assert_eq!(field.as_deref(), Some("nutrition")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
