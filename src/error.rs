//! Error types for forecast feature generation

use thiserror::Error;

/// Result type alias for feature generation
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Hard failures raised while building features.
///
/// Configuration problems (bad periods, empty names, invalid events,
/// unknown timezones) are not errors: they are reported through
/// [`crate::diagnostics::Diagnostics`] and the offending entry is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Cannot infer frequency: need at least 2 timestamps, got {points}")]
    CannotInferFrequency { points: usize },

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid feature identity: {0}")]
    InvalidFeature(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ForecastError::CannotInferFrequency { points: 1 };
        assert_eq!(
            err.to_string(),
            "Cannot infer frequency: need at least 2 timestamps, got 1"
        );
    }

    #[test]
    fn test_invalid_feature_display() {
        let err = ForecastError::InvalidFeature("lag_1".to_string());
        assert_eq!(err.to_string(), "Invalid feature identity: lag_1");
    }
}
