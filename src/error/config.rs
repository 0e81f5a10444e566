// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// Error code range: 3001-3005
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// Extended threshold is not strictly greater than the flexed threshold
    pub const INVALID_THRESHOLDS: i32 = 3001;

    /// Threshold is not a finite angle within [0, 180] degrees
    pub const THRESHOLD_OUT_OF_RANGE: i32 = 3002;

    /// Smoothing window must hold at least one sample
    pub const INVALID_HISTORY_CAPACITY: i32 = 3003;

    /// Exercise type has no entry in the registry
    pub const UNKNOWN_EXERCISE: i32 = 3004;

    /// Landmark visibility gate outside [0, 1]
    pub const INVALID_VISIBILITY: i32 = 3005;
}

/// Log a configuration error with structured context
///
/// Emits the error code, the component and the human-readable message so
/// startup failures can be grepped out of the log stream.
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=ExerciseConfig, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Configuration-related errors
///
/// Raised when an exercise configuration or tracker setting would make the
/// repetition state machine misbehave (FLEXED unreachable, continuous
/// re-triggering, an empty smoothing window).
///
/// Error code range: 3001-3005
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `extended_threshold` must be strictly greater than `flexed_threshold`
    InvalidThresholds { extended: f64, flexed: f64 },

    /// A threshold is NaN, infinite, or outside [0, 180]
    ThresholdOutOfRange { name: String, value: f64 },

    /// Smoothing window capacity of zero
    InvalidHistoryCapacity { capacity: usize },

    /// Requested exercise is not registered
    UnknownExercise { exercise: String },

    /// Minimum landmark visibility outside [0, 1]
    InvalidVisibility { value: f64 },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::InvalidThresholds { .. } => ConfigErrorCodes::INVALID_THRESHOLDS,
            ConfigError::ThresholdOutOfRange { .. } => ConfigErrorCodes::THRESHOLD_OUT_OF_RANGE,
            ConfigError::InvalidHistoryCapacity { .. } => {
                ConfigErrorCodes::INVALID_HISTORY_CAPACITY
            }
            ConfigError::UnknownExercise { .. } => ConfigErrorCodes::UNKNOWN_EXERCISE,
            ConfigError::InvalidVisibility { .. } => ConfigErrorCodes::INVALID_VISIBILITY,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::InvalidThresholds { extended, flexed } => format!(
                "Extended threshold ({}) must be greater than flexed threshold ({})",
                extended, flexed
            ),
            ConfigError::ThresholdOutOfRange { name, value } => {
                format!("{} must be a finite angle in [0, 180] (got {})", name, value)
            }
            ConfigError::InvalidHistoryCapacity { capacity } => {
                format!("History capacity must be at least 1 (got {})", capacity)
            }
            ConfigError::UnknownExercise { exercise } => {
                format!("No configuration registered for exercise '{}'", exercise)
            }
            ConfigError::InvalidVisibility { value } => {
                format!("Minimum visibility must be in [0, 1] (got {})", value)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::InvalidThresholds {
                extended: 100.0,
                flexed: 120.0
            }
            .code(),
            ConfigErrorCodes::INVALID_THRESHOLDS
        );
        assert_eq!(
            ConfigError::ThresholdOutOfRange {
                name: "flexed_threshold".to_string(),
                value: -3.0
            }
            .code(),
            ConfigErrorCodes::THRESHOLD_OUT_OF_RANGE
        );
        assert_eq!(
            ConfigError::InvalidHistoryCapacity { capacity: 0 }.code(),
            ConfigErrorCodes::INVALID_HISTORY_CAPACITY
        );
        assert_eq!(
            ConfigError::UnknownExercise {
                exercise: "squat".to_string()
            }
            .code(),
            ConfigErrorCodes::UNKNOWN_EXERCISE
        );
        assert_eq!(
            ConfigError::InvalidVisibility { value: 1.5 }.code(),
            ConfigErrorCodes::INVALID_VISIBILITY
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::InvalidThresholds {
            extended: 100.0,
            flexed: 120.0,
        };
        assert_eq!(
            err.message(),
            "Extended threshold (100) must be greater than flexed threshold (120)"
        );

        let err = ConfigError::InvalidHistoryCapacity { capacity: 0 };
        assert_eq!(err.message(), "History capacity must be at least 1 (got 0)");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidHistoryCapacity { capacity: 0 };
        let display = format!("{}", err);
        assert!(display.contains("ConfigError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
