// Error types for the rep tracker
//
// This module defines custom error types for configuration validation and
// landmark extraction, providing structured error handling with numeric codes
// suitable for hosts that surface errors across a process or language boundary.

mod config;
mod landmark;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use landmark::{log_landmark_error, LandmarkError, LandmarkErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling for
/// whatever host drives the tracker.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
