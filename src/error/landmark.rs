// Landmark extraction error types and constants

use crate::error::ErrorCode;
use crate::landmarks::LandmarkId;
use log::debug;
use std::fmt;

/// Landmark error code constants
///
/// Error code range: 4001-4004
pub struct LandmarkErrorCodes {}

impl LandmarkErrorCodes {
    /// The pose engine reported no person in the frame
    pub const NO_POSE: i32 = 4001;

    /// A required landmark is absent from the frame
    pub const MISSING: i32 = 4002;

    /// A required landmark was detected with too little visibility
    pub const LOW_VISIBILITY: i32 = 4003;

    /// Indexed landmark list does not match the pose model size
    pub const INVALID_LANDMARK_COUNT: i32 = 4004;
}

/// Log a landmark error with structured context
///
/// Landmark errors are per-frame skips rather than failures, so they are
/// reported at debug level.
pub fn log_landmark_error(err: &LandmarkError, context: &str) {
    debug!(
        "Landmark error in {}: code={}, component=LandmarkExtractor, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Reasons the extraction adapter could not produce a landmark triple
///
/// Every variant means "unavailable": the caller skips the frame and keeps
/// the previous stage, counter and angle.
///
/// Error code range: 4001-4004
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LandmarkError {
    /// No pose detected in the frame
    NoPose,

    /// Landmark not present in the frame's landmark set
    Missing { landmark: LandmarkId },

    /// Landmark present but below the visibility gate
    LowVisibility {
        landmark: LandmarkId,
        visibility: f64,
        min: f64,
    },

    /// Indexed landmark list has the wrong length
    InvalidLandmarkCount { expected: usize, actual: usize },
}

impl ErrorCode for LandmarkError {
    fn code(&self) -> i32 {
        match self {
            LandmarkError::NoPose => LandmarkErrorCodes::NO_POSE,
            LandmarkError::Missing { .. } => LandmarkErrorCodes::MISSING,
            LandmarkError::LowVisibility { .. } => LandmarkErrorCodes::LOW_VISIBILITY,
            LandmarkError::InvalidLandmarkCount { .. } => {
                LandmarkErrorCodes::INVALID_LANDMARK_COUNT
            }
        }
    }

    fn message(&self) -> String {
        match self {
            LandmarkError::NoPose => "No pose detected in frame".to_string(),
            LandmarkError::Missing { landmark } => {
                format!("Landmark {} missing from frame", landmark)
            }
            LandmarkError::LowVisibility {
                landmark,
                visibility,
                min,
            } => format!(
                "Landmark {} visibility {:.2} below minimum {:.2}",
                landmark, visibility, min
            ),
            LandmarkError::InvalidLandmarkCount { expected, actual } => {
                format!("Expected {} landmarks, got {}", expected, actual)
            }
        }
    }
}

impl fmt::Display for LandmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LandmarkError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for LandmarkError {}
